//! Running-sum checksum combination.
//!
//! Every value that takes part in a content checksum is folded into a
//! [`RunningSum`] through the [`Combine`] trait. Each Rust type has exactly one
//! `Combine` impl, so the category a value falls into is fixed at compile time.
//! When a type could fit several categories, the rule it uses follows this
//! precedence, most specific first:
//!
//! 1. Composite: types implementing [`CheckSum`] add their own checksum
//!    (wired up by [`impl_combine_for_checksum!`]).
//! 2. Optional reference: `Option<T>`, `&T`, `Box<T>`, `Rc<T>`, `Arc<T>`.
//!    Absence adds nothing.
//! 3. Pair: `(A, B)`, first then second.
//! 4. Enumeration: types implementing [`ChecksumEnum`] combine
//!    `ordinal + ENUM_OFFSET` as a signed integer
//!    (wired up by [`impl_combine_for_enum!`]).
//! 5. Sequences and ordered maps: each element's contribution weighted by its
//!    1-based position in iteration order, then the count.
//! 6. Floating point: log-scale fixed-point code.
//! 7. Integers: absolute value (signed) or value (unsigned).
//! 8. Text: the UTF-8 bytes as a sequence (position weighted), then the byte length.
//!
//! Hash-ordered collections (`HashMap`, `HashSet`) intentionally have no
//! `Combine` impl: their iteration order is not stable across processes.
//!
//! The sum is reduced modulo [`CHECKSUM_MODULUS`] after every step, so it always
//! lies in `[0, CHECKSUM_MODULUS)`.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

/// Modulus applied after every combination step.
pub const CHECKSUM_MODULUS: u32 = 10_000_000;

/// Offset added to enumeration ordinals so they don't collide with small integers.
pub const ENUM_OFFSET: i32 = 10;

/// Contribution of a NaN floating-point value.
pub const NAN_SENTINEL: u32 = 9_999_001;

/// Contribution of a positive or negative infinity.
pub const INFINITY_SENTINEL: u32 = 9_999_002;

/// The accumulator threaded through a checksum computation.
///
/// Invariant: the wrapped value is always below [`CHECKSUM_MODULUS`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunningSum(u32);

impl RunningSum {
    /// A fresh sum starting at zero.
    pub const fn new() -> Self {
        Self(0)
    }

    /// The current reduced value.
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Add an unsigned quantity and reduce.
    ///
    /// The addend is reduced before it is added, so arbitrarily wide inputs
    /// never overflow the 32-bit accumulator.
    pub fn add(&mut self, addend: impl Into<u128>) {
        let modulus = u128::from(CHECKSUM_MODULUS);
        let reduced = addend.into() % modulus;
        self.0 = ((u128::from(self.0) + reduced) % modulus) as u32;
    }

    /// Fold a value into this sum. Returns `self` so calls can be chained.
    pub fn combine<C: Combine + ?Sized>(&mut self, value: &C) -> &mut Self {
        value.combine_into(self);
        self
    }
}

impl From<RunningSum> for u32 {
    fn from(sum: RunningSum) -> Self {
        sum.0
    }
}

/// A value that can be folded into a [`RunningSum`].
pub trait Combine {
    /// Update `sum` in place with this value's contribution.
    fn combine_into(&self, sum: &mut RunningSum);
}

/// A composite that reports its own checksum.
///
/// The checksum is the running sum obtained by combining the composite's
/// fields, in one fixed declared order, starting from zero. The field order is
/// part of the type's contract.
pub trait CheckSum {
    /// Compute the fully reduced checksum of this value.
    fn checksum(&self) -> u32;
}

/// A closed enumeration with a stable signed ordinal.
pub trait ChecksumEnum {
    /// The ordinal used for checksums. Must not change between releases.
    fn ordinal(&self) -> i32;
}

/// Fold `value` into `sum`.
pub fn combine<C: Combine + ?Sized>(sum: &mut RunningSum, value: &C) {
    value.combine_into(sum);
}

/// Checksum of a single value folded into a fresh sum.
pub fn checksum_of<C: Combine + ?Sized>(value: &C) -> u32 {
    let mut sum = RunningSum::new();
    value.combine_into(&mut sum);
    sum.value()
}

/// Composite rule: add the self-reported checksum.
pub fn combine_checksum<C: CheckSum + ?Sized>(sum: &mut RunningSum, composite: &C) {
    let own = composite.checksum();
    tracing::trace!(
        kind = std::any::type_name::<C>(),
        checksum = own,
        "combine composite"
    );
    sum.add(own);
}

/// Enumeration rule: combine `ordinal + ENUM_OFFSET` as a signed integer.
pub fn combine_enum<E: ChecksumEnum + ?Sized>(sum: &mut RunningSum, value: &E) {
    let shifted = i64::from(value.ordinal()) + i64::from(ENUM_OFFSET);
    shifted.combine_into(sum);
}

/// Borrowed view that combines any [`CheckSum`] type by the composite rule.
///
/// Lets generic containers fold items that only promise `CheckSum`.
#[derive(Debug)]
pub struct Composite<'a, C: ?Sized>(pub &'a C);

impl<C: CheckSum + ?Sized> Combine for Composite<'_, C> {
    fn combine_into(&self, sum: &mut RunningSum) {
        combine_checksum(sum, self.0);
    }
}

/// Implement [`Combine`] for types that implement [`CheckSum`].
///
/// ```
/// use contentsum_core::checksum::{CheckSum, RunningSum};
///
/// struct Marker(u32);
///
/// impl CheckSum for Marker {
///     fn checksum(&self) -> u32 {
///         let mut sum = RunningSum::new();
///         sum.combine(&self.0);
///         sum.value()
///     }
/// }
///
/// contentsum_core::impl_combine_for_checksum!(Marker);
/// ```
#[macro_export]
macro_rules! impl_combine_for_checksum {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::checksum::Combine for $ty {
                fn combine_into(&self, sum: &mut $crate::checksum::RunningSum) {
                    $crate::checksum::combine_checksum(sum, self);
                }
            }
        )+
    };
}

/// Implement [`Combine`] for types that implement [`ChecksumEnum`].
#[macro_export]
macro_rules! impl_combine_for_enum {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::checksum::Combine for $ty {
                fn combine_into(&self, sum: &mut $crate::checksum::RunningSum) {
                    $crate::checksum::combine_enum(sum, self);
                }
            }
        )+
    };
}

// ─────────────────────────────────────────────────────────────────────────────
// Optional references
// ─────────────────────────────────────────────────────────────────────────────

impl<T: Combine> Combine for Option<T> {
    fn combine_into(&self, sum: &mut RunningSum) {
        if let Some(value) = self {
            value.combine_into(sum);
        }
    }
}

impl<T: Combine + ?Sized> Combine for &T {
    fn combine_into(&self, sum: &mut RunningSum) {
        (**self).combine_into(sum);
    }
}

impl<T: Combine + ?Sized> Combine for Box<T> {
    fn combine_into(&self, sum: &mut RunningSum) {
        (**self).combine_into(sum);
    }
}

impl<T: Combine + ?Sized> Combine for Rc<T> {
    fn combine_into(&self, sum: &mut RunningSum) {
        (**self).combine_into(sum);
    }
}

impl<T: Combine + ?Sized> Combine for Arc<T> {
    fn combine_into(&self, sum: &mut RunningSum) {
        (**self).combine_into(sum);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pairs
// ─────────────────────────────────────────────────────────────────────────────

impl<A: Combine, B: Combine> Combine for (A, B) {
    fn combine_into(&self, sum: &mut RunningSum) {
        self.0.combine_into(sum);
        self.1.combine_into(sum);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sequences
// ─────────────────────────────────────────────────────────────────────────────

/// Sequence rule: each element's own contribution is weighted by its
/// 1-based position, then the element count is added. Reordering elements
/// changes the result.
fn combine_elements<I>(sum: &mut RunningSum, elements: I, len: usize)
where
    I: IntoIterator,
    I::Item: Combine,
{
    for (index, element) in elements.into_iter().enumerate() {
        let contribution = u128::from(checksum_of(&element));
        sum.add(contribution * (index as u128 + 1));
    }
    sum.add(len as u128);
}

impl<T: Combine> Combine for [T] {
    fn combine_into(&self, sum: &mut RunningSum) {
        combine_elements(sum, self, self.len());
    }
}

impl<T: Combine, const N: usize> Combine for [T; N] {
    fn combine_into(&self, sum: &mut RunningSum) {
        combine_elements(sum, self, N);
    }
}

impl<T: Combine> Combine for Vec<T> {
    fn combine_into(&self, sum: &mut RunningSum) {
        self.as_slice().combine_into(sum);
    }
}

impl<T: Combine> Combine for VecDeque<T> {
    fn combine_into(&self, sum: &mut RunningSum) {
        combine_elements(sum, self, self.len());
    }
}

impl<T: Combine> Combine for BTreeSet<T> {
    fn combine_into(&self, sum: &mut RunningSum) {
        combine_elements(sum, self, self.len());
    }
}

/// Entries are combined as `(key, value)` pairs in ascending key order.
impl<K: Combine, V: Combine> Combine for BTreeMap<K, V> {
    fn combine_into(&self, sum: &mut RunningSum) {
        combine_elements(sum, self.iter(), self.len());
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Floating point
// ─────────────────────────────────────────────────────────────────────────────

/// Log-scale code for an `f64`: `(log10(|t|) + 400) * 10_000`, truncated.
///
/// Doubles span roughly 1e-308..1e308, which maps to codes in about
/// `[0, 8_100_000)`. Deep subnormals produce a negative intermediate and
/// saturate to 0.
fn f64_code(value: f64) -> u32 {
    if value == 0.0 {
        0
    } else if value.is_nan() {
        NAN_SENTINEL
    } else if value.is_infinite() {
        INFINITY_SENTINEL
    } else {
        ((value.abs().log10() + 400.0) * 10_000.0) as u32
    }
}

/// Log-scale code for an `f32`: `(log10(|t|) + 40) * 100_000`, computed in `f32`.
fn f32_code(value: f32) -> u32 {
    if value == 0.0 {
        0
    } else if value.is_nan() {
        NAN_SENTINEL
    } else if value.is_infinite() {
        INFINITY_SENTINEL
    } else {
        ((value.abs().log10() + 40.0) * 100_000.0) as u32
    }
}

impl Combine for f64 {
    fn combine_into(&self, sum: &mut RunningSum) {
        sum.add(f64_code(*self));
    }
}

impl Combine for f32 {
    fn combine_into(&self, sum: &mut RunningSum) {
        sum.add(f32_code(*self));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Integers
// ─────────────────────────────────────────────────────────────────────────────

macro_rules! combine_signed {
    ($($ty:ty),*) => {
        $(
            impl Combine for $ty {
                fn combine_into(&self, sum: &mut RunningSum) {
                    sum.add(self.unsigned_abs() as u128);
                }
            }
        )*
    };
}

macro_rules! combine_unsigned {
    ($($ty:ty),*) => {
        $(
            impl Combine for $ty {
                fn combine_into(&self, sum: &mut RunningSum) {
                    sum.add(*self as u128);
                }
            }
        )*
    };
}

combine_signed!(i8, i16, i32, i64, i128, isize);
combine_unsigned!(u8, u16, u32, u64, u128, usize);

impl Combine for bool {
    fn combine_into(&self, sum: &mut RunningSum) {
        sum.add(u8::from(*self));
    }
}

impl Combine for char {
    fn combine_into(&self, sum: &mut RunningSum) {
        sum.add(u32::from(*self));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Text
// ─────────────────────────────────────────────────────────────────────────────

impl Combine for str {
    fn combine_into(&self, sum: &mut RunningSum) {
        combine_elements(sum, self.bytes(), self.len());
    }
}

impl Combine for String {
    fn combine_into(&self, sum: &mut RunningSum) {
        self.as_str().combine_into(sum);
    }
}

impl Combine for Cow<'_, str> {
    fn combine_into(&self, sum: &mut RunningSum) {
        self.as_ref().combine_into(sum);
    }
}
