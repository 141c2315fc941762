//! # Contentsum Core
//!
//! Pure primitives for content checksums: the running sum, the combine
//! engine, and the hull content model.
//!
//! This crate contains no I/O, no storage, no async. It is pure computation
//! over already-parsed content.
//!
//! ## Key Types
//!
//! - [`RunningSum`] - The accumulator, always reduced below [`CHECKSUM_MODULUS`]
//! - [`Combine`] - How a value folds into a running sum
//! - [`CheckSum`] - Composites that report their own checksum
//! - [`ShipHull`] - A hull definition, the content item checksummed per category
//! - [`Slot`] - A typed slot position on a hull
//!
//! ## Determinism
//!
//! A checksum depends only on field values and declared field order: never on
//! addresses, hash seeds, or insertion order of ordered maps. See the
//! [`checksum`] module for the exact combination rules.

pub mod checksum;
pub mod hull;
pub mod script;

pub use checksum::{
    checksum_of, combine, CheckSum, ChecksumEnum, Combine, Composite, RunningSum, CHECKSUM_MODULUS,
    ENUM_OFFSET, INFINITY_SENTINEL, NAN_SENTINEL,
};
pub use hull::{ConsumptionMap, ShipHull, ShipHullBuilder, ShipSlotType, Slot};
pub use script::{Condition, Effect, EffectsGroup, MeterType, OpType, ReferenceType, ValueRef};
