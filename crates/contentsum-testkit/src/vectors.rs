//! Golden test vectors for deterministic verification.
//!
//! These vectors pin the combine rules down to exact numbers, so that every
//! build of the engine (and any reimplementation that must interoperate with
//! it) produces identical checksums.

use contentsum_core::{checksum_of, CheckSum, ShipHull, ShipSlotType, Slot};
use contentsum_registry::ContentTable;

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// How the expected value is derived.
    pub description: &'static str,
    /// Produces the value under test.
    pub compute: fn() -> u32,
    /// Expected checksum.
    pub expected: u32,
}

/// The minimal hull used by the hull vectors: name "H", one centred external slot.
pub fn minimal_hull() -> ShipHull {
    ShipHull::builder("H")
        .slot(Slot::new(ShipSlotType::External, 0.5, 0.5))
        .build()
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "external slot at (0.5, 0.5)",
            description: "enum 0+10, then code(0.5) = 3996989 twice",
            compute: || Slot::new(ShipSlotType::External, 0.5, 0.5).checksum(),
            expected: 7_993_988,
        },
        GoldenVector {
            name: "default slot",
            description: "invalid type -1+10, then code(0.5) twice",
            compute: || Slot::default().checksum(),
            expected: 7_993_987,
        },
        GoldenVector {
            name: "text AB",
            description: "65*1 + 66*2, then length 2",
            compute: || checksum_of("AB"),
            expected: 199,
        },
        GoldenVector {
            name: "integer sequence 1,2,3",
            description: "1*1 + 2*2 + 3*3, then length 3",
            compute: || checksum_of(&vec![1i32, 2, 3]),
            expected: 17,
        },
        GoldenVector {
            name: "f64 one",
            description: "(log10(1) + 400) * 10000",
            compute: || checksum_of(&1.0f64),
            expected: 4_000_000,
        },
        GoldenVector {
            name: "f64 hundred",
            description: "(log10(100) + 400) * 10000",
            compute: || checksum_of(&100.0f64),
            expected: 4_020_000,
        },
        GoldenVector {
            name: "i64 minimum",
            description: "|i64::MIN| mod 10^7",
            compute: || checksum_of(&i64::MIN),
            expected: 4_775_808,
        },
        GoldenVector {
            name: "minimal hull",
            description: "name 73 + speed code(1.0f32) 4000000 + slots 7993989, reduced",
            compute: || minimal_hull().checksum(),
            expected: 1_994_062,
        },
        GoldenVector {
            name: "empty table",
            description: "no entries, count 0",
            compute: || ContentTable::<ShipHull>::new().checksum(),
            expected: 0,
        },
        GoldenVector {
            name: "single hull table",
            description: "pair (\"H\" 73, hull 1994062) at position 1, then count 1",
            compute: || {
                ContentTable::from_items(vec![minimal_hull()])
                    .map(|table| table.checksum())
                    .unwrap_or(u32::MAX)
            },
            expected: 1_994_136,
        },
    ]
}

/// Run every vector and report `(name, matches, actual)`.
///
/// Call this to verify your build matches the reference values.
pub fn verify_all_vectors() -> Vec<(String, bool, u32)> {
    all_vectors()
        .iter()
        .map(|v| {
            let actual = (v.compute)();
            (v.name.to_string(), actual == v.expected, actual)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_match() {
        for (name, matches, actual) in verify_all_vectors() {
            assert!(matches, "vector '{name}' produced {actual}");
        }
    }

    #[test]
    fn test_vectors_are_deterministic() {
        for vector in all_vectors() {
            assert_eq!(
                (vector.compute)(),
                (vector.compute)(),
                "vector '{}' changed on recomputation",
                vector.name
            );
        }
    }

    #[test]
    fn test_vector_names_unique() {
        let vectors = all_vectors();
        let mut names: Vec<_> = vectors.iter().map(|v| v.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), vectors.len());
    }
}
