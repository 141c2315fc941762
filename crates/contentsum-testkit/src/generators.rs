//! Proptest generators for property-based testing.

use proptest::prelude::*;

use contentsum_core::{ShipHull, ShipSlotType, Slot};
use contentsum_registry::ContentTable;

/// Generate a slot type, including the invalid sentinel.
pub fn slot_type() -> impl Strategy<Value = ShipSlotType> {
    prop_oneof![
        Just(ShipSlotType::Invalid),
        Just(ShipSlotType::External),
        Just(ShipSlotType::Internal),
        Just(ShipSlotType::Core),
    ]
}

/// Generate a slot with a position inside the unit square.
pub fn slot() -> impl Strategy<Value = Slot> {
    (slot_type(), 0.0f64..=1.0, 0.0f64..=1.0).prop_map(|(t, x, y)| Slot::new(t, x, y))
}

/// Generate a content name.
pub fn content_name() -> impl Strategy<Value = String> {
    "SH_[A-Z][A-Z0-9_]{0,15}".prop_map(String::from)
}

/// Generate a non-negative stat value.
pub fn stat() -> impl Strategy<Value = f32> {
    prop_oneof![Just(0.0f32), 0.0f32..1000.0]
}

/// Parameters for generating a hull.
#[derive(Debug, Clone)]
pub struct HullParams {
    pub name: String,
    pub description: String,
    pub speed: f32,
    pub fuel: f32,
    pub stealth: f32,
    pub structure: f32,
    pub producible: bool,
    pub slots: Vec<Slot>,
    pub tags: Vec<String>,
}

impl Arbitrary for HullParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            content_name(),
            "[a-zA-Z ]{0,40}",
            stat(),
            stat(),
            stat(),
            stat(),
            any::<bool>(),
            prop::collection::vec(slot(), 0..8),
            prop::collection::vec("[A-Z_]{1,12}", 0..4),
        )
            .prop_map(
                |(name, description, speed, fuel, stealth, structure, producible, slots, tags)| {
                    HullParams {
                        name,
                        description,
                        speed,
                        fuel,
                        stealth,
                        structure,
                        producible,
                        slots,
                        tags,
                    }
                },
            )
            .boxed()
    }
}

/// Build a hull from parameters.
pub fn hull_from_params(params: &HullParams) -> ShipHull {
    let mut builder = ShipHull::builder(params.name.clone())
        .description(params.description.clone())
        .speed(params.speed)
        .fuel(params.fuel)
        .stealth(params.stealth)
        .structure(params.structure)
        .producible(params.producible)
        .slots(params.slots.iter().copied());
    for tag in &params.tags {
        builder = builder.tag(tag.clone());
    }
    builder.build()
}

/// Generate a hull.
pub fn ship_hull() -> impl Strategy<Value = ShipHull> {
    any::<HullParams>().prop_map(|params| hull_from_params(&params))
}

/// Generate hulls with distinct names.
pub fn distinct_hulls(max_len: usize) -> impl Strategy<Value = Vec<ShipHull>> {
    prop::collection::btree_map(content_name(), any::<HullParams>(), 0..=max_len).prop_map(
        |by_name| {
            by_name
                .into_iter()
                .map(|(name, params)| hull_from_params(&HullParams { name, ..params }))
                .collect()
        },
    )
}

/// Build a table from hulls with distinct names.
pub fn table_from_hulls(hulls: Vec<ShipHull>) -> ContentTable<ShipHull> {
    ContentTable::from_map(
        hulls
            .into_iter()
            .map(|hull| (hull.name().to_owned(), hull))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use contentsum_core::{CheckSum, CHECKSUM_MODULUS};

    proptest! {
        #[test]
        fn test_hull_checksum_deterministic(params: HullParams) {
            let h1 = hull_from_params(&params);
            let h2 = hull_from_params(&params);

            prop_assert_eq!(h1.checksum(), h2.checksum());
            prop_assert!(h1.checksum() < CHECKSUM_MODULUS);
        }

        #[test]
        fn test_table_checksum_ignores_insertion_order(hulls in distinct_hulls(12)) {
            let forward = table_from_hulls(hulls.clone());
            let mut reversed = hulls;
            reversed.reverse();
            let backward = ContentTable::from_items(reversed).unwrap();

            prop_assert_eq!(forward.checksum(), backward.checksum());
            prop_assert!(forward.checksum() < CHECKSUM_MODULUS);
        }

        #[test]
        fn test_slot_checksum_in_range(s in slot()) {
            prop_assert!(s.checksum() < CHECKSUM_MODULUS);
        }

        #[test]
        fn test_description_change_detected(params: HullParams, suffix in "[a-z]{1,8}") {
            let original = hull_from_params(&params);
            let changed = hull_from_params(&HullParams {
                description: format!("{}{}", params.description, suffix),
                ..params
            });
            prop_assert_ne!(original.checksum(), changed.checksum());
        }
    }
}
