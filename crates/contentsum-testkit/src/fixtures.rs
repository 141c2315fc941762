//! Test fixtures and helpers.
//!
//! Common setup code for integration tests and benchmarks.

use contentsum_core::{
    Condition, Effect, EffectsGroup, MeterType, ShipHull, ShipSlotType, Slot, ValueRef,
};
use contentsum_registry::{ContentRegistry, ContentTable, RegistryConfig};

/// A small, realistic set of hull definitions.
pub fn sample_hulls() -> Vec<ShipHull> {
    vec![
        ShipHull::builder("SH_BASIC_SMALL")
            .description("SH_BASIC_SMALL_DESC")
            .speed(75.0)
            .fuel(5.0)
            .stealth(5.0)
            .structure(8.0)
            .producible(true)
            .production_cost(ValueRef::Constant(10.0))
            .production_time(ValueRef::Constant(2))
            .slot(Slot::new(ShipSlotType::External, 0.5, 0.5))
            .tag("peaceful")
            .location(Condition::OwnedBy { empire_id: 1 })
            .graphic("hulls_design/basic-small-hull.png")
            .icon("icons/ship_hulls/basic-small-hull_small.png")
            .build(),
        ShipHull::builder("SH_BASIC_MEDIUM")
            .description("SH_BASIC_MEDIUM_DESC")
            .speed(75.0)
            .fuel(3.0)
            .stealth(5.0)
            .structure(20.0)
            .producible(true)
            .production_cost(ValueRef::Constant(18.0))
            .production_time(ValueRef::Constant(2))
            .slots([
                Slot::new(ShipSlotType::External, 0.30, 0.50),
                Slot::new(ShipSlotType::Internal, 0.60, 0.50),
            ])
            .graphic("hulls_design/basic-medium-hull.png")
            .build(),
        ShipHull::builder("SH_ROBOTIC")
            .description("SH_ROBOTIC_DESC")
            .speed(75.0)
            .fuel(2.0)
            .stealth(5.0)
            .structure(200.0)
            .producible(true)
            .production_cost(ValueRef::Constant(40.0))
            .production_time(ValueRef::Constant(2))
            .slots([
                Slot::new(ShipSlotType::External, 0.20, 0.15),
                Slot::new(ShipSlotType::External, 0.40, 0.15),
                Slot::new(ShipSlotType::External, 0.60, 0.15),
                Slot::new(ShipSlotType::External, 0.80, 0.15),
                Slot::new(ShipSlotType::Internal, 0.50, 0.50),
            ])
            .tag("robotic")
            .meter_consumption(MeterType::Industry, Some(ValueRef::Constant(1.0)), None)
            .exclusion("SH_BASIC_SMALL")
            .effects_group(EffectsGroup {
                scope: Some(Condition::Source),
                activation: None,
                stacking_group: String::from("ROBOTIC_REPAIR"),
                effects: vec![Effect {
                    name: String::from("SetStructure"),
                    magnitude: Some(ValueRef::Constant(10.0)),
                }],
                accounting_label: String::new(),
                priority: 0,
            })
            .graphic("hulls_design/robotic-hull.png")
            .build(),
    ]
}

/// A table of [`sample_hulls`].
pub fn sample_table() -> ContentTable<ShipHull> {
    table_of(sample_hulls())
}

/// Build a table, panicking on duplicate names.
pub fn table_of(hulls: Vec<ShipHull>) -> ContentTable<ShipHull> {
    ContentTable::from_items(hulls).expect("fixture hull names are unique")
}

/// `count` distinct hulls named `SH_GEN_0000`, `SH_GEN_0001`, ...
pub fn generated_hulls(count: usize) -> Vec<ShipHull> {
    (0..count)
        .map(|i| {
            ShipHull::builder(format!("SH_GEN_{i:04}"))
                .speed(50.0 + i as f32)
                .structure(10.0 * (i % 7) as f32)
                .slots((0..(i % 5)).map(|s| {
                    Slot::new(
                        ShipSlotType::VALID[s % ShipSlotType::VALID.len()],
                        0.1 + 0.2 * s as f64,
                        0.5,
                    )
                }))
                .build()
        })
        .collect()
}

/// A registry with [`sample_hulls`] installed.
pub fn populated_registry(category: &str) -> ContentRegistry<ShipHull> {
    let registry = ContentRegistry::new(RegistryConfig::for_category(category));
    registry.replace(sample_table());
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use contentsum_registry::{RegistryState, StaticLoader};

    #[test]
    fn test_sample_hulls_unique_names() {
        let table = sample_table();
        assert_eq!(table.len(), sample_hulls().len());
    }

    #[test]
    fn test_populated_registry() {
        let registry = populated_registry("hulls");
        assert_eq!(registry.state(), RegistryState::Populated);
        assert_eq!(registry.size(), 3);
        assert_eq!(registry.checksum(), sample_table().checksum());
        assert_eq!(
            registry.lookup("SH_ROBOTIC").map(|h| h.num_slots()),
            Some(5)
        );
    }

    #[test]
    fn test_generated_hulls_unique() {
        let table = table_of(generated_hulls(50));
        assert_eq!(table.len(), 50);
    }

    #[tokio::test]
    async fn test_static_loader_fixture() {
        let registry: ContentRegistry<ShipHull> = ContentRegistry::default();
        let loaded = registry
            .load_from(&StaticLoader::new(sample_table()))
            .await
            .unwrap();
        assert_eq!(loaded, 3);
        assert_eq!(registry.checksum(), sample_table().checksum());
    }
}
