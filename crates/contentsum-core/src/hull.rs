//! Hull definitions: the base on which ship designs are built.
//!
//! A [`ShipHull`] is constructed once by the content parser (through
//! [`ShipHullBuilder`]) and is immutable afterwards. Its checksum folds every
//! field in a fixed order, so two processes that parsed the same content files
//! agree on the value.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::checksum::{CheckSum, ChecksumEnum, RunningSum};
use crate::script::{Condition, Effect, EffectsGroup, MeterType, OpType, ReferenceType, ValueRef};
use crate::{impl_combine_for_checksum, impl_combine_for_enum};

/// Consumption of some resource during production, keyed by what is consumed.
///
/// Each entry pairs the amount consumed with an optional condition that
/// limits when it applies.
pub type ConsumptionMap<K> =
    std::collections::BTreeMap<K, (Option<ValueRef<f64>>, Option<Condition>)>;

/// Types of slots in a hull. Parts may be restricted to certain slot types.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[repr(i32)]
pub enum ShipSlotType {
    #[default]
    Invalid = -1,
    /// More easily damaged.
    External = 0,
    /// More protected, fewer in number.
    Internal = 1,
    Core = 2,
}

impl ShipSlotType {
    /// All valid slot types, in ordinal order.
    pub const VALID: [ShipSlotType; 3] = [Self::External, Self::Internal, Self::Core];
}

impl ChecksumEnum for ShipSlotType {
    fn ordinal(&self) -> i32 {
        *self as i32
    }
}

impl fmt::Display for ShipSlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Invalid => "INVALID_SHIP_SLOT_TYPE",
            Self::External => "SL_EXTERNAL",
            Self::Internal => "SL_INTERNAL",
            Self::Core => "SL_CORE",
        };
        f.write_str(name)
    }
}

/// A slot on a hull: its type plus a position on the design screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    #[serde(rename = "type")]
    pub slot_type: ShipSlotType,
    pub x: f64,
    pub y: f64,
}

impl Slot {
    pub fn new(slot_type: ShipSlotType, x: f64, y: f64) -> Self {
        Self { slot_type, x, y }
    }
}

impl Default for Slot {
    fn default() -> Self {
        Self {
            slot_type: ShipSlotType::Invalid,
            x: 0.5,
            y: 0.5,
        }
    }
}

impl CheckSum for Slot {
    fn checksum(&self) -> u32 {
        let mut sum = RunningSum::new();
        sum.combine(&self.slot_type)
            .combine(&self.x)
            .combine(&self.y);
        sum.value()
    }
}

/// Specification for a hull.
///
/// The hull determines some final design characteristics directly, and also
/// how many parts can be added to a design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ShipHullBuilder")]
pub struct ShipHull {
    name: String,
    description: String,
    speed: f32,
    fuel: f32,
    stealth: f32,
    structure: f32,
    producible: bool,
    production_cost: Option<ValueRef<f64>>,
    production_time: Option<ValueRef<i32>>,
    slots: Vec<Slot>,
    tags: Vec<String>,
    production_meter_consumption: ConsumptionMap<MeterType>,
    production_special_consumption: ConsumptionMap<String>,
    location: Option<Condition>,
    exclusions: BTreeSet<String>,
    effects: Vec<EffectsGroup>,
    graphic: String,
    icon: String,
}

impl ShipHull {
    /// Start building a hull with the given unique name.
    pub fn builder(name: impl Into<String>) -> ShipHullBuilder {
        ShipHullBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Description, including the stats and effects of this hull.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Starlane speed.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Fuel capacity.
    pub fn fuel(&self) -> f32 {
        self.fuel
    }

    pub fn stealth(&self) -> f32 {
        self.stealth
    }

    pub fn structure(&self) -> f32 {
        self.structure
    }

    /// Hulls carry no shields of their own.
    pub fn shields(&self) -> f32 {
        0.0
    }

    pub fn colony_capacity(&self) -> f32 {
        0.0
    }

    pub fn troop_capacity(&self) -> f32 {
        0.0
    }

    pub fn detection(&self) -> f32 {
        0.0
    }

    /// Whether players can produce this hull and see it on the design screen.
    pub fn producible(&self) -> bool {
        self.producible
    }

    pub fn production_cost(&self) -> Option<&ValueRef<f64>> {
        self.production_cost.as_ref()
    }

    pub fn production_time(&self) -> Option<&ValueRef<i32>> {
        self.production_time.as_ref()
    }

    /// True if production cost and time do not depend on the location.
    pub fn production_cost_time_location_invariant(&self) -> bool {
        let cost = self
            .production_cost
            .as_ref()
            .map_or(true, ValueRef::target_invariant);
        let time = self
            .production_time
            .as_ref()
            .map_or(true, ValueRef::target_invariant);
        cost && time
    }

    pub fn production_meter_consumption(&self) -> &ConsumptionMap<MeterType> {
        &self.production_meter_consumption
    }

    pub fn production_special_consumption(&self) -> &ConsumptionMap<String> {
        &self.production_special_consumption
    }

    /// Total number of slots.
    pub fn num_slots(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots of the given type.
    pub fn num_slots_of(&self, slot_type: ShipSlotType) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.slot_type == slot_type)
            .count()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Tags, upper-cased, in declaration order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Condition on where designs using this hull can be produced.
    pub fn location(&self) -> Option<&Condition> {
        self.location.as_ref()
    }

    /// Names of other content that cannot share a design with this hull.
    pub fn exclusions(&self) -> &BTreeSet<String> {
        &self.exclusions
    }

    pub fn effects(&self) -> &[EffectsGroup] {
        &self.effects
    }

    /// Image shown on the design screen.
    pub fn graphic(&self) -> &str {
        &self.graphic
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }
}

impl CheckSum for ShipHull {
    fn checksum(&self) -> u32 {
        let mut sum = RunningSum::new();
        sum.combine(&self.name)
            .combine(&self.description)
            .combine(&self.speed)
            .combine(&self.fuel)
            .combine(&self.stealth)
            .combine(&self.structure)
            .combine(&self.production_cost)
            .combine(&self.production_time)
            .combine(&self.producible)
            .combine(&self.slots)
            .combine(&self.tags)
            .combine(&self.production_meter_consumption)
            .combine(&self.production_special_consumption)
            .combine(&self.location)
            .combine(&self.exclusions)
            .combine(&self.effects)
            .combine(&self.graphic)
            .combine(&self.icon);
        sum.value()
    }
}

impl_combine_for_enum!(ShipSlotType);
impl_combine_for_checksum!(Slot, ShipHull);

/// Builder for [`ShipHull`], used by content parsers.
///
/// Also the deserialisation form of a hull, so hulls read from data go
/// through the same normalisation as hulls built in code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipHullBuilder {
    name: String,
    description: String,
    speed: f32,
    fuel: f32,
    stealth: f32,
    structure: f32,
    default_fuel_effects: bool,
    default_speed_effects: bool,
    default_stealth_effects: bool,
    default_structure_effects: bool,
    producible: bool,
    production_cost: Option<ValueRef<f64>>,
    production_time: Option<ValueRef<i32>>,
    slots: Vec<Slot>,
    tags: Vec<String>,
    production_meter_consumption: ConsumptionMap<MeterType>,
    production_special_consumption: ConsumptionMap<String>,
    location: Option<Condition>,
    exclusions: BTreeSet<String>,
    effects: Vec<EffectsGroup>,
    graphic: String,
    icon: String,
}

impl Default for ShipHullBuilder {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl ShipHullBuilder {
    /// Create a builder with default stats (speed 1, everything else zero or empty).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            speed: 1.0,
            fuel: 0.0,
            stealth: 0.0,
            structure: 0.0,
            default_fuel_effects: false,
            default_speed_effects: false,
            default_stealth_effects: false,
            default_structure_effects: false,
            producible: false,
            production_cost: None,
            production_time: None,
            slots: Vec::new(),
            tags: Vec::new(),
            production_meter_consumption: ConsumptionMap::new(),
            production_special_consumption: ConsumptionMap::new(),
            location: None,
            exclusions: BTreeSet::new(),
            effects: Vec::new(),
            graphic: String::new(),
            icon: String::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn fuel(mut self, fuel: f32) -> Self {
        self.fuel = fuel;
        self
    }

    pub fn stealth(mut self, stealth: f32) -> Self {
        self.stealth = stealth;
        self
    }

    pub fn structure(mut self, structure: f32) -> Self {
        self.structure = structure;
        self
    }

    /// Add an effects group that raises max fuel by the hull's fuel stat.
    pub fn default_fuel_effects(mut self, enabled: bool) -> Self {
        self.default_fuel_effects = enabled;
        self
    }

    /// Add an effects group that raises speed by the hull's speed stat.
    pub fn default_speed_effects(mut self, enabled: bool) -> Self {
        self.default_speed_effects = enabled;
        self
    }

    /// Add an effects group that raises stealth by the hull's stealth stat.
    pub fn default_stealth_effects(mut self, enabled: bool) -> Self {
        self.default_stealth_effects = enabled;
        self
    }

    /// Add an effects group that raises max structure by the hull's structure stat.
    pub fn default_structure_effects(mut self, enabled: bool) -> Self {
        self.default_structure_effects = enabled;
        self
    }

    pub fn producible(mut self, producible: bool) -> Self {
        self.producible = producible;
        self
    }

    pub fn production_cost(mut self, cost: ValueRef<f64>) -> Self {
        self.production_cost = Some(cost);
        self
    }

    pub fn production_time(mut self, time: ValueRef<i32>) -> Self {
        self.production_time = Some(time);
        self
    }

    pub fn slot(mut self, slot: Slot) -> Self {
        self.slots.push(slot);
        self
    }

    pub fn slots(mut self, slots: impl IntoIterator<Item = Slot>) -> Self {
        self.slots.extend(slots);
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn meter_consumption(
        mut self,
        meter: MeterType,
        amount: Option<ValueRef<f64>>,
        condition: Option<Condition>,
    ) -> Self {
        self.production_meter_consumption
            .insert(meter, (amount, condition));
        self
    }

    pub fn special_consumption(
        mut self,
        special: impl Into<String>,
        amount: Option<ValueRef<f64>>,
        condition: Option<Condition>,
    ) -> Self {
        self.production_special_consumption
            .insert(special.into(), (amount, condition));
        self
    }

    pub fn location(mut self, location: Condition) -> Self {
        self.location = Some(location);
        self
    }

    pub fn exclusion(mut self, name: impl Into<String>) -> Self {
        self.exclusions.insert(name.into());
        self
    }

    pub fn effects_group(mut self, group: EffectsGroup) -> Self {
        self.effects.push(group);
        self
    }

    pub fn graphic(mut self, graphic: impl Into<String>) -> Self {
        self.graphic = graphic.into();
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Finish the hull.
    ///
    /// Tags are upper-cased. Enabled default effects groups are placed ahead
    /// of the parsed effects, one per stat, and only for non-zero stats.
    pub fn build(self) -> ShipHull {
        let mut effects = Vec::with_capacity(self.effects.len() + 4);
        let defaults = [
            (self.default_fuel_effects, "SetMaxFuel", self.fuel),
            (self.default_speed_effects, "SetSpeed", self.speed),
            (self.default_stealth_effects, "SetStealth", self.stealth),
            (self.default_structure_effects, "SetMaxStructure", self.structure),
        ];
        for (enabled, effect, amount) in defaults {
            if enabled && amount != 0.0 {
                effects.push(default_stat_group(&self.name, effect, amount));
            }
        }
        effects.extend(self.effects);

        ShipHull {
            name: self.name,
            description: self.description,
            speed: self.speed,
            fuel: self.fuel,
            stealth: self.stealth,
            structure: self.structure,
            producible: self.producible,
            production_cost: self.production_cost,
            production_time: self.production_time,
            slots: self.slots,
            tags: self.tags.iter().map(|t| t.to_uppercase()).collect(),
            production_meter_consumption: self.production_meter_consumption,
            production_special_consumption: self.production_special_consumption,
            location: self.location,
            exclusions: self.exclusions,
            effects,
            graphic: self.graphic,
            icon: self.icon,
        }
    }
}

/// `effect: Target.Value + amount` on the hull's own ship, credited to the hull.
fn default_stat_group(hull: &str, effect: &str, amount: f32) -> EffectsGroup {
    EffectsGroup {
        scope: Some(Condition::Source),
        activation: None,
        stacking_group: String::new(),
        effects: vec![Effect {
            name: effect.to_owned(),
            magnitude: Some(ValueRef::Operation {
                op: OpType::Plus,
                operands: vec![
                    ValueRef::Variable {
                        reference: ReferenceType::Target,
                        property: String::from("Value"),
                    },
                    ValueRef::Constant(f64::from(amount)),
                ],
            }),
        }],
        accounting_label: hull.to_owned(),
        priority: 0,
    }
}

impl From<ShipHullBuilder> for ShipHull {
    fn from(builder: ShipHullBuilder) -> Self {
        builder.build()
    }
}
