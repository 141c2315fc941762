//! Script objects attached to content definitions.
//!
//! Production formulas, placement conditions and effects groups are built by
//! the content parser and evaluated by gameplay code, neither of which lives
//! here. To the checksum engine they are opaque composites: each one only
//! contributes its own [`CheckSum`].

use serde::{Deserialize, Serialize};

use crate::checksum::{combine_checksum, CheckSum, ChecksumEnum, Combine, RunningSum};
use crate::impl_combine_for_checksum;
use crate::impl_combine_for_enum;

/// Meters a content item can consume or modify.
///
/// Declaration order matches the ordinal order, so derived `Ord` gives the
/// ascending key order used by consumption maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(i32)]
pub enum MeterType {
    Invalid = -1,
    TargetPopulation = 0,
    TargetIndustry,
    TargetResearch,
    TargetInfluence,
    TargetConstruction,
    TargetHappiness,
    MaxCapacity,
    MaxSecondaryStat,
    MaxFuel,
    MaxShield,
    MaxStructure,
    MaxDefense,
    MaxSupply,
    MaxStockpile,
    MaxTroops,
    Population,
    Industry,
    Research,
    Influence,
    Construction,
    Happiness,
    Capacity,
    SecondaryStat,
    Fuel,
    Shield,
    Structure,
    Defense,
    Supply,
    Stockpile,
    Troops,
    RebelTroops,
    Stealth,
    Detection,
    Speed,
    Size,
}

impl ChecksumEnum for MeterType {
    fn ordinal(&self) -> i32 {
        *self as i32
    }
}

/// Which object a variable reference reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(i32)]
pub enum ReferenceType {
    NonObject = -1,
    Source = 0,
    /// The object being acted upon, e.g. the production location.
    Target,
    LocalCandidate,
    RootCandidate,
}

impl ChecksumEnum for ReferenceType {
    fn ordinal(&self) -> i32 {
        *self as i32
    }
}

/// Arithmetic operators in a value expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum OpType {
    Plus = 0,
    Minus,
    Times,
    Divide,
    Negate,
    Exponentiate,
    Minimum,
    Maximum,
}

impl ChecksumEnum for OpType {
    fn ordinal(&self) -> i32 {
        *self as i32
    }
}

impl_combine_for_enum!(MeterType, ReferenceType, OpType);

/// A parsed value expression, such as a production cost formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValueRef<T> {
    Constant(T),
    Variable {
        reference: ReferenceType,
        property: String,
    },
    Operation {
        op: OpType,
        operands: Vec<ValueRef<T>>,
    },
}

impl<T> ValueRef<T> {
    /// True for a literal constant.
    pub fn is_constant(&self) -> bool {
        matches!(self, Self::Constant(_))
    }

    /// True if the expression never reads from the target object.
    ///
    /// For production formulas the target is the production location, so a
    /// target-invariant formula gives the same result everywhere.
    pub fn target_invariant(&self) -> bool {
        match self {
            Self::Constant(_) => true,
            Self::Variable { reference, .. } => *reference != ReferenceType::Target,
            Self::Operation { operands, .. } => operands.iter().all(Self::target_invariant),
        }
    }
}

impl<T: Combine> CheckSum for ValueRef<T> {
    fn checksum(&self) -> u32 {
        let mut sum = RunningSum::new();
        match self {
            Self::Constant(value) => {
                sum.combine("ValueRef::Constant").combine(value);
            }
            Self::Variable {
                reference,
                property,
            } => {
                sum.combine("ValueRef::Variable")
                    .combine(reference)
                    .combine(property);
            }
            Self::Operation { op, operands } => {
                sum.combine("ValueRef::Operation")
                    .combine(op)
                    .combine(operands);
            }
        }
        sum.value()
    }
}

impl<T: Combine> Combine for ValueRef<T> {
    fn combine_into(&self, sum: &mut RunningSum) {
        combine_checksum(sum, self);
    }
}

/// A parsed object-matching condition, such as a production location rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    All,
    Source,
    Type { name: String },
    OwnedBy { empire_id: i32 },
    HasTag { tag: String },
    And(Vec<Condition>),
    Or(Vec<Condition>),
    Not(Box<Condition>),
}

impl CheckSum for Condition {
    fn checksum(&self) -> u32 {
        let mut sum = RunningSum::new();
        match self {
            Self::All => {
                sum.combine("Condition::All");
            }
            Self::Source => {
                sum.combine("Condition::Source");
            }
            Self::Type { name } => {
                sum.combine("Condition::Type").combine(name);
            }
            Self::OwnedBy { empire_id } => {
                sum.combine("Condition::OwnedBy").combine(empire_id);
            }
            Self::HasTag { tag } => {
                sum.combine("Condition::HasTag").combine(tag);
            }
            Self::And(operands) => {
                sum.combine("Condition::And").combine(operands);
            }
            Self::Or(operands) => {
                sum.combine("Condition::Or").combine(operands);
            }
            Self::Not(operand) => {
                sum.combine("Condition::Not").combine(operand);
            }
        }
        sum.value()
    }
}

/// A single effect descriptor inside an [`EffectsGroup`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub name: String,
    pub magnitude: Option<ValueRef<f64>>,
}

impl CheckSum for Effect {
    fn checksum(&self) -> u32 {
        let mut sum = RunningSum::new();
        sum.combine("Effect").combine(&self.name).combine(&self.magnitude);
        sum.value()
    }
}

/// Effects applied to objects matched by `scope` while `activation` holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectsGroup {
    pub scope: Option<Condition>,
    pub activation: Option<Condition>,
    #[serde(default)]
    pub stacking_group: String,
    #[serde(default)]
    pub effects: Vec<Effect>,
    #[serde(default)]
    pub accounting_label: String,
    #[serde(default)]
    pub priority: i32,
}

impl CheckSum for EffectsGroup {
    fn checksum(&self) -> u32 {
        let mut sum = RunningSum::new();
        sum.combine("EffectsGroup")
            .combine(&self.scope)
            .combine(&self.activation)
            .combine(&self.stacking_group)
            .combine(&self.effects)
            .combine(&self.accounting_label)
            .combine(&self.priority);
        sum.value()
    }
}

impl_combine_for_checksum!(Condition, Effect, EffectsGroup);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::checksum_of;

    #[test]
    fn test_meter_ordinals() {
        assert_eq!(MeterType::Invalid.ordinal(), -1);
        assert_eq!(MeterType::TargetPopulation.ordinal(), 0);
        assert_eq!(MeterType::Size.ordinal(), 34);
        assert!(MeterType::MaxFuel < MeterType::Fuel);
    }

    #[test]
    fn test_constant_differs_from_variable() {
        let constant: ValueRef<f64> = ValueRef::Constant(1.0);
        let variable: ValueRef<f64> = ValueRef::Variable {
            reference: ReferenceType::Source,
            property: String::from("Fuel"),
        };
        assert_ne!(constant.checksum(), variable.checksum());
        assert_eq!(checksum_of(&constant), constant.checksum());
    }

    #[test]
    fn test_target_invariance() {
        let reads_target: ValueRef<f64> = ValueRef::Operation {
            op: OpType::Times,
            operands: vec![
                ValueRef::Constant(2.0),
                ValueRef::Variable {
                    reference: ReferenceType::Target,
                    property: String::from("Population"),
                },
            ],
        };
        assert!(!reads_target.target_invariant());
        assert!(!reads_target.is_constant());
        assert!(ValueRef::Constant(3i32).target_invariant());
    }

    #[test]
    fn test_operand_order_matters() {
        let a: ValueRef<f64> = ValueRef::Operation {
            op: OpType::Minus,
            operands: vec![ValueRef::Constant(10.0), ValueRef::Constant(1.0)],
        };
        let b: ValueRef<f64> = ValueRef::Operation {
            op: OpType::Minus,
            operands: vec![ValueRef::Constant(1.0), ValueRef::Constant(10.0)],
        };
        assert_ne!(a.checksum(), b.checksum());
    }

    #[test]
    fn test_condition_checksum_deterministic() {
        let condition = Condition::And(vec![
            Condition::OwnedBy { empire_id: 3 },
            Condition::Not(Box::new(Condition::HasTag {
                tag: String::from("ORBITAL"),
            })),
        ]);
        assert_eq!(condition.checksum(), condition.clone().checksum());
        assert_ne!(condition.checksum(), Condition::All.checksum());
    }

    #[test]
    fn test_effects_group_includes_priority() {
        let base = EffectsGroup {
            scope: Some(Condition::Source),
            activation: None,
            stacking_group: String::from("HULL_FUEL_STACK"),
            effects: vec![Effect {
                name: String::from("SetMaxFuel"),
                magnitude: Some(ValueRef::Constant(2.0)),
            }],
            accounting_label: String::new(),
            priority: 0,
        };
        let mut later = base.clone();
        later.priority = 5;
        assert_ne!(base.checksum(), later.checksum());
    }
}
