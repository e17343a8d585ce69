//! Consumable wear tracking (brushes, filters, mops).

use serde::Serialize;
use strum::{Display, EnumString, IntoStaticStr};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConsumableType {
    Brush,
    Filter,
    Mop,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConsumableSubType {
    None,
    Main,
    SideRight,
    SideLeft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConsumableUnit {
    Minutes,
    Percent,
}

/// Remaining life of a consumable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConsumableRemaining {
    pub value: u32,
    pub unit: ConsumableUnit,
}

impl ConsumableRemaining {
    pub fn minutes(value: u32) -> Self {
        Self {
            value,
            unit: ConsumableUnit::Minutes,
        }
    }

    pub fn percent(value: u32) -> Self {
        Self {
            value,
            unit: ConsumableUnit::Percent,
        }
    }

    /// Convert fractional device hours into whole minutes, clamped at zero.
    pub fn from_hours(hours: f64) -> Self {
        let minutes = (hours * 60.0).max(0.0).round();
        Self::minutes(minutes.min(u32::MAX as f64) as u32)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsumableAttribute {
    #[serde(rename = "type")]
    consumable_type: ConsumableType,
    #[serde(rename = "subType")]
    sub_type: ConsumableSubType,
    remaining: ConsumableRemaining,
}

impl ConsumableAttribute {
    pub fn new(
        consumable_type: ConsumableType,
        sub_type: ConsumableSubType,
        remaining: ConsumableRemaining,
    ) -> Self {
        Self {
            consumable_type,
            sub_type,
            remaining,
        }
    }

    pub fn consumable_type(&self) -> ConsumableType {
        self.consumable_type
    }

    pub fn sub_type(&self) -> ConsumableSubType {
        self.sub_type
    }

    pub fn remaining(&self) -> ConsumableRemaining {
        self.remaining
    }
}
