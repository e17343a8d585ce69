//! Zone cleaning request types and bounds validation.

use crate::error::{Result, RobotError};
use crate::map::MapPoint;
use serde::{Deserialize, Serialize};

/// A rectangle given by two opposite corners, cleaned `iterations` times.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CleaningZone {
    pub pa: MapPoint,
    pub pc: MapPoint,
    pub iterations: u32,
}

impl CleaningZone {
    pub fn new(pa: MapPoint, pc: MapPoint, iterations: u32) -> Self {
        Self { pa, pc, iterations }
    }
}

/// Inclusive `[min, max]` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: u32,
    pub max: u32,
}

impl Bounds {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneCleaningProperties {
    pub zone_count: Bounds,
    pub iteration_count: Bounds,
}

impl ZoneCleaningProperties {
    /// Check a zone request against the declared bounds.
    pub fn validate(&self, zones: &[CleaningZone]) -> Result<()> {
        let count = zones.len() as u32;
        if !self.zone_count.contains(count) {
            return Err(RobotError::InvalidRequest(format!(
                "zone count {} outside [{}, {}]",
                count, self.zone_count.min, self.zone_count.max
            )));
        }

        for (i, zone) in zones.iter().enumerate() {
            if !self.iteration_count.contains(zone.iterations) {
                return Err(RobotError::InvalidRequest(format!(
                    "zone {} iterations {} outside [{}, {}]",
                    i, zone.iterations, self.iteration_count.min, self.iteration_count.max
                )));
            }
        }

        Ok(())
    }
}
