//! Statistics of the most recent cleanup run.

use serde::Serialize;
use strum::{Display, EnumString, IntoStaticStr};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CleanupStatisticType {
    /// Cleaned area in cm²
    Area,
    /// Run duration in seconds
    Duration,
    Count,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestCleanupStatisticsAttribute {
    #[serde(rename = "type")]
    statistic_type: CleanupStatisticType,
    value: u64,
}

impl LatestCleanupStatisticsAttribute {
    pub fn new(statistic_type: CleanupStatisticType, value: u64) -> Self {
        Self {
            statistic_type,
            value,
        }
    }

    pub fn statistic_type(&self) -> CleanupStatisticType {
        self.statistic_type
    }

    pub fn value(&self) -> u64 {
        self.value
    }
}
