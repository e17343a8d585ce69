//! Vendor-agnostic robot capabilities.
//!
//! A capability is one uniform high-level operation (monitor consumables,
//! clean zones, clean map segments). Each robot family provides its own
//! implementation; the [`Capabilities`] set of a robot is fixed when the robot
//! is constructed.

pub mod zone;

pub use zone::{Bounds, CleaningZone, ZoneCleaningProperties};

use crate::attributes::{AttributeValue, ConsumableSubType, ConsumableType};
use crate::error::{Result, RobotError};
use async_trait::async_trait;
use std::sync::Arc;
use strum::{Display, IntoStaticStr};

/// Opaque map segment id as understood by the robot's own map partitioning.
pub type SegmentId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum CapabilityType {
    ConsumableMonitoringCapability,
    ZoneCleaningCapability,
    MapSegmentationCapability,
}

/// Tracks remaining life of brushes, filters and mops.
#[async_trait]
pub trait ConsumableMonitoringCapability: Send + Sync {
    /// Query the robot, update the consumable attributes in the store and
    /// return all consumable attributes currently stored.
    ///
    /// Returns an empty list if the robot gave no response at all.
    async fn poll_consumables(&self) -> Result<Vec<AttributeValue>>;

    /// Reset the wear counter of one consumable.
    ///
    /// Families that cannot reset a consumable keep this default, which fails
    /// with [`RobotError::UnsupportedOperation`].
    async fn reset_consumable(
        &self,
        consumable_type: ConsumableType,
        sub_type: Option<ConsumableSubType>,
    ) -> Result<()> {
        let sub_type = sub_type.map(|s| s.to_string()).unwrap_or_default();
        Err(RobotError::UnsupportedOperation(format!(
            "resetting consumable {} {}",
            consumable_type, sub_type
        )))
    }
}

/// Cleans rectangular zones.
#[async_trait]
pub trait ZoneCleaningCapability: Send + Sync {
    /// Stop any running job and start cleaning the given zones.
    async fn start_zones(&self, zones: &[CleaningZone]) -> Result<()>;

    async fn stop(&self) -> Result<()>;

    /// Zone and iteration count bounds accepted by `start_zones`.
    fn properties(&self) -> ZoneCleaningProperties;
}

/// Cleans and edits robot-defined map segments.
#[async_trait]
pub trait MapSegmentationCapability: Send + Sync {
    /// Stop any running job and start cleaning the given segments.
    async fn clean_segments(&self, segment_ids: &[SegmentId]) -> Result<()>;

    /// Merge segment `b` into segment `a`. The map is refreshed afterwards even
    /// if the merge fails.
    async fn join_segments(&self, a: SegmentId, b: SegmentId) -> Result<()>;

    async fn stop(&self) -> Result<()>;
}

/// The capabilities one robot supports.
#[derive(Default, Clone)]
pub struct Capabilities {
    pub consumable_monitoring: Option<Arc<dyn ConsumableMonitoringCapability>>,
    pub zone_cleaning: Option<Arc<dyn ZoneCleaningCapability>>,
    pub map_segmentation: Option<Arc<dyn MapSegmentationCapability>>,
}

impl Capabilities {
    pub fn supported(&self) -> Vec<CapabilityType> {
        let mut supported = Vec::new();
        if self.consumable_monitoring.is_some() {
            supported.push(CapabilityType::ConsumableMonitoringCapability);
        }
        if self.zone_cleaning.is_some() {
            supported.push(CapabilityType::ZoneCleaningCapability);
        }
        if self.map_segmentation.is_some() {
            supported.push(CapabilityType::MapSegmentationCapability);
        }
        supported
    }

    pub fn has(&self, capability: CapabilityType) -> bool {
        self.supported().contains(&capability)
    }
}

pub(crate) fn unsupported(capability: CapabilityType) -> RobotError {
    RobotError::UnsupportedOperation(capability.to_string())
}
