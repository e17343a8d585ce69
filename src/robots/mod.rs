//! Robot aggregates and device families.
//!
//! A [`Robot`] bundles the shared [`RobotContext`], the capabilities chosen for
//! its family and the family's state poller. Everything is resolved once in
//! [`build_robot`]; nothing is re-dispatched later.

pub mod context;
pub mod viomi;

pub use context::{RobotContext, with_cleanup};

use crate::capabilities::{
    Capabilities, CapabilityType, ConsumableMonitoringCapability, MapSegmentationCapability,
    ZoneCleaningCapability, unsupported,
};
use crate::config::{RobotConfig, RobotModel};
use crate::error::Result;
use crate::transport::Transport;
use async_trait::async_trait;
use std::sync::Arc;

/// Refreshes the non-consumable state attributes of a robot.
#[async_trait]
pub trait StatePoller: Send + Sync {
    async fn poll_state(&self) -> Result<()>;
}

/// One robot with its family-specific capabilities.
pub struct Robot {
    model: RobotModel,
    identifier: String,
    context: Arc<RobotContext>,
    capabilities: Capabilities,
    poller: Arc<dyn StatePoller>,
}

impl Robot {
    pub fn new(
        model: RobotModel,
        identifier: impl Into<String>,
        context: Arc<RobotContext>,
        capabilities: Capabilities,
        poller: Arc<dyn StatePoller>,
    ) -> Self {
        Self {
            model,
            identifier: identifier.into(),
            context,
            capabilities,
            poller,
        }
    }

    pub fn model(&self) -> RobotModel {
        self.model
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn context(&self) -> Arc<RobotContext> {
        self.context.clone()
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub async fn poll_state(&self) -> Result<()> {
        self.poller.poll_state().await
    }

    pub fn consumable_monitoring(&self) -> Result<Arc<dyn ConsumableMonitoringCapability>> {
        self.capabilities
            .consumable_monitoring
            .clone()
            .ok_or_else(|| unsupported(CapabilityType::ConsumableMonitoringCapability))
    }

    pub fn zone_cleaning(&self) -> Result<Arc<dyn ZoneCleaningCapability>> {
        self.capabilities
            .zone_cleaning
            .clone()
            .ok_or_else(|| unsupported(CapabilityType::ZoneCleaningCapability))
    }

    pub fn map_segmentation(&self) -> Result<Arc<dyn MapSegmentationCapability>> {
        self.capabilities
            .map_segmentation
            .clone()
            .ok_or_else(|| unsupported(CapabilityType::MapSegmentationCapability))
    }
}

/// Build the robot for the configured model on top of `transport`.
pub fn build_robot(config: &RobotConfig, transport: Arc<dyn Transport>) -> Robot {
    match config.model {
        RobotModel::Viomi => viomi::build(config, transport),
    }
}
