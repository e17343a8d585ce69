//! Viomi robot family.
//!
//! Viomi robots take numeric mode codes and `_`-joined zone records. The
//! coordinate system is metres around the map centre with an inverted y axis.

pub mod common;
pub mod consumables;
pub mod encoder;
pub mod map_segmentation;
pub mod mode;
pub mod state;
pub mod zone_cleaning;

pub use consumables::ViomiConsumableMonitoringCapability;
pub use map_segmentation::ViomiMapSegmentationCapability;
pub use state::ViomiStatePoller;
pub use zone_cleaning::ViomiZoneCleaningCapability;

use self::common::{ViomiOperation, ViomiOperationMode};
use self::mode::{Attachments, derive_operation_mode};
use super::{Robot, RobotContext};
use crate::attributes::{
    AttributeClass, AttributeQuery, AttributeValue, OperationMode, OperationModeAttribute,
};
use crate::capabilities::{Bounds, Capabilities, ZoneCleaningProperties};
use crate::config::{RobotConfig, RobotModel};
use crate::error::Result;
use crate::map::CoordinateTransform;
use crate::transport::Transport;
use log::info;
use serde_json::json;
use std::sync::Arc;

/// Generic centimetres (map origin at 2000/2000) to Viomi metres.
pub const VIOMI_TRANSFORM: CoordinateTransform =
    CoordinateTransform::new(100.0, 2000.0, 2000.0, true, (0.0, 4000.0));

pub const VIOMI_ZONE_PROPERTIES: ZoneCleaningProperties = ZoneCleaningProperties {
    zone_count: Bounds::new(1, 5),
    iteration_count: Bounds::new(1, 10),
};

/// Build a Viomi robot with all supported capabilities.
pub fn build(config: &RobotConfig, transport: Arc<dyn Transport>) -> Robot {
    let context = Arc::new(RobotContext::new(transport, config.command_timeout()));

    let capabilities = Capabilities {
        consumable_monitoring: Some(Arc::new(ViomiConsumableMonitoringCapability::new(
            context.clone(),
        ))),
        zone_cleaning: Some(Arc::new(ViomiZoneCleaningCapability::new(context.clone()))),
        map_segmentation: Some(Arc::new(ViomiMapSegmentationCapability::new(
            context.clone(),
            config.mop_route_on_mop_moves,
        ))),
    };
    let poller = Arc::new(ViomiStatePoller::new(context.clone()));

    Robot::new(
        RobotModel::Viomi,
        config.identifier.clone(),
        context,
        capabilities,
        poller,
    )
}

/// Stop whatever the robot is doing.
pub(crate) async fn stop(context: &RobotContext) -> Result<()> {
    context
        .send_command("set_mode", json!([ViomiOperation::Stop as u8]))
        .await?;
    Ok(())
}

/// Switch the robot to the operation mode matching its attachments.
///
/// The stored mode is only updated after the robot accepted `set_mop`.
pub(crate) async fn ensure_operation_mode(context: &RobotContext) -> Result<ViomiOperationMode> {
    let (attachments, current) = {
        let state = context.state().read();
        let current = state
            .get_first_matching(&AttributeQuery::class(AttributeClass::OperationMode))
            .and_then(|a| a.as_operation_mode())
            .map(|a| a.value());
        (Attachments::from_store(&state), current)
    };

    let mode = derive_operation_mode(attachments);
    let generic = OperationMode::from(mode);

    if current != Some(generic) {
        info!("[Viomi] Switching operation mode to {}", generic);
        context
            .send_command("set_mop", json!([mode as u8]))
            .await?;
        context.upsert_and_notify([AttributeValue::from(OperationModeAttribute::new(generic))]);
    }

    Ok(mode)
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::capabilities::CapabilityType;
    use crate::config::Config;
    use crate::error::RobotError;
    use crate::transport::SimulatedViomi;

    #[tokio::test]
    async fn test_mode_is_set_when_store_has_none() {
        let sim = Arc::new(SimulatedViomi::new());
        let ctx = context(&sim);
        attach(&ctx, true, true, true);

        let mode = ensure_operation_mode(&ctx).await.unwrap();

        assert_eq!(mode, ViomiOperationMode::Mixed);
        assert_eq!(sim.commands_named("set_mop")[0].args, json!([1]));
        assert_eq!(stored_mode(&ctx), Some(OperationMode::VacuumAndMop));
    }

    #[tokio::test]
    async fn test_mode_not_resent_when_unchanged() {
        let sim = Arc::new(SimulatedViomi::new());
        let ctx = context(&sim);
        ctx.upsert_and_notify([AttributeValue::from(OperationModeAttribute::new(
            OperationMode::Vacuum,
        ))]);

        let mode = ensure_operation_mode(&ctx).await.unwrap();

        assert_eq!(mode, ViomiOperationMode::Vacuum);
        assert!(sim.commands_named("set_mop").is_empty());
    }

    #[tokio::test]
    async fn test_failed_mode_switch_leaves_store_untouched() {
        let sim = Arc::new(SimulatedViomi::new());
        let ctx = context(&sim);
        ctx.upsert_and_notify([AttributeValue::from(OperationModeAttribute::new(
            OperationMode::Vacuum,
        ))]);
        attach(&ctx, false, false, true);
        sim.fail_next("set_mop", "device busy");

        let err = ensure_operation_mode(&ctx).await.unwrap_err();

        assert!(matches!(err, RobotError::Transport(_)));
        assert_eq!(stored_mode(&ctx), Some(OperationMode::Vacuum));
    }

    #[test]
    fn test_build_registers_all_capabilities() {
        let config = Config::default();
        let robot = build(&config.robot, Arc::new(SimulatedViomi::new()));

        assert_eq!(robot.identifier(), "viomi_v8");
        assert_eq!(robot.model(), RobotModel::Viomi);
        for capability in [
            CapabilityType::ConsumableMonitoringCapability,
            CapabilityType::ZoneCleaningCapability,
            CapabilityType::MapSegmentationCapability,
        ] {
            assert!(robot.capabilities().has(capability));
        }
        assert_eq!(
            robot.zone_cleaning().unwrap().properties(),
            VIOMI_ZONE_PROPERTIES
        );
    }
}
