//! Zone cleaning for Viomi robots.

use super::common::{ViomiMovementMode, ViomiOperation};
use super::encoder::{encode_zones, zone_command_args};
use super::{VIOMI_TRANSFORM, VIOMI_ZONE_PROPERTIES, ensure_operation_mode, stop};
use crate::capabilities::{CleaningZone, ZoneCleaningCapability, ZoneCleaningProperties};
use crate::error::{Result, RobotError};
use crate::robots::RobotContext;
use async_trait::async_trait;
use log::{info, trace};
use serde_json::json;
use std::sync::Arc;

pub struct ViomiZoneCleaningCapability {
    context: Arc<RobotContext>,
}

impl ViomiZoneCleaningCapability {
    pub fn new(context: Arc<RobotContext>) -> Self {
        Self { context }
    }

    fn check_bounds(zones: &[CleaningZone]) -> Result<()> {
        for (i, zone) in zones.iter().enumerate() {
            for point in [zone.pa, zone.pc] {
                if !VIOMI_TRANSFORM.contains(point) {
                    return Err(RobotError::InvalidRequest(format!(
                        "zone {} corner ({}, {}) outside map bounds",
                        i, point.x, point.y
                    )));
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ZoneCleaningCapability for ViomiZoneCleaningCapability {
    async fn start_zones(&self, zones: &[CleaningZone]) -> Result<()> {
        VIOMI_ZONE_PROPERTIES.validate(zones)?;
        Self::check_bounds(zones)?;

        // A running job makes the robot reject the new zone program
        stop(&self.context).await?;
        ensure_operation_mode(&self.context).await?;

        let records = encode_zones(zones, &VIOMI_TRANSFORM);
        trace!("[Viomi] areas to clean: {:?}", records);
        info!(
            "[Viomi] Starting zoned cleanup: {} zone(s), {} pass(es)",
            zones.len(),
            records.len()
        );

        self.context
            .send_command("set_zone", zone_command_args(&records))
            .await?;
        self.context
            .send_command(
                "set_mode",
                json!([
                    ViomiMovementMode::ZonedCleanOrMopping as u8,
                    ViomiOperation::Start as u8
                ]),
            )
            .await?;

        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        stop(&self.context).await
    }

    fn properties(&self) -> ZoneCleaningProperties {
        VIOMI_ZONE_PROPERTIES
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::OperationMode;
    use crate::map::MapPoint;
    use crate::robots::viomi::test_support::{attach, context, stored_mode};
    use crate::transport::SimulatedViomi;

    fn zone(iterations: u32) -> CleaningZone {
        CleaningZone::new(
            MapPoint::new(2100.0, 1900.0),
            MapPoint::new(2350.0, 1500.0),
            iterations,
        )
    }

    #[tokio::test]
    async fn test_start_sends_stop_mode_zones_and_start() {
        let sim = Arc::new(SimulatedViomi::new());
        let ctx = context(&sim);
        attach(&ctx, true, true, true);
        let capability = ViomiZoneCleaningCapability::new(ctx.clone());

        capability.start_zones(&[zone(3)]).await.unwrap();

        assert_eq!(
            sim.command_names(),
            vec!["set_mode", "set_mop", "set_zone", "set_mode"]
        );
        let commands = sim.commands();
        assert_eq!(commands[0].args, json!([0]));
        assert_eq!(commands[1].args, json!([1]));
        assert_eq!(commands[3].args, json!([3, 1]));

        let zone_args = commands[2].args.as_array().unwrap();
        assert_eq!(zone_args[0], 3);
        let indices: Vec<&str> = zone_args[1..]
            .iter()
            .map(|r| r.as_str().unwrap().split('_').next().unwrap())
            .collect();
        assert_eq!(indices, vec!["0", "1", "2"]);
        assert_eq!(
            zone_args[1],
            "0_0_1.0000_1.0000_1.0000_5.0000_3.5000_5.0000_3.5000_1.0000"
        );

        assert_eq!(stored_mode(&ctx), Some(OperationMode::VacuumAndMop));
    }

    #[tokio::test]
    async fn test_vacuum_only_skips_mode_switch_when_already_stored() {
        let sim = Arc::new(SimulatedViomi::new());
        let ctx = context(&sim);
        let capability = ViomiZoneCleaningCapability::new(ctx.clone());

        capability.start_zones(&[zone(1)]).await.unwrap();
        sim.clear_commands();
        capability.start_zones(&[zone(1), zone(2)]).await.unwrap();

        assert_eq!(sim.command_names(), vec!["set_mode", "set_zone", "set_mode"]);
        assert_eq!(sim.commands()[1].args[0], 3);
    }

    #[tokio::test]
    async fn test_invalid_request_sends_nothing() {
        let sim = Arc::new(SimulatedViomi::new());
        let capability = ViomiZoneCleaningCapability::new(context(&sim));

        assert!(matches!(
            capability.start_zones(&[zone(11)]).await,
            Err(RobotError::InvalidRequest(_))
        ));
        assert!(matches!(
            capability.start_zones(&[]).await,
            Err(RobotError::InvalidRequest(_))
        ));
        let outside = CleaningZone::new(MapPoint::new(-5.0, 0.0), MapPoint::new(10.0, 10.0), 1);
        assert!(matches!(
            capability.start_zones(&[outside]).await,
            Err(RobotError::InvalidRequest(_))
        ));
        assert!(sim.commands().is_empty());
    }

    #[tokio::test]
    async fn test_transport_error_propagates_without_retry() {
        let sim = Arc::new(SimulatedViomi::new());
        sim.fail_next("set_zone", "connection reset");
        let capability = ViomiZoneCleaningCapability::new(context(&sim));

        let err = capability.start_zones(&[zone(1)]).await.unwrap_err();

        assert!(matches!(err, RobotError::Transport(msg) if msg == "connection reset"));
        assert_eq!(sim.commands_named("set_zone").len(), 1);
        // The start command is never sent
        assert_eq!(sim.commands_named("set_mode").len(), 1);
    }

    #[tokio::test]
    async fn test_stop() {
        let sim = Arc::new(SimulatedViomi::new());
        let capability = ViomiZoneCleaningCapability::new(context(&sim));

        capability.stop().await.unwrap();
        assert_eq!(sim.commands()[0].args, json!([0]));
    }
}
