//! Periodic state refresh for Viomi robots.

use super::common::ViomiOperationMode;
use crate::attributes::{
    AttachmentAttribute, AttachmentType, AttributeValue, CleanupStatisticType,
    LatestCleanupStatisticsAttribute, OperationMode, OperationModeAttribute,
};
use crate::error::{Result, RobotError};
use crate::robots::{RobotContext, StatePoller};
use async_trait::async_trait;
use log::{debug, warn};
use serde_json::{Value, json};
use std::sync::Arc;

const STATE_PROPERTIES: [&str; 5] = ["box_type", "mop_type", "is_mop", "s_area", "s_time"];

/// Box types reported in `box_type`.
const BOX_DUSTBIN: u64 = 1;
const BOX_WATERTANK: u64 = 2;
const BOX_TWO_IN_ONE: u64 = 3;

pub struct ViomiStatePoller {
    context: Arc<RobotContext>,
}

impl ViomiStatePoller {
    pub fn new(context: Arc<RobotContext>) -> Self {
        Self { context }
    }
}

/// Scale a device statistic to its stored unit, rounded.
///
/// Negative values and values that do not fit a `u64` are skipped.
fn scale_statistic(name: &str, value: f64, factor: f64) -> Option<u64> {
    let scaled = (value * factor).round();
    if !scaled.is_finite() || scaled < 0.0 || scaled >= u64::MAX as f64 {
        warn!("[Viomi] Ignoring {} = {}", name, value);
        return None;
    }
    Some(scaled as u64)
}

fn parse_state(response: &[Value]) -> Vec<AttributeValue> {
    let raw = |name: &str| {
        STATE_PROPERTIES
            .iter()
            .position(|p| *p == name)
            .and_then(|index| response.get(index))
    };
    let prop = |name: &str| raw(name).and_then(Value::as_u64);

    let mut values = Vec::new();

    if let Some(box_type) = prop("box_type") {
        values.push(
            AttachmentAttribute::new(
                AttachmentType::Dustbin,
                box_type == BOX_DUSTBIN || box_type == BOX_TWO_IN_ONE,
            )
            .into(),
        );
        values.push(
            AttachmentAttribute::new(
                AttachmentType::Watertank,
                box_type == BOX_WATERTANK || box_type == BOX_TWO_IN_ONE,
            )
            .into(),
        );
    }

    if let Some(mop_type) = prop("mop_type") {
        values.push(AttachmentAttribute::new(AttachmentType::Mop, mop_type == 1).into());
    }

    if let Some(raw) = prop("is_mop") {
        match ViomiOperationMode::from_wire(raw) {
            Ok(mode) => {
                values.push(OperationModeAttribute::new(OperationMode::from(mode)).into())
            }
            Err(err) => warn!("[Viomi] Ignoring operation mode: {}", err),
        }
    }

    // Square metres and minutes on the wire, possibly fractional
    for (name, statistic_type, factor) in [
        ("s_area", CleanupStatisticType::Area, 10_000.0),
        ("s_time", CleanupStatisticType::Duration, 60.0),
    ] {
        if let Some(value) = raw(name).and_then(Value::as_f64)
            && let Some(scaled) = scale_statistic(name, value, factor)
        {
            values.push(LatestCleanupStatisticsAttribute::new(statistic_type, scaled).into());
        }
    }

    values
}

#[async_trait]
impl StatePoller for ViomiStatePoller {
    async fn poll_state(&self) -> Result<()> {
        let response = self
            .context
            .send_command("get_prop", json!(STATE_PROPERTIES))
            .await?;

        let response = match response {
            Value::Array(values) => values,
            other => {
                return Err(RobotError::InvalidDeviceResponse(format!(
                    "expected state array, got {}",
                    other
                )));
            }
        };

        let values = parse_state(&response);
        debug!("[Viomi] Polled {} state attributes", values.len());
        self.context.upsert_and_notify(values);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{AttributeClass, AttributeQuery};
    use crate::robots::viomi::test_support::{context, stored_mode};
    use crate::transport::SimulatedViomi;

    fn attached(ctx: &RobotContext, attachment_type: AttachmentType) -> Option<bool> {
        ctx.get_first_matching(
            &AttributeQuery::class(AttributeClass::Attachment).with_type(attachment_type),
        )
        .and_then(|a| a.as_attachment().map(|a| a.attached()))
    }

    fn statistic(ctx: &RobotContext, statistic_type: CleanupStatisticType) -> Option<u64> {
        ctx.get_first_matching(
            &AttributeQuery::class(AttributeClass::LatestCleanupStatistics)
                .with_type(statistic_type),
        )
        .and_then(|a| a.as_cleanup_statistic().map(|s| s.value()))
    }

    #[tokio::test]
    async fn test_poll_state_two_in_one_box() {
        let sim = Arc::new(SimulatedViomi::new());
        let ctx = context(&sim);

        ViomiStatePoller::new(ctx.clone()).poll_state().await.unwrap();

        assert_eq!(attached(&ctx, AttachmentType::Dustbin), Some(true));
        assert_eq!(attached(&ctx, AttachmentType::Watertank), Some(true));
        assert_eq!(attached(&ctx, AttachmentType::Mop), Some(true));
        assert_eq!(stored_mode(&ctx), Some(OperationMode::VacuumAndMop));
        assert_eq!(statistic(&ctx, CleanupStatisticType::Area), Some(120_000));
        assert_eq!(statistic(&ctx, CleanupStatisticType::Duration), Some(2100));
    }

    #[tokio::test]
    async fn test_poll_state_water_tank_only() {
        let sim = Arc::new(SimulatedViomi::new());
        sim.set_prop("box_type", json!(2));
        sim.set_prop("mop_type", json!(0));
        sim.set_prop("is_mop", json!(0));
        let ctx = context(&sim);

        ViomiStatePoller::new(ctx.clone()).poll_state().await.unwrap();

        assert_eq!(attached(&ctx, AttachmentType::Dustbin), Some(false));
        assert_eq!(attached(&ctx, AttachmentType::Watertank), Some(true));
        assert_eq!(attached(&ctx, AttachmentType::Mop), Some(false));
        assert_eq!(stored_mode(&ctx), Some(OperationMode::Vacuum));
    }

    #[tokio::test]
    async fn test_poll_state_notifies_once_and_keeps_unique_slots() {
        let sim = Arc::new(SimulatedViomi::new());
        let ctx = context(&sim);
        let poller = ViomiStatePoller::new(ctx.clone());

        let before = ctx.state().read().version();
        poller.poll_state().await.unwrap();
        assert_eq!(ctx.state().read().version(), before + 1);

        let count = ctx.state().read().len();
        poller.poll_state().await.unwrap();
        assert_eq!(ctx.state().read().len(), count);
    }

    #[tokio::test]
    async fn test_missing_values_leave_store_untouched() {
        let sim = Arc::new(SimulatedViomi::new());
        let ctx = context(&sim);
        let poller = ViomiStatePoller::new(ctx.clone());
        poller.poll_state().await.unwrap();

        sim.remove_prop("s_area");
        sim.set_prop("s_time", json!(10));
        poller.poll_state().await.unwrap();

        assert_eq!(statistic(&ctx, CleanupStatisticType::Area), Some(120_000));
        assert_eq!(statistic(&ctx, CleanupStatisticType::Duration), Some(600));
    }

    #[tokio::test]
    async fn test_fractional_statistics_are_scaled() {
        let sim = Arc::new(SimulatedViomi::new());
        sim.set_prop("s_area", json!(12.5));
        sim.set_prop("s_time", json!(1.5));
        let ctx = context(&sim);

        ViomiStatePoller::new(ctx.clone()).poll_state().await.unwrap();

        assert_eq!(statistic(&ctx, CleanupStatisticType::Area), Some(125_000));
        assert_eq!(statistic(&ctx, CleanupStatisticType::Duration), Some(90));
    }

    #[tokio::test]
    async fn test_oversized_statistics_are_skipped() {
        let sim = Arc::new(SimulatedViomi::new());
        sim.set_prop("s_area", json!(u64::MAX / 1000));
        sim.set_prop("s_time", json!(-4));
        let ctx = context(&sim);

        ViomiStatePoller::new(ctx.clone()).poll_state().await.unwrap();

        assert_eq!(statistic(&ctx, CleanupStatisticType::Area), None);
        assert_eq!(statistic(&ctx, CleanupStatisticType::Duration), None);
        assert_eq!(attached(&ctx, AttachmentType::Dustbin), Some(true));
    }

    #[test]
    fn test_scale_statistic() {
        assert_eq!(scale_statistic("s_area", 0.00004, 10_000.0), Some(0));
        assert_eq!(scale_statistic("s_time", 2.0, 60.0), Some(120));
        assert_eq!(scale_statistic("s_area", f64::MAX, 10_000.0), None);
    }

    #[tokio::test]
    async fn test_unknown_operation_mode_is_skipped() {
        let sim = Arc::new(SimulatedViomi::new());
        sim.set_prop("is_mop", json!(9));
        let ctx = context(&sim);

        ViomiStatePoller::new(ctx.clone()).poll_state().await.unwrap();

        assert_eq!(stored_mode(&ctx), None);
        assert_eq!(attached(&ctx, AttachmentType::Mop), Some(true));
    }

    #[tokio::test]
    async fn test_malformed_reply() {
        let sim = Arc::new(SimulatedViomi::new());
        sim.reply_next("get_prop", json!({"error": "busy"}));
        let ctx = context(&sim);

        let err = ViomiStatePoller::new(ctx).poll_state().await.unwrap_err();
        assert!(matches!(err, RobotError::InvalidDeviceResponse(_)));
    }
}
