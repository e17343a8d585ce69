//! Consumable monitoring for Viomi robots.

use crate::attributes::{
    AttributeClass, AttributeQuery, AttributeValue, ConsumableAttribute, ConsumableRemaining,
    ConsumableSubType, ConsumableType,
};
use crate::capabilities::ConsumableMonitoringCapability;
use crate::error::{Result, RobotError};
use crate::robots::RobotContext;
use async_trait::async_trait;
use log::debug;
use serde_json::{Value, json};
use std::sync::Arc;

/// Consumable properties in query order, with the attribute slot each maps to.
/// Values are remaining hours.
const CONSUMABLE_PROPERTIES: [(&str, ConsumableType, ConsumableSubType); 4] = [
    ("main_brush_hours", ConsumableType::Brush, ConsumableSubType::Main),
    ("side_brush_hours", ConsumableType::Brush, ConsumableSubType::SideRight),
    ("hypa_hours", ConsumableType::Filter, ConsumableSubType::Main),
    ("mop_hours", ConsumableType::Mop, ConsumableSubType::Main),
];

pub struct ViomiConsumableMonitoringCapability {
    context: Arc<RobotContext>,
}

impl ViomiConsumableMonitoringCapability {
    pub fn new(context: Arc<RobotContext>) -> Self {
        Self { context }
    }
}

/// Map a `get_prop` reply onto consumable attributes.
///
/// Properties that are missing, `null` or not numeric produce no attribute.
fn parse_consumables(response: &[Value]) -> Vec<AttributeValue> {
    CONSUMABLE_PROPERTIES
        .iter()
        .enumerate()
        .filter_map(|(index, (name, consumable_type, sub_type))| {
            let hours = response.get(index).and_then(Value::as_f64)?;
            debug!("[Viomi] {} = {}", name, hours);
            Some(
                ConsumableAttribute::new(
                    *consumable_type,
                    *sub_type,
                    ConsumableRemaining::from_hours(hours),
                )
                .into(),
            )
        })
        .collect()
}

#[async_trait]
impl ConsumableMonitoringCapability for ViomiConsumableMonitoringCapability {
    async fn poll_consumables(&self) -> Result<Vec<AttributeValue>> {
        let names: Vec<&str> = CONSUMABLE_PROPERTIES.iter().map(|(n, _, _)| *n).collect();
        let response = self.context.send_command("get_prop", json!(names)).await?;

        let values = match response {
            Value::Null => return Ok(Vec::new()),
            Value::Array(values) => values,
            other => {
                return Err(RobotError::InvalidDeviceResponse(format!(
                    "expected consumable array, got {}",
                    other
                )));
            }
        };

        self.context.upsert_and_notify(parse_consumables(&values));

        Ok(self
            .context
            .get_all_matching(&AttributeQuery::class(AttributeClass::Consumable)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::robots::viomi::test_support::context;
    use crate::transport::SimulatedViomi;

    fn remaining(
        ctx: &RobotContext,
        consumable_type: ConsumableType,
        sub_type: ConsumableSubType,
    ) -> Option<u32> {
        ctx.get_first_matching(
            &AttributeQuery::class(AttributeClass::Consumable)
                .with_type(consumable_type)
                .with_sub_type(sub_type),
        )
        .and_then(|a| a.as_consumable().map(|c| c.remaining().value))
    }

    #[tokio::test]
    async fn test_poll_converts_hours_to_minutes() {
        let sim = Arc::new(SimulatedViomi::new());
        let ctx = context(&sim);
        let capability = ViomiConsumableMonitoringCapability::new(ctx.clone());

        let consumables = capability.poll_consumables().await.unwrap();

        assert_eq!(consumables.len(), 4);
        assert_eq!(
            remaining(&ctx, ConsumableType::Brush, ConsumableSubType::Main),
            Some(7230)
        );
        assert_eq!(
            remaining(&ctx, ConsumableType::Brush, ConsumableSubType::SideRight),
            Some(4815)
        );
        assert_eq!(
            remaining(&ctx, ConsumableType::Filter, ConsumableSubType::Main),
            Some(3600)
        );
        assert_eq!(sim.commands_named("get_prop")[0].args[0], "main_brush_hours");
    }

    #[tokio::test]
    async fn test_missing_property_leaves_previous_value() {
        let sim = Arc::new(SimulatedViomi::new());
        let ctx = context(&sim);
        let capability = ViomiConsumableMonitoringCapability::new(ctx.clone());
        capability.poll_consumables().await.unwrap();
        let version = ctx.state().read().version();

        sim.set_prop("main_brush_hours", json!(10));
        sim.remove_prop("side_brush_hours");
        capability.poll_consumables().await.unwrap();

        assert_eq!(
            remaining(&ctx, ConsumableType::Brush, ConsumableSubType::Main),
            Some(600)
        );
        // Unchanged from the first poll
        assert_eq!(
            remaining(&ctx, ConsumableType::Brush, ConsumableSubType::SideRight),
            Some(4815)
        );
        // One notification per poll
        assert_eq!(ctx.state().read().version(), version + 1);
    }

    #[tokio::test]
    async fn test_negative_hours_clamp_to_zero() {
        let sim = Arc::new(SimulatedViomi::new());
        sim.set_prop("mop_hours", json!(-4.5));
        let ctx = context(&sim);
        let capability = ViomiConsumableMonitoringCapability::new(ctx.clone());

        capability.poll_consumables().await.unwrap();

        assert_eq!(
            remaining(&ctx, ConsumableType::Mop, ConsumableSubType::Main),
            Some(0)
        );
    }

    #[tokio::test]
    async fn test_no_response_returns_empty() {
        let sim = Arc::new(SimulatedViomi::new());
        sim.reply_next("get_prop", Value::Null);
        let ctx = context(&sim);
        let capability = ViomiConsumableMonitoringCapability::new(ctx.clone());

        let consumables = capability.poll_consumables().await.unwrap();

        assert!(consumables.is_empty());
        assert!(ctx.state().read().is_empty());
        assert_eq!(ctx.state().read().version(), 0);
    }

    #[tokio::test]
    async fn test_malformed_response_is_invalid_device_response() {
        let sim = Arc::new(SimulatedViomi::new());
        sim.reply_next("get_prop", json!({"error": "oops"}));
        let ctx = context(&sim);
        let capability = ViomiConsumableMonitoringCapability::new(ctx);

        let err = capability.poll_consumables().await.unwrap_err();
        assert!(matches!(err, RobotError::InvalidDeviceResponse(_)));
    }

    #[tokio::test]
    async fn test_reset_is_unsupported() {
        let sim = Arc::new(SimulatedViomi::new());
        let capability = ViomiConsumableMonitoringCapability::new(context(&sim));

        let err = capability
            .reset_consumable(ConsumableType::Filter, None)
            .await
            .unwrap_err();
        assert!(matches!(err, RobotError::UnsupportedOperation(_)));
    }
}
