//! Map segment cleaning and editing for Viomi robots.

use super::common::{ARRANGE_ROOM_MERGE, ViomiMovementMode, ViomiOperation};
use super::mode::derive_movement_mode;
use super::{ensure_operation_mode, stop};
use crate::capabilities::{MapSegmentationCapability, SegmentId};
use crate::error::{Result, RobotError};
use crate::robots::{RobotContext, with_cleanup};
use async_trait::async_trait;
use log::info;
use serde_json::{Value, json};
use std::sync::Arc;

pub struct ViomiMapSegmentationCapability {
    context: Arc<RobotContext>,
    /// Enable the mop route before starting in mop-moves mode
    mop_route_on_mop_moves: bool,
}

impl ViomiMapSegmentationCapability {
    pub fn new(context: Arc<RobotContext>, mop_route_on_mop_moves: bool) -> Self {
        Self {
            context,
            mop_route_on_mop_moves,
        }
    }

    /// Id of the map the robot currently uses.
    async fn current_map_id(&self) -> Result<u64> {
        let response = self.context.send_command("get_curmap", json!([])).await?;

        response
            .get(0)
            .and_then(Value::as_u64)
            .filter(|id| *id > 0)
            .ok_or_else(|| {
                RobotError::InvalidDeviceResponse(format!("invalid map id response {}", response))
            })
    }

    /// Ask the robot to upload a fresh map.
    async fn refresh_map(&self) -> Result<()> {
        self.context
            .send_command("set_uploadmap", json!([1]))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl MapSegmentationCapability for ViomiMapSegmentationCapability {
    async fn clean_segments(&self, segment_ids: &[SegmentId]) -> Result<()> {
        if segment_ids.is_empty() {
            return Err(RobotError::InvalidRequest(
                "at least one segment is required".to_string(),
            ));
        }

        stop(&self.context).await?;
        let operation_mode = ensure_operation_mode(&self.context).await?;

        // Edge cleaning is never requested for segments
        let movement_mode = derive_movement_mode(operation_mode, false);

        if movement_mode == ViomiMovementMode::MopMoves && self.mop_route_on_mop_moves {
            self.context
                .send_command("set_moproute", json!([1]))
                .await?;
        }

        let mut payload = vec![
            json!(movement_mode as u8),
            json!(ViomiOperation::Start as u8),
            json!(segment_ids.len()),
        ];
        payload.extend(segment_ids.iter().map(|id| json!(id)));

        info!(
            "[Viomi] Cleaning segments {:?} with movement mode {:?}",
            segment_ids, movement_mode
        );
        self.context
            .send_command("set_mode_withroom", Value::Array(payload))
            .await?;

        Ok(())
    }

    async fn join_segments(&self, a: SegmentId, b: SegmentId) -> Result<()> {
        if a == b {
            return Err(RobotError::InvalidRequest(format!(
                "cannot join segment {} with itself",
                a
            )));
        }

        let map_id = self.current_map_id().await?;
        info!("[Viomi] Joining segments {} and {} on map {}", a, b, map_id);

        let merge = self.context.send_command(
            "arrange_room",
            json!({
                "lang": "en",
                "mapId": map_id,
                "roomArr": [[a, b]],
                "type": ARRANGE_ROOM_MERGE,
            }),
        );

        with_cleanup(async { merge.await.map(|_| ()) }, self.refresh_map()).await
    }

    async fn stop(&self) -> Result<()> {
        stop(&self.context).await
    }
}
