//! Publishes robot attributes to MQTT whenever the store changes.

use super::autoconf::{AutoconfOptions, describe, state_topic};
use super::client::{AVAILABILITY_OFFLINE, AVAILABILITY_ONLINE, publish};
use crate::attributes::AttributeValue;
use crate::error::Result;
use crate::robots::RobotContext;
use log::{info, warn};
use rumqttc::AsyncClient;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Retained discovery config
    Config,
    State,
}

/// One message to put on the broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub topic: String,
    pub payload: String,
    pub kind: MessageKind,
}

impl OutgoingMessage {
    pub fn retain(&self) -> bool {
        self.kind == MessageKind::Config
    }
}

/// Messages for one store snapshot.
///
/// Discovery configs are included for topics not yet in `announced`; state
/// payloads are included every time.
pub fn collect_messages(
    attributes: &[AttributeValue],
    options: &AutoconfOptions,
    announced: &HashSet<String>,
) -> Vec<OutgoingMessage> {
    let mut messages = Vec::new();

    for attribute in attributes {
        let data = describe(attribute, options);
        if !announced.contains(&data.topic) {
            match serde_json::to_string(&data.payload) {
                Ok(payload) => messages.push(OutgoingMessage {
                    topic: data.topic,
                    payload,
                    kind: MessageKind::Config,
                }),
                Err(e) => warn!("[MQTT] Failed to serialize config for {}: {}", data.topic, e),
            }
        }

        messages.push(OutgoingMessage {
            topic: state_topic(attribute, options),
            payload: attribute.state_payload().to_string(),
            kind: MessageKind::State,
        });
    }

    messages
}

/// Track a config topic once its publish went through.
pub fn record_delivery(
    announced: &mut HashSet<String>,
    message: &OutgoingMessage,
    outcome: &Result<()>,
) {
    if message.kind == MessageKind::Config && outcome.is_ok() {
        announced.insert(message.topic.clone());
    }
}

/// Background task mirroring one robot's attribute store to MQTT.
pub struct AutoconfPublisher {
    client: AsyncClient,
    options: AutoconfOptions,
    context: Arc<RobotContext>,
}

impl AutoconfPublisher {
    pub fn new(client: AsyncClient, options: AutoconfOptions, context: Arc<RobotContext>) -> Self {
        Self {
            client,
            options,
            context,
        }
    }

    /// Spawn the publisher. It runs until `cancel` fires, then marks the
    /// device offline.
    pub fn start(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run(cancel).await;
        })
    }

    async fn run(self, cancel: CancellationToken) {
        let availability = self.options.availability_topic.clone();
        let mut changes = self.context.state().read().subscribe();
        let mut announced = HashSet::new();

        let _ = self.send(&availability, AVAILABILITY_ONLINE, true).await;
        self.publish_snapshot(&mut announced).await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                changed = changes.changed() => {
                    if changed.is_err() {
                        warn!("[MQTT] Attribute store closed");
                        break;
                    }
                    self.publish_snapshot(&mut announced).await;
                }
            }
        }

        let _ = self.send(&availability, AVAILABILITY_OFFLINE, true).await;
        info!("[MQTT] Publisher stopped");
    }

    async fn publish_snapshot(&self, announced: &mut HashSet<String>) {
        let snapshot = self.context.state().read().snapshot();
        for message in collect_messages(&snapshot, &self.options, announced) {
            let outcome = self
                .send(&message.topic, &message.payload, message.retain())
                .await;
            record_delivery(announced, &message, &outcome);
        }
    }

    async fn send(&self, topic: &str, payload: &str, retain: bool) -> Result<()> {
        let outcome = publish(&self.client, topic, payload, retain).await;
        if let Err(e) = &outcome {
            warn!("[MQTT] Failed to publish {}: {}", topic, e);
        }
        outcome
    }
}
