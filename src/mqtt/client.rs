//! MQTT client wrapper for publishing robot state.

use crate::config::MqttConfig;
use crate::error::Result;
use log::{debug, error, info};
use rumqttc::{AsyncClient, Event, EventLoop, LastWill, MqttOptions, Packet, QoS};
use std::time::Duration;
use tokio::sync::oneshot;

/// Payload of the availability topic while the bridge is up.
pub const AVAILABILITY_ONLINE: &str = "online";
/// Payload of the availability topic once the bridge is gone.
pub const AVAILABILITY_OFFLINE: &str = "offline";

/// MQTT client with a last will on the availability topic.
pub struct MqttClient {
    client: AsyncClient,
    event_loop: EventLoop,
}

impl MqttClient {
    /// Create a new MQTT client from configuration.
    pub fn new(config: &MqttConfig, availability_topic: &str) -> Self {
        let mut options =
            MqttOptions::new(&config.client_id, &config.broker_host, config.broker_port);
        options.set_keep_alive(Duration::from_secs(30));

        // Set credentials if provided
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            options.set_credentials(username, password);
        }

        options.set_last_will(LastWill::new(
            availability_topic,
            AVAILABILITY_OFFLINE,
            QoS::AtLeastOnce,
            true,
        ));

        let (client, event_loop) = AsyncClient::new(options, 100);

        Self { client, event_loop }
    }

    /// Publish a message to a topic.
    pub async fn publish(&self, topic: &str, payload: &str, retain: bool) -> Result<()> {
        publish(&self.client, topic, payload, retain).await
    }

    /// Run the MQTT event loop.
    ///
    /// Runs until the task is aborted. `connected` fires on the first
    /// successful connection.
    pub async fn run(mut self, mut connected: Option<oneshot::Sender<()>>) {
        info!("[MQTT] Starting event loop");

        loop {
            match self.event_loop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    info!("[MQTT] Connected to broker");
                    if let Some(tx) = connected.take() {
                        let _ = tx.send(());
                    }
                }
                Ok(event) => debug!("[MQTT] {:?}", event),
                Err(e) => {
                    error!("[MQTT] Connection error: {:?}", e);
                    // Wait before reconnecting
                    tokio::time::sleep(Duration::from_secs(5)).await;
                }
            }
        }
    }

    /// Get a clone of the async client for publishing from other tasks.
    pub fn client(&self) -> AsyncClient {
        self.client.clone()
    }
}

/// Publish through any clone of the async client.
pub async fn publish(client: &AsyncClient, topic: &str, payload: &str, retain: bool) -> Result<()> {
    debug!("[MQTT] Publishing to {}: {}", topic, payload);
    client
        .publish(topic, QoS::AtLeastOnce, retain, payload.as_bytes())
        .await?;
    Ok(())
}
