//! MQTT surface: Home Assistant discovery plus state topics.

pub mod autoconf;
pub mod client;
pub mod publisher;

pub use autoconf::{AutoconfOptions, DeviceSpecification, describe, state_topic};
pub use client::MqttClient;
pub use publisher::AutoconfPublisher;
