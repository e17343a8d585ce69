//! Vacuum Bridge library.
//!
//! Typed robot state attributes, device-family capabilities and the MQTT
//! discovery surface that exposes them.

pub mod attributes;
pub mod capabilities;
pub mod config;
pub mod error;
pub mod map;
pub mod mqtt;
pub mod robots;
pub mod state;
pub mod transport;
