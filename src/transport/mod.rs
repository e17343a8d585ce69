//! Request/response channel to a robot.
//!
//! The bridge does not own a wire transport. Anything that can deliver a named
//! command with JSON arguments and hand back the JSON reply implements
//! [`Transport`]. Timeouts are applied by the caller through
//! [`send_with_timeout`] so every transport gets the same timeout semantics.

pub mod simulation;

pub use simulation::{RecordedCommand, SimulatedViomi};

use crate::error::{Result, RobotError};
use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use std::time::Duration;

/// Per-call options for an outbound command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommandOptions {
    /// Overrides the robot's default command timeout
    pub timeout: Option<Duration>,
}

impl CommandOptions {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }
}

/// Delivers commands to a robot and returns its reply.
///
/// Implementations report I/O failures as [`RobotError::Transport`] and must
/// not retry; commands are not assumed to be idempotent. A robot that answered
/// without a payload is reported as `Value::Null`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_command(&self, name: &str, args: Value, options: CommandOptions)
    -> Result<Value>;
}

/// Send a command, failing with [`RobotError::Timeout`] once the effective
/// timeout elapses. The explicit per-call timeout wins over `default_timeout`.
pub async fn send_with_timeout(
    transport: &dyn Transport,
    name: &str,
    args: Value,
    options: CommandOptions,
    default_timeout: Duration,
) -> Result<Value> {
    let timeout = options.timeout.unwrap_or(default_timeout);
    debug!("Sending {} {} (timeout {:?})", name, args, timeout);

    match tokio::time::timeout(timeout, transport.send_command(name, args, options)).await {
        Ok(result) => result,
        Err(_) => Err(RobotError::Timeout {
            command: name.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        }),
    }
}
