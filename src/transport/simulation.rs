//! Simulated Viomi robot for development and testing.
//!
//! Answers the Viomi command set from an in-memory property table, records
//! every command it receives in order, and can be told to fail or to reply
//! with a canned payload for specific commands.

use super::{CommandOptions, Transport};
use crate::error::{Result, RobotError};
use async_trait::async_trait;
use log::info;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

/// A command received by the simulator.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCommand {
    pub name: String,
    pub args: Value,
}

struct SimState {
    props: HashMap<String, Value>,
    map_id: Option<u64>,
    commands: Vec<RecordedCommand>,
    failures: HashMap<String, VecDeque<String>>,
    canned: HashMap<String, VecDeque<Value>>,
    reply_delay: Option<Duration>,
}

/// In-process stand-in for a Viomi robot.
pub struct SimulatedViomi {
    state: Mutex<SimState>,
}

impl SimulatedViomi {
    /// A robot with a 2-in-1 box and mop attached, running in mixed mode.
    pub fn new() -> Self {
        let props = [
            ("box_type", json!(3)),
            ("mop_type", json!(1)),
            ("is_mop", json!(1)),
            ("s_area", json!(12)),
            ("s_time", json!(35)),
            ("main_brush_hours", json!(120.5)),
            ("side_brush_hours", json!(80.25)),
            ("hypa_hours", json!(60)),
            ("mop_hours", json!(40)),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            state: Mutex::new(SimState {
                props,
                map_id: Some(1_612_345_678),
                commands: Vec::new(),
                failures: HashMap::new(),
                canned: HashMap::new(),
                reply_delay: None,
            }),
        }
    }

    pub fn set_prop(&self, name: &str, value: Value) {
        self.state.lock().props.insert(name.to_string(), value);
    }

    pub fn remove_prop(&self, name: &str) {
        self.state.lock().props.remove(name);
    }

    pub fn set_map_id(&self, map_id: Option<u64>) {
        self.state.lock().map_id = map_id;
    }

    /// Delay every reply, e.g. to exercise timeouts.
    pub fn set_reply_delay(&self, delay: Option<Duration>) {
        self.state.lock().reply_delay = delay;
    }

    /// Fail the next invocation of `command` with a transport error.
    pub fn fail_next(&self, command: &str, message: &str) {
        self.state
            .lock()
            .failures
            .entry(command.to_string())
            .or_default()
            .push_back(message.to_string());
    }

    /// Answer the next invocation of `command` with `reply` instead of simulating it.
    pub fn reply_next(&self, command: &str, reply: Value) {
        self.state
            .lock()
            .canned
            .entry(command.to_string())
            .or_default()
            .push_back(reply);
    }

    /// All commands received so far, in order.
    pub fn commands(&self) -> Vec<RecordedCommand> {
        self.state.lock().commands.clone()
    }

    /// Names of all commands received so far, in order.
    pub fn command_names(&self) -> Vec<String> {
        self.state
            .lock()
            .commands
            .iter()
            .map(|c| c.name.clone())
            .collect()
    }

    pub fn commands_named(&self, name: &str) -> Vec<RecordedCommand> {
        self.state
            .lock()
            .commands
            .iter()
            .filter(|c| c.name == name)
            .cloned()
            .collect()
    }

    pub fn clear_commands(&self) {
        self.state.lock().commands.clear();
    }

    fn handle(&self, name: &str, args: &Value) -> Result<Value> {
        let mut state = self.state.lock();
        state.commands.push(RecordedCommand {
            name: name.to_string(),
            args: args.clone(),
        });

        if let Some(message) = state.failures.get_mut(name).and_then(|q| q.pop_front()) {
            return Err(RobotError::Transport(message));
        }
        if let Some(reply) = state.canned.get_mut(name).and_then(|q| q.pop_front()) {
            return Ok(reply);
        }

        match name {
            "get_prop" => {
                let names = args.as_array().cloned().unwrap_or_default();
                let values = names
                    .iter()
                    .map(|n| {
                        n.as_str()
                            .and_then(|n| state.props.get(n).cloned())
                            .unwrap_or(Value::Null)
                    })
                    .collect();
                Ok(Value::Array(values))
            }
            "set_mop" => {
                if let Some(mode) = args.get(0).cloned() {
                    state.props.insert("is_mop".to_string(), mode);
                }
                Ok(json!(["ok"]))
            }
            "set_zone" => {
                let declared = args.get(0).and_then(Value::as_u64).unwrap_or(0) as usize;
                let records = args.as_array().map(|a| a.len().saturating_sub(1)).unwrap_or(0);
                if declared != records {
                    return Err(RobotError::Transport(format!(
                        "set_zone declared {} zones but carried {}",
                        declared, records
                    )));
                }
                Ok(json!(["ok"]))
            }
            "get_curmap" => Ok(match state.map_id {
                Some(id) => json!([id]),
                None => json!([]),
            }),
            "set_mode" | "set_mode_withroom" | "set_moproute" | "arrange_room"
            | "set_uploadmap" => Ok(json!(["ok"])),
            other => Err(RobotError::Transport(format!("unknown method {}", other))),
        }
    }
}

impl Default for SimulatedViomi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for SimulatedViomi {
    async fn send_command(
        &self,
        name: &str,
        args: Value,
        _options: CommandOptions,
    ) -> Result<Value> {
        let delay = self.state.lock().reply_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self.handle(name, &args);
        info!("[Sim] {} {} -> {:?}", name, args, reply);
        reply
    }
}
