use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use strum::{EnumString, IntoStaticStr};

/// Load environment variables from .env file with robust parsing.
/// Handles values with spaces without requiring quotes.
pub fn load_dotenv() {
    load_dotenv_from(Path::new(".env"));
}

fn load_dotenv_from(env_path: &Path) {
    let content = match fs::read_to_string(env_path) {
        Ok(c) => c,
        Err(_) => return,
    };

    for (key, value) in parse_dotenv(&content) {
        // Only set if not already set (env vars take precedence)
        if std::env::var(&key).is_err() {
            // SAFETY: We're single-threaded at this point (called before any async runtime)
            unsafe { std::env::set_var(key, value) };
        }
    }
}

fn parse_dotenv(content: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();

    for line in content.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Find the first '=' and split there
        if let Some(eq_pos) = line.find('=') {
            let key = line[..eq_pos].trim();
            let mut value = line[eq_pos + 1..].trim();

            // Remove surrounding quotes if present
            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = &value[1..value.len() - 1];
            }

            pairs.push((key.to_string(), value.to_string()));
        }
    }

    pairs
}

/// Supported robot families.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum RobotModel {
    Viomi,
}

impl RobotModel {
    pub fn manufacturer(&self) -> &'static str {
        match self {
            RobotModel::Viomi => "Viomi",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub robot: RobotConfig,
    pub mqtt: MqttConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotConfig {
    pub model: RobotModel,
    /// Device identifier used in MQTT topics and unique ids
    pub identifier: String,
    /// Default timeout for every outbound device command
    pub command_timeout_ms: u64,
    pub poll_interval_secs: u64,
    /// Send the mop route flag before segment cleaning in mop-moves mode
    pub mop_route_on_mop_moves: bool,
}

impl RobotConfig {
    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MqttConfig {
    pub broker_host: String,
    pub broker_port: u16,
    pub client_id: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Prefix for state and availability topics
    pub topic_prefix: String,
    /// Prefix for Home Assistant discovery topics
    pub autoconf_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            robot: RobotConfig {
                model: RobotModel::Viomi,
                identifier: "viomi_v8".to_string(),
                command_timeout_ms: 5000,
                poll_interval_secs: 30,
                mop_route_on_mop_moves: true,
            },
            mqtt: MqttConfig {
                broker_host: "10.0.0.2".to_string(),
                broker_port: 1883,
                client_id: "vacuum-bridge".to_string(),
                username: None,
                password: None,
                topic_prefix: "valetudo".to_string(),
                autoconf_prefix: "homeassistant".to_string(),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build the configuration from a variable lookup, keeping defaults for
    /// anything unset or unparsable.
    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        // Robot configuration
        if let Some(model) = var("ROBOT_MODEL")
            && let Ok(m) = model.parse()
        {
            config.robot.model = m;
        }
        if let Some(identifier) = var("ROBOT_IDENTIFIER") {
            config.robot.identifier = identifier;
        }
        if let Some(timeout) = var("ROBOT_COMMAND_TIMEOUT_MS")
            && let Ok(t) = timeout.parse::<u64>()
        {
            if t > 0 {
                config.robot.command_timeout_ms = t;
            } else {
                warn!("ROBOT_COMMAND_TIMEOUT_MS must be positive, keeping default");
            }
        }
        if let Some(interval) = var("ROBOT_POLL_INTERVAL_SECS")
            && let Ok(i) = interval.parse::<u64>()
        {
            if i > 0 {
                config.robot.poll_interval_secs = i;
            } else {
                warn!("ROBOT_POLL_INTERVAL_SECS must be positive, keeping default");
            }
        }
        if let Some(flag) = var("ROBOT_MOP_ROUTE_ON_MOP_MOVES")
            && let Ok(f) = flag.parse()
        {
            config.robot.mop_route_on_mop_moves = f;
        }

        // MQTT configuration
        if let Some(host) = var("MQTT_BROKER_HOST") {
            config.mqtt.broker_host = host;
        }
        if let Some(port) = var("MQTT_BROKER_PORT")
            && let Ok(p) = port.parse()
        {
            config.mqtt.broker_port = p;
        }
        if let Some(client_id) = var("MQTT_CLIENT_ID") {
            config.mqtt.client_id = client_id;
        }
        if let Some(username) = var("MQTT_USERNAME") {
            config.mqtt.username = Some(username);
        }
        if let Some(password) = var("MQTT_PASSWORD") {
            config.mqtt.password = Some(password);
        }
        if let Some(prefix) = var("MQTT_TOPIC_PREFIX") {
            config.mqtt.topic_prefix = prefix;
        }
        if let Some(prefix) = var("MQTT_AUTOCONF_PREFIX") {
            config.mqtt.autoconf_prefix = prefix;
        }

        config
    }
}
