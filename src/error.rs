use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum RobotError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid device response: {0}")]
    InvalidDeviceResponse(String),

    #[error("Operation not supported: {0}")]
    UnsupportedOperation(String),

    #[error("Command {command} timed out after {timeout_ms}ms")]
    Timeout { command: String, timeout_ms: u64 },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unknown operation mode {0}")]
    UnknownOperationMode(String),

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),

    #[error(transparent)]
    MqttError(#[from] rumqttc::ClientError),
}

pub type Result<T> = std::result::Result<T, RobotError>;
