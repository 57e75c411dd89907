//! Error types
//!
//! None of these ever abort a frame: sensor errors send the session back to
//! the connect screen and persistence errors are logged and dropped.

/// Balance board failures
#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    #[error("Balance board unavailable: {0}")]
    Unavailable(String),
    #[error("Balance board timed out after {polls} empty polls")]
    Timeout { polls: u32 },
    #[error("Balance board disconnected")]
    Disconnected,
    #[error("Sensor IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Record store write failures (read misses are not errors)
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Record IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Record serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Configuration problems surfaced at startup
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Settings IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Settings parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid settings: {0}")]
    Invalid(String),
}
