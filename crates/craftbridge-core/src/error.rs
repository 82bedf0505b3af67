//! Error types for CraftBridge

use thiserror::Error;

/// Result type for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Bridge error types
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Start requested while the server process is live
    #[error("server is already running")]
    AlreadyRunning,

    /// Command or stop requested while the server process is dead
    #[error("server is not running")]
    NotRunning,

    /// Binary missing or launch failed; the process stays not-running
    #[error("failed to launch server: {0}")]
    Spawn(String),

    /// Name absent from both the administrative and native registries
    #[error("not a valid command: {0}")]
    InvalidCommand(String),

    /// Unexpected failure inside an administrative handler
    #[error("command handler failed: {0}")]
    HandlerFault(String),

    /// Settings-file collaborator error (allow-list, permissions, properties)
    #[error("settings error: {0}")]
    Settings(String),

    /// I/O error from the process pipes or settings files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Chat transport delivery error
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::Settings(err.to_string())
    }
}
