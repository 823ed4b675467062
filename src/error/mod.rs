//! Error types for newsbrief.

use thiserror::Error;

use crate::hooks::HookPhase;

/// Primary error type for all session operations.
#[derive(Error, Debug)]
pub enum BriefError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config file error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Tool execution error: {tool_name}: {message}")]
    ToolExecution { tool_name: String, message: String },

    #[error("Hook handler '{handler}' failed: {message}")]
    HookHandler { handler: String, message: String },

    #[error("Session denied at {phase}: {reason}")]
    SessionDenied { phase: HookPhase, reason: String },
}

impl BriefError {
    /// Create a stream error.
    pub fn stream(message: impl Into<String>) -> Self {
        Self::Stream(message.into())
    }

    /// Create a hook handler error.
    pub fn hook(handler: impl Into<String>, message: impl Into<String>) -> Self {
        Self::HookHandler {
            handler: handler.into(),
            message: message.into(),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, BriefError>;
