//! Error types for macadamia

use thiserror::Error;

/// Result type for macadamia operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for macadamia
#[derive(Debug, Error)]
pub enum Error {
    /// Debug endpoint HTTP request failed (refused, timed out, non-2xx)
    #[error("Debug endpoint request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// WebSocket transport error
    #[error("Transport error: {context}")]
    Transport {
        context: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// CDP protocol error returned in a response envelope
    #[error("CDP error: {message} (code {code})")]
    Cdp { code: i64, message: String },

    /// Deadline expired on a transport call
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Response or input had an unexpected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No debuggable target exposes a usable WebSocket URL
    #[error("No debuggable target: {0}")]
    NoTarget(String),
}

impl Error {
    /// Create a transport error with context
    pub fn transport(context: impl Into<String>) -> Self {
        Self::Transport {
            context: context.into(),
            source: None,
        }
    }

    /// Create a transport error with IO source
    pub fn transport_io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Transport {
            context: context.into(),
            source: Some(source),
        }
    }

    /// Create a CDP error from a response envelope's error member
    pub fn cdp(code: i64, message: impl Into<String>) -> Self {
        Self::Cdp {
            code,
            message: message.into(),
        }
    }
}
