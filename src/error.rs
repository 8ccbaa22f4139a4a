//! Error types for Wiretap.
//!
//! Uses thiserror for ergonomic error definitions. Any error aborts the
//! current fixture run; there is no retry or recovery layer.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Auth errors
    #[error("Token error: {0}")]
    Token(String),

    // REST transport errors
    #[error("Chat API request failed: {0}")]
    Request(String),

    #[error("Chat API error {status}: {body}")]
    Api { status: u16, body: String },

    // WebSocket errors
    #[error("WebSocket error: {0}")]
    Socket(String),

    #[error("Timed out after {waited_secs}s waiting for {event_type} event")]
    EventTimeout {
        event_type: String,
        waited_secs: u64,
    },

    // Validation errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

// Convenience conversions
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::Socket(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::Token(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::Config(format!("Invalid URL: {}", err))
    }
}
