//! Protocol error types.

use thiserror::Error;

/// Errors raised while encoding or decoding protocol frames.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Payload did not match the shape expected for its event.
    #[error("invalid payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Frame is not a `[name, payload]` pair.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Event name is not part of the protocol.
    #[error("unknown event: {0}")]
    UnknownEvent(String),

    /// Language tag is not in the agreed set.
    #[error("unknown language: {0}")]
    UnknownLanguage(String),
}

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;
