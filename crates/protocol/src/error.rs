//! Protocol error types.

use thiserror::Error;

/// Errors that can occur while decoding an inbound frame.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("frame is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("frame has no `type` field")]
    MissingKind,

    #[error("unknown message type: {0}")]
    UnknownKind(String),

    #[error("invalid `{kind}` payload: {source}")]
    BadPayload {
        kind: String,
        source: serde_json::Error,
    },
}
