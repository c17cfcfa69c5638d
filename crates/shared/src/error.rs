//! Errors raised while decoding frames from the live-log endpoint.

use thiserror::Error;

/// A frame that could not be turned into a keep-alive or a log event.
///
/// These are never fatal to a connection: the receiver logs them and drops
/// the single offending frame.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("empty frame")]
    Empty,
    #[error("malformed log event: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("log event is missing an id")]
    MissingId,
    #[error("unknown log level `{0}`")]
    UnknownLevel(String),
}
