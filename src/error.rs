use std::time::Duration;

use crate::transport::Action;

/// Errors surfaced by bridge commands.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The bridge app reported `success: false`. No further detail crosses
    /// the frame boundary, only the operation that failed.
    #[error("Ledger: {action} failed")]
    AppFailed { action: Action },

    /// No correlated reply arrived within the configured timeout.
    #[error("Ledger: {action} timed out after {timeout:?}")]
    Timeout { action: Action, timeout: Duration },

    /// The bridge was disposed while the request was in flight.
    #[error("Ledger: bridge disposed")]
    Disposed,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid bridge url: {0}")]
    InvalidBridgeUrl(#[from] url::ParseError),

    /// A successful reply carried a payload that does not decode into the
    /// operation's response type.
    #[error("unexpected {action} payload: {source}")]
    UnexpectedPayload {
        action: Action,
        #[source]
        source: serde_json::Error,
    },
}
