//! Envelopes exchanged with the bridge page.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier the bridge page uses to recognize envelopes addressed to it,
/// as opposed to unrelated traffic on the same message channel.
pub const FRAME_TARGET: &str = "ledger-cardano-bridge";

/// Commands understood by the bridge page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "ledger-get-version")]
    GetVersion,
    #[serde(rename = "ledger-get-extended-public-key")]
    GetExtendedPublicKey,
    #[serde(rename = "ledger-derive-address")]
    DeriveAddress,
    #[serde(rename = "ledger-sign-transaction")]
    SignTransaction,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::GetVersion => "ledger-get-version",
            Action::GetExtendedPublicKey => "ledger-get-extended-public-key",
            Action::DeriveAddress => "ledger-derive-address",
            Action::SignTransaction => "ledger-sign-transaction",
        }
    }

    /// Action name the frame echoes back on the matching reply.
    pub fn reply_action(&self) -> String {
        format!("{}-reply", self.as_str())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Envelope posted into the frame's content window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestEnvelope {
    pub target: String,
    pub action: Action,
    #[serde(rename = "requestId")]
    pub request_id: u64,
    pub params: Value,
}

/// Reply data, once parsed. The `action` is kept as a raw string so that a
/// malformed or mismatched name can be inspected before it is trusted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reply {
    pub action: String,
    #[serde(rename = "requestId")]
    pub request_id: u64,
    pub success: bool,
    #[serde(default)]
    pub payload: Value,
}

/// A raw event from the page-level message channel, before any filtering.
/// The channel is shared; most events on it are not for us.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub origin: String,
    pub data: Value,
}
