use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::BridgeError;
use crate::transport::origin_of;

/// Publicly hosted bridge page used when no override is given.
pub const BRIDGE_URL: &str = "https://emurgo.github.io/yoroi-extension-ledger-bridge";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// How the bridge page talks to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionType {
    #[default]
    U2f,
    WebUsb,
}

impl ConnectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionType::U2f => "u2f",
            ConnectionType::WebUsb => "webusb",
        }
    }
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Construction parameters for [`LedgerBridge`](crate::bridge::LedgerBridge).
/// Bridge URL and connection type together fully determine the frame's
/// source URL and the trusted reply origin.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub bridge_url: String,
    pub connection_type: ConnectionType,
    /// Per-request timeout. `None` leaves replyless requests pending
    /// forever, which is what the original bridge page contract allows for.
    pub timeout: Option<Duration>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        BridgeConfig {
            bridge_url: BRIDGE_URL.to_string(),
            connection_type: ConnectionType::default(),
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

impl BridgeConfig {
    /// Full frame URL; the connection type rides as the query leaf.
    pub fn frame_url(&self) -> String {
        format!("{}?{}", self.bridge_url, self.connection_type)
    }

    /// Origin a reply must carry to be considered at all.
    pub fn trusted_origin(&self) -> String {
        origin_of(&self.frame_url())
    }

    pub(crate) fn validate(&self) -> Result<(), BridgeError> {
        Url::parse(&self.bridge_url)?;
        Ok(())
    }
}
