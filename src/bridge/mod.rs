#[allow(clippy::module_inception)]
mod bridge;
mod config;
mod pending;

pub use bridge::LedgerBridge;
pub use config::{BridgeConfig, ConnectionType, BRIDGE_URL};
