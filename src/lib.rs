//! Client-side bridge to a Ledger hardware wallet's Cardano app.
//!
//! The hard parts (USB/U2F transport, the Cardano signing protocol, key
//! derivation arithmetic) live in a separately-hosted bridge page loaded
//! into an embedded frame. This crate only builds BIP44 derivation paths,
//! posts command envelopes towards that page, and correlates replies back
//! to callers, validating the reply origin along the way. The frame
//! boundary is a [`transport::Transport`] seam, so the correlation core
//! runs unchanged against a fake frame in tests.

pub mod bridge;
pub mod transport;

mod error;
mod path;
mod types;

pub use bridge::{BridgeConfig, ConnectionType, LedgerBridge, BRIDGE_URL};
pub use error::BridgeError;
pub use path::{DerivationPath, BIP44_PURPOSE, CARDANO_COIN_TYPE, HARDENED};
pub use types::*;
