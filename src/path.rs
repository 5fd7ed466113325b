//! BIP44 derivation path construction, fixed to Cardano's coin type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Offset marking a path segment as hardened.
pub const HARDENED: u32 = 0x8000_0000;

/// BIP44 purpose field.
pub const BIP44_PURPOSE: u32 = 44;

/// Cardano's registered coin type.
pub const CARDANO_COIN_TYPE: u32 = 1815;

/// A 5-element BIP44 derivation path in the array form the Cardano app
/// expects: purpose, coin type and account hardened, then chain and index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DerivationPath(pub [u32; 5]);

impl DerivationPath {
    /// Builds `m/44'/1815'/account'/change/address_index`.
    ///
    /// No bounds are checked; an `account` at or above [`HARDENED`] wraps
    /// into the non-hardened range, as in the original bridge.
    pub fn bip44(account: u32, is_change: bool, address_index: u32) -> Self {
        DerivationPath([
            HARDENED + BIP44_PURPOSE,
            HARDENED + CARDANO_COIN_TYPE,
            HARDENED.wrapping_add(account),
            is_change as u32,
            address_index,
        ])
    }

    pub fn segments(&self) -> &[u32; 5] {
        &self.0
    }

    /// Serializes the path in the little-endian layout Ledger apps take in
    /// APDU payloads.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(4 * self.0.len());
        for segment in self.0 {
            bytes.extend(segment.to_le_bytes());
        }
        bytes
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for segment in self.0 {
            if segment >= HARDENED {
                write!(f, "/{}'", segment - HARDENED)?;
            } else {
                write!(f, "/{}", segment)?;
            }
        }
        Ok(())
    }
}
