//! Wire types of the Cardano app API surface.
//!
//! These are re-exported at the crate root so consumers can speak the app's
//! vocabulary directly, alongside the bridge's own command methods.

use serde::{Deserialize, Serialize};

use crate::path::DerivationPath;

/// Cardano app version, as reported by `get_version`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl AppVersion {
    pub fn is_at_least(&self, major: u32, minor: u32, patch: u32) -> bool {
        semver::Version::from(*self) >= semver::Version::new(major as u64, minor as u64, patch as u64)
    }
}

impl From<AppVersion> for semver::Version {
    fn from(v: AppVersion) -> Self {
        semver::Version::new(v.major as u64, v.minor as u64, v.patch as u64)
    }
}

/// Extended public key at a derivation path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedPublicKey {
    pub public_key_hex: String,
    pub chain_code_hex: String,
}

/// Address derived on the device, base58-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedAddress {
    pub address58: String,
}

/// A UTxO being spent: the raw transaction it came from, the output index
/// within it, and the path owning that output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputTypeUtxo {
    pub tx_data_hex: String,
    pub output_index: u32,
    pub path: DerivationPath,
}

/// Transaction output: either a third-party address, or change returned to
/// a path owned by the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TxOutput {
    #[serde(rename_all = "camelCase")]
    Address { amount_str: String, address58: String },
    #[serde(rename_all = "camelCase")]
    Change {
        amount_str: String,
        path: DerivationPath,
    },
}

/// One witness per signing path of a signed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Witness {
    pub path: DerivationPath,
    pub witness_signature_hex: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignTransactionResponse {
    pub tx_hash_hex: String,
    pub witnesses: Vec<Witness>,
}
