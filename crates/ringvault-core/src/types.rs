// SPDX-FileCopyrightText: 2026 RingVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the RingVault workspace.

use serde::{Deserialize, Serialize};

/// Type tag of the mnemonic-derived keyring.
pub const HD_KEYRING_TYPE: &str = "HD Key Tree";

/// Type tag of the imported raw-key keyring.
pub const SIMPLE_KEYRING_TYPE: &str = "Simple Key Pair";

/// One keyring in its persisted form: a type tag plus data only its variant understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedKeyring {
    #[serde(rename = "type")]
    pub keyring_type: String,
    pub data: serde_json::Value,
}

/// Opaque ciphertext produced by an [`Encryptor`](crate::traits::Encryptor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncryptedBlob(pub String);

impl EncryptedBlob {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Everything the controller keeps in the external state store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vault: Option<EncryptedBlob>,
}

/// Canonical form of an account address: `0x`-prefixed lowercase hex.
///
/// Accepts input with or without the prefix, in any case.
pub fn normalize_address(address: &str) -> String {
    let trimmed = address.trim();
    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    format!("0x{}", hex.to_ascii_lowercase())
}

/// Compare two addresses ignoring case and `0x` prefix.
pub fn same_address(a: &str, b: &str) -> bool {
    normalize_address(a) == normalize_address(b)
}
