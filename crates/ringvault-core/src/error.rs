// SPDX-FileCopyrightText: 2026 RingVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the RingVault keyring controller.

use thiserror::Error;

/// The primary error type used across all RingVault crates.
///
/// Messages never include passwords, mnemonics, or private keys.
#[derive(Debug, Error)]
pub enum RingVaultError {
    /// Wrong password, corrupt vault blob, or no vault stored.
    #[error("vault decryption failed: {0}")]
    Decryption(String),

    /// No keyring builder is registered under the given type tag.
    #[error("unsupported keyring type: {0}")]
    UnsupportedKeyringType(String),

    /// No live keyring owns the given address.
    #[error("no keyring found for account {0}")]
    AccountNotFound(String),

    /// A persist was attempted while the controller is locked.
    #[error("no password set -- controller is locked")]
    NoPasswordSet,

    /// A new keyring would materialize an address that another keyring already owns.
    #[error("account {0} is already held by another keyring")]
    DuplicateAccount(String),

    /// No keyring exists at the given position.
    #[error("no keyring at index {0}")]
    KeyringIndexOutOfRange(usize),

    /// Malformed private key, invalid mnemonic, or bad derivation path.
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// Keyring data does not match the shape its variant expects.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// RNG, cipher setup, or key-derivation failures unrelated to the password.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// State store errors (database connection, query failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration errors.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RingVaultError {
    /// Whether this error means the vault could not be opened with the given password.
    pub fn is_decryption(&self) -> bool {
        matches!(self, RingVaultError::Decryption(_))
    }
}

impl From<serde_json::Error> for RingVaultError {
    fn from(e: serde_json::Error) -> Self {
        RingVaultError::Serialization(e.to_string())
    }
}
