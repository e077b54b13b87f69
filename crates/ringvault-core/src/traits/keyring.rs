// SPDX-FileCopyrightText: 2026 RingVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyring traits: the account-holding strategy and its constructor.

use secrecy::SecretString;

use crate::error::RingVaultError;

/// A strategy object owning one or more accounts and their private key material.
///
/// Every variant must round-trip through [`Keyring::serialize`] and
/// [`KeyringBuilder::restore`] to an instance with the identical account list.
/// Addresses are accepted in any case, with or without `0x`.
pub trait Keyring: Send + Sync {
    /// Returns the type tag used to select this variant's builder.
    fn keyring_type(&self) -> &str;

    /// Returns the addresses currently materialized, in keyring order.
    fn accounts(&self) -> Vec<String>;

    /// Materializes `count` additional accounts and returns their addresses.
    fn add_accounts(&mut self, count: usize) -> Result<Vec<String>, RingVaultError>;

    /// Returns the raw private key of `address` as lowercase hex without `0x`.
    fn export_account(&self, address: &str) -> Result<SecretString, RingVaultError>;

    /// Drops `address` from this keyring. Remaining accounts keep their order.
    fn remove_account(&mut self, address: &str) -> Result<(), RingVaultError>;

    /// Signs a 32-byte digest, returning a `0x`-hex `r || s || v` signature.
    fn sign_message(&self, address: &str, hash: &[u8; 32]) -> Result<String, RingVaultError>;

    /// Signs `message` with the EIP-191 personal-message prefix.
    fn sign_personal_message(&self, address: &str, message: &[u8])
        -> Result<String, RingVaultError>;

    /// Returns this keyring's variant-specific data.
    fn serialize(&self) -> Result<serde_json::Value, RingVaultError>;
}

/// Constructs and restores keyrings of one type.
///
/// Builders are registered by type tag so new variants can be added without
/// touching the controller.
pub trait KeyringBuilder: Send + Sync {
    /// The type tag this builder answers to.
    fn keyring_type(&self) -> &str;

    /// Creates a new keyring from caller-supplied options (`None` for a fresh one).
    fn build(&self, options: Option<serde_json::Value>) -> Result<Box<dyn Keyring>, RingVaultError>;

    /// Recreates a keyring from the data its [`Keyring::serialize`] produced.
    fn restore(&self, data: serde_json::Value) -> Result<Box<dyn Keyring>, RingVaultError>;
}
