// SPDX-FileCopyrightText: 2026 RingVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password-based encryption capability consumed by the vault codec.

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::RingVaultError;
use crate::types::EncryptedBlob;

/// Symmetric encryption keyed by a password.
///
/// `decrypt` must fail with [`RingVaultError::Decryption`] on a wrong password
/// or a malformed blob; it never returns garbage plaintext.
#[async_trait]
pub trait Encryptor: Send + Sync {
    /// Encrypts a JSON value under `password`.
    async fn encrypt(
        &self,
        password: &SecretString,
        plaintext: &serde_json::Value,
    ) -> Result<EncryptedBlob, RingVaultError>;

    /// Decrypts a blob produced by [`Encryptor::encrypt`].
    async fn decrypt(
        &self,
        password: &SecretString,
        blob: &EncryptedBlob,
    ) -> Result<serde_json::Value, RingVaultError>;
}
