// SPDX-FileCopyrightText: 2026 RingVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault codec: the ordered keyring list to and from one encrypted blob.
//!
//! The plaintext is a JSON array of `{"type": <tag>, "data": <variant data>}`
//! objects in controller order.

use std::sync::Arc;

use ringvault_core::{EncryptedBlob, Encryptor, Keyring, RingVaultError, SerializedKeyring};
use secrecy::SecretString;

/// Serializes keyrings and delegates the encryption itself to an [`Encryptor`].
#[derive(Clone)]
pub struct VaultCodec {
    encryptor: Arc<dyn Encryptor>,
}

impl VaultCodec {
    pub fn new(encryptor: Arc<dyn Encryptor>) -> Self {
        Self { encryptor }
    }

    /// Encrypt `keyrings` in order under `password`.
    pub async fn seal(
        &self,
        password: &SecretString,
        keyrings: &[Box<dyn Keyring>],
    ) -> Result<EncryptedBlob, RingVaultError> {
        let serialized = serialize_keyrings(keyrings)?;
        let plaintext = serde_json::to_value(&serialized)?;
        self.encryptor.encrypt(password, &plaintext).await
    }

    /// Decrypt a blob back into its serialized keyrings.
    ///
    /// A blob whose plaintext is not a keyring list is treated like a wrong
    /// password: nothing is restored.
    pub async fn open(
        &self,
        password: &SecretString,
        blob: &EncryptedBlob,
    ) -> Result<Vec<SerializedKeyring>, RingVaultError> {
        let plaintext = self.encryptor.decrypt(password, blob).await?;
        serde_json::from_value(plaintext).map_err(|_| {
            RingVaultError::Decryption("vault contents are not a keyring list".to_string())
        })
    }
}

impl std::fmt::Debug for VaultCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultCodec").finish_non_exhaustive()
    }
}

/// Snapshot each keyring as its type tag plus variant data.
pub fn serialize_keyrings(
    keyrings: &[Box<dyn Keyring>],
) -> Result<Vec<SerializedKeyring>, RingVaultError> {
    keyrings
        .iter()
        .map(|keyring| {
            Ok(SerializedKeyring {
                keyring_type: keyring.keyring_type().to_string(),
                data: keyring.serialize()?,
            })
        })
        .collect()
}
