// SPDX-FileCopyrightText: 2026 RingVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password-based [`Encryptor`] built on Argon2id and AES-256-GCM.
//!
//! Each blob is a JSON envelope:
//!
//! ```text
//! {"version":1,"kdf":{"memory_cost":..,"iterations":..,"parallelism":..},
//!  "salt":"<b64>","iv":"<b64>","data":"<b64 ciphertext+tag>"}
//! ```
//!
//! A fresh salt and nonce are drawn for every encryption.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ringvault_config::VaultConfig;
use ringvault_core::{EncryptedBlob, Encryptor, RingVaultError};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroizing;

use crate::crypto;
use crate::kdf::{self, KdfParams};

const ENVELOPE_VERSION: u32 = 1;

/// Upper bounds on Argon2id costs accepted from a stored blob, unless they
/// match this encryptor's own parameters.
const MAX_STORED_MEMORY_COST: u32 = 1024 * 1024;
const MAX_STORED_ITERATIONS: u32 = 64;
const MAX_STORED_PARALLELISM: u32 = 16;

#[derive(Serialize, Deserialize)]
struct Envelope {
    version: u32,
    kdf: KdfParams,
    salt: String,
    iv: String,
    data: String,
}

/// Encrypts vault plaintext under a key derived from the password.
#[derive(Debug, Clone, Default)]
pub struct PassphraseEncryptor {
    params: KdfParams,
}

impl PassphraseEncryptor {
    pub fn new(params: KdfParams) -> Self {
        Self { params }
    }

    pub fn from_config(config: &VaultConfig) -> Self {
        Self::new(KdfParams::from_config(config))
    }

    pub fn params(&self) -> &KdfParams {
        &self.params
    }

    /// Reject stored KDF costs that Argon2id cannot run or that would pin
    /// memory and CPU well beyond what this vault was configured for.
    fn check_stored_params(&self, stored: &KdfParams) -> Result<(), RingVaultError> {
        if *stored == self.params {
            return Ok(());
        }
        let in_range = (1..=MAX_STORED_PARALLELISM).contains(&stored.parallelism)
            && (1..=MAX_STORED_ITERATIONS.max(self.params.iterations)).contains(&stored.iterations)
            && stored.memory_cost >= 8 * stored.parallelism
            && stored.memory_cost <= MAX_STORED_MEMORY_COST.max(self.params.memory_cost);
        if in_range {
            Ok(())
        } else {
            Err(RingVaultError::Decryption(
                "vault blob carries out-of-range key derivation parameters".to_string(),
            ))
        }
    }
}

fn undecodable() -> RingVaultError {
    RingVaultError::Decryption("vault blob is not a recognised envelope".to_string())
}

fn decode_fixed<const N: usize>(encoded: &str) -> Result<[u8; N], RingVaultError> {
    STANDARD
        .decode(encoded)
        .ok()
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or_else(undecodable)
}

#[async_trait]
impl Encryptor for PassphraseEncryptor {
    async fn encrypt(
        &self,
        password: &SecretString,
        plaintext: &serde_json::Value,
    ) -> Result<EncryptedBlob, RingVaultError> {
        let salt = kdf::generate_salt()?;
        let key = kdf::derive_key(password.expose_secret().as_bytes(), &salt, &self.params)?;
        let serialized = Zeroizing::new(serde_json::to_vec(plaintext)?);
        let (ciphertext, nonce) = crypto::seal(&key, &serialized)?;

        let envelope = Envelope {
            version: ENVELOPE_VERSION,
            kdf: self.params,
            salt: STANDARD.encode(salt),
            iv: STANDARD.encode(nonce),
            data: STANDARD.encode(ciphertext),
        };
        debug!(bytes = serialized.len(), "vault encrypted");
        Ok(EncryptedBlob(serde_json::to_string(&envelope)?))
    }

    async fn decrypt(
        &self,
        password: &SecretString,
        blob: &EncryptedBlob,
    ) -> Result<serde_json::Value, RingVaultError> {
        let envelope: Envelope =
            serde_json::from_str(blob.as_str()).map_err(|_| undecodable())?;
        if envelope.version != ENVELOPE_VERSION {
            return Err(RingVaultError::Decryption(format!(
                "unsupported vault envelope version {}",
                envelope.version
            )));
        }
        let salt: [u8; 16] = decode_fixed(&envelope.salt)?;
        let nonce: [u8; 12] = decode_fixed(&envelope.iv)?;
        let ciphertext = STANDARD.decode(&envelope.data).map_err(|_| undecodable())?;

        self.check_stored_params(&envelope.kdf)?;
        let key = kdf::derive_key(password.expose_secret().as_bytes(), &salt, &envelope.kdf)
            .map_err(|_| {
                RingVaultError::Decryption("vault key derivation failed".to_string())
            })?;
        let plaintext = Zeroizing::new(crypto::open(&key, &nonce, &ciphertext)?);
        serde_json::from_slice(&plaintext).map_err(|_| {
            RingVaultError::Decryption("vault plaintext is not valid JSON".to_string())
        })
    }
}
