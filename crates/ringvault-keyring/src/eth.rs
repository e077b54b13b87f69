// SPDX-FileCopyrightText: 2026 RingVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! secp256k1 key pairs with Ethereum-style addresses and signatures.
//!
//! An address is `0x` + lowercase hex of the last 20 bytes of the keccak256
//! hash of the uncompressed public key (without its `0x04` tag).

use k256::ecdsa::SigningKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use rand::rngs::OsRng;
use ringvault_core::RingVaultError;
use sha3::{Digest, Keccak256};
use zeroize::Zeroizing;

/// A secp256k1 signing key together with its cached address.
///
/// The signing key is zeroized when dropped.
#[derive(Clone)]
pub struct EthKeyPair {
    signing_key: SigningKey,
    address: String,
}

impl std::fmt::Debug for EthKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EthKeyPair")
            .field("address", &self.address)
            .field("signing_key", &"[REDACTED]")
            .finish()
    }
}

impl EthKeyPair {
    /// Generate a new random key pair from the OS RNG.
    pub fn generate() -> Self {
        Self::from_signing_key(SigningKey::random(&mut OsRng))
    }

    pub fn from_signing_key(signing_key: SigningKey) -> Self {
        let address = address_of(&signing_key);
        Self {
            signing_key,
            address,
        }
    }

    /// Create from raw private key bytes (32 bytes, a valid non-zero scalar).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RingVaultError> {
        if bytes.len() != 32 {
            return Err(RingVaultError::InvalidKeyMaterial(format!(
                "expected 32-byte private key, got {} bytes",
                bytes.len()
            )));
        }
        let signing_key = SigningKey::from_slice(bytes).map_err(|_| {
            RingVaultError::InvalidKeyMaterial("private key is not a valid secp256k1 scalar".into())
        })?;
        Ok(Self::from_signing_key(signing_key))
    }

    /// Create from a hex private key, with or without `0x`.
    pub fn from_hex(private_key: &str) -> Result<Self, RingVaultError> {
        let trimmed = private_key.trim();
        let stripped = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = Zeroizing::new(hex::decode(stripped).map_err(|_| {
            RingVaultError::InvalidKeyMaterial("private key is not valid hex".into())
        })?);
        Self::from_bytes(&bytes)
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Export the private key as lowercase hex without `0x` (handle with care).
    pub fn private_key_hex(&self) -> Zeroizing<String> {
        let bytes: Zeroizing<[u8; 32]> = Zeroizing::new(self.signing_key.to_bytes().into());
        Zeroizing::new(hex::encode(*bytes))
    }

    /// Sign a 32-byte digest, returning `r || s || v` with `v` in {27, 28}.
    pub fn sign_hash(&self, hash: &[u8; 32]) -> Result<[u8; 65], RingVaultError> {
        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(hash)
            .map_err(|e| RingVaultError::Crypto(format!("secp256k1 signing failed: {e}")))?;

        let mut out = [0u8; 65];
        out[..64].copy_from_slice(&signature.to_bytes());
        out[64] = recovery_id.to_byte() + 27;
        Ok(out)
    }

    /// Sign `message` with the EIP-191 personal-message prefix.
    pub fn sign_personal_message(&self, message: &[u8]) -> Result<[u8; 65], RingVaultError> {
        self.sign_hash(&hash_personal_message(message))
    }
}

fn address_of(signing_key: &SigningKey) -> String {
    let point = signing_key.verifying_key().to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    format!("0x{}", hex::encode(&hash[12..]))
}

/// Compute keccak256 hash.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// Hash a message according to EIP-191 (personal sign).
pub fn hash_personal_message(message: &[u8]) -> [u8; 32] {
    let prefix = format!("\x19Ethereum Signed Message:\n{}", message.len());
    let mut hasher = Keccak256::new();
    hasher.update(prefix.as_bytes());
    hasher.update(message);
    hasher.finalize().into()
}

/// Encode a signature as `0x`-prefixed hex.
pub fn signature_hex(signature: &[u8; 65]) -> String {
    format!("0x{}", hex::encode(signature))
}
