// SPDX-FileCopyrightText: 2026 RingVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Imported raw-key ("Simple Key Pair") keyring.
//!
//! Serialized form is a JSON array of lowercase hex private keys without `0x`,
//! in insertion order.

use ringvault_core::{
    normalize_address, same_address, Keyring, KeyringBuilder, RingVaultError, SIMPLE_KEYRING_TYPE,
};
use secrecy::SecretString;
use tracing::debug;
use zeroize::Zeroizing;

use crate::eth::{signature_hex, EthKeyPair};

/// A keyring holding an ordered list of explicitly imported private keys.
#[derive(Debug, Default)]
pub struct SimpleKeyring {
    wallets: Vec<EthKeyPair>,
}

impl SimpleKeyring {
    pub fn new() -> Self {
        Self::default()
    }

    /// Import keys given as hex strings, with or without `0x`.
    pub fn from_private_keys<S: AsRef<str>>(keys: &[S]) -> Result<Self, RingVaultError> {
        let wallets = keys
            .iter()
            .map(|key| EthKeyPair::from_hex(key.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { wallets })
    }

    fn find(&self, address: &str) -> Result<&EthKeyPair, RingVaultError> {
        self.wallets
            .iter()
            .find(|w| same_address(w.address(), address))
            .ok_or_else(|| RingVaultError::AccountNotFound(normalize_address(address)))
    }
}

fn parse_keys(value: serde_json::Value) -> Result<Vec<Zeroizing<String>>, RingVaultError> {
    let keys: Vec<String> = serde_json::from_value(value).map_err(|_| {
        RingVaultError::Serialization("simple keyring data must be a list of hex private keys".into())
    })?;
    Ok(keys.into_iter().map(Zeroizing::new).collect())
}

impl Keyring for SimpleKeyring {
    fn keyring_type(&self) -> &str {
        SIMPLE_KEYRING_TYPE
    }

    fn accounts(&self) -> Vec<String> {
        self.wallets.iter().map(|w| w.address().to_string()).collect()
    }

    fn add_accounts(&mut self, count: usize) -> Result<Vec<String>, RingVaultError> {
        let added: Vec<EthKeyPair> = (0..count).map(|_| EthKeyPair::generate()).collect();
        let addresses = added.iter().map(|w| w.address().to_string()).collect();
        self.wallets.extend(added);
        debug!(count, "generated simple key pairs");
        Ok(addresses)
    }

    fn export_account(&self, address: &str) -> Result<SecretString, RingVaultError> {
        let hex = self.find(address)?.private_key_hex();
        Ok(SecretString::from(hex.to_string()))
    }

    fn remove_account(&mut self, address: &str) -> Result<(), RingVaultError> {
        let position = self
            .wallets
            .iter()
            .position(|w| same_address(w.address(), address))
            .ok_or_else(|| RingVaultError::AccountNotFound(normalize_address(address)))?;
        self.wallets.remove(position);
        Ok(())
    }

    fn sign_message(&self, address: &str, hash: &[u8; 32]) -> Result<String, RingVaultError> {
        Ok(signature_hex(&self.find(address)?.sign_hash(hash)?))
    }

    fn sign_personal_message(
        &self,
        address: &str,
        message: &[u8],
    ) -> Result<String, RingVaultError> {
        Ok(signature_hex(
            &self.find(address)?.sign_personal_message(message)?,
        ))
    }

    fn serialize(&self) -> Result<serde_json::Value, RingVaultError> {
        Ok(serde_json::Value::Array(
            self.wallets
                .iter()
                .map(|w| serde_json::Value::String(w.private_key_hex().to_string()))
                .collect(),
        ))
    }
}

/// Builder registered under [`SIMPLE_KEYRING_TYPE`].
///
/// Options and persisted data are both a list of hex private keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleKeyringBuilder;

impl KeyringBuilder for SimpleKeyringBuilder {
    fn keyring_type(&self) -> &str {
        SIMPLE_KEYRING_TYPE
    }

    fn build(
        &self,
        options: Option<serde_json::Value>,
    ) -> Result<Box<dyn Keyring>, RingVaultError> {
        match options {
            Some(value) => self.restore(value),
            None => Ok(Box::new(SimpleKeyring::new())),
        }
    }

    fn restore(&self, data: serde_json::Value) -> Result<Box<dyn Keyring>, RingVaultError> {
        let keys = parse_keys(data)?;
        let keys: Vec<&str> = keys.iter().map(|k| k.as_str()).collect();
        Ok(Box::new(SimpleKeyring::from_private_keys(&keys)?))
    }
}
