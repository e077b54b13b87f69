// SPDX-FileCopyrightText: 2026 RingVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mnemonic-derived ("HD Key Tree") keyring.
//!
//! Account `i` is the BIP-32 child `{hd_path}/i` of the BIP-39 seed (empty
//! passphrase). Accounts are always derived in index order, so the same
//! mnemonic and account count reproduce the same addresses.
//!
//! Removing an account records its index as skipped. `numberOfAccounts` keeps
//! counting every index ever derived, so the remaining addresses never move and
//! new accounts continue after the highest index.

use std::collections::BTreeSet;
use std::str::FromStr;

use bip32::{ChildNumber, DerivationPath, XPrv};
use bip39::{Language, Mnemonic};
use rand::RngCore;
use rand::rngs::OsRng;
use ringvault_core::{
    normalize_address, same_address, Keyring, KeyringBuilder, RingVaultError, HD_KEYRING_TYPE,
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroizing;

use crate::eth::{signature_hex, EthKeyPair};

/// Standard Ethereum derivation parent (BIP-44 coin type 60).
pub const DEFAULT_HD_PATH: &str = "m/44'/60'/0'/0";

/// Options accepted by [`HdKeyringBuilder::build`] and the persisted data shape.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct HdKeyringOptions {
    #[serde(default)]
    mnemonic: Option<String>,
    #[serde(default)]
    number_of_accounts: u32,
    #[serde(default)]
    hd_path: Option<String>,
    #[serde(default)]
    skipped_indices: Vec<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HdKeyringData<'a> {
    mnemonic: &'a str,
    number_of_accounts: u32,
    hd_path: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    skipped_indices: Vec<u32>,
}

struct HdAccount {
    index: u32,
    keypair: EthKeyPair,
}

/// A keyring deriving all of its accounts from one mnemonic.
pub struct HdKeyring {
    mnemonic: Zeroizing<String>,
    hd_path: String,
    parent: XPrv,
    number_of_accounts: u32,
    skipped: BTreeSet<u32>,
    accounts: Vec<HdAccount>,
}

impl std::fmt::Debug for HdKeyring {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HdKeyring")
            .field("mnemonic", &"[REDACTED]")
            .field("hd_path", &self.hd_path)
            .field("number_of_accounts", &self.number_of_accounts)
            .field("skipped", &self.skipped)
            .finish()
    }
}

impl HdKeyring {
    /// Create a keyring from a fresh 12-word mnemonic with no accounts.
    pub fn generate(hd_path: &str) -> Result<Self, RingVaultError> {
        let mut entropy = Zeroizing::new([0u8; 16]);
        OsRng.fill_bytes(entropy.as_mut());
        let mnemonic = Mnemonic::from_entropy(entropy.as_ref())
            .map_err(|e| RingVaultError::Crypto(format!("mnemonic generation failed: {e}")))?;
        let phrase = Zeroizing::new(mnemonic.to_string());
        Self::from_mnemonic(&phrase, hd_path, 0)
    }

    /// Create a keyring from a phrase and derive the first `number_of_accounts` accounts.
    pub fn from_mnemonic(
        phrase: &str,
        hd_path: &str,
        number_of_accounts: u32,
    ) -> Result<Self, RingVaultError> {
        Self::with_skipped(phrase, hd_path, number_of_accounts, BTreeSet::new())
    }

    fn with_skipped(
        phrase: &str,
        hd_path: &str,
        number_of_accounts: u32,
        skipped: BTreeSet<u32>,
    ) -> Result<Self, RingVaultError> {
        let mnemonic = Mnemonic::parse_in_normalized(Language::English, phrase).map_err(|_| {
            RingVaultError::InvalidKeyMaterial("mnemonic is not a valid BIP-39 English phrase".into())
        })?;
        let path = DerivationPath::from_str(hd_path).map_err(|_| {
            RingVaultError::InvalidKeyMaterial(format!("invalid derivation path `{hd_path}`"))
        })?;
        let seed = Zeroizing::new(mnemonic.to_seed(""));
        let parent = XPrv::derive_from_path(&*seed, &path)
            .map_err(|e| RingVaultError::Crypto(format!("BIP-32 derivation failed: {e}")))?;

        if let Some(index) = skipped.iter().find(|&&i| i >= number_of_accounts) {
            return Err(RingVaultError::Serialization(format!(
                "skipped index {index} is beyond numberOfAccounts {number_of_accounts}"
            )));
        }

        let mut keyring = Self {
            mnemonic: Zeroizing::new(mnemonic.to_string()),
            hd_path: hd_path.to_string(),
            parent,
            number_of_accounts: 0,
            skipped,
            accounts: Vec::new(),
        };
        for index in 0..number_of_accounts {
            if let Some(account) = keyring.derive_account(index)? {
                keyring.accounts.push(account);
            }
        }
        keyring.number_of_accounts = number_of_accounts;
        Ok(keyring)
    }

    fn from_options(options: HdKeyringOptions, default_path: &str) -> Result<Self, RingVaultError> {
        let hd_path = options.hd_path.as_deref().unwrap_or(default_path);
        let skipped = options.skipped_indices.into_iter().collect();
        match options.mnemonic.map(Zeroizing::new) {
            Some(phrase) => {
                Self::with_skipped(&phrase, hd_path, options.number_of_accounts, skipped)
            }
            None => {
                let mut keyring = Self::generate(hd_path)?;
                keyring.add_accounts(options.number_of_accounts as usize)?;
                Ok(keyring)
            }
        }
    }

    /// Derives the account at `index`, or `None` if it was removed.
    fn derive_account(&self, index: u32) -> Result<Option<HdAccount>, RingVaultError> {
        if self.skipped.contains(&index) {
            return Ok(None);
        }
        let child_number = ChildNumber::new(index, false)
            .map_err(|e| RingVaultError::InvalidKeyMaterial(format!("bad child index {index}: {e}")))?;
        let child = self
            .parent
            .derive_child(child_number)
            .map_err(|e| RingVaultError::Crypto(format!("BIP-32 derivation failed: {e}")))?;
        let keypair = EthKeyPair::from_signing_key(child.private_key().clone());
        Ok(Some(HdAccount { index, keypair }))
    }

    fn find(&self, address: &str) -> Result<usize, RingVaultError> {
        self.accounts
            .iter()
            .position(|a| same_address(a.keypair.address(), address))
            .ok_or_else(|| RingVaultError::AccountNotFound(normalize_address(address)))
    }

    pub fn hd_path(&self) -> &str {
        &self.hd_path
    }

    /// Count of derivation indices consumed so far, including removed ones.
    pub fn number_of_accounts(&self) -> u32 {
        self.number_of_accounts
    }
}

impl Keyring for HdKeyring {
    fn keyring_type(&self) -> &str {
        HD_KEYRING_TYPE
    }

    fn accounts(&self) -> Vec<String> {
        self.accounts
            .iter()
            .map(|a| a.keypair.address().to_string())
            .collect()
    }

    fn add_accounts(&mut self, count: usize) -> Result<Vec<String>, RingVaultError> {
        let first = self.number_of_accounts;
        let end = u32::try_from(count)
            .ok()
            .and_then(|count| first.checked_add(count))
            .ok_or_else(|| {
                RingVaultError::InvalidKeyMaterial(format!(
                    "cannot derive {count} more accounts after index {first}"
                ))
            })?;

        // Nothing is committed until every index has derived.
        let mut derived = Vec::new();
        for index in first..end {
            if let Some(account) = self.derive_account(index)? {
                derived.push(account);
            }
        }
        let added = derived
            .iter()
            .map(|a| a.keypair.address().to_string())
            .collect();
        self.accounts.extend(derived);
        self.number_of_accounts = end;
        debug!(count, total = self.number_of_accounts, "derived HD accounts");
        Ok(added)
    }

    fn export_account(&self, address: &str) -> Result<SecretString, RingVaultError> {
        let position = self.find(address)?;
        let hex = self.accounts[position].keypair.private_key_hex();
        Ok(SecretString::from(hex.to_string()))
    }

    fn remove_account(&mut self, address: &str) -> Result<(), RingVaultError> {
        let position = self.find(address)?;
        let removed = self.accounts.remove(position);
        self.skipped.insert(removed.index);
        Ok(())
    }

    fn sign_message(&self, address: &str, hash: &[u8; 32]) -> Result<String, RingVaultError> {
        let position = self.find(address)?;
        let signature = self.accounts[position].keypair.sign_hash(hash)?;
        Ok(signature_hex(&signature))
    }

    fn sign_personal_message(
        &self,
        address: &str,
        message: &[u8],
    ) -> Result<String, RingVaultError> {
        let position = self.find(address)?;
        let signature = self.accounts[position]
            .keypair
            .sign_personal_message(message)?;
        Ok(signature_hex(&signature))
    }

    fn serialize(&self) -> Result<serde_json::Value, RingVaultError> {
        let data = HdKeyringData {
            mnemonic: &self.mnemonic,
            number_of_accounts: self.number_of_accounts,
            hd_path: &self.hd_path,
            skipped_indices: self.skipped.iter().copied().collect(),
        };
        Ok(serde_json::to_value(data)?)
    }
}

/// Builder registered under [`HD_KEYRING_TYPE`].
///
/// Options: `{"mnemonic"?, "numberOfAccounts"?, "hdPath"?}`; a missing
/// mnemonic generates a fresh one.
#[derive(Debug, Clone)]
pub struct HdKeyringBuilder {
    hd_path: String,
}

impl HdKeyringBuilder {
    /// Builder whose keyrings default to `hd_path` when the options name none.
    pub fn new(hd_path: impl Into<String>) -> Self {
        Self {
            hd_path: hd_path.into(),
        }
    }
}

impl Default for HdKeyringBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_HD_PATH)
    }
}

fn parse_options(value: serde_json::Value) -> Result<HdKeyringOptions, RingVaultError> {
    serde_json::from_value(value)
        .map_err(|_| RingVaultError::Serialization("malformed HD keyring data".into()))
}

impl KeyringBuilder for HdKeyringBuilder {
    fn keyring_type(&self) -> &str {
        HD_KEYRING_TYPE
    }

    fn build(
        &self,
        options: Option<serde_json::Value>,
    ) -> Result<Box<dyn Keyring>, RingVaultError> {
        let keyring = match options {
            Some(value) => HdKeyring::from_options(parse_options(value)?, &self.hd_path)?,
            None => HdKeyring::generate(&self.hd_path)?,
        };
        Ok(Box::new(keyring))
    }

    fn restore(&self, data: serde_json::Value) -> Result<Box<dyn Keyring>, RingVaultError> {
        let options = parse_options(data)?;
        if options.mnemonic.is_none() {
            return Err(RingVaultError::Serialization(
                "HD keyring data is missing its mnemonic".into(),
            ));
        }
        Ok(Box::new(HdKeyring::from_options(options, &self.hd_path)?))
    }
}
