// SPDX-FileCopyrightText: 2026 RingVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock keyring variant with caller-chosen account strings.
//!
//! `MockKeyring` holds plain account labels with no key material behind them,
//! which makes ordering and aggregation easy to assert on. Its serialized form
//! is the JSON list of labels.

use ringvault_core::{Keyring, KeyringBuilder, RingVaultError};
use secrecy::SecretString;

/// Type tag the mock builder registers under.
pub const MOCK_KEYRING_TYPE: &str = "Mock Keyring";

/// A keyring whose accounts are fixed strings.
#[derive(Debug, Clone, Default)]
pub struct MockKeyring {
    accounts: Vec<String>,
}

impl MockKeyring {
    pub fn new(accounts: Vec<String>) -> Self {
        Self { accounts }
    }

    fn position(&self, address: &str) -> Result<usize, RingVaultError> {
        self.accounts
            .iter()
            .position(|a| a == address)
            .ok_or_else(|| RingVaultError::AccountNotFound(address.to_string()))
    }
}

impl Keyring for MockKeyring {
    fn keyring_type(&self) -> &str {
        MOCK_KEYRING_TYPE
    }

    fn accounts(&self) -> Vec<String> {
        self.accounts.clone()
    }

    fn add_accounts(&mut self, count: usize) -> Result<Vec<String>, RingVaultError> {
        let start = self.accounts.len();
        let added: Vec<String> = (start..start + count)
            .map(|i| format!("mock-{i}"))
            .collect();
        self.accounts.extend(added.iter().cloned());
        Ok(added)
    }

    fn export_account(&self, address: &str) -> Result<SecretString, RingVaultError> {
        self.position(address)?;
        Ok(SecretString::from(format!("mock-key-{address}")))
    }

    fn remove_account(&mut self, address: &str) -> Result<(), RingVaultError> {
        let position = self.position(address)?;
        self.accounts.remove(position);
        Ok(())
    }

    fn sign_message(&self, address: &str, _hash: &[u8; 32]) -> Result<String, RingVaultError> {
        self.position(address)?;
        Ok(format!("mock-signature-{address}"))
    }

    fn sign_personal_message(
        &self,
        address: &str,
        _message: &[u8],
    ) -> Result<String, RingVaultError> {
        self.position(address)?;
        Ok(format!("mock-personal-signature-{address}"))
    }

    fn serialize(&self) -> Result<serde_json::Value, RingVaultError> {
        Ok(serde_json::json!(self.accounts))
    }
}

/// Builder for [`MockKeyring`]; options and data are a JSON list of labels.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockKeyringBuilder;

impl KeyringBuilder for MockKeyringBuilder {
    fn keyring_type(&self) -> &str {
        MOCK_KEYRING_TYPE
    }

    fn build(
        &self,
        options: Option<serde_json::Value>,
    ) -> Result<Box<dyn Keyring>, RingVaultError> {
        match options {
            Some(value) => self.restore(value),
            None => Ok(Box::new(MockKeyring::default())),
        }
    }

    fn restore(&self, data: serde_json::Value) -> Result<Box<dyn Keyring>, RingVaultError> {
        let accounts: Vec<String> = serde_json::from_value(data)
            .map_err(|_| RingVaultError::Serialization("mock keyring data must be a list".into()))?;
        Ok(Box::new(MockKeyring::new(accounts)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn restore_keeps_labels_in_order() {
        let keyring = MockKeyringBuilder.restore(json!(["1", "2", "3"])).unwrap();
        assert_eq!(keyring.accounts(), vec!["1", "2", "3"]);
        assert_eq!(keyring.serialize().unwrap(), json!(["1", "2", "3"]));
    }

    #[test]
    fn add_and_remove() {
        let mut keyring = MockKeyring::default();
        assert_eq!(keyring.add_accounts(2).unwrap(), vec!["mock-0", "mock-1"]);
        keyring.remove_account("mock-0").unwrap();
        assert_eq!(keyring.accounts(), vec!["mock-1"]);
        assert!(matches!(
            keyring.remove_account("mock-0"),
            Err(RingVaultError::AccountNotFound(_))
        ));
    }
}
