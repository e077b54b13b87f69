// SPDX-FileCopyrightText: 2026 RingVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for controller integration tests.
//!
//! `TestHarness` wires a `KeyringController` to an in-memory store and a
//! low-cost passphrase encryptor, with the mock keyring variant registered.

use std::sync::Arc;

use ringvault_config::KeyringConfig;
use ringvault_controller::KeyringController;
use ringvault_core::{EncryptedBlob, RingVaultError, StateStore};
use ringvault_vault::{KdfParams, MemoryStore, PassphraseEncryptor};
use secrecy::SecretString;

use crate::mock_keyring::MockKeyringBuilder;

/// Argon2id parameters cheap enough for tests. Not for production use.
pub fn fast_kdf_params() -> KdfParams {
    KdfParams {
        memory_cost: 1024,
        iterations: 1,
        parallelism: 1,
    }
}

pub fn fast_encryptor() -> PassphraseEncryptor {
    PassphraseEncryptor::new(fast_kdf_params())
}

/// Wrap a test password.
pub fn password(p: &str) -> SecretString {
    SecretString::from(p.to_string())
}

/// Builder for [`TestHarness`].
pub struct TestHarnessBuilder {
    store: Arc<MemoryStore>,
    keyring_config: KeyringConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            keyring_config: KeyringConfig::default(),
        }
    }

    /// Share an existing store, e.g. to simulate a restart.
    pub fn with_store(mut self, store: Arc<MemoryStore>) -> Self {
        self.store = store;
        self
    }

    pub fn with_keyring_config(mut self, keyring_config: KeyringConfig) -> Self {
        self.keyring_config = keyring_config;
        self
    }

    pub fn build(self) -> TestHarness {
        let mut controller = KeyringController::new(
            self.store.clone(),
            Arc::new(fast_encryptor()),
            self.keyring_config,
        );
        controller.register_keyring_type(Arc::new(MockKeyringBuilder));
        TestHarness {
            controller,
            store: self.store,
        }
    }
}

/// A locked controller over a fresh in-memory store.
pub struct TestHarness {
    pub controller: KeyringController,
    pub store: Arc<MemoryStore>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Harness whose controller has already created a vault under `pw`.
    pub async fn unlocked(pw: &str) -> Result<Self, RingVaultError> {
        let mut harness = Self::new();
        harness
            .controller
            .create_new_vault_and_keychain(password(pw))
            .await?;
        Ok(harness)
    }

    /// A second controller over the same store, as after a process restart.
    pub fn restart(&self) -> Self {
        Self::builder().with_store(self.store.clone()).build()
    }

    /// The blob currently in the store.
    pub async fn stored_vault(&self) -> Result<Option<EncryptedBlob>, RingVaultError> {
        Ok(self.store.get_state().await?.vault)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
