// SPDX-FileCopyrightText: 2026 RingVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The keyring controller.
//!
//! `KeyringController` owns the live keyrings and the password while unlocked,
//! and is the only writer of the encrypted vault in the state store. Every
//! mutating operation is all-or-nothing: if persisting fails, the in-memory
//! keyrings are put back the way they were.

use std::collections::HashSet;
use std::sync::Arc;

use ringvault_config::{KeyringConfig, RingVaultConfig};
use ringvault_core::{
    normalize_address, same_address, EncryptedBlob, Encryptor, Keyring, KeyringBuilder,
    PersistedState, RingVaultError, SerializedKeyring, StateStore,
};
use ringvault_keyring::{HdKeyring, KeyringRegistry};
use ringvault_vault::{PassphraseEncryptor, SqliteStore, VaultCodec};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, info, warn};

use crate::state::{ControllerState, KeyringSummary};

/// Manages keyrings under a single password and persists them as one vault.
///
/// Callers are expected to serialize operations on one controller; nothing
/// here guards against concurrent mutation.
pub struct KeyringController {
    store: Arc<dyn StateStore>,
    codec: VaultCodec,
    registry: KeyringRegistry,
    keyring_config: KeyringConfig,
    password: Option<SecretString>,
    keyrings: Vec<Box<dyn Keyring>>,
}

impl std::fmt::Debug for KeyringController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyringController")
            .field("unlocked", &self.password.is_some())
            .field("keyrings", &self.keyrings.len())
            .field("registry", &self.registry)
            .finish()
    }
}

impl KeyringController {
    /// Create a locked controller with the default keyring variants registered.
    pub fn new(
        store: Arc<dyn StateStore>,
        encryptor: Arc<dyn Encryptor>,
        keyring_config: KeyringConfig,
    ) -> Self {
        let registry = KeyringRegistry::with_defaults(&keyring_config.hd_path);
        Self {
            store,
            codec: VaultCodec::new(encryptor),
            registry,
            keyring_config,
            password: None,
            keyrings: Vec::new(),
        }
    }

    /// Controller over the SQLite store and passphrase encryptor named by `config`.
    pub async fn from_config(config: &RingVaultConfig) -> Result<Self, RingVaultError> {
        let store = SqliteStore::open(&config.storage.database_path).await?;
        let encryptor = PassphraseEncryptor::from_config(&config.vault);
        Ok(Self::new(
            Arc::new(store),
            Arc::new(encryptor),
            config.keyring.clone(),
        ))
    }

    /// Load and validate configuration from the standard locations, then build
    /// a controller from it.
    pub async fn load() -> Result<Self, RingVaultError> {
        let config = ringvault_config::load_and_validate().map_err(|errors| {
            let report = ringvault_config::render_errors(&errors);
            error!(count = errors.len(), "configuration rejected");
            RingVaultError::Config(report)
        })?;
        Self::from_config(&config).await
    }

    /// Make a new keyring variant available to `add_new_keyring` and unlock.
    pub fn register_keyring_type(&mut self, builder: Arc<dyn KeyringBuilder>) {
        self.registry.register(builder);
    }

    pub fn registry(&self) -> &KeyringRegistry {
        &self.registry
    }

    // --- Vault lifecycle ---

    /// Create the vault and its first keyring, or reuse the stored vault.
    ///
    /// With a vault already in the store this unlocks it with `password`
    /// instead of overwriting it, so calling it twice never duplicates keyrings.
    /// A stored vault that cannot be opened with `password` is a hard error.
    pub async fn create_new_vault_and_keychain(
        &mut self,
        password: SecretString,
    ) -> Result<Vec<String>, RingVaultError> {
        let mut keyrings = match self.store.get_state().await?.vault {
            Some(blob) => self.open_vault(&password, &blob).await?,
            None => Vec::new(),
        };

        if keyrings.is_empty() {
            let mut first = self
                .registry
                .build(&self.keyring_config.default_type, None)?;
            first.add_accounts(self.keyring_config.initial_accounts)?;
            keyrings.push(first);
            info!(keyring_type = %self.keyring_config.default_type, "created first keyring");
        }

        self.commit(password, keyrings).await?;
        info!(keyrings = self.keyrings.len(), "vault ready");
        Ok(self.get_accounts())
    }

    /// Replace every keyring with one HD keyring restored from `mnemonic`.
    ///
    /// The new keyring starts with a single account. The previous vault is
    /// overwritten.
    pub async fn create_new_vault_and_restore(
        &mut self,
        password: SecretString,
        mnemonic: SecretString,
    ) -> Result<Vec<String>, RingVaultError> {
        let keyring = HdKeyring::from_mnemonic(
            mnemonic.expose_secret(),
            &self.keyring_config.hd_path,
            1,
        )?;
        self.commit(password, vec![Box::new(keyring)]).await?;
        info!("vault restored from mnemonic");
        Ok(self.get_accounts())
    }

    /// Lenient unlock for password prompts.
    ///
    /// Returns how many keyrings were unlocked. A wrong password, a corrupt
    /// vault, or no vault at all yields `Ok(0)` and leaves the controller as it
    /// was. Other failures still propagate.
    pub async fn submit_password(&mut self, password: SecretString) -> Result<usize, RingVaultError> {
        match self.unlock_keyrings(password).await {
            Ok(keyrings) => Ok(keyrings.len()),
            Err(e) if e.is_decryption() => {
                warn!(error = %e, "password rejected");
                Ok(0)
            }
            Err(e) => Err(e),
        }
    }

    /// Decrypt the stored vault and replace the live keyrings with fresh instances.
    ///
    /// Fails with [`RingVaultError::Decryption`] if no vault is stored, the
    /// password is wrong, or the blob is corrupt.
    pub async fn unlock_keyrings(
        &mut self,
        password: SecretString,
    ) -> Result<&[Box<dyn Keyring>], RingVaultError> {
        let blob = self
            .store
            .get_state()
            .await?
            .vault
            .ok_or_else(|| RingVaultError::Decryption("no vault stored".to_string()))?;
        let keyrings = self.open_vault(&password, &blob).await?;

        self.password = Some(password);
        self.keyrings = keyrings;
        info!(keyrings = self.keyrings.len(), "vault unlocked");
        Ok(&self.keyrings)
    }

    /// Forget the password and drop every keyring. The stored vault is untouched.
    pub fn set_locked(&mut self) {
        self.password = None;
        self.keyrings.clear();
        info!("controller locked");
    }

    pub fn is_unlocked(&self) -> bool {
        self.password.is_some()
    }

    /// Check `password` against the stored vault without changing any state.
    pub async fn verify_password(&self, password: &SecretString) -> Result<(), RingVaultError> {
        let blob = self
            .store
            .get_state()
            .await?
            .vault
            .ok_or_else(|| RingVaultError::Decryption("no vault stored".to_string()))?;
        self.codec.open(password, &blob).await.map(|_| ())
    }

    /// Encrypt every live keyring with the current password and write the vault.
    pub async fn persist_all_keyrings(&self) -> Result<(), RingVaultError> {
        let password = self.password.as_ref().ok_or(RingVaultError::NoPasswordSet)?;
        self.write_vault(password, &self.keyrings).await?;
        debug!(keyrings = self.keyrings.len(), "keyrings persisted");
        Ok(())
    }

    // --- Keyring management ---

    /// Build a keyring of `keyring_type`, append it, and persist.
    ///
    /// Rejects keyrings that would hold an address another keyring already
    /// owns. Nothing changes unless the vault is written.
    pub async fn add_new_keyring(
        &mut self,
        keyring_type: &str,
        options: Option<serde_json::Value>,
    ) -> Result<&dyn Keyring, RingVaultError> {
        self.require_password()?;
        let keyring = self.registry.build(keyring_type, options)?;

        let mut seen: HashSet<String> = self
            .get_accounts()
            .iter()
            .map(|a| normalize_address(a))
            .collect();
        for account in keyring.accounts() {
            if !seen.insert(normalize_address(&account)) {
                return Err(RingVaultError::DuplicateAccount(normalize_address(&account)));
            }
        }

        self.keyrings.push(keyring);
        if let Err(e) = self.persist_all_keyrings().await {
            self.keyrings.pop();
            return Err(e);
        }
        info!(keyring_type, keyrings = self.keyrings.len(), "keyring added");

        self.keyrings
            .last()
            .map(|k| k.as_ref())
            .ok_or_else(|| RingVaultError::Internal("added keyring disappeared".to_string()))
    }

    /// Materialize one more account in the keyring at `keyring_index` and persist.
    pub async fn add_new_account(&mut self, keyring_index: usize) -> Result<String, RingVaultError> {
        self.require_password()?;
        let keyring = self
            .keyrings
            .get_mut(keyring_index)
            .ok_or(RingVaultError::KeyringIndexOutOfRange(keyring_index))?;
        let backup = snapshot(keyring.as_ref())?;

        let address = keyring
            .add_accounts(1)?
            .into_iter()
            .next()
            .ok_or_else(|| RingVaultError::Internal("keyring added no account".to_string()))?;

        if let Err(e) = self.persist_all_keyrings().await {
            self.roll_back(keyring_index, backup, false);
            return Err(e);
        }
        debug!(keyring_index, "account added");
        Ok(address)
    }

    /// Instantiate a standalone keyring from its persisted form.
    ///
    /// The controller's own keyrings are not touched.
    pub fn restore_keyring(
        &self,
        serialized: SerializedKeyring,
    ) -> Result<Box<dyn Keyring>, RingVaultError> {
        self.registry.restore(serialized)
    }

    pub fn keyrings(&self) -> &[Box<dyn Keyring>] {
        &self.keyrings
    }

    /// The keyring that owns `address`.
    pub fn get_keyring_for_account(&self, address: &str) -> Result<&dyn Keyring, RingVaultError> {
        let index = self.find_keyring_index(address)?;
        Ok(self.keyrings[index].as_ref())
    }

    pub fn get_keyrings_by_type(&self, keyring_type: &str) -> Vec<&dyn Keyring> {
        self.keyrings
            .iter()
            .filter(|k| k.keyring_type() == keyring_type)
            .map(|k| k.as_ref())
            .collect()
    }

    // --- Accounts ---

    /// Every account, in keyring order then per-keyring order.
    pub fn get_accounts(&self) -> Vec<String> {
        self.keyrings.iter().flat_map(|k| k.accounts()).collect()
    }

    /// Remove `address` from its keyring and persist.
    ///
    /// A keyring left with no accounts is dropped as well.
    pub async fn remove_account(&mut self, address: &str) -> Result<(), RingVaultError> {
        let index = self.find_keyring_index(address)?;
        self.require_password()?;
        let backup = snapshot(self.keyrings[index].as_ref())?;

        self.keyrings[index].remove_account(address)?;
        let emptied = self.keyrings[index].accounts().is_empty();
        if emptied {
            self.keyrings.remove(index);
        }

        if let Err(e) = self.persist_all_keyrings().await {
            self.roll_back(index, backup, emptied);
            return Err(e);
        }
        info!(
            account = %normalize_address(address),
            keyring_dropped = emptied,
            "account removed"
        );
        Ok(())
    }

    /// Raw private key of `address` as lowercase hex.
    ///
    /// The caller must not log or persist the result.
    pub fn export_account(&self, address: &str) -> Result<SecretString, RingVaultError> {
        self.get_keyring_for_account(address)?.export_account(address)
    }

    /// Sign a 32-byte digest with the key of `address`.
    pub fn sign_message(&self, address: &str, hash: &[u8; 32]) -> Result<String, RingVaultError> {
        self.get_keyring_for_account(address)?
            .sign_message(address, hash)
    }

    /// Sign `message` with the EIP-191 personal-message prefix.
    pub fn sign_personal_message(
        &self,
        address: &str,
        message: &[u8],
    ) -> Result<String, RingVaultError> {
        self.get_keyring_for_account(address)?
            .sign_personal_message(address, message)
    }

    pub fn state(&self) -> ControllerState {
        ControllerState {
            is_unlocked: self.is_unlocked(),
            keyring_types: self.registry.types(),
            keyrings: self
                .keyrings
                .iter()
                .map(|k| KeyringSummary {
                    keyring_type: k.keyring_type().to_string(),
                    accounts: k.accounts(),
                })
                .collect(),
        }
    }

    // --- Internals ---

    fn require_password(&self) -> Result<&SecretString, RingVaultError> {
        self.password.as_ref().ok_or(RingVaultError::NoPasswordSet)
    }

    fn find_keyring_index(&self, address: &str) -> Result<usize, RingVaultError> {
        self.keyrings
            .iter()
            .position(|k| k.accounts().iter().any(|a| same_address(a, address)))
            .ok_or_else(|| RingVaultError::AccountNotFound(normalize_address(address)))
    }

    async fn open_vault(
        &self,
        password: &SecretString,
        blob: &EncryptedBlob,
    ) -> Result<Vec<Box<dyn Keyring>>, RingVaultError> {
        self.codec
            .open(password, blob)
            .await?
            .into_iter()
            .map(|serialized| self.registry.restore(serialized))
            .collect()
    }

    async fn write_vault(
        &self,
        password: &SecretString,
        keyrings: &[Box<dyn Keyring>],
    ) -> Result<(), RingVaultError> {
        let blob = self.codec.seal(password, keyrings).await?;
        self.store
            .update_state(PersistedState { vault: Some(blob) })
            .await
    }

    /// Persist `keyrings` under `password`, then adopt both.
    async fn commit(
        &mut self,
        password: SecretString,
        keyrings: Vec<Box<dyn Keyring>>,
    ) -> Result<(), RingVaultError> {
        self.write_vault(&password, &keyrings).await?;
        self.password = Some(password);
        self.keyrings = keyrings;
        Ok(())
    }

    /// Put the keyring at `index` back to its `backup` state after a failed persist.
    fn roll_back(&mut self, index: usize, backup: SerializedKeyring, reinsert: bool) {
        match self.registry.restore(backup) {
            Ok(original) if reinsert => self.keyrings.insert(index, original),
            Ok(original) => self.keyrings[index] = original,
            Err(e) => error!(error = %e, index, "failed to roll back keyring"),
        }
    }
}

fn snapshot(keyring: &dyn Keyring) -> Result<SerializedKeyring, RingVaultError> {
    Ok(SerializedKeyring {
        keyring_type: keyring.keyring_type().to_string(),
        data: keyring.serialize()?,
    })
}
