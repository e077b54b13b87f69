// SPDX-FileCopyrightText: 2026 RingVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the RingVault keyring controller.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level RingVault configuration.
///
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RingVaultConfig {
    /// Vault encryption settings.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Shape of the first keyring created for a new vault.
    #[serde(default)]
    pub keyring: KeyringConfig,

    /// State store settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Argon2id parameters for the passphrase encryptor.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// Argon2id memory cost in KiB (default: 65536 = 64 MiB).
    #[serde(default = "default_kdf_memory_cost")]
    pub kdf_memory_cost: u32,

    /// Argon2id iteration count (default: 3).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Argon2id parallelism lanes (default: 4).
    #[serde(default = "default_kdf_parallelism")]
    pub kdf_parallelism: u32,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            kdf_memory_cost: default_kdf_memory_cost(),
            kdf_iterations: default_kdf_iterations(),
            kdf_parallelism: default_kdf_parallelism(),
        }
    }
}

fn default_kdf_memory_cost() -> u32 {
    65536 // 64 MiB per OWASP recommendation
}

fn default_kdf_iterations() -> u32 {
    3
}

fn default_kdf_parallelism() -> u32 {
    4
}

/// Keyring defaults used by `create_new_vault_and_keychain`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KeyringConfig {
    /// Type tag of the keyring created for a brand-new vault.
    #[serde(default = "default_keyring_type")]
    pub default_type: String,

    /// BIP-32 parent path for HD accounts; account `i` lives at `{hd_path}/{i}`.
    #[serde(default = "default_hd_path")]
    pub hd_path: String,

    /// Number of accounts the first keyring starts with.
    #[serde(default = "default_initial_accounts")]
    pub initial_accounts: usize,
}

impl Default for KeyringConfig {
    fn default() -> Self {
        Self {
            default_type: default_keyring_type(),
            hd_path: default_hd_path(),
            initial_accounts: default_initial_accounts(),
        }
    }
}

fn default_keyring_type() -> String {
    "HD Key Tree".to_string()
}

fn default_hd_path() -> String {
    "m/44'/60'/0'/0".to_string()
}

fn default_initial_accounts() -> usize {
    1
}

/// Where the SQLite state store lives.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file holding the encrypted vault.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_local_dir()
        .map(|d| d.join("ringvault").join("ringvault.db"))
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "ringvault.db".to_string())
}
