// SPDX-FileCopyrightText: 2026 RingVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use std::str::FromStr;

use bip32::DerivationPath;

use crate::diagnostic::ConfigError;
use crate::model::RingVaultConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &RingVaultConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.vault.kdf_memory_cost < 32768 {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.kdf_memory_cost must be at least 32768 (32 MiB), got {}",
                config.vault.kdf_memory_cost
            ),
        });
    }

    if config.vault.kdf_iterations < 2 {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.kdf_iterations must be at least 2, got {}",
                config.vault.kdf_iterations
            ),
        });
    }

    if config.vault.kdf_parallelism < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.kdf_parallelism must be at least 1, got {}",
                config.vault.kdf_parallelism
            ),
        });
    }

    if config.keyring.default_type.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "keyring.default_type must not be empty".to_string(),
        });
    }

    if config.keyring.initial_accounts < 1 {
        errors.push(ConfigError::Validation {
            message: "keyring.initial_accounts must be at least 1".to_string(),
        });
    }

    if !is_derivation_path(&config.keyring.hd_path) {
        errors.push(ConfigError::Validation {
            message: format!(
                "keyring.hd_path `{}` is not a BIP-32 path like m/44'/60'/0'/0",
                config.keyring.hd_path
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// `m` followed by `/`-separated indices, each optionally hardened with `'`.
fn is_derivation_path(path: &str) -> bool {
    DerivationPath::from_str(path).is_ok()
}
