// SPDX-FileCopyrightText: 2026 RingVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./ringvault.toml` > `~/.config/ringvault/ringvault.toml` >
//! `/etc/ringvault/ringvault.toml` with environment variable overrides via `RINGVAULT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::RingVaultConfig;

/// System-wide config file location.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/ringvault/ringvault.toml";

/// Local config file name, resolved against the working directory.
pub const LOCAL_CONFIG_FILE: &str = "ringvault.toml";

/// The user's XDG config file, if a config directory exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ringvault").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/ringvault/ringvault.toml` (system-wide)
/// 3. `~/.config/ringvault/ringvault.toml` (user XDG config)
/// 4. `./ringvault.toml` (local directory)
/// 5. `RINGVAULT_*` environment variables
pub fn load_config() -> Result<RingVaultConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env vars).
pub fn load_config_from_str(toml_content: &str) -> Result<RingVaultConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RingVaultConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<RingVaultConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RingVaultConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(RingVaultConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `RINGVAULT_VAULT_KDF_MEMORY_COST` must map to
/// `vault.kdf_memory_cost`, not `vault.kdf.memory.cost`.
fn env_provider() -> Env {
    Env::prefixed("RINGVAULT_").map(|key| env_key_to_path(key.as_str()).into())
}

/// Map a prefix-stripped env var name to a dotted config path.
///
/// Only the leading section name is split off, so underscored field names
/// survive: `KEYRING_INITIAL_ACCOUNTS` -> `keyring.initial_accounts`.
fn env_key_to_path(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in ["vault", "keyring", "storage"] {
        if let Some(field) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{field}");
        }
    }
    key
}
