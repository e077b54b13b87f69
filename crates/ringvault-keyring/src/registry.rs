// SPDX-FileCopyrightText: 2026 RingVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyring builder registry.
//!
//! The `KeyringRegistry` maps type tags to [`KeyringBuilder`]s. The controller
//! only ever talks to keyrings through this registry, so registering a new
//! builder is all it takes to support a new keyring variant.

use std::collections::HashMap;
use std::sync::Arc;

use ringvault_core::{Keyring, KeyringBuilder, RingVaultError, SerializedKeyring};
use tracing::debug;

use crate::hd::HdKeyringBuilder;
use crate::simple::SimpleKeyringBuilder;

/// Registry of keyring builders keyed by type tag.
#[derive(Clone)]
pub struct KeyringRegistry {
    builders: HashMap<String, Arc<dyn KeyringBuilder>>,
}

impl std::fmt::Debug for KeyringRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyringRegistry")
            .field("types", &self.types())
            .finish()
    }
}

impl KeyringRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            builders: HashMap::new(),
        }
    }

    /// Registry with the HD and simple key-pair builders installed.
    ///
    /// `hd_path` is the derivation path used when HD options do not name one.
    pub fn with_defaults(hd_path: &str) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(HdKeyringBuilder::new(hd_path)));
        registry.register(Arc::new(SimpleKeyringBuilder));
        registry
    }

    /// Register a builder, replacing any previous builder for the same tag.
    pub fn register(&mut self, builder: Arc<dyn KeyringBuilder>) {
        let tag = builder.keyring_type().to_string();
        debug!(keyring_type = %tag, "registered keyring builder");
        self.builders.insert(tag, builder);
    }

    /// Look up the builder for `keyring_type`.
    pub fn get(&self, keyring_type: &str) -> Result<&Arc<dyn KeyringBuilder>, RingVaultError> {
        self.builders
            .get(keyring_type)
            .ok_or_else(|| RingVaultError::UnsupportedKeyringType(keyring_type.to_string()))
    }

    pub fn contains(&self, keyring_type: &str) -> bool {
        self.builders.contains_key(keyring_type)
    }

    /// Build a new keyring of `keyring_type` from optional options.
    pub fn build(
        &self,
        keyring_type: &str,
        options: Option<serde_json::Value>,
    ) -> Result<Box<dyn Keyring>, RingVaultError> {
        self.get(keyring_type)?.build(options)
    }

    /// Restore a keyring from its persisted form.
    pub fn restore(&self, serialized: SerializedKeyring) -> Result<Box<dyn Keyring>, RingVaultError> {
        self.get(&serialized.keyring_type)?.restore(serialized.data)
    }

    /// Registered type tags, sorted.
    pub fn types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.builders.keys().cloned().collect();
        types.sort();
        types
    }
}

impl Default for KeyringRegistry {
    fn default() -> Self {
        Self::with_defaults(crate::hd::DEFAULT_HD_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringvault_core::{HD_KEYRING_TYPE, SIMPLE_KEYRING_TYPE};
    use serde_json::json;

    const TRUFFLE_KEY: &str = "c87509a1c067bbde78beb793e6fa76530b6382a4c0241e5e4a9ec0a0f44dc0d3";

    #[test]
    fn defaults_include_both_variants() {
        let registry = KeyringRegistry::default();
        assert_eq!(registry.types(), vec![HD_KEYRING_TYPE, SIMPLE_KEYRING_TYPE]);
        assert!(registry.contains(HD_KEYRING_TYPE));
    }

    #[test]
    fn empty_registry_rejects_everything() {
        let registry = KeyringRegistry::new();
        assert!(registry.types().is_empty());
        assert!(matches!(
            registry.build(HD_KEYRING_TYPE, None),
            Err(RingVaultError::UnsupportedKeyringType(t)) if t == HD_KEYRING_TYPE
        ));
    }

    #[test]
    fn unknown_type_is_unsupported() {
        let registry = KeyringRegistry::default();
        let result = registry.restore(SerializedKeyring {
            keyring_type: "Ledger Hardware".into(),
            data: json!({}),
        });
        assert!(matches!(result, Err(RingVaultError::UnsupportedKeyringType(_))));
    }

    #[test]
    fn restore_dispatches_on_type_tag() {
        let registry = KeyringRegistry::default();
        let keyring = registry
            .restore(SerializedKeyring {
                keyring_type: SIMPLE_KEYRING_TYPE.into(),
                data: json!([TRUFFLE_KEY]),
            })
            .unwrap();
        assert_eq!(keyring.keyring_type(), SIMPLE_KEYRING_TYPE);
        assert_eq!(
            keyring.accounts(),
            vec!["0x627306090abab3a6e1400e9345bc60c78a8bef57"]
        );
    }

    #[test]
    fn hd_builder_uses_configured_path() {
        let registry = KeyringRegistry::with_defaults("m/44'/1'/0'/0");
        let mut keyring = registry.build(HD_KEYRING_TYPE, None).unwrap();
        keyring.add_accounts(1).unwrap();
        assert_eq!(keyring.serialize().unwrap()["hdPath"], "m/44'/1'/0'/0");
    }

    #[test]
    fn register_replaces_same_tag() {
        let mut registry = KeyringRegistry::new();
        registry.register(Arc::new(HdKeyringBuilder::new("m/44'/60'/0'/0")));
        registry.register(Arc::new(HdKeyringBuilder::new("m/44'/1'/0'/0")));
        assert_eq!(registry.types().len(), 1);

        let mut keyring = registry.build(HD_KEYRING_TYPE, None).unwrap();
        keyring.add_accounts(1).unwrap();
        assert_eq!(keyring.serialize().unwrap()["hdPath"], "m/44'/1'/0'/0");
    }
}
