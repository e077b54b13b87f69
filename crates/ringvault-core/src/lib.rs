// SPDX-FileCopyrightText: 2026 RingVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the RingVault keyring controller.
//!
//! This crate provides the trait definitions, error type, and common types
//! shared by the keyring variants, the vault codec, and the controller.

pub mod error;
pub mod traits;
pub mod types;

pub use error::RingVaultError;
pub use traits::{Encryptor, Keyring, KeyringBuilder, StateStore};
pub use types::{
    normalize_address, same_address, EncryptedBlob, PersistedState, SerializedKeyring,
    HD_KEYRING_TYPE, SIMPLE_KEYRING_TYPE,
};
