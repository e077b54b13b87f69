// SPDX-FileCopyrightText: 2026 RingVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyring variants for RingVault.
//!
//! Two variants ship by default: an HD keyring that derives accounts from a
//! BIP-39 mnemonic, and a simple keyring holding imported raw private keys.
//! Both are reached through the [`KeyringRegistry`] by their type tag.

pub mod eth;
pub mod hd;
pub mod registry;
pub mod simple;

pub use eth::{hash_personal_message, keccak256, signature_hex, EthKeyPair};
pub use hd::{HdKeyring, HdKeyringBuilder, DEFAULT_HD_PATH};
pub use registry::KeyringRegistry;
pub use simple::{SimpleKeyring, SimpleKeyringBuilder};
