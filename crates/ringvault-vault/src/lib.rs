// SPDX-FileCopyrightText: 2026 RingVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encrypted vault for RingVault keyrings.
//!
//! The controller's whole keyring list is serialized by [`VaultCodec`],
//! encrypted by a [`PassphraseEncryptor`] (Argon2id-derived key, AES-256-GCM),
//! and kept as one opaque blob in a [`StateStore`](ringvault_core::StateStore).

pub mod codec;
pub mod crypto;
pub mod encryptor;
pub mod kdf;
pub mod store;

pub use codec::{serialize_keyrings, VaultCodec};
pub use encryptor::PassphraseEncryptor;
pub use kdf::KdfParams;
pub use store::{MemoryStore, SqliteStore};
