// SPDX-FileCopyrightText: 2026 RingVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions at the seams of the keyring controller.

pub mod encryptor;
pub mod keyring;
pub mod store;

pub use encryptor::Encryptor;
pub use keyring::{Keyring, KeyringBuilder};
pub use store::StateStore;
