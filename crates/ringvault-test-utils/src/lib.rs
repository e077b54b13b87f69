// SPDX-FileCopyrightText: 2026 RingVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for RingVault integration tests.
//!
//! # Components
//!
//! - [`MockKeyring`] - keyring variant with fixed account labels
//! - [`TestHarness`] - controller over an in-memory store with fast Argon2 settings

pub mod harness;
pub mod mock_keyring;

pub use harness::{fast_encryptor, fast_kdf_params, password, TestHarness, TestHarnessBuilder};
pub use mock_keyring::{MockKeyring, MockKeyringBuilder, MOCK_KEYRING_TYPE};
