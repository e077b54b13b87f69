// SPDX-FileCopyrightText: 2026 RingVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyring controller for RingVault.
//!
//! The [`KeyringController`] is the trust boundary of a wallet: it holds the
//! live keyrings and the password while unlocked, aggregates accounts across
//! keyring variants, and keeps the encrypted vault in the state store in step
//! with every change.

pub mod controller;
pub mod state;

pub use controller::KeyringController;
pub use state::{ControllerState, KeyringSummary};
