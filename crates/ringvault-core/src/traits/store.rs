// SPDX-FileCopyrightText: 2026 RingVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! State store trait for the persisted vault blob.

use async_trait::async_trait;

use crate::error::RingVaultError;
use crate::types::PersistedState;

/// Key-value persistence for the controller's opaque state.
///
/// The controller is the single writer; implementations need not guard
/// against concurrent external mutation.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Reads the current persisted state.
    async fn get_state(&self) -> Result<PersistedState, RingVaultError>;

    /// Replaces the persisted state.
    async fn update_state(&self, state: PersistedState) -> Result<(), RingVaultError>;
}
