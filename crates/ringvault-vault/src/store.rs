// SPDX-FileCopyrightText: 2026 RingVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`StateStore`] implementations.
//!
//! [`MemoryStore`] keeps state in process; [`SqliteStore`] persists the vault
//! blob in a single-row SQLite table so it survives restarts.

use std::path::Path;

use async_trait::async_trait;
use ringvault_core::{EncryptedBlob, PersistedState, RingVaultError, StateStore};
use rusqlite::OptionalExtension;
use tokio::sync::RwLock;
use tokio_rusqlite::Connection;
use tracing::debug;

/// In-memory state store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<PersistedState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `state`, e.g. a vault written by an earlier session.
    pub fn with_state(state: PersistedState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn get_state(&self) -> Result<PersistedState, RingVaultError> {
        Ok(self.state.read().await.clone())
    }

    async fn update_state(&self, state: PersistedState) -> Result<(), RingVaultError> {
        *self.state.write().await = state;
        Ok(())
    }
}

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS vault_state (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    vault TEXT
)";

fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> RingVaultError {
    RingVaultError::Storage {
        source: Box::new(e),
    }
}

/// SQLite-backed state store.
pub struct SqliteStore {
    conn: Connection,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, RingVaultError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| RingVaultError::Storage {
                source: Box::new(e),
            })?;
        }
        let conn = Connection::open(path)
            .await
            .map_err(|e| RingVaultError::Storage {
                source: Box::new(e),
            })?;
        debug!(path = %path.display(), "opened state database");
        Self::init(conn).await
    }

    /// Private in-memory database; state is lost when the store drops.
    pub async fn open_in_memory() -> Result<Self, RingVaultError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RingVaultError::Storage {
                source: Box::new(e),
            })?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self, RingVaultError> {
        conn.call(|conn| -> Result<(), rusqlite::Error> {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl StateStore for SqliteStore {
    async fn get_state(&self) -> Result<PersistedState, RingVaultError> {
        let vault = self
            .conn
            .call(|conn| -> Result<Option<String>, rusqlite::Error> {
                let row: Option<Option<String>> = conn
                    .query_row("SELECT vault FROM vault_state WHERE id = 1", [], |row| {
                        row.get(0)
                    })
                    .optional()?;
                Ok(row.flatten())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(PersistedState {
            vault: vault.map(EncryptedBlob),
        })
    }

    async fn update_state(&self, state: PersistedState) -> Result<(), RingVaultError> {
        let vault = state.vault.map(|blob| blob.0);
        self.conn
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "INSERT OR REPLACE INTO vault_state (id, vault) VALUES (1, ?1)",
                    rusqlite::params![vault],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("vault state persisted");
        Ok(())
    }
}
