//! Durable key-value blob storage.
//!
//! # Responsibility
//! - Provide get/put of opaque byte values under string keys.
//! - Own the `blobs` table schema and its version stamp.
//! - Offer a SQLite implementation and an in-memory fake for tests.
//!
//! # Invariants
//! - `put` replaces the previous value for the key entirely; one row per key.
//! - `updated_at` is the epoch-ms time of the latest `put` for that key.
//! - A missing key reads as `Ok(None)`, never as an error.

use crate::model::task::now_epoch_ms;
use crate::repo::{RepoError, RepoResult};
use log::info;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// `PRAGMA user_version` stamped once the `blobs` table exists.
pub const BLOB_SCHEMA_VERSION: u32 = 1;

const CREATE_BLOBS_SQL: &str = "
CREATE TABLE IF NOT EXISTS blobs (
    key TEXT PRIMARY KEY NOT NULL,
    value BLOB NOT NULL,
    updated_at INTEGER NOT NULL
);";

/// Key-value blob storage contract.
pub trait BlobStore {
    /// Reads the value stored under `key`.
    fn get(&self, key: &str) -> RepoResult<Option<Vec<u8>>>;
    /// Overwrites the value stored under `key`.
    fn put(&self, key: &str, value: &[u8]) -> RepoResult<()>;
}

/// SQLite-backed blob store over the `blobs` table.
pub struct SqliteBlobStore {
    conn: Connection,
}

impl SqliteBlobStore {
    /// Wraps a connection, creating the `blobs` table on first use.
    ///
    /// # Errors
    /// - `UnsupportedSchemaVersion` when the file was stamped by a newer
    ///   build; the file is left untouched.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        ensure_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Underlying connection, for diagnostics and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn ensure_schema(conn: &Connection) -> RepoResult<()> {
    let found: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if found > BLOB_SCHEMA_VERSION {
        return Err(RepoError::UnsupportedSchemaVersion {
            found,
            supported: BLOB_SCHEMA_VERSION,
        });
    }
    if found < BLOB_SCHEMA_VERSION {
        conn.execute_batch(&format!(
            "BEGIN IMMEDIATE;{CREATE_BLOBS_SQL}\nPRAGMA user_version = {BLOB_SCHEMA_VERSION};\nCOMMIT;"
        ))?;
        info!(
            "event=blob_schema module=repo status=created from_version={} to_version={}",
            found, BLOB_SCHEMA_VERSION
        );
    }
    Ok(())
}

impl BlobStore for SqliteBlobStore {
    fn get(&self, key: &str) -> RepoResult<Option<Vec<u8>>> {
        let value = self
            .conn
            .query_row("SELECT value FROM blobs WHERE key = ?1;", [key], |row| {
                row.get::<_, Vec<u8>>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn put(&self, key: &str, value: &[u8]) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO blobs (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value, now_epoch_ms()],
        )?;
        Ok(())
    }
}

/// In-memory blob store. Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    entries: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    read_only: Arc<AtomicBool>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `put` fail until cleared.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn ensure_writable(&self) -> RepoResult<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(RepoError::Unavailable("memory blob store is read-only"));
        }
        Ok(())
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> RepoResult<Option<Vec<u8>>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| RepoError::Unavailable("memory blob store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> RepoResult<()> {
        self.ensure_writable()?;
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| RepoError::Unavailable("memory blob store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{BlobStore, MemoryBlobStore};

    #[test]
    fn memory_store_clones_share_entries() {
        let store = MemoryBlobStore::new();
        let alias = store.clone();

        store.put("todos", b"[]").unwrap();
        assert_eq!(alias.get("todos").unwrap().as_deref(), Some(&b"[]"[..]));

        alias.put("todos", b"[1]").unwrap();
        assert_eq!(store.get("todos").unwrap().as_deref(), Some(&b"[1]"[..]));
        assert_eq!(store.len(), 1);
        assert!(store.get("other").unwrap().is_none());
    }

    #[test]
    fn read_only_memory_store_rejects_writes_but_serves_reads() {
        let store = MemoryBlobStore::new();
        store.put("todos", b"[1]").unwrap();
        store.set_read_only(true);

        assert!(store.put("todos", b"[2]").is_err());
        assert_eq!(store.get("todos").unwrap().as_deref(), Some(&b"[1]"[..]));
    }
}
