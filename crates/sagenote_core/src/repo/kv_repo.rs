//! Key-value store contracts and implementations.
//!
//! # Responsibility
//! - Provide a small string key-value API modelled on browser local storage.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `set` overwrites the whole value for a key; there are no partial writes.
//! - `get` on a missing key returns `Ok(None)`, never an error.

use crate::db::DbError;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

const KV_TABLE: &str = "kv_entries";
const KV_REQUIRED_COLUMNS: [&str; 3] = ["key", "value", "updated_at"];

pub type StorageResult<T> = Result<T, StorageError>;

/// Error for key-value storage reads and writes.
#[derive(Debug)]
pub enum StorageError {
    /// Underlying database failure.
    Db(DbError),
    /// Store could not serve the read.
    ReadFailed { key: String, reason: String },
    /// Store refused the write (quota, read-only mode).
    WriteRejected { key: String, reason: String },
    /// Value could not be encoded before writing.
    Encode(serde_json::Error),
    /// Connection is missing the `kv_entries` schema.
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::ReadFailed { key, reason } => write!(f, "read of `{key}` failed: {reason}"),
            Self::WriteRejected { key, reason } => {
                write!(f, "write to `{key}` rejected: {reason}")
            }
            Self::Encode(err) => write!(f, "failed to encode value: {err}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// String key-value storage.
pub trait KeyValueStore {
    /// Reads the value stored under `key`.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    /// Overwrites the value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
    /// Deletes `key`. Missing keys are not an error.
    fn remove(&mut self, key: &str) -> StorageResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

/// SQLite-backed key-value store over the `kv_entries` table.
pub struct SqliteKeyValueStore {
    conn: Connection,
}

impl SqliteKeyValueStore {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - Returns `MissingRequiredTable`/`MissingRequiredColumn` when the
    ///   connection was not opened through `open_db*`.
    pub fn try_new(conn: Connection) -> StorageResult<Self> {
        ensure_kv_connection_ready(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        debug!(
            "event=kv_set module=repo status=ok key={key} bytes={}",
            value.len()
        );
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(())
    }
}

/// In-process key-value store.
///
/// Reads and writes can be switched off to exercise storage-failure paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: BTreeMap<String, String>,
    fail_reads: bool,
    reject_writes: bool,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `get` fail with `ReadFailed`.
    pub fn set_fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    /// Makes every subsequent `set`/`remove` fail with `WriteRejected`.
    pub fn set_reject_writes(&mut self, reject: bool) {
        self.reject_writes = reject;
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_writable(&self, key: &str) -> StorageResult<()> {
        if self.reject_writes {
            return Err(StorageError::WriteRejected {
                key: key.to_string(),
                reason: "store is read-only".to_string(),
            });
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        if self.fail_reads {
            return Err(StorageError::ReadFailed {
                key: key.to_string(),
                reason: "store is unavailable".to_string(),
            });
        }
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.check_writable(key)?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.check_writable(key)?;
        self.entries.remove(key);
        Ok(())
    }
}

fn ensure_kv_connection_ready(conn: &Connection) -> StorageResult<()> {
    if !table_exists(conn, KV_TABLE)? {
        return Err(StorageError::MissingRequiredTable(KV_TABLE));
    }

    for column in KV_REQUIRED_COLUMNS {
        if !table_has_column(conn, KV_TABLE, column)? {
            return Err(StorageError::MissingRequiredColumn {
                table: KV_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> StorageResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> StorageResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
