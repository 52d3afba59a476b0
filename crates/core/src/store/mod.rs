//! Persistent key-value stores backing the cache.
//!
//! A store holds opaque JSON values keyed by record identifier, inside a single namespace.
//! Two implementations ship with the crate:
//!
//! - [`SqliteStore`], a namespace view over a shared [`CacheDb`]
//! - [`MemoryStore`], a process-local map for tests and ephemeral caches

mod memory;
pub mod sqlite;

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::Error;

pub use memory::MemoryStore;
pub use sqlite::{CacheDb, SqliteStore};

/// Storage key used when a call does not name a record.
pub const DEFAULT_RECORD_KEY: &str = "@default";

/// Identifier of a cached record.
///
/// Text and numeric identifiers are distinct: `"1"` and `1` address different records.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordId {
    Text(String),
    Number(i64),
}

impl RecordId {
    /// Key under which the record is persisted, tagged with the identifier kind.
    pub fn storage_key(&self) -> String {
        match self {
            RecordId::Text(text) => format!("s:{text}"),
            RecordId::Number(n) => format!("n:{n}"),
        }
    }
}

/// Storage key for an optional identifier, falling back to [`DEFAULT_RECORD_KEY`].
pub fn storage_key(id: Option<&RecordId>) -> String {
    id.map_or_else(|| DEFAULT_RECORD_KEY.to_string(), RecordId::storage_key)
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Text(text) => f.write_str(text),
            RecordId::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        RecordId::Text(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        RecordId::Text(id)
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId::Number(id)
    }
}

/// Asynchronous key-value store bound to one namespace.
///
/// Every operation may fail; the cache decides what a failure means.
/// An omitted identifier addresses [`DEFAULT_RECORD_KEY`] on `get`/`set`
/// and the whole namespace on `delete`.
#[async_trait]
pub trait Store: Send + Sync {
    /// Namespace this store is bound to.
    fn namespace(&self) -> &str;

    /// Read the raw value stored under `id`.
    async fn get(&self, id: Option<&RecordId>) -> Result<Option<Value>, Error>;

    /// Write `value` under `id`, replacing any previous value.
    async fn set(&self, id: Option<&RecordId>, value: Value) -> Result<(), Error>;

    /// Remove the record under `id`, or every record in the namespace when `id` is `None`.
    async fn delete(&self, id: Option<&RecordId>) -> Result<(), Error>;
}
