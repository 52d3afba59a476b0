//! Record CRUD and maintenance operations.
//!
//! Records are stored as JSON text keyed by `(namespace, record_id)`, where `record_id`
//! is the kind-tagged [`RecordId::storage_key`].

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite::OptionalExtension;

use super::connection::CacheDb;
use crate::Error;
use crate::store::{RecordId, Store, storage_key};

/// Namespace view over a [`CacheDb`].
#[derive(Clone, Debug)]
pub struct SqliteStore {
    db: CacheDb,
    namespace: String,
}

impl SqliteStore {
    pub fn new(db: CacheDb, namespace: impl Into<String>) -> Self {
        Self { db, namespace: namespace.into() }
    }

    /// Delete stale records in this namespace.
    ///
    /// A record is stale once its `staleAt` timestamp is at or before now. Records that
    /// are not valid envelopes can never be served and are removed as well.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_stale(&self) -> Result<u64, Error> {
        let namespace = self.namespace.clone();
        let now = Utc::now().timestamp_millis();
        let deleted = self
            .db
            .conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute(
                    "DELETE FROM records
                    WHERE namespace = ?1
                    AND CASE
                        WHEN json_valid(value) THEN
                            json_type(value, '$.data') IS NULL
                            OR json_type(value, '$.staleAt') IS NOT 'integer'
                            OR json_extract(value, '$.staleAt') <= ?2
                        ELSE 1
                    END",
                    params![namespace, now],
                )?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)?;

        tracing::debug!(namespace = %self.namespace, deleted, "purged stale cache records");
        Ok(deleted)
    }

    /// Number of records in this namespace, fresh or stale.
    pub async fn count(&self) -> Result<u64, Error> {
        let namespace = self.namespace.clone();
        self.db
            .conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM records WHERE namespace = ?1", params![namespace], |row| {
                        row.get(0)
                    })?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Storage keys of every record in this namespace, in key order.
    pub async fn list_ids(&self) -> Result<Vec<String>, Error> {
        let namespace = self.namespace.clone();
        self.db
            .conn
            .call(move |conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT record_id FROM records WHERE namespace = ?1 ORDER BY record_id")?;
                let ids = stmt
                    .query_map(params![namespace], |row| row.get(0))?
                    .collect::<Result<Vec<String>, _>>()?;
                Ok(ids)
            })
            .await
            .map_err(Error::from)
    }
}

#[async_trait]
impl Store for SqliteStore {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn get(&self, id: Option<&RecordId>) -> Result<Option<Value>, Error> {
        let namespace = self.namespace.clone();
        let key = storage_key(id);
        let raw = self
            .db
            .conn
            .call(move |conn| -> Result<Option<String>, Error> {
                let value = conn
                    .query_row(
                        "SELECT value FROM records WHERE namespace = ?1 AND record_id = ?2",
                        params![namespace, key],
                        |row| row.get(0),
                    )
                    .optional()?;
                Ok(value)
            })
            .await
            .map_err(Error::from)?;

        raw.map(|text| serde_json::from_str(&text).map_err(Error::from))
            .transpose()
    }

    /// Insert or replace the record.
    ///
    /// Uses UPSERT semantics, so the last write wins.
    async fn set(&self, id: Option<&RecordId>, value: Value) -> Result<(), Error> {
        let namespace = self.namespace.clone();
        let key = storage_key(id);
        let text = serde_json::to_string(&value)?;
        let updated_at = Utc::now().to_rfc3339();

        self.db
            .conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO records (namespace, record_id, value, updated_at)
                    VALUES (?1, ?2, ?3, ?4)
                    ON CONFLICT(namespace, record_id) DO UPDATE SET
                        value = excluded.value,
                        updated_at = excluded.updated_at",
                    params![namespace, key, text, updated_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn delete(&self, id: Option<&RecordId>) -> Result<(), Error> {
        let namespace = self.namespace.clone();
        let key = id.map(RecordId::storage_key);

        self.db
            .conn
            .call(move |conn| -> Result<(), Error> {
                match key {
                    Some(key) => {
                        conn.execute(
                            "DELETE FROM records WHERE namespace = ?1 AND record_id = ?2",
                            params![namespace, key],
                        )?;
                    }
                    None => {
                        conn.execute("DELETE FROM records WHERE namespace = ?1", params![namespace])?;
                    }
                }
                Ok(())
            })
            .await
            .map_err(Error::from)
    }
}
