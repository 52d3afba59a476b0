//! Process-local store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{RecordId, Store, storage_key};
use crate::Error;

/// In-memory store bound to a namespace.
///
/// Clones share the same records.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    namespace: String,
    records: Arc<RwLock<HashMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self { namespace: namespace.into(), records: Arc::default() }
    }

    /// Number of records held, fresh or stale.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn get(&self, id: Option<&RecordId>) -> Result<Option<Value>, Error> {
        Ok(self.records.read().await.get(&storage_key(id)).cloned())
    }

    async fn set(&self, id: Option<&RecordId>, value: Value) -> Result<(), Error> {
        self.records.write().await.insert(storage_key(id), value);
        Ok(())
    }

    async fn delete(&self, id: Option<&RecordId>) -> Result<(), Error> {
        let mut records = self.records.write().await;
        match id {
            Some(id) => {
                records.remove(&id.storage_key());
            }
            None => records.clear(),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_and_get() {
        let store = MemoryStore::new("users");
        let id = RecordId::from("alice");

        store.set(Some(&id), json!({"name": "Alice"})).await.unwrap();

        let value = store.get(Some(&id)).await.unwrap().unwrap();
        assert_eq!(value["name"], "Alice");
        assert_eq!(store.namespace(), "users");
    }

    #[tokio::test]
    async fn test_get_missing() {
        let store = MemoryStore::new("users");
        assert!(store.get(Some(&RecordId::from("nobody"))).await.unwrap().is_none());
        assert!(store.get(None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_text_and_numeric_ids_are_distinct() {
        let store = MemoryStore::new("users");
        store.set(Some(&RecordId::from("1")), json!("text")).await.unwrap();
        store.set(Some(&RecordId::Number(1)), json!("number")).await.unwrap();

        assert_eq!(store.get(Some(&RecordId::from("1"))).await.unwrap(), Some(json!("text")));
        assert_eq!(store.get(Some(&RecordId::Number(1))).await.unwrap(), Some(json!("number")));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_delete_one_and_all() {
        let store = MemoryStore::new("users");
        store.set(Some(&RecordId::from("a")), json!(1)).await.unwrap();
        store.set(Some(&RecordId::from("b")), json!(2)).await.unwrap();
        store.set(None, json!(3)).await.unwrap();

        store.delete(Some(&RecordId::from("a"))).await.unwrap();
        assert_eq!(store.len().await, 2);

        store.delete(None).await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_clones_share_records() {
        let store = MemoryStore::new("users");
        let other = store.clone();
        store.set(None, json!("shared")).await.unwrap();
        assert_eq!(other.get(None).await.unwrap(), Some(json!("shared")));
    }
}
