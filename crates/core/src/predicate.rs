//! Cacheability predicate.
//!
//! Decides whether freshly fetched data may be persisted.

use std::fmt;

use futures_util::FutureExt;
use futures_util::future::{self, BoxFuture};

use crate::store::RecordId;

/// Boxed predicate evaluated against the record identifier and the fetched data.
pub type Predicate<T> = Box<dyn for<'a> Fn(Option<&'a RecordId>, &'a T) -> BoxFuture<'a, bool> + Send + Sync>;

/// Whether the result of a query should be cached.
pub enum CacheIf<T> {
    Always,
    Never,
    Evaluate(Predicate<T>),
}

impl<T> CacheIf<T> {
    /// Decide with a synchronous predicate.
    pub fn when<F>(predicate: F) -> Self
    where
        F: Fn(Option<&RecordId>, &T) -> bool + Send + Sync + 'static,
    {
        Self::when_async(move |id, data| future::ready(predicate(id, data)).boxed())
    }

    /// Decide with an asynchronous predicate.
    pub fn when_async<F>(predicate: F) -> Self
    where
        F: for<'a> Fn(Option<&'a RecordId>, &'a T) -> BoxFuture<'a, bool> + Send + Sync + 'static,
    {
        Self::Evaluate(Box::new(predicate))
    }
}

impl<T> From<bool> for CacheIf<T> {
    fn from(cache: bool) -> Self {
        if cache { CacheIf::Always } else { CacheIf::Never }
    }
}

impl<T> fmt::Debug for CacheIf<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheIf::Always => f.write_str("Always"),
            CacheIf::Never => f.write_str("Never"),
            CacheIf::Evaluate(_) => f.write_str("Evaluate(..)"),
        }
    }
}

/// Evaluate the cacheability of `data`. An absent predicate always caches.
pub async fn should_cache<T>(id: Option<&RecordId>, data: &T, cache_if: Option<&CacheIf<T>>) -> bool {
    match cache_if {
        None | Some(CacheIf::Always) => true,
        Some(CacheIf::Never) => false,
        Some(CacheIf::Evaluate(predicate)) => predicate(id, data).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn data() -> Value {
        json!({"foo": "bar"})
    }

    #[tokio::test]
    async fn test_absent_caches() {
        let id = RecordId::from("some-id");
        assert!(should_cache(Some(&id), &data(), None).await);
    }

    #[tokio::test]
    async fn test_booleans() {
        let id = RecordId::from("some-id");
        assert!(should_cache(Some(&id), &data(), Some(&CacheIf::from(true))).await);
        assert!(!should_cache(Some(&id), &data(), Some(&CacheIf::from(false))).await);
    }

    #[tokio::test]
    async fn test_sync_predicate() {
        let id = RecordId::from("some-id");
        let yes = CacheIf::<Value>::when(|_, _| true);
        let no = CacheIf::<Value>::when(|_, _| false);
        assert!(should_cache(Some(&id), &data(), Some(&yes)).await);
        assert!(!should_cache(Some(&id), &data(), Some(&no)).await);
    }

    #[tokio::test]
    async fn test_async_predicate() {
        let id = RecordId::from("some-id");
        let yes = CacheIf::<Value>::when_async(|_, _| async { true }.boxed());
        let no = CacheIf::<Value>::when_async(|_, _| async { false }.boxed());
        assert!(should_cache(Some(&id), &data(), Some(&yes)).await);
        assert!(!should_cache(Some(&id), &data(), Some(&no)).await);
    }

    #[tokio::test]
    async fn test_predicate_sees_id_and_data() {
        let only_bar = CacheIf::<Value>::when(|id, data| {
            id == Some(&RecordId::from("some-id")) && data["foo"] == "bar"
        });
        assert!(should_cache(Some(&RecordId::from("some-id")), &data(), Some(&only_bar)).await);
        assert!(!should_cache(Some(&RecordId::from("other-id")), &data(), Some(&only_bar)).await);
        assert!(!should_cache(None, &json!({"foo": "baz"}), Some(&only_bar)).await);
    }

    #[tokio::test]
    async fn test_async_predicate_inspects_data() {
        let positive = CacheIf::<i64>::when_async(|_, data| {
            let keep = *data > 0;
            async move { keep }.boxed()
        });
        assert!(should_cache(None, &5, Some(&positive)).await);
        assert!(!should_cache(None, &-5, Some(&positive)).await);
    }
}
