//! Query options and their normalization.
//!
//! [`QueryOptions`] is what callers hand to [`SwrCache::run`](crate::SwrCache::run). Only the
//! query itself is required; normalization checks it is present and resolves the freshness
//! window, producing [`ProcessedQueryOptions`].

use std::fmt;
use std::future::Future;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;

use crate::predicate::CacheIf;
use crate::revalidate::{self, Revalidate};
use crate::store::RecordId;
use crate::{BoxError, Error};

/// Boxed query producing the data to cache.
pub type QueryFn<T> = Box<dyn FnOnce() -> BoxFuture<'static, Result<T, BoxError>> + Send>;

/// Options controlling how a query is executed and cached.
pub struct QueryOptions<T> {
    /// The record's identifier.
    pub id: Option<RecordId>,

    /// The function invoked to retrieve the data.
    pub query: Option<QueryFn<T>>,

    /// Whether the retrieved data may be cached. Always cached when absent.
    pub cache_if: Option<CacheIf<T>>,

    /// How long the data stays fresh. One day when absent.
    pub revalidate: Option<Revalidate>,
}

/// Query options after validation, with the freshness window resolved.
pub struct ProcessedQueryOptions<T> {
    pub id: Option<RecordId>,
    pub query: QueryFn<T>,
    pub cache_if: Option<CacheIf<T>>,
    /// Freshness window in milliseconds, always positive.
    pub revalidate: u64,
}

fn box_query<T, F, Fut, E>(query: F) -> QueryFn<T>
where
    T: 'static,
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    E: Into<BoxError> + 'static,
{
    Box::new(move || async move { query().await.map_err(Into::<BoxError>::into) }.boxed())
}

impl<T> Default for QueryOptions<T> {
    fn default() -> Self {
        Self { id: None, query: None, cache_if: None, revalidate: None }
    }
}

impl<T: 'static> QueryOptions<T> {
    /// Options running `query`, with every other field left at its default.
    pub fn new<F, Fut, E>(query: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Into<BoxError> + 'static,
    {
        Self::default().query(query)
    }

    pub fn query<F, Fut, E>(mut self, query: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Into<BoxError> + 'static,
    {
        self.query = Some(box_query(query));
        self
    }
}

impl<T> QueryOptions<T> {
    pub fn id(mut self, id: impl Into<RecordId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn cache_if(mut self, cache_if: impl Into<CacheIf<T>>) -> Self {
        self.cache_if = Some(cache_if.into());
        self
    }

    pub fn revalidate(mut self, revalidate: impl Into<Revalidate>) -> Self {
        self.revalidate = Some(revalidate.into());
        self
    }

    /// Validate the options and resolve the freshness window.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidQueryFunction` if no query was supplied
    /// - `Error::InvalidRevalidateValue` if the freshness window is invalid
    pub fn normalize(self) -> Result<ProcessedQueryOptions<T>, Error> {
        let query = self.query.ok_or(Error::InvalidQueryFunction)?;
        let revalidate = revalidate::resolve(self.revalidate.as_ref())?;

        Ok(ProcessedQueryOptions { id: self.id, query, cache_if: self.cache_if, revalidate })
    }
}

impl<T> fmt::Debug for QueryOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryOptions")
            .field("id", &self.id)
            .field("query", &self.query.as_ref().map(|_| "<fn>"))
            .field("cache_if", &self.cache_if)
            .field("revalidate", &self.revalidate)
            .finish()
    }
}

impl<T> fmt::Debug for ProcessedQueryOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessedQueryOptions")
            .field("id", &self.id)
            .field("cache_if", &self.cache_if)
            .field("revalidate", &self.revalidate)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use super::*;

    fn options() -> QueryOptions<u32> {
        QueryOptions::new(|| async { Ok::<_, Infallible>(123) })
    }

    #[test]
    fn test_normalize_defaults() {
        let opts = options().normalize().unwrap();
        assert_eq!(opts.id, None);
        assert!(opts.cache_if.is_none());
        assert_eq!(opts.revalidate, 86_400_000);
    }

    #[test]
    fn test_normalize_passes_id_through() {
        let opts = options().id("7281bfdc-c983-4d03-b7ad-96db698b4a14").normalize().unwrap();
        assert_eq!(opts.id, Some(RecordId::from("7281bfdc-c983-4d03-b7ad-96db698b4a14")));

        let opts = options().id(RecordId::Number(123)).normalize().unwrap();
        assert_eq!(opts.id, Some(RecordId::Number(123)));
    }

    #[test]
    fn test_normalize_passes_cache_if_through() {
        let opts = options().cache_if(CacheIf::<u32>::when(|_, _| true)).normalize().unwrap();
        assert!(matches!(opts.cache_if, Some(CacheIf::Evaluate(_))));

        let opts = options().cache_if(false).normalize().unwrap();
        assert!(matches!(opts.cache_if, Some(CacheIf::Never)));
    }

    #[test]
    fn test_normalize_resolves_revalidate() {
        let opts = options().revalidate(Revalidate::Millis(546_123)).normalize().unwrap();
        assert_eq!(opts.revalidate, 546_123);

        let opts = options().revalidate("7 days").normalize().unwrap();
        assert_eq!(opts.revalidate, 604_800_000);
    }

    #[test]
    fn test_normalize_propagates_revalidate_error() {
        let result = options().revalidate("1 dayz").normalize();
        assert!(matches!(result, Err(Error::InvalidRevalidateValue(value)) if value == "1 dayz"));
    }

    #[test]
    fn test_normalize_requires_query() {
        let result = QueryOptions::<u32>::default().normalize();
        assert!(matches!(result, Err(Error::InvalidQueryFunction)));

        let result = QueryOptions::<u32>::default()
            .id("some-id")
            .cache_if(true)
            .revalidate("1 dayz")
            .normalize();
        assert!(matches!(result, Err(Error::InvalidQueryFunction)));
    }

    #[tokio::test]
    async fn test_query_runs() {
        let opts = options().normalize().unwrap();
        assert_eq!((opts.query)().await.unwrap(), 123);
    }

    #[tokio::test]
    async fn test_query_error_is_boxed() {
        let opts = QueryOptions::<u32>::new(|| async { Err(std::io::Error::other("offline")) })
            .normalize()
            .unwrap();
        let err = (opts.query)().await.unwrap_err();
        assert_eq!(err.to_string(), "offline");
    }
}
