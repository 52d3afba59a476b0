//! Unified error types for swrkv.
//!
//! Every variant renders with a stable code prefix, except query failures which are
//! displayed exactly as the caller's query produced them.

use tokio_rusqlite::rusqlite;

/// Error produced by a caller-supplied query, boxed so any error type can flow through `run`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Unified error types for the cache.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The freshness window could not be resolved to a positive millisecond count.
    #[error(
        "INVALID_REVALIDATE_VALUE: the provided revalidate value '{0}' is invalid. Provide either a \
         number of milliseconds (e.g. 1000) or a duration string (e.g. \"1 hour\" or \"35 s\")"
    )]
    InvalidRevalidateValue(String),

    /// The query options did not carry a query function.
    #[error("INVALID_QUERY_FUNCTION: the query function provided in the options is invalid")]
    InvalidQueryFunction,

    /// The caller's query failed.
    #[error("{0}")]
    Query(BoxError),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// A record could not be encoded or decoded.
    #[error("CACHE_ERROR: serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store refused the operation.
    #[error("CACHE_ERROR: store unavailable: {0}")]
    StoreUnavailable(String),
}

impl Error {
    /// Stable code identifying the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidRevalidateValue(_) => "INVALID_REVALIDATE_VALUE",
            Error::InvalidQueryFunction => "INVALID_QUERY_FUNCTION",
            Error::Query(_) => "QUERY_FAILED",
            Error::Database(_) | Error::MigrationFailed(_) | Error::Serialization(_) | Error::StoreUnavailable(_) => {
                "CACHE_ERROR"
            }
        }
    }

    /// Whether the error came from the storage layer.
    pub fn is_storage(&self) -> bool {
        self.code() == "CACHE_ERROR"
    }

    /// Recover the caller's own error from a failed query.
    pub fn into_query_error(self) -> Option<BoxError> {
        match self {
            Error::Query(err) => Some(err),
            _ => None,
        }
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}
