//! Stale-while-revalidate read-through cache over a persistent key-value store.
//!
//! This crate provides:
//! - [`SwrCache`], which serves fresh cached data and otherwise runs the caller's query
//! - Record stores backed by SQLite or process memory
//! - Freshness windows given as milliseconds or duration strings ("10s", "2 days")
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod duration;
pub mod envelope;
pub mod error;
pub mod predicate;
pub mod query;
pub mod revalidate;
pub mod store;

pub use cache::SwrCache;
pub use config::{AppConfig, ConfigError};
pub use envelope::WrappedData;
pub use error::{BoxError, Error};
pub use predicate::CacheIf;
pub use query::{ProcessedQueryOptions, QueryOptions};
pub use revalidate::Revalidate;
pub use store::{CacheDb, MemoryStore, RecordId, SqliteStore, Store};
