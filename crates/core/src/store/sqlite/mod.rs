//! SQLite-backed store.
//!
//! A single [`CacheDb`] connection (tokio-rusqlite, WAL mode, migrated schema) is shared by
//! any number of [`SqliteStore`] handles, each bound to one namespace.

pub mod connection;
pub mod migrations;
pub mod records;

pub use connection::CacheDb;
pub use records::SqliteStore;
