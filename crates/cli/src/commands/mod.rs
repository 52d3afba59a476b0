//! Subcommand implementations.
//!
//! Each command produces a serializable output that is rendered as pretty JSON.

pub mod inspect;
pub mod purge;
pub mod revalidate;
pub mod stats;

use anyhow::{Context as _, Result};
use serde::Serialize;
use swrkv_core::{CacheDb, RecordId, SqliteStore};

use crate::Command;

/// Database handle and namespace a command runs against.
#[derive(Debug, Clone)]
pub struct Context {
    db: CacheDb,
    namespace: String,
}

impl Context {
    pub fn new(db: CacheDb, namespace: impl Into<String>) -> Self {
        Self { db, namespace: namespace.into() }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn store(&self) -> SqliteStore {
        self.db.store(self.namespace.as_str())
    }
}

/// Parse a command-line identifier, as an integer when `numeric` is set.
pub fn parse_record_id(id: &str, numeric: bool) -> Result<RecordId> {
    if numeric {
        let n = id.parse::<i64>().with_context(|| format!("'{id}' is not an integer identifier"))?;
        Ok(RecordId::Number(n))
    } else {
        Ok(RecordId::from(id))
    }
}

/// Run `command` and render its output.
pub async fn execute(ctx: &Context, command: &Command) -> Result<String> {
    match command {
        Command::Inspect { id, numeric } => {
            let id = parse_record_id(id, *numeric)?;
            render(&inspect::inspect_impl(ctx, &id).await?)
        }
        Command::Revalidate { id, numeric } => {
            let id = id.as_deref().map(|id| parse_record_id(id, *numeric)).transpose()?;
            render(&revalidate::revalidate_impl(ctx, id.as_ref()).await?)
        }
        Command::Purge => render(&purge::purge_impl(ctx).await?),
        Command::Stats => render(&stats::stats_impl(ctx).await?),
    }
}

fn render<T: Serialize>(output: &T) -> Result<String> {
    serde_json::to_string_pretty(output).context("failed to serialize command output")
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::convert::Infallible;

    use serde_json::Value;
    use swrkv_core::{QueryOptions, SwrCache};

    use super::*;

    pub async fn context() -> Context {
        let db = CacheDb::open_in_memory().await.unwrap();
        Context::new(db, "users")
    }

    /// Cache `value` under `id` through the read-through path.
    pub async fn seed(ctx: &Context, id: RecordId, value: Value) {
        let options = QueryOptions::new(move || async move { Ok::<_, Infallible>(value) }).id(id);
        SwrCache::open(&ctx.db, ctx.namespace(), false).run(options).await.unwrap();
    }
}
