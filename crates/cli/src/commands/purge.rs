//! purge command.
//!
//! Deletes records that can no longer be served: stale ones and ones that are not
//! valid envelopes.

use anyhow::{Context as _, Result};
use serde::Serialize;

use super::Context;

#[derive(Debug, Clone, Serialize)]
pub struct PurgeOutput {
    pub namespace: String,
    pub deleted: u64,
    pub remaining: u64,
}

pub async fn purge_impl(ctx: &Context) -> Result<PurgeOutput> {
    let store = ctx.store();
    let deleted = store.purge_stale().await.context("failed to purge stale records")?;
    let remaining = store.count().await.context("failed to count remaining records")?;

    tracing::info!(namespace = %ctx.namespace(), deleted, remaining, "purged cache");

    Ok(PurgeOutput { namespace: ctx.namespace().to_string(), deleted, remaining })
}
