//! inspect command.
//!
//! Shows a stored record as persisted, with its freshness.

use anyhow::{Context as _, Result, anyhow};
use chrono::DateTime;
use serde::Serialize;
use serde_json::Value;
use swrkv_core::envelope;
use swrkv_core::{RecordId, Store};

use super::Context;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Fresh,
    Stale,
    /// Not a valid envelope; the cache treats it as a miss.
    Malformed,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectOutput {
    pub namespace: String,
    pub key: String,
    pub status: RecordStatus,
    /// RFC 3339 form of the record's `staleAt`.
    pub stale_at: Option<String>,
    /// The record exactly as stored.
    pub record: Value,
}

pub async fn inspect_impl(ctx: &Context, id: &RecordId) -> Result<InspectOutput> {
    let record = ctx
        .store()
        .get(Some(id))
        .await
        .with_context(|| format!("failed to read record {id}"))?
        .ok_or_else(|| anyhow!("no cached record for '{id}' in namespace '{}'", ctx.namespace()))?;

    let wrapped = envelope::decode::<Value>(record.clone());
    let status = match &wrapped {
        None => RecordStatus::Malformed,
        Some(wrapped) if wrapped.is_fresh_at(envelope::now_ms()) => RecordStatus::Fresh,
        Some(_) => RecordStatus::Stale,
    };
    let stale_at = wrapped
        .and_then(|wrapped| DateTime::from_timestamp_millis(wrapped.stale_at))
        .map(|at| at.to_rfc3339());

    Ok(InspectOutput { namespace: ctx.namespace().to_string(), key: id.storage_key(), status, stale_at, record })
}
