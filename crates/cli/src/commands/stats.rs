//! stats command.

use anyhow::{Context as _, Result};
use serde::Serialize;

use super::Context;

#[derive(Debug, Clone, Serialize)]
pub struct StatsOutput {
    pub namespace: String,
    pub records: u64,
    /// Storage keys, in key order.
    pub keys: Vec<String>,
}

pub async fn stats_impl(ctx: &Context) -> Result<StatsOutput> {
    let store = ctx.store();
    let records = store.count().await.context("failed to count records")?;
    let keys = store.list_ids().await.context("failed to list record keys")?;

    Ok(StatsOutput { namespace: ctx.namespace().to_string(), records, keys })
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use swrkv_core::RecordId;

    use super::*;
    use crate::commands::test_support::{context, seed};

    #[tokio::test]
    async fn test_stats_empty() {
        let ctx = context().await;
        let output = stats_impl(&ctx).await.unwrap();
        assert_eq!(output.records, 0);
        assert!(output.keys.is_empty());
    }

    #[tokio::test]
    async fn test_stats_lists_keys() {
        let ctx = context().await;
        seed(&ctx, RecordId::from("b"), json!(1)).await;
        seed(&ctx, RecordId::Number(3), json!(2)).await;
        seed(&ctx, RecordId::from("a"), json!(3)).await;

        let output = stats_impl(&ctx).await.unwrap();

        assert_eq!(output.records, 3);
        assert_eq!(output.keys, vec!["n:3", "s:a", "s:b"]);
    }
}
