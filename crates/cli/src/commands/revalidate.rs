//! revalidate command.

use anyhow::{Context as _, Result};
use serde::Serialize;
use swrkv_core::{RecordId, Store, store::storage_key};

use super::Context;

#[derive(Debug, Clone, Serialize)]
pub struct RevalidateOutput {
    pub namespace: String,
    /// Key of the dropped record, or `None` when the whole namespace was cleared.
    pub key: Option<String>,
    /// Records left in the namespace afterwards.
    pub remaining: u64,
}

pub async fn revalidate_impl(ctx: &Context, id: Option<&RecordId>) -> Result<RevalidateOutput> {
    ctx.store()
        .delete(id)
        .await
        .with_context(|| format!("failed to revalidate {} in namespace '{}'", storage_key(id), ctx.namespace()))?;

    let remaining = ctx.store().count().await.context("failed to count remaining records")?;
    tracing::info!(namespace = %ctx.namespace(), remaining, "revalidated cache records");

    Ok(RevalidateOutput { namespace: ctx.namespace().to_string(), key: id.map(RecordId::storage_key), remaining })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::commands::test_support::{context, seed};

    #[tokio::test]
    async fn test_revalidate_one() {
        let ctx = context().await;
        seed(&ctx, RecordId::from("a"), json!(1)).await;
        seed(&ctx, RecordId::Number(1), json!(2)).await;

        let output = revalidate_impl(&ctx, Some(&RecordId::Number(1))).await.unwrap();

        assert_eq!(output.key.as_deref(), Some("n:1"));
        assert_eq!(output.remaining, 1);
        assert!(ctx.store().get(Some(&RecordId::from("a"))).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_revalidate_missing_is_noop() {
        let ctx = context().await;
        seed(&ctx, RecordId::from("a"), json!(1)).await;

        let output = revalidate_impl(&ctx, Some(&RecordId::from("b"))).await.unwrap();
        assert_eq!(output.remaining, 1);
    }

    #[tokio::test]
    async fn test_revalidate_namespace() {
        let ctx = context().await;
        seed(&ctx, RecordId::from("a"), json!(1)).await;
        seed(&ctx, RecordId::from("b"), json!(2)).await;

        let output = revalidate_impl(&ctx, None).await.unwrap();

        assert_eq!(output.key, None);
        assert_eq!(output.remaining, 0);
    }

    #[tokio::test]
    async fn test_revalidate_reports_storage_failure() {
        let db = swrkv_core::CacheDb::open_in_memory().await.unwrap();
        let ctx = Context::new(db.clone(), "users");
        db.close().await.unwrap();

        let err = revalidate_impl(&ctx, Some(&RecordId::from("a"))).await.unwrap_err();
        assert!(err.to_string().contains("failed to revalidate s:a in namespace 'users'"), "{err}");
    }
}
