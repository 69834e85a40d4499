use anyhow::{Context, Result};
use std::io::Write;

use crate::client::HeliusClient;
use crate::context::RequestContext;

use super::print_json;

#[tracing::instrument(skip(client, ctx, out))]
pub async fn list_webhooks<W: Write>(
    client: &HeliusClient,
    ctx: &RequestContext,
    out: &mut W,
) -> Result<()> {
    let webhooks = client
        .list_webhooks(ctx)
        .await
        .context("Failed to list webhooks")?;
    print_json(out, &webhooks)
}

#[tracing::instrument(skip(client, ctx, out))]
pub async fn get_webhook<W: Write>(
    client: &HeliusClient,
    ctx: &RequestContext,
    id: &str,
    out: &mut W,
) -> Result<()> {
    let webhook = client
        .get_webhook(ctx, id)
        .await
        .with_context(|| format!("Failed to fetch webhook {}", id))?;
    print_json(out, &webhook)
}

#[tracing::instrument(skip(client, ctx, out))]
pub async fn delete_webhook<W: Write>(
    client: &HeliusClient,
    ctx: &RequestContext,
    id: &str,
    out: &mut W,
) -> Result<()> {
    client
        .delete_webhook(ctx, id)
        .await
        .with_context(|| format!("Failed to delete webhook {}", id))?;
    print_json(out, &serde_json::json!({ "deleted": id }))
}
