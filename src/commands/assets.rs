use anyhow::{Context, Result};
use std::io::Write;

use crate::api::das::AssetsByOwnerOptions;
use crate::client::HeliusClient;
use crate::context::RequestContext;

use super::print_json;

#[tracing::instrument(skip(client, ctx, out))]
pub async fn asset<W: Write>(
    client: &HeliusClient,
    ctx: &RequestContext,
    id: &str,
    out: &mut W,
) -> Result<()> {
    let asset = client
        .get_asset(ctx, id)
        .await
        .with_context(|| format!("Failed to fetch asset {}", id))?;
    print_json(out, &asset)
}

#[tracing::instrument(skip(client, ctx, out))]
pub async fn assets<W: Write>(
    client: &HeliusClient,
    ctx: &RequestContext,
    owner: &str,
    page: Option<u32>,
    limit: Option<u32>,
    out: &mut W,
) -> Result<()> {
    let opts = AssetsByOwnerOptions {
        page,
        limit,
        ..Default::default()
    };
    let page = client
        .get_assets_by_owner(ctx, owner, Some(&opts))
        .await
        .with_context(|| format!("Failed to fetch assets owned by {}", owner))?;
    print_json(out, &page)
}
