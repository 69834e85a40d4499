use anyhow::{Context, Result};
use std::io::Write;

use crate::api::token_holders::{TokenHoldersOptions, calculate_top_holder_stats};
use crate::client::HeliusClient;
use crate::context::RequestContext;

use super::print_json;

#[derive(Debug, Clone, Default)]
pub struct HoldersQuery {
    pub mint: String,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
    /// Follow cursors to the last page.
    pub all: bool,
    /// Print concentration stats for the top N holders instead of the list.
    pub top: Option<usize>,
}

#[tracing::instrument(skip(client, ctx, out))]
pub async fn holders<W: Write>(
    client: &HeliusClient,
    ctx: &RequestContext,
    query: &HoldersQuery,
    out: &mut W,
) -> Result<()> {
    let holders = if query.all {
        client
            .get_all_token_holders(ctx, &query.mint)
            .await
            .with_context(|| format!("Failed to fetch all holders of {}", query.mint))?
    } else {
        let opts = TokenHoldersOptions {
            cursor: query.cursor.clone(),
            limit: query.limit,
        };
        let page = client
            .get_token_holders(ctx, &query.mint, Some(&opts))
            .await
            .with_context(|| format!("Failed to fetch holders of {}", query.mint))?;

        if query.top.is_none() {
            return print_json(out, &page);
        }
        page.token_holders
    };

    match query.top {
        Some(n) => print_json(out, &calculate_top_holder_stats(&holders, n)),
        None => print_json(out, &holders),
    }
}
