use anyhow::{Context, Result, bail};
use std::io::Write;

use crate::api::priority_fees::{PriorityFeeOptions, PriorityLevel, TransactionEncoding};
use crate::client::HeliusClient;
use crate::context::RequestContext;

use super::print_json;

#[derive(Debug, Clone, Default)]
pub struct FeeQuery {
    pub accounts: Vec<String>,
    /// Base64 serialized transaction; takes the place of `accounts`.
    pub transaction: Option<String>,
    pub level: Option<PriorityLevel>,
    pub all_levels: bool,
}

#[tracing::instrument(skip(client, ctx, out))]
pub async fn fee<W: Write>(
    client: &HeliusClient,
    ctx: &RequestContext,
    query: &FeeQuery,
    out: &mut W,
) -> Result<()> {
    let mut opts = PriorityFeeOptions {
        priority_level: query.level,
        include_all_priority_fee_levels: query.all_levels,
        ..Default::default()
    };

    let estimate = match (&query.transaction, query.accounts.is_empty()) {
        (Some(_), false) => bail!("Pass either account addresses or --transaction, not both"),
        (Some(tx), true) => {
            opts.transaction_encoding = Some(TransactionEncoding::Base64);
            client
                .get_priority_fee_estimate_for_transaction(ctx, tx, Some(&opts))
                .await
                .context("Failed to estimate priority fee for transaction")?
        }
        (None, _) => client
            .get_priority_fee_estimate(ctx, &query.accounts, Some(&opts))
            .await
            .context("Failed to estimate priority fee")?,
    };

    print_json(out, &estimate)
}
