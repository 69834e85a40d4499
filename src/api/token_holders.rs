//! Token holder lookups and concentration statistics.

use futures_util::Stream;
use serde::{Deserialize, Serialize};

use crate::client::paginate::{EmptyPagePolicy, Page, collect_all, page_stream};
use crate::client::{HeliusClient, require};
use crate::context::RequestContext;
use crate::error::Result;

const TOKEN_HOLDERS_PATH: &str = "/token-holders";

/// Largest page the server accepts.
pub const MAX_TOKEN_HOLDERS_PAGE_SIZE: u32 = 10_000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenHolder {
    /// Wallet address of the holder.
    pub owner: String,
    pub token_account: String,
    /// Raw balance, not scaled by `decimals`.
    pub balance: u64,
    pub decimals: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenHoldersPage {
    pub total: u64,
    pub limit: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    pub token_holders: Vec<TokenHolder>,
}

impl From<TokenHoldersPage> for Page<TokenHolder> {
    fn from(page: TokenHoldersPage) -> Self {
        Page {
            items: page.token_holders,
            total: page.total,
            limit: page.limit,
            cursor: page.cursor,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenHoldersOptions {
    /// Cursor from a previous page.
    pub cursor: Option<String>,
    /// Page size; the server defaults to 1000 and caps at
    /// [`MAX_TOKEN_HOLDERS_PAGE_SIZE`].
    pub limit: Option<u32>,
}

#[derive(Serialize)]
struct TokenHoldersRequest<'a> {
    mint: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    cursor: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
}

impl HeliusClient {
    /// Fetches one page of holders of `mint`.
    ///
    /// ```no_run
    /// # async fn example(client: helius::HeliusClient) -> helius::Result<()> {
    /// let ctx = helius::RequestContext::new();
    /// let page = client
    ///     .get_token_holders(&ctx, "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v", None)
    ///     .await?;
    /// println!("total holders: {}", page.total);
    /// # Ok(())
    /// # }
    /// ```
    #[tracing::instrument(skip(self, ctx, opts))]
    pub async fn get_token_holders(
        &self,
        ctx: &RequestContext,
        mint: &str,
        opts: Option<&TokenHoldersOptions>,
    ) -> Result<TokenHoldersPage> {
        require(!mint.is_empty(), "mint address is required", TOKEN_HOLDERS_PATH)?;

        let request = TokenHoldersRequest {
            mint,
            cursor: opts
                .and_then(|o| o.cursor.as_deref())
                .filter(|c| !c.is_empty()),
            limit: opts.and_then(|o| o.limit).filter(|l| *l > 0),
        };
        let page: TokenHoldersPage = self
            .inner
            .post(ctx, "get token holders", TOKEN_HOLDERS_PATH, &request)
            .await?;

        self.inner.logger.debug(
            "fetched token holders",
            &[
                ("mint", &mint),
                ("total", &page.total),
                ("returned", &page.token_holders.len()),
            ],
        );
        Ok(page)
    }

    /// Fetches every holder of `mint`, following cursors until the last page.
    ///
    /// The number of round-trips is unbounded, so this can be slow and
    /// memory-hungry for widely held tokens. Use [`Self::token_holder_pages`]
    /// or [`Self::get_token_holders`] to bound memory.
    #[tracing::instrument(skip(self, ctx))]
    pub async fn get_all_token_holders(
        &self,
        ctx: &RequestContext,
        mint: &str,
    ) -> Result<Vec<TokenHolder>> {
        require(!mint.is_empty(), "mint address is required", TOKEN_HOLDERS_PATH)?;

        let holders = collect_all(
            move |cursor| {
                let opts = TokenHoldersOptions {
                    cursor,
                    limit: Some(MAX_TOKEN_HOLDERS_PAGE_SIZE),
                };
                async move {
                    self.get_token_holders(ctx, mint, Some(&opts))
                        .await
                        .map(Page::from)
                }
            },
            EmptyPagePolicy::default(),
        )
        .await?;

        self.inner.logger.info(
            "fetched all token holders",
            &[("mint", &mint), ("total", &holders.len())],
        );
        Ok(holders)
    }

    /// Lazily yields pages of holders of `mint` at the maximum page size.
    ///
    /// The stream owns clones of the client and context, so it can outlive
    /// the borrow it was created from. It ends after the last page or after
    /// the first error.
    pub fn token_holder_pages(
        &self,
        ctx: &RequestContext,
        mint: String,
    ) -> impl Stream<Item = Result<Page<TokenHolder>>> + Send + use<> {
        let client = self.clone();
        let ctx = ctx.clone();

        page_stream(
            move |cursor| {
                let client = client.clone();
                let ctx = ctx.clone();
                let mint = mint.clone();
                async move {
                    let opts = TokenHoldersOptions {
                        cursor,
                        limit: Some(MAX_TOKEN_HOLDERS_PAGE_SIZE),
                    };
                    client
                        .get_token_holders(&ctx, &mint, Some(&opts))
                        .await
                        .map(Page::from)
                }
            },
            EmptyPagePolicy::default(),
        )
    }
}

/// Concentration figures for the first `top_n` holders of a list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TopHolderStats {
    pub total_holders: usize,
    pub top_holders: Vec<TokenHolder>,
    pub top_holders_balance: u64,
    /// Share of `total_supply` held by the top holders, 0 to 100.
    pub top_holders_percent: f64,
    /// Sum of all balances in the input, not the on-chain supply.
    pub total_supply: u64,
}

/// Computes holder concentration over `holders`, which must already be sorted
/// by balance, largest first. An empty input yields all-zero stats.
pub fn calculate_top_holder_stats(holders: &[TokenHolder], top_n: usize) -> TopHolderStats {
    if holders.is_empty() {
        return TopHolderStats::default();
    }

    let total_supply = sum_balances(holders);
    let top_holders = holders[..top_n.min(holders.len())].to_vec();
    let top_holders_balance = sum_balances(&top_holders);

    let top_holders_percent = if total_supply > 0 {
        top_holders_balance as f64 / total_supply as f64 * 100.0
    } else {
        0.0
    };

    TopHolderStats {
        total_holders: holders.len(),
        top_holders,
        top_holders_balance,
        top_holders_percent,
        total_supply,
    }
}

fn sum_balances(holders: &[TokenHolder]) -> u64 {
    holders
        .iter()
        .fold(0u64, |acc, h| acc.saturating_add(h.balance))
}
