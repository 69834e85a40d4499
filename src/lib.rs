//! Typed async client for the Helius Solana API.
//!
//! [`HeliusClient`] covers DAS asset lookups, webhook management, token
//! holder queries and priority fee estimates. Every call builds an
//! authenticated request, retries transient failures with exponential
//! backoff and classifies error statuses into [`ApiError`]s.
//!
//! ```no_run
//! use std::time::Duration;
//! use helius::{ClientConfig, HeliusClient, Network, RequestContext};
//!
//! # async fn example() -> helius::Result<()> {
//! let config = ClientConfig::builder("your-api-key")
//!     .network(Network::Devnet)
//!     .max_retries(5)
//!     .build()?;
//! let client = HeliusClient::with_config(config);
//!
//! let ctx = RequestContext::new().with_timeout(Duration::from_secs(30));
//! match client.get_asset(&ctx, "mint-address").await {
//!     Ok(asset) => println!("{}", asset.interface),
//!     Err(e) if e.api_error().is_some_and(|a| a.is_not_found()) => println!("no such asset"),
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod commands;
pub mod context;
pub mod error;
pub mod http;
pub mod logger;
pub mod webhook;

pub use api::das::{
    Asset, AssetContent, AssetFile, AssetsByOwnerOptions, AssetsPage, Authority, Compression,
    Grouping, NativeBalance, Ownership, Price, Royalty, SearchAssetsOptions, SortBy,
    SortDirection, SortField, Supply, TokenInfo,
};
pub use api::priority_fees::{
    PriorityFeeEstimate, PriorityFeeLevels, PriorityFeeOptions, PriorityLevel,
    TransactionEncoding, calculate_priority_fee,
};
pub use api::token_holders::{
    MAX_TOKEN_HOLDERS_PAGE_SIZE, TokenHolder, TokenHoldersOptions, TokenHoldersPage,
    TopHolderStats, calculate_top_holder_stats,
};
pub use api::webhooks::{
    CreateWebhookRequest, TransactionType, UpdateWebhookRequest, Webhook, WebhookType,
};
pub use client::paginate::{EmptyPagePolicy, Page};
pub use client::{ClientConfig, ClientConfigBuilder, HeliusClient, Network};
pub use context::RequestContext;
pub use error::{ApiError, CancelReason, Error, Result};
pub use logger::{LogLogger, Logger, NoopLogger};
