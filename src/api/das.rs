//! Digital Asset Standard (DAS) lookups.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::client::{HeliusClient, require};
use crate::context::RequestContext;
use crate::error::Result;

const ASSETS_PATH: &str = "/assets";
const SEARCH_PATH: &str = "/assets/search";
const BATCH_PATH: &str = "/assets/batch";

/// A digital asset (NFT or token).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Asset {
    /// Mint address.
    pub id: String,
    /// Asset kind, e.g. `V1_NFT` or `FungibleToken`.
    pub interface: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<AssetContent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub authorities: Vec<Authority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression: Option<Compression>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub grouping: Vec<Grouping>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub royalty: Option<Royalty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ownership: Option<Ownership>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supply: Option<Supply>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_info: Option<TokenInfo>,
    pub mutable: bool,
    pub burnt: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetContent {
    #[serde(rename = "$schema", skip_serializing_if = "String::is_empty")]
    pub schema: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub json_uri: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<AssetFile>,
    #[serde(skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, serde_json::Value>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub links: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetFile {
    pub uri: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mime: String,
    pub cdn: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Authority {
    pub address: String,
    pub scopes: Vec<String>,
}

/// Compression details for compressed NFTs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Compression {
    pub eligible: bool,
    pub compressed: bool,
    pub data_hash: String,
    pub creator_hash: String,
    pub asset_hash: String,
    pub tree: String,
    pub seq: u64,
    pub leaf_id: u64,
}

/// Collection membership.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Grouping {
    pub group_key: String,
    pub group_value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Royalty {
    pub royalty_model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub percent: f64,
    pub basis_points: u32,
    pub primary_sale_happened: bool,
    pub locked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ownership {
    pub frozen: bool,
    pub delegated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delegate: Option<String>,
    pub ownership_model: String,
    pub owner: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Supply {
    pub print_max_supply: u64,
    pub print_current_supply: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edition_nonce: Option<u64>,
}

/// Fungible token details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    pub balance: u64,
    pub supply: u64,
    pub decimals: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_program: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub associated_token_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_info: Option<Price>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Price {
    pub price_per_token: f64,
    pub total_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// One page of assets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsPage {
    pub total: u64,
    pub limit: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    pub items: Vec<Asset>,
    #[serde(rename = "nativeBalance", skip_serializing_if = "Option::is_none")]
    pub native_balance: Option<NativeBalance>,
}

/// Native SOL balance, returned when requested with `show_native_balance`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NativeBalance {
    pub lamports: u64,
    pub price_per_sol: f64,
    pub total_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Created,
    Updated,
    RecentAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortBy {
    pub sort_by: SortField,
    pub sort_direction: SortDirection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetsByOwnerOptions {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
    pub before: Option<String>,
    pub after: Option<String>,
    pub show_fungible: bool,
    pub show_native_balance: bool,
    pub show_unverified_collections: bool,
    pub show_collection_metadata: bool,
    pub show_grand_total: bool,
    pub show_zero_balance: bool,
    pub sort_by: Option<SortBy>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AssetsByOwnerRequest<'a> {
    owner_address: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cursor: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    before: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    after: Option<&'a str>,
    #[serde(skip_serializing_if = "DisplayOptions::is_empty")]
    display_options: DisplayOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort_by: Option<SortBy>,
}

#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct DisplayOptions {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    show_fungible: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    show_native_balance: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    show_unverified_collections: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    show_collection_metadata: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    show_grand_total: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    show_zero_balance: bool,
}

impl DisplayOptions {
    fn is_empty(&self) -> bool {
        !(self.show_fungible
            || self.show_native_balance
            || self.show_unverified_collections
            || self.show_collection_metadata
            || self.show_grand_total
            || self.show_zero_balance)
    }
}

impl<'a> AssetsByOwnerRequest<'a> {
    fn new(owner_address: &'a str, opts: Option<&'a AssetsByOwnerOptions>) -> Self {
        let Some(opts) = opts else {
            return Self {
                owner_address,
                page: None,
                limit: None,
                cursor: None,
                before: None,
                after: None,
                display_options: DisplayOptions::default(),
                sort_by: None,
            };
        };

        Self {
            owner_address,
            page: opts.page.filter(|p| *p > 0),
            limit: opts.limit.filter(|l| *l > 0),
            cursor: non_empty(&opts.cursor),
            before: non_empty(&opts.before),
            after: non_empty(&opts.after),
            display_options: DisplayOptions {
                show_fungible: opts.show_fungible,
                show_native_balance: opts.show_native_balance,
                show_unverified_collections: opts.show_unverified_collections,
                show_collection_metadata: opts.show_collection_metadata,
                show_grand_total: opts.show_grand_total,
                show_zero_balance: opts.show_zero_balance,
            },
            sort_by: opts.sort_by,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Search criteria. Unset fields are left out of the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchAssetsOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authority_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delegate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frozen: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compressed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub burnt: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortBy>,
}

#[derive(Serialize)]
struct IdRequest<'a> {
    id: &'a str,
}

#[derive(Serialize)]
struct BatchRequest<'a> {
    ids: Vec<&'a str>,
}

impl HeliusClient {
    /// Fetches one asset by its mint address.
    #[tracing::instrument(skip(self, ctx))]
    pub async fn get_asset(&self, ctx: &RequestContext, id: &str) -> Result<Asset> {
        require(!id.is_empty(), "asset ID is required", ASSETS_PATH)?;

        let asset: Asset = self
            .inner
            .post(ctx, "get asset", ASSETS_PATH, &IdRequest { id })
            .await?;

        self.inner.logger.debug(
            "fetched asset",
            &[("id", &id), ("interface", &asset.interface)],
        );
        Ok(asset)
    }

    /// Fetches one page of the assets held by `owner_address`.
    #[tracing::instrument(skip(self, ctx, opts))]
    pub async fn get_assets_by_owner(
        &self,
        ctx: &RequestContext,
        owner_address: &str,
        opts: Option<&AssetsByOwnerOptions>,
    ) -> Result<AssetsPage> {
        require(!owner_address.is_empty(), "owner address is required", ASSETS_PATH)?;

        let request = AssetsByOwnerRequest::new(owner_address, opts);
        let page: AssetsPage = self
            .inner
            .post(ctx, "get assets by owner", ASSETS_PATH, &request)
            .await?;

        self.inner.logger.debug(
            "fetched assets by owner",
            &[
                ("owner", &owner_address),
                ("total", &page.total),
                ("returned", &page.items.len()),
            ],
        );
        Ok(page)
    }

    #[tracing::instrument(skip_all)]
    pub async fn search_assets(
        &self,
        ctx: &RequestContext,
        opts: &SearchAssetsOptions,
    ) -> Result<AssetsPage> {
        let page: AssetsPage = self
            .inner
            .post(ctx, "search assets", SEARCH_PATH, opts)
            .await?;

        self.inner.logger.debug(
            "searched assets",
            &[("total", &page.total), ("returned", &page.items.len())],
        );
        Ok(page)
    }

    /// Fetches several assets in one call. An empty `ids` returns an empty
    /// list without contacting the server.
    #[tracing::instrument(skip_all, fields(requested = ids.len()))]
    pub async fn get_asset_batch<S: AsRef<str>>(
        &self,
        ctx: &RequestContext,
        ids: &[S],
    ) -> Result<Vec<Asset>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let request = BatchRequest {
            ids: ids.iter().map(AsRef::as_ref).collect(),
        };
        let assets: Vec<Asset> = self
            .inner
            .post(ctx, "get asset batch", BATCH_PATH, &request)
            .await?;

        self.inner.logger.debug(
            "fetched asset batch",
            &[("requested", &ids.len()), ("returned", &assets.len())],
        );
        Ok(assets)
    }
}
