//! Priority fee estimation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::client::{HeliusClient, require};
use crate::context::RequestContext;
use crate::error::{Error, Result};

const PRIORITY_FEE_PATH: &str = "/priority-fee";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PriorityLevel {
    Min,
    Low,
    /// The recommended level.
    #[default]
    Medium,
    High,
    VeryHigh,
    /// Highest fees; may overpay substantially.
    UnsafeMax,
}

impl PriorityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityLevel::Min => "Min",
            PriorityLevel::Low => "Low",
            PriorityLevel::Medium => "Medium",
            PriorityLevel::High => "High",
            PriorityLevel::VeryHigh => "VeryHigh",
            PriorityLevel::UnsafeMax => "UnsafeMax",
        }
    }
}

impl fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriorityLevel {
    type Err = Error;

    /// Case-insensitive; `-` and `_` are ignored, so `very-high` parses.
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "min" => Ok(PriorityLevel::Min),
            "low" => Ok(PriorityLevel::Low),
            "medium" => Ok(PriorityLevel::Medium),
            "high" => Ok(PriorityLevel::High),
            "veryhigh" => Ok(PriorityLevel::VeryHigh),
            "unsafemax" => Ok(PriorityLevel::UnsafeMax),
            _ => Err(Error::Config(format!("unknown priority level '{}'", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionEncoding {
    Base58,
    Base64,
}

/// Estimated fee in micro-lamports per compute unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PriorityFeeEstimate {
    pub priority_fee_estimate: f64,
    /// Present when all levels were requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_fee_levels: Option<PriorityFeeLevels>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PriorityFeeLevels {
    pub min: f64,
    pub low: f64,
    pub medium: f64,
    pub high: f64,
    pub very_high: f64,
    pub unsafe_max: f64,
}

/// Estimation options. Unset fields are left out of the request and an
/// all-default value omits the `options` object entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityFeeOptions {
    /// Only meaningful with a serialized transaction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_encoding: Option<TransactionEncoding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_level: Option<PriorityLevel>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub include_all_priority_fee_levels: bool,
    /// Slots of fee history to consider; the server defaults to 150.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookback_slots: Option<u32>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub include_vote: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub recommended: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub evaluate_empty_slot_as_zero: bool,
}

impl PriorityFeeOptions {
    fn is_unset(opts: &Option<&PriorityFeeOptions>) -> bool {
        opts.is_none_or(|o| *o == PriorityFeeOptions::default())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AccountsRequest<'a, S: AsRef<str>> {
    #[serde(serialize_with = "serialize_keys")]
    account_keys: &'a [S],
    #[serde(skip_serializing_if = "PriorityFeeOptions::is_unset")]
    options: Option<&'a PriorityFeeOptions>,
}

#[derive(Serialize)]
struct TransactionRequest<'a> {
    transaction: &'a str,
    #[serde(skip_serializing_if = "PriorityFeeOptions::is_unset")]
    options: Option<&'a PriorityFeeOptions>,
}

fn serialize_keys<S, K>(keys: &&[K], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
    K: AsRef<str>,
{
    serializer.collect_seq(keys.iter().map(AsRef::as_ref))
}

impl HeliusClient {
    /// Estimates the priority fee for a transaction touching `account_keys`.
    #[tracing::instrument(skip_all, fields(accounts = account_keys.len()))]
    pub async fn get_priority_fee_estimate<S: AsRef<str>>(
        &self,
        ctx: &RequestContext,
        account_keys: &[S],
        opts: Option<&PriorityFeeOptions>,
    ) -> Result<PriorityFeeEstimate> {
        require(
            !account_keys.is_empty(),
            "at least one account key is required",
            PRIORITY_FEE_PATH,
        )?;

        let request = AccountsRequest {
            account_keys,
            options: opts,
        };
        let estimate: PriorityFeeEstimate = self
            .inner
            .post(ctx, "get priority fee estimate", PRIORITY_FEE_PATH, &request)
            .await?;

        self.inner.logger.debug(
            "got priority fee estimate",
            &[
                ("fee", &estimate.priority_fee_estimate),
                ("accounts", &account_keys.len()),
            ],
        );
        Ok(estimate)
    }

    /// Estimates the priority fee for a serialized transaction.
    #[tracing::instrument(skip_all)]
    pub async fn get_priority_fee_estimate_for_transaction(
        &self,
        ctx: &RequestContext,
        transaction: &str,
        opts: Option<&PriorityFeeOptions>,
    ) -> Result<PriorityFeeEstimate> {
        require(!transaction.is_empty(), "transaction is required", PRIORITY_FEE_PATH)?;

        let request = TransactionRequest {
            transaction,
            options: opts,
        };
        let estimate: PriorityFeeEstimate = self
            .inner
            .post(
                ctx,
                "get priority fee estimate for transaction",
                PRIORITY_FEE_PATH,
                &request,
            )
            .await?;

        self.inner.logger.debug(
            "got priority fee estimate for transaction",
            &[("fee", &estimate.priority_fee_estimate)],
        );
        Ok(estimate)
    }
}

/// Total priority fee in lamports: `compute_units * micro_lamports_per_cu /
/// 1_000_000`, rounded down.
///
/// ```
/// assert_eq!(helius::calculate_priority_fee(200_000, 50_000.0), 10_000);
/// ```
pub fn calculate_priority_fee(compute_units: u64, micro_lamports_per_cu: f64) -> u64 {
    (compute_units as f64 * micro_lamports_per_cu / 1_000_000.0) as u64
}
