use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A transaction delivered to a webhook endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebhookEvent {
    pub signature: String,
    pub slot: u64,
    /// Unix seconds.
    pub timestamp: i64,
    /// Transaction type, e.g. `SWAP`.
    #[serde(rename = "type")]
    pub transaction_type: String,
    /// Originating program or marketplace, e.g. `JUPITER`.
    pub source: String,
    /// Human-readable summary; enhanced webhooks only.
    pub description: String,
    /// Fee in lamports.
    pub fee: u64,
    pub fee_payer: String,
    pub account_data: Vec<AccountData>,
    pub native_transfers: Vec<NativeTransfer>,
    pub token_transfers: Vec<TokenTransfer>,
    pub instructions: Vec<serde_json::Value>,
    pub events: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountData {
    pub account: String,
    pub native_balance_change: i64,
    pub token_balance_changes: Vec<TokenBalanceChange>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenBalanceChange {
    pub mint: String,
    pub raw_token_amount: RawTokenAmount,
    pub token_account: String,
    pub user_account: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTokenAmount {
    pub decimals: u8,
    /// Signed integer amount as a string, unscaled.
    pub token_amount: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NativeTransfer {
    pub amount: u64,
    pub from_user_account: String,
    pub to_user_account: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenTransfer {
    pub from_token_account: String,
    pub from_user_account: String,
    pub mint: String,
    pub to_token_account: String,
    pub to_user_account: String,
    /// Amount scaled by the mint's decimals.
    pub token_amount: f64,
    pub token_standard: String,
}

/// Parses a payload holding a single event object.
pub fn parse_event(body: &[u8]) -> Result<WebhookEvent> {
    serde_json::from_slice(body).map_err(|source| Error::Decode {
        operation: "parse webhook event",
        source,
    })
}

/// Parses a payload holding an array of events. A single event object is
/// accepted too and returned as a one-element list.
pub fn parse_events(body: &[u8]) -> Result<Vec<WebhookEvent>> {
    if let Ok(events) = serde_json::from_slice::<Vec<WebhookEvent>>(body) {
        return Ok(events);
    }

    serde_json::from_slice::<WebhookEvent>(body)
        .map(|event| vec![event])
        .map_err(|source| Error::Decode {
            operation: "parse webhook events",
            source,
        })
}
