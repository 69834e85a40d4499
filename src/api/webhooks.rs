//! Webhook management.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::client::{HeliusClient, require};
use crate::context::RequestContext;
use crate::error::Result;

const WEBHOOKS_PATH: &str = "/webhooks";

/// Payload format delivered to a webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebhookType {
    /// Parsed, human-readable transactions.
    #[default]
    Enhanced,
    Raw,
    /// Formatted messages for a Discord channel.
    Discord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Any,
    Swap,
    Transfer,
    NftSale,
    NftListing,
    NftMint,
    NftBid,
    NftCancelListing,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransactionType::Any => "ANY",
            TransactionType::Swap => "SWAP",
            TransactionType::Transfer => "TRANSFER",
            TransactionType::NftSale => "NFT_SALE",
            TransactionType::NftListing => "NFT_LISTING",
            TransactionType::NftMint => "NFT_MINT",
            TransactionType::NftBid => "NFT_BID",
            TransactionType::NftCancelListing => "NFT_CANCEL_LISTING",
        };
        f.write_str(s)
    }
}

/// A registered webhook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Webhook {
    #[serde(rename = "webhookID")]
    pub webhook_id: String,
    /// Wallet that created the webhook.
    pub wallet: String,
    #[serde(rename = "webhookURL")]
    pub webhook_url: String,
    #[serde(rename = "transactionTypes")]
    pub transaction_types: Vec<TransactionType>,
    #[serde(rename = "accountAddresses")]
    pub account_addresses: Vec<String>,
    #[serde(rename = "webhookType")]
    pub webhook_type: WebhookType,
    #[serde(rename = "authHeader", skip_serializing_if = "Option::is_none")]
    pub auth_header: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateWebhookRequest {
    #[serde(rename = "webhookURL")]
    pub webhook_url: String,
    #[serde(rename = "transactionTypes")]
    pub transaction_types: Vec<TransactionType>,
    /// Addresses to watch, at most 10,000.
    #[serde(rename = "accountAddresses")]
    pub account_addresses: Vec<String>,
    /// Defaults to [`WebhookType::Enhanced`] when unset.
    #[serde(rename = "webhookType", skip_serializing_if = "Option::is_none")]
    pub webhook_type: Option<WebhookType>,
    #[serde(rename = "authHeader", skip_serializing_if = "Option::is_none")]
    pub auth_header: Option<String>,
}

/// Partial update. Unset fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateWebhookRequest {
    #[serde(rename = "webhookURL", skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(rename = "transactionTypes", skip_serializing_if = "Option::is_none")]
    pub transaction_types: Option<Vec<TransactionType>>,
    #[serde(rename = "accountAddresses", skip_serializing_if = "Option::is_none")]
    pub account_addresses: Option<Vec<String>>,
    #[serde(rename = "webhookType", skip_serializing_if = "Option::is_none")]
    pub webhook_type: Option<WebhookType>,
    #[serde(rename = "authHeader", skip_serializing_if = "Option::is_none")]
    pub auth_header: Option<String>,
}

fn webhook_path(webhook_id: &str) -> String {
    format!("{}/{}", WEBHOOKS_PATH, webhook_id)
}

impl HeliusClient {
    #[tracing::instrument(skip_all, fields(url = %request.webhook_url))]
    pub async fn create_webhook(
        &self,
        ctx: &RequestContext,
        request: &CreateWebhookRequest,
    ) -> Result<Webhook> {
        require(!request.webhook_url.is_empty(), "webhookURL is required", WEBHOOKS_PATH)?;
        require(
            !request.transaction_types.is_empty(),
            "at least one transactionType is required",
            WEBHOOKS_PATH,
        )?;
        require(
            !request.account_addresses.is_empty(),
            "at least one accountAddress is required",
            WEBHOOKS_PATH,
        )?;

        let mut request = request.clone();
        request.webhook_type.get_or_insert_default();

        let webhook: Webhook = self
            .inner
            .post(ctx, "create webhook", WEBHOOKS_PATH, &request)
            .await?;

        self.inner.logger.info(
            "created webhook",
            &[
                ("webhookID", &webhook.webhook_id),
                ("url", &webhook.webhook_url),
                ("addresses", &webhook.account_addresses.len()),
            ],
        );
        Ok(webhook)
    }

    #[tracing::instrument(skip(self, ctx))]
    pub async fn get_webhook(&self, ctx: &RequestContext, webhook_id: &str) -> Result<Webhook> {
        require(!webhook_id.is_empty(), "webhookID is required", WEBHOOKS_PATH)?;

        self.inner
            .get(ctx, "get webhook", &webhook_path(webhook_id))
            .await
    }

    /// Lists every webhook on the account.
    #[tracing::instrument(skip_all)]
    pub async fn list_webhooks(&self, ctx: &RequestContext) -> Result<Vec<Webhook>> {
        let webhooks: Vec<Webhook> = self.inner.get(ctx, "list webhooks", WEBHOOKS_PATH).await?;

        self.inner
            .logger
            .debug("listed webhooks", &[("count", &webhooks.len())]);
        Ok(webhooks)
    }

    #[tracing::instrument(skip(self, ctx, request))]
    pub async fn update_webhook(
        &self,
        ctx: &RequestContext,
        webhook_id: &str,
        request: &UpdateWebhookRequest,
    ) -> Result<Webhook> {
        require(!webhook_id.is_empty(), "webhookID is required", WEBHOOKS_PATH)?;

        let webhook: Webhook = self
            .inner
            .put(ctx, "update webhook", &webhook_path(webhook_id), request)
            .await?;

        self.inner
            .logger
            .info("updated webhook", &[("webhookID", &webhook_id)]);
        Ok(webhook)
    }

    #[tracing::instrument(skip(self, ctx))]
    pub async fn delete_webhook(&self, ctx: &RequestContext, webhook_id: &str) -> Result<()> {
        require(!webhook_id.is_empty(), "webhookID is required", WEBHOOKS_PATH)?;

        self.inner
            .delete(ctx, "delete webhook", &webhook_path(webhook_id))
            .await?;

        self.inner
            .logger
            .info("deleted webhook", &[("webhookID", &webhook_id)]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{api_key, client_for};
    use mockito::Matcher;
    use serde_json::json;

    const WEBHOOK_BODY: &str = r#"{
        "webhookID": "wh-1",
        "wallet": "wallet1",
        "webhookURL": "https://example.com/hook",
        "transactionTypes": ["SWAP", "NFT_SALE"],
        "accountAddresses": ["addr1"],
        "webhookType": "enhanced"
    }"#;

    fn create_request() -> CreateWebhookRequest {
        CreateWebhookRequest {
            webhook_url: "https://example.com/hook".into(),
            transaction_types: vec![TransactionType::Swap, TransactionType::NftSale],
            account_addresses: vec!["addr1".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_transaction_type_wire_names() {
        assert_eq!(
            serde_json::to_value(TransactionType::NftCancelListing).unwrap(),
            json!("NFT_CANCEL_LISTING")
        );
        assert_eq!(TransactionType::NftCancelListing.to_string(), "NFT_CANCEL_LISTING");
        assert_eq!(serde_json::to_value(WebhookType::Discord).unwrap(), json!("discord"));
    }

    #[tokio::test]
    async fn test_create_webhook_defaults_to_enhanced() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/webhooks")
            .match_query(api_key())
            .match_body(Matcher::Json(json!({
                "webhookURL": "https://example.com/hook",
                "transactionTypes": ["SWAP", "NFT_SALE"],
                "accountAddresses": ["addr1"],
                "webhookType": "enhanced"
            })))
            .with_status(200)
            .with_body(WEBHOOK_BODY)
            .create_async()
            .await;

        let client = client_for(&server);
        let webhook = client
            .create_webhook(&RequestContext::new(), &create_request())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(webhook.webhook_id, "wh-1");
        assert_eq!(webhook.webhook_type, WebhookType::Enhanced);
        assert_eq!(
            webhook.transaction_types,
            vec![TransactionType::Swap, TransactionType::NftSale]
        );
        assert!(webhook.auth_header.is_none());
    }

    #[tokio::test]
    async fn test_create_webhook_validation() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("POST", Matcher::Any).expect(0).create_async().await;
        let client = client_for(&server);
        let ctx = RequestContext::new();

        let cases = [
            (
                CreateWebhookRequest {
                    webhook_url: String::new(),
                    ..create_request()
                },
                "webhookURL is required",
            ),
            (
                CreateWebhookRequest {
                    transaction_types: vec![],
                    ..create_request()
                },
                "at least one transactionType is required",
            ),
            (
                CreateWebhookRequest {
                    account_addresses: vec![],
                    ..create_request()
                },
                "at least one accountAddress is required",
            ),
        ];

        for (request, message) in cases {
            let err = client.create_webhook(&ctx, &request).await.unwrap_err();
            let api_err = err.api_error().unwrap();
            assert_eq!(api_err.status_code, 400);
            assert_eq!(api_err.message, message);
            assert_eq!(api_err.path, "/webhooks");
        }

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_webhook() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/webhooks/wh-1")
            .match_query(api_key())
            .with_status(200)
            .with_body(WEBHOOK_BODY)
            .create_async()
            .await;

        let client = client_for(&server);
        let webhook = client
            .get_webhook(&RequestContext::new(), "wh-1")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(webhook.wallet, "wallet1");
    }

    #[tokio::test]
    async fn test_list_webhooks() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/webhooks")
            .match_query(api_key())
            .with_status(200)
            .with_body(format!("[{}, {}]", WEBHOOK_BODY, WEBHOOK_BODY))
            .create_async()
            .await;

        let client = client_for(&server);
        let webhooks = client.list_webhooks(&RequestContext::new()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(webhooks.len(), 2);
    }

    #[tokio::test]
    async fn test_update_webhook_sends_only_changed_fields() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/webhooks/wh-1")
            .match_query(api_key())
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"accountAddresses": ["addr1", "addr2"]})))
            .with_status(200)
            .with_body(WEBHOOK_BODY)
            .create_async()
            .await;

        let request = UpdateWebhookRequest {
            account_addresses: Some(vec!["addr1".into(), "addr2".into()]),
            ..Default::default()
        };

        let client = client_for(&server);
        client
            .update_webhook(&RequestContext::new(), "wh-1", &request)
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_webhook() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/webhooks/wh-1")
            .match_query(api_key())
            .with_status(200)
            .create_async()
            .await;

        let client = client_for(&server);
        client
            .delete_webhook(&RequestContext::new(), "wh-1")
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_webhook_id_required() {
        let server = mockito::Server::new_async().await;
        let client = client_for(&server);
        let ctx = RequestContext::new();

        let errors = [
            client.get_webhook(&ctx, "").await.unwrap_err(),
            client
                .update_webhook(&ctx, "", &UpdateWebhookRequest::default())
                .await
                .unwrap_err(),
            client.delete_webhook(&ctx, "").await.unwrap_err(),
        ];

        for err in errors {
            assert!(err.is_validation());
            assert_eq!(err.api_error().unwrap().message, "webhookID is required");
        }
    }

    #[tokio::test]
    async fn test_delete_webhook_server_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/webhooks/wh-1")
            .with_status(401)
            .with_body("invalid api key")
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client
            .delete_webhook(&RequestContext::new(), "wh-1")
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert!(err.api_error().unwrap().is_unauthorized());
    }
}
