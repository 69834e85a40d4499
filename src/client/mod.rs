//! The Helius client facade.
//!
//! [`HeliusClient`] combines the request builder, the retrying transport and
//! the response classifier. Endpoint methods live in [`crate::api`]; this
//! module only holds the plumbing they share.

mod config;
pub mod paginate;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::context::RequestContext;
use crate::error::{ApiError, Error, Result};
use crate::http::{API_KEY_PARAM, Request, RequestBuilder, Transport, classify};
use crate::logger::Logger;

pub use config::{
    ClientConfig, ClientConfigBuilder, DEFAULT_DEVNET_API_URL, DEFAULT_DEVNET_RPC_URL,
    DEFAULT_MAINNET_API_URL, DEFAULT_MAINNET_RPC_URL, DEFAULT_TIMEOUT, Network,
};

/// Client for the Helius REST API.
///
/// Cloning is cheap and clones share the connection pool. All methods take
/// `&self`, so one client can serve concurrent tasks.
///
/// ```no_run
/// use helius::{HeliusClient, RequestContext};
///
/// # async fn example() -> helius::Result<()> {
/// let client = HeliusClient::new("your-api-key")?;
/// let ctx = RequestContext::new();
///
/// let page = client.get_assets_by_owner(&ctx, "wallet-address", None).await?;
/// println!("found {} assets", page.total);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HeliusClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) config: ClientConfig,
    pub(crate) transport: Transport,
    pub(crate) logger: Arc<dyn Logger>,
}

impl HeliusClient {
    /// Creates a client with default settings on mainnet.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self::with_config(ClientConfig::builder(api_key).build()?))
    }

    pub fn with_config(config: ClientConfig) -> Self {
        let logger = config.logger();
        let transport = Transport::new(config.transport(), config.retry().clone(), logger.clone());
        Self {
            inner: Arc::new(ClientInner {
                config,
                transport,
                logger,
            }),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Connection string for a Solana JSON-RPC client:
    /// `<rpc url>/?api-key=<key>`.
    pub fn rpc_url(&self) -> String {
        let key: String =
            url::form_urlencoded::byte_serialize(self.inner.config.api_key().as_bytes()).collect();
        format!("{}/?{}={}", self.inner.config.rpc_url(), API_KEY_PARAM, key)
    }
}

impl std::fmt::Debug for HeliusClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeliusClient")
            .field("config", &self.inner.config)
            .finish()
    }
}

/// Fails with a local 400 when `ok` is false. No request is sent.
pub(crate) fn require(ok: bool, message: &str, path: &str) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(Error::Validation(ApiError::bad_request(message, path)))
    }
}

impl ClientInner {
    fn requests(&self) -> RequestBuilder<'_> {
        RequestBuilder::new(self.config.api_url(), self.config.api_key())
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        operation: &'static str,
        path: &str,
    ) -> Result<T> {
        let request = self.requests().get(operation, path)?;
        let body = self.execute(ctx, &request).await?;
        decode(operation, &body)
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        ctx: &RequestContext,
        operation: &'static str,
        path: &str,
        payload: &B,
    ) -> Result<T> {
        let request = self.requests().post(operation, path, payload)?;
        let body = self.execute(ctx, &request).await?;
        decode(operation, &body)
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        ctx: &RequestContext,
        operation: &'static str,
        path: &str,
        payload: &B,
    ) -> Result<T> {
        let request = self.requests().put(operation, path, payload)?;
        let body = self.execute(ctx, &request).await?;
        decode(operation, &body)
    }

    /// DELETE, ignoring any response body.
    pub(crate) async fn delete(
        &self,
        ctx: &RequestContext,
        operation: &'static str,
        path: &str,
    ) -> Result<()> {
        let request = self.requests().delete(operation, path)?;
        self.execute(ctx, &request).await?;
        Ok(())
    }

    /// Sends `request` and returns the body of a successful response.
    ///
    /// The configured timeout bounds the whole call, retries and backoff
    /// included. A caller deadline that comes first still wins.
    async fn execute(&self, ctx: &RequestContext, request: &Request) -> Result<Vec<u8>> {
        let ctx = ctx.clone().with_timeout(self.config.timeout());
        let exchange = self.transport.send(&ctx, request).await?;
        let status = exchange.response.status;

        classify::classify(exchange.response, &request.path).map_err(|e| {
            self.logger.error(
                "api error",
                &[
                    ("status", &status),
                    ("path", &request.path),
                    ("attempts", &exchange.attempts),
                    ("body", &e.message),
                ],
            );
            Error::Upstream(e)
        })
    }
}

fn decode<T: DeserializeOwned>(operation: &'static str, body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|source| Error::Decode { operation, source })
}
