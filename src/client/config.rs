//! Client configuration.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{ApiError, Error, Result};
use crate::http::{HttpTransport, ReqwestTransport, RetryPolicy};
use crate::logger::{Logger, NoopLogger};

pub const DEFAULT_MAINNET_API_URL: &str = "https://api.helius.xyz/v0";
pub const DEFAULT_DEVNET_API_URL: &str = "https://api-devnet.helius.xyz/v0";
pub const DEFAULT_MAINNET_RPC_URL: &str = "https://mainnet.helius-rpc.com";
pub const DEFAULT_DEVNET_RPC_URL: &str = "https://devnet.helius-rpc.com";

/// Per-attempt HTTP timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Solana network served by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Network {
    #[default]
    Mainnet,
    Devnet,
}

impl Network {
    pub fn api_url(&self) -> &'static str {
        match self {
            Network::Mainnet => DEFAULT_MAINNET_API_URL,
            Network::Devnet => DEFAULT_DEVNET_API_URL,
        }
    }

    pub fn rpc_url(&self) -> &'static str {
        match self {
            Network::Mainnet => DEFAULT_MAINNET_RPC_URL,
            Network::Devnet => DEFAULT_DEVNET_RPC_URL,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Devnet => write!(f, "devnet"),
        }
    }
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "mainnet" | "mainnet-beta" => Ok(Network::Mainnet),
            "devnet" => Ok(Network::Devnet),
            _ => Err(Error::Config(format!(
                "unknown network: {}. Expected mainnet or devnet.",
                s
            ))),
        }
    }
}

/// Validated, immutable client configuration.
///
/// Build one with [`ClientConfig::builder`]:
///
/// ```
/// use std::time::Duration;
/// use helius::{ClientConfig, Network};
///
/// let config = ClientConfig::builder("my-api-key")
///     .network(Network::Devnet)
///     .timeout(Duration::from_secs(30))
///     .max_retries(5)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.api_url(), "https://api-devnet.helius.xyz/v0");
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    api_key: String,
    network: Network,
    api_url: String,
    rpc_url: String,
    timeout: Duration,
    retry: RetryPolicy,
    transport: Arc<dyn HttpTransport>,
    logger: Arc<dyn Logger>,
}

impl ClientConfig {
    pub fn builder(api_key: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder::new(api_key)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    pub(crate) fn transport(&self) -> Arc<dyn HttpTransport> {
        self.transport.clone()
    }

    pub(crate) fn logger(&self) -> Arc<dyn Logger> {
        self.logger.clone()
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("network", &self.network)
            .field("api_url", &self.api_url)
            .field("rpc_url", &self.rpc_url)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

/// Named construction-time options for [`ClientConfig`].
///
/// Explicit URLs always win over the defaults derived from the network.
pub struct ClientConfigBuilder {
    api_key: String,
    network: Network,
    api_url: Option<String>,
    rpc_url: Option<String>,
    timeout: Duration,
    retry: RetryPolicy,
    transport: Option<Arc<dyn HttpTransport>>,
    logger: Arc<dyn Logger>,
}

impl ClientConfigBuilder {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            network: Network::default(),
            api_url: None,
            rpc_url: None,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            transport: None,
            logger: Arc::new(NoopLogger),
        }
    }

    pub fn network(mut self, network: Network) -> Self {
        self.network = network;
        self
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    pub fn rpc_url(mut self, url: impl Into<String>) -> Self {
        self.rpc_url = Some(url.into());
        self
    }

    /// Upper bound for a whole call, retries and backoff included. The
    /// default transport also applies it to each attempt.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.retry.max_retries = max_retries;
        self
    }

    pub fn retry_wait_min(mut self, wait: Duration) -> Self {
        self.retry.min_backoff = wait;
        self
    }

    pub fn retry_wait_max(mut self, wait: Duration) -> Self {
        self.retry.max_backoff = wait;
        self
    }

    /// Also retry `status`, on top of 429 and 5xx.
    pub fn extra_retry_status(mut self, status: u16) -> Self {
        if !self.retry.extra_retry_statuses.contains(&status) {
            self.retry.extra_retry_statuses.push(status);
        }
        self
    }

    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use a pre-built reqwest client. Its own timeout settings apply.
    pub fn http_client(self, client: reqwest::Client) -> Self {
        self.transport(Arc::new(ReqwestTransport::new(client)))
    }

    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn build(self) -> Result<ClientConfig> {
        if self.api_key.is_empty() {
            return Err(Error::Validation(ApiError::bad_request(
                "API key is required",
                "client",
            )));
        }
        if self.timeout.is_zero() {
            return Err(Error::Config("timeout must be greater than zero".to_string()));
        }
        if self.retry.min_backoff > self.retry.max_backoff {
            return Err(Error::Config(format!(
                "retry wait min ({:?}) exceeds retry wait max ({:?})",
                self.retry.min_backoff, self.retry.max_backoff
            )));
        }

        let api_url = self
            .api_url
            .unwrap_or_else(|| self.network.api_url().to_string());
        let rpc_url = self
            .rpc_url
            .unwrap_or_else(|| self.network.rpc_url().to_string());
        for (name, url) in [("api url", &api_url), ("rpc url", &rpc_url)] {
            url::Url::parse(url)
                .map_err(|e| Error::Config(format!("invalid {}: {}: {}", name, url, e)))?;
        }

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(
                ReqwestTransport::with_timeout(self.timeout)
                    .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?,
            ),
        };

        Ok(ClientConfig {
            api_key: self.api_key,
            network: self.network,
            api_url: api_url.trim_end_matches('/').to_string(),
            rpc_url: rpc_url.trim_end_matches('/').to_string(),
            timeout: self.timeout,
            retry: self.retry,
            transport,
            logger: self.logger,
        })
    }
}
