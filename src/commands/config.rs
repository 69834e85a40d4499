use anyhow::{Context, Result};
use log::debug;
use std::sync::Arc;
use std::time::Duration;

use crate::client::{ClientConfig, HeliusClient, Network};
use crate::logger::LogLogger;

/// Connection settings gathered from the command line and environment.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub api_key: Option<String>,
    pub network: Network,
    pub api_url: Option<String>,
    pub rpc_url: Option<String>,
    pub timeout: Option<Duration>,
    pub max_retries: Option<u32>,
}

impl Config {
    /// Builds a client that logs through the `log` facade.
    pub fn client(&self) -> Result<HeliusClient> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .context("API key is required: pass --api-key or set HELIUS_API_KEY")?;

        if api_key.len() > 8 && api_key.is_ascii() {
            debug!(
                "Using API key {}*********{}",
                &api_key[..4],
                &api_key[api_key.len() - 4..]
            );
        }

        let mut builder = ClientConfig::builder(api_key)
            .network(self.network)
            .logger(Arc::new(LogLogger));

        if let Some(url) = &self.api_url {
            builder = builder.api_url(url.clone());
        }
        if let Some(url) = &self.rpc_url {
            builder = builder.rpc_url(url.clone());
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(max_retries) = self.max_retries {
            builder = builder.max_retries(max_retries);
        }

        let config = builder.build().context("Invalid client configuration")?;
        Ok(HeliusClient::with_config(config))
    }
}
