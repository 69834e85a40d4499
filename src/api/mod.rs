//! Endpoint methods on [`HeliusClient`](crate::HeliusClient), one module per
//! upstream capability.

pub mod das;
pub mod priority_fees;
pub mod token_holders;
pub mod webhooks;

#[cfg(test)]
pub(crate) mod testing {
    use mockito::Matcher;

    use crate::client::{ClientConfig, HeliusClient};

    pub const API_KEY: &str = "test-key";

    /// A client pointed at `server` that never retries.
    pub fn client_for(server: &mockito::ServerGuard) -> HeliusClient {
        HeliusClient::with_config(
            ClientConfig::builder(API_KEY)
                .api_url(server.url())
                .max_retries(0)
                .build()
                .unwrap(),
        )
    }

    pub fn api_key() -> Matcher {
        Matcher::UrlEncoded("api-key".into(), API_KEY.into())
    }
}
