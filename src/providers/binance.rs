//! Binance public REST transport

use crate::{
    constants::{BINANCE_API_URL, BINANCE_API_URL_ENV, REQUEST_TIMEOUT_SECS, USER_AGENT},
    error::RequestError,
    provider::ExchangeTransport,
    types::ApiRequest,
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Binance REST transport for public endpoints
pub struct BinanceProvider {
    client: Client,
    base_url: String,
}

impl BinanceProvider {
    /// Creates a provider against the default host, or `BINANCE_API_URL` if set
    pub fn new() -> Result<Self, RequestError> {
        let base_url =
            std::env::var(BINANCE_API_URL_ENV).unwrap_or_else(|_| BINANCE_API_URL.to_string());
        Self::with_base_url(base_url)
    }

    /// Creates a provider against a custom host
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, RequestError> {
        let client = Self::client_builder()
            .build()
            .map_err(RequestError::NetworkError)?;
        Ok(Self::with_client(base_url, client))
    }

    /// Creates a provider from a prebuilt reqwest client
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Client builder with the SDK's timeout and user agent
    pub fn client_builder() -> reqwest::ClientBuilder {
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
    }

    /// Builds the full URL for a request
    fn build_url(&self, request: &ApiRequest) -> String {
        let mut url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            request.path.trim_start_matches('/')
        );
        if !request.query.is_empty() {
            url.push('?');
            url.push_str(&request.query);
        }
        url
    }
}

#[async_trait]
impl ExchangeTransport for BinanceProvider {
    async fn send(&self, request: &ApiRequest) -> Result<Value, RequestError> {
        if !request.public {
            return Err(RequestError::PrivateEndpoint(request.path.clone()));
        }

        let url = self.build_url(request);
        tracing::debug!(method = %request.method, url = %url, "Calling Binance");

        let mut builder = self.client.request(request.method.into(), &url);
        if !request.body.is_empty() {
            builder = builder.body(request.body.clone());
        }

        let response = builder.send().await.map_err(RequestError::NetworkError)?;

        // 418 is Binance's IP ban after ignoring 429s
        let status = response.status().as_u16();
        if status == 429 || status == 418 {
            return Err(RequestError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            return Err(RequestError::Status {
                status,
                body: response.text().await.unwrap_or_default(),
            });
        }

        let response_text = response.text().await.map_err(RequestError::NetworkError)?;

        serde_json::from_str(&response_text).map_err(|e| {
            RequestError::InvalidResponse(format!(
                "Failed to parse Binance response: {}. Response: {}",
                e, response_text
            ))
        })
    }

    fn provider_name(&self) -> &'static str {
        "binance"
    }
}
