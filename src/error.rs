//! Error types for the current-prices SDK

use thiserror::Error;

/// Errors raised while talking to the exchange
#[derive(Debug, Error)]
pub enum RequestError {
    /// Network request failed
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Exchange answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Rate limit exceeded (HTTP 429 or 418)
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Body was not valid JSON
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Signed endpoints are not supported
    #[error("Private endpoint not supported: {0}")]
    PrivateEndpoint(String),
}

/// Errors raised by [`crate::CurrentPrices::run`] and its parts
#[derive(Debug, Error)]
pub enum PriceError {
    /// The fetch lock stayed busy for every attempt
    #[error("Lock still held after {attempts} attempts")]
    Locked { attempts: u32 },

    /// Upstream request failed
    #[error("Request failed: {0}")]
    Request(#[from] RequestError),

    /// Payload was not a list of tickers
    #[error("Invalid ticker payload: {0}")]
    InvalidTickers(String),

    /// A ticker carried a price that is not a finite number
    #[error("Malformed price {price:?} for {symbol}")]
    MalformedPrice { symbol: String, price: String },

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PriceError {
    /// Creates a MalformedPrice error
    pub fn malformed_price(symbol: &str, price: &str) -> Self {
        Self::MalformedPrice {
            symbol: symbol.to_string(),
            price: price.to_string(),
        }
    }

    /// Creates a Config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True when the failure came from the exchange rather than local data
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Request(_))
    }
}
