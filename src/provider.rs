//! Transport abstraction for calling the exchange REST API

use crate::{error::RequestError, types::ApiRequest};
use async_trait::async_trait;
use serde_json::Value;

/// Trait for exchange transports
///
/// Implementations perform one HTTP round trip and return the decoded JSON body.
/// Caching and locking happen above this layer.
#[async_trait]
pub trait ExchangeTransport: Send + Sync {
    /// Sends `request` and returns the JSON body of a 2xx response
    ///
    /// # Arguments
    /// * `request` - Method, path, query, body and visibility of the call
    ///
    /// # Returns
    /// The decoded body, or an error for network failures, non-2xx statuses and
    /// bodies that are not JSON
    async fn send(&self, request: &ApiRequest) -> Result<Value, RequestError>;

    /// Returns the name of this transport
    fn provider_name(&self) -> &'static str;
}
