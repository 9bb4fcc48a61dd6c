//! Cache-aware request layer
//!
//! Serves a response from the [`ResponseCache`] while it is fresh and only calls
//! the exchange on a miss, so each distinct request reaches the exchange at
//! most once per TTL window.

use crate::{
    cache::{CacheKey, ResponseCache},
    error::RequestError,
    metrics::{MetricsCollector, RequestMetrics},
    provider::ExchangeTransport,
    types::ApiRequest,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Request layer combining a transport with a shared response cache
#[derive(Clone)]
pub struct CachedRequester {
    transport: Arc<dyn ExchangeTransport>,
    cache: Arc<ResponseCache>,
    metrics: Arc<MetricsCollector>,
}

impl CachedRequester {
    /// Creates a requester with a fresh, empty cache
    pub fn new(transport: Arc<dyn ExchangeTransport>) -> Self {
        Self::with_cache(transport, Arc::new(ResponseCache::new()))
    }

    /// Creates a requester sharing an existing cache
    pub fn with_cache(transport: Arc<dyn ExchangeTransport>, cache: Arc<ResponseCache>) -> Self {
        let metrics = Arc::new(MetricsCollector::new(transport.provider_name()));
        Self {
            transport,
            cache,
            metrics,
        }
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    pub fn provider_name(&self) -> &'static str {
        self.transport.provider_name()
    }

    pub async fn metrics(&self) -> RequestMetrics {
        self.metrics.get_metrics().await
    }

    /// Returns the response for `request`, from cache when fresh
    ///
    /// # Arguments
    /// * `ttl_secs` - Lifetime of a stored response; zero or negative skips the
    ///   cache entirely
    /// * `request` - The call to make
    ///
    /// # Returns
    /// The shared payload. Callers within the same TTL window get the same `Arc`.
    /// Failed calls are never cached.
    pub async fn fetch_with_cache(
        &self,
        ttl_secs: i64,
        request: &ApiRequest,
    ) -> Result<Arc<Value>, RequestError> {
        let key = CacheKey::for_request(request);

        if ttl_secs > 0 {
            if let Some(payload) = self.cache.get(&key).await {
                tracing::debug!(key = %key, "Cache hit");
                self.metrics.record_cache_hit().await;
                return Ok(payload);
            }
        }

        tracing::debug!(key = %key, ttl_secs = ttl_secs, "Cache miss, calling exchange");
        self.metrics.record_cache_miss().await;

        let start = Instant::now();
        let payload = match self.transport.send(request).await {
            Ok(value) => Arc::new(value),
            Err(e) => {
                self.metrics.record_upstream(start.elapsed(), false).await;
                tracing::warn!(
                    provider = self.transport.provider_name(),
                    key = %key,
                    error = %e,
                    "Exchange request failed"
                );
                return Err(e);
            }
        };
        self.metrics.record_upstream(start.elapsed(), true).await;

        if ttl_secs > 0 {
            self.cache
                .insert(key, payload.clone(), Duration::from_secs(ttl_secs as u64))
                .await;
        }

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock::MockTransport;
    use tokio::time::advance;

    fn requester() -> (Arc<MockTransport>, CachedRequester) {
        let transport = Arc::new(MockTransport::new());
        transport.set_tickers(&[("BTCUSDT", "100.5")]);
        let requester = CachedRequester::new(transport.clone());
        (transport, requester)
    }

    #[tokio::test(start_paused = true)]
    async fn test_calls_within_ttl_share_one_fetch() {
        let (transport, requester) = requester();
        let request = ApiRequest::ticker_prices();

        let first = requester.fetch_with_cache(120, &request).await.unwrap();
        advance(Duration::from_secs(60)).await;
        let second = requester.fetch_with_cache(120, &request).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(transport.call_count(), 1);

        advance(Duration::from_secs(60)).await;
        let third = requester.fetch_with_cache(120, &request).await.unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(*first, *third);
        assert_eq!(transport.call_count(), 2);

        let metrics = requester.metrics().await;
        assert_eq!(metrics.cache_hits, 1);
        assert_eq!(metrics.cache_misses, 2);
        assert_eq!(metrics.upstream_requests, 2);
    }

    #[tokio::test]
    async fn test_zero_ttl_always_fetches() {
        let (transport, requester) = requester();
        let request = ApiRequest::ticker_prices();

        for _ in 0..3 {
            requester.fetch_with_cache(0, &request).await.unwrap();
        }

        assert_eq!(transport.call_count(), 3);
        assert!(requester.cache().is_empty().await);
    }

    #[tokio::test]
    async fn test_negative_ttl_always_fetches() {
        let (transport, requester) = requester();
        let request = ApiRequest::ticker_prices();

        requester.fetch_with_cache(-1, &request).await.unwrap();
        requester.fetch_with_cache(-1, &request).await.unwrap();

        assert_eq!(transport.call_count(), 2);
        assert!(requester.cache().is_empty().await);
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let (transport, requester) = requester();
        let request = ApiRequest::ticker_prices();

        transport.set_status(503);
        match requester.fetch_with_cache(120, &request).await {
            Err(RequestError::Status { status, .. }) => assert_eq!(status, 503),
            other => panic!("expected Status error, got {:?}", other),
        }
        assert!(requester.cache().is_empty().await);

        transport.set_tickers(&[("ETHUSDT", "50")]);
        requester.fetch_with_cache(120, &request).await.unwrap();
        assert_eq!(transport.call_count(), 2);
        assert_eq!(requester.cache().len().await, 1);
        assert_eq!(requester.metrics().await.upstream_failures, 1);
    }

    #[tokio::test]
    async fn test_distinct_requests_are_cached_separately() {
        let (transport, requester) = requester();

        requester
            .fetch_with_cache(120, &ApiRequest::ticker_prices())
            .await
            .unwrap();
        requester
            .fetch_with_cache(120, &ApiRequest::ticker_prices().query("symbol=BTCUSDT"))
            .await
            .unwrap();

        assert_eq!(transport.call_count(), 2);
        assert_eq!(requester.cache().len().await, 2);
    }
}
