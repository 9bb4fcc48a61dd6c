//! Current prices entry point
//!
//! One run takes the fetch lock, gets the ticker list from the cache or the
//! exchange, releases the lock, then normalizes and sorts outside of it.

use crate::{
    config::Options,
    error::PriceError,
    lock::LockManager,
    metrics::RequestMetrics,
    parser::{parse, tickers_from_payload},
    providers::BinanceProvider,
    requester::CachedRequester,
    types::{ApiRequest, PriceLookup},
};
use std::sync::Arc;

/// Current market prices for every listed symbol
///
/// Build one per host and share it (or its lock manager and requester) across
/// triggers so they contend on the same lock and cache.
///
/// # Example
/// ```no_run
/// use binance_sheets_sdk::{CurrentPrices, Options, PriceLookup};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prices = CurrentPrices::new(Options::default())?;
///
/// if let PriceLookup::Price(btc) = prices.run(Some("BTCUSDT")).await? {
///     println!("BTCUSDT: {}", btc);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CurrentPrices {
    options: Options,
    lock: LockManager,
    requester: CachedRequester,
}

impl CurrentPrices {
    /// Creates a runner against the live Binance API with an in-process lock
    pub fn new(options: Options) -> Result<Self, PriceError> {
        let transport = Arc::new(BinanceProvider::new()?);
        Ok(Self::with_parts(
            options,
            LockManager::local(),
            CachedRequester::new(transport),
        ))
    }

    /// Creates a runner from explicit parts
    ///
    /// This is how tests and hosts with their own lock backend wire things up.
    pub fn with_parts(options: Options, lock: LockManager, requester: CachedRequester) -> Self {
        Self {
            options,
            lock,
            requester,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Returns current market prices
    ///
    /// # Arguments
    /// * `symbol` - If given, resolves just that symbol's price
    ///
    /// # Returns
    /// The sorted table when no symbol is given, otherwise the symbol's price or
    /// `NotFound`
    pub async fn run(&self, symbol: Option<&str>) -> Result<PriceLookup, PriceError> {
        tracing::info!(symbol = symbol.unwrap_or(""), "Running current prices");

        let handle = self.lock.acquire().await?;
        let fetched = self
            .requester
            .fetch_with_cache(self.options.cache_ttl, &ApiRequest::ticker_prices())
            .await;
        handle.release();
        let payload = fetched?;

        let tickers = tickers_from_payload(&payload)?;
        let parsed = parse(&tickers, symbol)?;

        tracing::info!(tickers = tickers.len(), "Current prices done");
        Ok(parsed)
    }

    /// Gets request metrics including cache hit counts and upstream latency
    pub async fn metrics(&self) -> RequestMetrics {
        self.requester.metrics().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LockPolicy;
    use crate::error::RequestError;
    use crate::lock::{LockBackend, LocalLock};
    use crate::provider::mock::MockTransport;
    use std::time::Duration;

    fn runner(transport: Arc<MockTransport>, cache_ttl: i64) -> CurrentPrices {
        CurrentPrices::with_parts(
            Options::with_cache_ttl(cache_ttl),
            LockManager::local(),
            CachedRequester::new(transport),
        )
    }

    fn two_tickers() -> Arc<MockTransport> {
        let transport = Arc::new(MockTransport::new());
        transport.set_tickers(&[("ETHUSDT", "50"), ("BTCUSDT", "100.5")]);
        transport
    }

    #[tokio::test]
    async fn test_run_returns_sorted_table() {
        let prices = runner(two_tickers(), 120);

        let lookup = prices.run(None).await.unwrap();
        assert_eq!(
            serde_json::to_value(lookup.as_table().unwrap()).unwrap(),
            serde_json::json!([["Symbol", "Price"], ["BTCUSDT", 100.5], ["ETHUSDT", 50.0]])
        );
    }

    #[tokio::test]
    async fn test_run_resolves_symbol() {
        let prices = runner(two_tickers(), 120);

        assert_eq!(
            prices.run(Some("BTCUSDT")).await.unwrap(),
            PriceLookup::Price(100.5)
        );
        assert_eq!(
            prices.run(Some("DOGEUSDT")).await.unwrap(),
            PriceLookup::NotFound
        );
    }

    #[tokio::test]
    async fn test_repeated_runs_are_idempotent() {
        let transport = two_tickers();
        let prices = runner(transport.clone(), 120);

        let first = prices.run(None).await.unwrap();
        let second = prices.run(None).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(transport.call_count(), 1);
        assert_eq!(prices.metrics().await.cache_hits, 1);
    }

    #[tokio::test]
    async fn test_zero_ttl_fetches_every_run() {
        let transport = two_tickers();
        let prices = runner(transport.clone(), 0);

        prices.run(None).await.unwrap();
        prices.run(Some("BTCUSDT")).await.unwrap();

        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_huge_ttl_still_caches() {
        let transport = two_tickers();
        let prices = runner(transport.clone(), i64::MAX);

        assert_eq!(
            prices.run(Some("BTCUSDT")).await.unwrap(),
            PriceLookup::Price(100.5)
        );
        prices.run(None).await.unwrap();

        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates_and_releases_lock() {
        let transport = two_tickers();
        transport.set_status(429);
        let prices = runner(transport.clone(), 120);

        match prices.run(None).await {
            Err(PriceError::Request(RequestError::RateLimitExceeded)) => {}
            other => panic!("expected rate limit error, got {:?}", other),
        }

        transport.set_tickers(&[("BTCUSDT", "1")]);
        assert_eq!(
            prices.run(Some("BTCUSDT")).await.unwrap(),
            PriceLookup::Price(1.0)
        );
    }

    #[tokio::test]
    async fn test_malformed_price_propagates() {
        let transport = Arc::new(MockTransport::new());
        transport.set_tickers(&[("BTCUSDT", "abc")]);
        let prices = runner(transport, 120);

        assert!(matches!(
            prices.run(None).await,
            Err(PriceError::MalformedPrice { .. })
        ));
    }

    #[tokio::test]
    async fn test_non_list_payload_is_invalid() {
        let transport = Arc::new(MockTransport::new());
        transport.set_payload(serde_json::json!({ "code": -1003, "msg": "Too many requests" }));
        let prices = runner(transport, 120);

        assert!(matches!(
            prices.run(None).await,
            Err(PriceError::InvalidTickers(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_runs_never_overlap() {
        let transport = Arc::new(MockTransport::new().with_delay(Duration::from_millis(50)));
        transport.set_tickers(&[("BTCUSDT", "100.5")]);

        let policy = LockPolicy {
            wait: Duration::from_millis(20),
            max_attempts: 100,
            initial_backoff: Duration::from_millis(10),
            max_backoff: Duration::from_millis(40),
            jitter: 0.1,
        };
        let prices = CurrentPrices::with_parts(
            Options::with_cache_ttl(0),
            LockManager::new(Arc::new(LocalLock::new()), policy),
            CachedRequester::new(transport.clone()),
        );

        let runs = (0..8).map(|_| {
            let prices = prices.clone();
            tokio::spawn(async move { prices.run(Some("BTCUSDT")).await })
        });
        let results = futures::future::join_all(runs).await;

        for result in results {
            assert_eq!(result.unwrap().unwrap(), PriceLookup::Price(100.5));
        }
        assert_eq!(transport.call_count(), 8);
        assert_eq!(transport.max_in_flight(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sustained_contention_reports_locked() {
        let backend = Arc::new(LocalLock::new());
        let policy = LockPolicy {
            wait: Duration::from_millis(5),
            max_attempts: 4,
            initial_backoff: Duration::from_millis(5),
            max_backoff: Duration::from_millis(20),
            jitter: 0.0,
        };
        let transport = two_tickers();
        let prices = CurrentPrices::with_parts(
            Options::default(),
            LockManager::new(backend.clone(), policy),
            CachedRequester::new(transport.clone()),
        );

        let _held = backend.try_acquire(Duration::from_millis(1)).await.unwrap();

        assert!(matches!(
            prices.run(None).await,
            Err(PriceError::Locked { attempts: 4 })
        ));
        assert_eq!(transport.call_count(), 0);
    }
}
