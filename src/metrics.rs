//! Request and cache metrics
//!
//! Tracks cache hit rates, upstream failures and upstream latency percentiles.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::RwLock;

/// Maximum number of latency samples to keep
const MAX_SAMPLES: usize = 100;

/// Snapshot of request metrics
#[derive(Debug, Clone, PartialEq)]
pub struct RequestMetrics {
    /// Name of the upstream transport
    pub provider_name: String,
    pub cache_hits: u64,
    pub cache_misses: u64,
    /// Calls that reached the exchange
    pub upstream_requests: u64,
    pub upstream_failures: u64,
    /// 50th percentile upstream latency in milliseconds
    pub latency_p50_ms: f64,
    /// 99th percentile upstream latency in milliseconds
    pub latency_p99_ms: f64,
}

impl RequestMetrics {
    /// Creates metrics with no data
    pub fn empty(provider_name: &str) -> Self {
        Self {
            provider_name: provider_name.to_string(),
            cache_hits: 0,
            cache_misses: 0,
            upstream_requests: 0,
            upstream_failures: 0,
            latency_p50_ms: 0.0,
            latency_p99_ms: 0.0,
        }
    }

    /// Share of lookups served from the cache (0.0 to 1.0)
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.cache_hits + self.cache_misses;
        if lookups == 0 {
            0.0
        } else {
            self.cache_hits as f64 / lookups as f64
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    cache_hits: u64,
    cache_misses: u64,
    upstream_requests: u64,
    upstream_failures: u64,
    /// Successful upstream latencies in milliseconds
    samples: VecDeque<f64>,
}

/// Collects request metrics
pub struct MetricsCollector {
    provider_name: String,
    counters: RwLock<Counters>,
}

impl MetricsCollector {
    pub fn new(provider_name: &str) -> Self {
        Self {
            provider_name: provider_name.to_string(),
            counters: RwLock::new(Counters {
                samples: VecDeque::with_capacity(MAX_SAMPLES),
                ..Counters::default()
            }),
        }
    }

    pub async fn record_cache_hit(&self) {
        self.counters.write().await.cache_hits += 1;
    }

    pub async fn record_cache_miss(&self) {
        self.counters.write().await.cache_misses += 1;
    }

    /// Records an upstream call with its duration and outcome
    pub async fn record_upstream(&self, duration: Duration, success: bool) {
        let mut counters = self.counters.write().await;
        counters.upstream_requests += 1;

        if !success {
            counters.upstream_failures += 1;
            return;
        }

        if counters.samples.len() >= MAX_SAMPLES {
            counters.samples.pop_front();
        }
        counters.samples.push_back(duration.as_secs_f64() * 1000.0);
    }

    /// Computes current metrics
    pub async fn get_metrics(&self) -> RequestMetrics {
        let counters = self.counters.read().await;

        let mut latencies: Vec<f64> = counters.samples.iter().copied().collect();
        latencies.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        RequestMetrics {
            provider_name: self.provider_name.clone(),
            cache_hits: counters.cache_hits,
            cache_misses: counters.cache_misses,
            upstream_requests: counters.upstream_requests,
            upstream_failures: counters.upstream_failures,
            latency_p50_ms: latency_percentile(&latencies, 50.0),
            latency_p99_ms: latency_percentile(&latencies, 99.0),
        }
    }
}

/// Upstream latency at percentile `p` of the rolling window
///
/// `sorted_ms` holds successful call latencies in ascending order; the
/// nearest-rank sample is returned, or 0.0 before any call succeeded.
fn latency_percentile(sorted_ms: &[f64], p: f64) -> f64 {
    let Some(last) = sorted_ms.len().checked_sub(1) else {
        return 0.0;
    };
    let rank = (p.clamp(0.0, 100.0) / 100.0 * last as f64).round() as usize;
    sorted_ms[rank.min(last)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_metrics_collector() {
        let collector = MetricsCollector::new("test");

        collector.record_cache_miss().await;
        collector.record_upstream(Duration::from_millis(100), true).await;
        collector.record_cache_hit().await;
        collector.record_cache_hit().await;
        collector.record_cache_miss().await;
        collector.record_upstream(Duration::from_millis(300), false).await;

        let metrics = collector.get_metrics().await;

        assert_eq!(metrics.provider_name, "test");
        assert_eq!(metrics.cache_hits, 2);
        assert_eq!(metrics.cache_misses, 2);
        assert_eq!(metrics.upstream_requests, 2);
        assert_eq!(metrics.upstream_failures, 1);
        assert_eq!(metrics.latency_p50_ms, 100.0);
        assert_eq!(metrics.hit_rate(), 0.5);
    }

    #[tokio::test]
    async fn test_empty_metrics() {
        let collector = MetricsCollector::new("test");
        assert_eq!(collector.get_metrics().await, RequestMetrics::empty("test"));
    }

    #[test]
    fn test_latency_percentile() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(latency_percentile(&values, 50.0), 3.0);
        assert_eq!(latency_percentile(&values, 99.0), 5.0);
        assert_eq!(latency_percentile(&values, 250.0), 5.0);
        assert_eq!(latency_percentile(&[], 50.0), 0.0);
    }
}
