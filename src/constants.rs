//! Constants for the current-prices SDK
//!
//! Defaults for every tunable live here. Runtime overrides go through
//! [`crate::config`].

/// Default lifetime of a cached API response (in seconds)
pub const DEFAULT_CACHE_TTL_SECS: i64 = 120;

/// Longest lifetime a cached response can get (one year, in seconds)
pub const MAX_CACHE_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Environment variable overriding the cache TTL (in seconds)
pub const CACHE_TTL_ENV: &str = "BINANCE_SHEETS_CACHE_TTL";

/// Maximum number of distinct responses kept in the cache
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// HTTP request timeout when calling the exchange (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// How long a single lock attempt may block (in milliseconds)
pub const LOCK_WAIT_MS: u64 = 10_000;

/// Maximum number of lock attempts before giving up
pub const MAX_LOCK_ATTEMPTS: u32 = 10;

/// Initial backoff delay between lock attempts (in milliseconds)
pub const INITIAL_BACKOFF_MS: u64 = 250;

/// Maximum backoff delay between lock attempts (in milliseconds)
pub const MAX_BACKOFF_MS: u64 = 5_000;

/// Relative jitter applied to each backoff delay
pub const BACKOFF_JITTER: f64 = 0.1;

/// Binance public REST host
pub const BINANCE_API_URL: &str = "https://api.binance.com/";

/// Environment variable overriding the REST host
pub const BINANCE_API_URL_ENV: &str = "BINANCE_API_URL";

/// Ticker price listing endpoint
pub const TICKER_PRICE_ENDPOINT: &str = "api/v3/ticker/price";

/// User agent for HTTP requests
pub const USER_AGENT: &str = "binance-sheets-sdk/0.1.0";

/// Header row of every price table
pub const TABLE_HEADER: [&str; 2] = ["Symbol", "Price"];

/// Property name holding the API key
pub const API_KEY_NAME: &str = "BIN_API_KEY";

/// Property name holding the API secret key
pub const API_SECRET_NAME: &str = "BIN_API_SECRET_KEY";
