//! # Binance Sheets SDK
//!
//! Current prices for every symbol listed on Binance, shaped for spreadsheets.
//!
//! Each run takes a fetch lock, serves the ticker list from a time-bounded
//! cache (or calls `GET api/v3/ticker/price` on a miss), releases the lock, then
//! normalizes the list into a sorted `[symbol, price]` table or resolves one
//! symbol's price.
//!
//! ## Usage
//!
//! ```no_run
//! use binance_sheets_sdk::{CurrentPrices, Options, PriceLookup};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let prices = CurrentPrices::new(Options::default())?;
//!
//! // Full table, header first
//! if let PriceLookup::Table(table) = prices.run(None).await? {
//!     for row in table.rows() {
//!         println!("{}: {}", row.symbol(), row.price());
//!     }
//! }
//!
//! // A single symbol
//! match prices.run(Some("BTCUSDT")).await? {
//!     PriceLookup::Price(price) => println!("BTCUSDT: {}", price),
//!     PriceLookup::NotFound => println!("BTCUSDT is not listed"),
//!     PriceLookup::Table(_) => unreachable!(),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! CurrentPrices::run(symbol?)
//!     ↓
//! LockManager (bounded retry with backoff)
//!     ↓
//! CachedRequester ── ResponseCache (TTL, lazy expiry)
//!     ↓ miss
//! ExchangeTransport (Binance REST)
//!     ↓ lock released
//! parser::parse → sort::sort_results
//! ```

pub mod cache;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod current_prices;
pub mod error;
pub mod lock;
pub mod metrics;
pub mod parser;
pub mod provider;
pub mod providers;
pub mod requester;
pub mod setup;
pub mod sort;
pub mod types;

// Re-export commonly used types
pub use config::{LockPolicy, Options};
pub use current_prices::CurrentPrices;
pub use error::{PriceError, RequestError};
pub use metrics::RequestMetrics;
pub use types::{CellValue, PriceLookup, PriceRow, PriceTable, Ticker};
