//! Exchange transport implementations

pub mod binance;

pub use binance::BinanceProvider;
