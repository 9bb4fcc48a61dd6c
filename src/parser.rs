//! Ticker normalization
//!
//! Turns the exchange's ticker list into a `[symbol, price]` table, or resolves
//! a single symbol's price.

use crate::{
    error::PriceError,
    sort::sort_results,
    types::{PriceLookup, PriceRow, PriceTable, Ticker},
};
use serde::Deserialize;
use serde_json::Value;

/// Decodes a raw ticker price payload
pub fn tickers_from_payload(payload: &Value) -> Result<Vec<Ticker>, PriceError> {
    Vec::<Ticker>::deserialize(payload).map_err(|e| PriceError::InvalidTickers(e.to_string()))
}

/// Parses a ticker's price text
///
/// Rejects anything that is not a finite decimal number.
pub fn parse_price(ticker: &Ticker) -> Result<f64, PriceError> {
    match ticker.price.trim().parse::<f64>() {
        Ok(price) if price.is_finite() => Ok(price),
        _ => Err(PriceError::malformed_price(&ticker.symbol, &ticker.price)),
    }
}

/// Builds the unsorted table, in upstream order
pub fn normalize(tickers: &[Ticker]) -> Result<PriceTable, PriceError> {
    let mut table = PriceTable::with_capacity(tickers.len());
    for ticker in tickers {
        table.push(PriceRow(ticker.symbol.clone(), parse_price(ticker)?));
    }
    Ok(table)
}

/// Normalizes `tickers`, optionally resolving one symbol
///
/// # Arguments
/// * `tickers` - Upstream ticker list
/// * `symbol` - Exact, case-sensitive symbol to resolve. `None` or an empty
///   string asks for the full table.
///
/// # Returns
/// The sorted table, the requested price, or `NotFound`. Every price is parsed
/// even when a single symbol is requested, so a malformed ticker anywhere in
/// the list fails the call.
pub fn parse(tickers: &[Ticker], symbol: Option<&str>) -> Result<PriceLookup, PriceError> {
    let table = normalize(tickers)?;

    match symbol.filter(|s| !s.is_empty()) {
        Some(symbol) => Ok(table
            .rows()
            .iter()
            .rev()
            .find(|row| row.symbol() == symbol)
            .map_or(PriceLookup::NotFound, |row| PriceLookup::Price(row.price()))),
        None => Ok(PriceLookup::Table(sort_results(table))),
    }
}
