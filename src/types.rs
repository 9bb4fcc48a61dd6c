//! Types for the current-prices SDK

use crate::constants::{TABLE_HEADER, TICKER_PRICE_ENDPOINT};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// One trading pair and its latest price, as returned by the exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticker {
    /// Pair symbol, e.g. `BTCUSDT`
    pub symbol: String,
    /// Price as decimal text
    pub price: String,
}

impl Ticker {
    pub fn new(symbol: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            price: price.into(),
        }
    }
}

/// A normalized `[symbol, price]` row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceRow(pub String, pub f64);

impl PriceRow {
    pub fn symbol(&self) -> &str {
        &self.0
    }

    pub fn price(&self) -> f64 {
        self.1
    }
}

/// Spreadsheet-ready price table
///
/// The `["Symbol", "Price"]` header is implicit and always rendered first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    rows: Vec<PriceRow>,
}

impl PriceTable {
    /// Creates a header-only table
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, row: PriceRow) {
        self.rows.push(row);
    }

    /// Data rows, header excluded
    pub fn rows(&self) -> &[PriceRow] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut Vec<PriceRow> {
        &mut self.rows
    }

    pub fn header(&self) -> [&'static str; 2] {
        TABLE_HEADER
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<Vec<PriceRow>> for PriceTable {
    fn from(rows: Vec<PriceRow>) -> Self {
        Self { rows }
    }
}

impl Serialize for PriceTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len() + 1))?;
        seq.serialize_element(&TABLE_HEADER)?;
        for row in &self.rows {
            seq.serialize_element(row)?;
        }
        seq.end()
    }
}

/// A single spreadsheet cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

/// Result of a current-prices run
#[derive(Debug, Clone, PartialEq)]
pub enum PriceLookup {
    /// Full sorted table (no symbol requested)
    Table(PriceTable),
    /// Price of the requested symbol
    Price(f64),
    /// The requested symbol is not listed
    NotFound,
}

impl PriceLookup {
    pub fn as_table(&self) -> Option<&PriceTable> {
        match self {
            PriceLookup::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_price(&self) -> Option<f64> {
        match self {
            PriceLookup::Price(price) => Some(*price),
            _ => None,
        }
    }

    /// Renders the result as spreadsheet cells
    ///
    /// A missing symbol renders as a single empty-text cell so the sheet shows a
    /// blank instead of an error.
    pub fn to_cells(&self) -> Vec<Vec<CellValue>> {
        match self {
            PriceLookup::Table(table) => {
                let mut cells = Vec::with_capacity(table.len() + 1);
                cells.push(
                    TABLE_HEADER
                        .iter()
                        .map(|h| CellValue::Text(h.to_string()))
                        .collect(),
                );
                for row in table.rows() {
                    cells.push(vec![
                        CellValue::Text(row.0.clone()),
                        CellValue::Number(row.1),
                    ]);
                }
                cells
            }
            PriceLookup::Price(price) => vec![vec![CellValue::Number(*price)]],
            PriceLookup::NotFound => vec![vec![CellValue::Text(String::new())]],
        }
    }
}

/// HTTP verbs accepted by the request layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A request against the exchange REST API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Endpoint path relative to the API host, e.g. `api/v3/ticker/price`
    pub path: String,
    /// Query string without the leading `?`
    pub query: String,
    pub body: String,
    /// Public endpoints need no credentials
    pub public: bool,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: String::new(),
            body: String::new(),
            public: false,
        }
    }

    /// Public GET with no query or body
    pub fn public_get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path).public(true)
    }

    /// The ticker price listing request
    pub fn ticker_prices() -> Self {
        Self::public_get(TICKER_PRICE_ENDPOINT)
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn public(mut self, public: bool) -> Self {
        self.public = public;
        self
    }
}
