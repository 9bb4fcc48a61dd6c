//! Deterministic ordering for price tables

use crate::types::PriceTable;

/// Sorts data rows by symbol, ascending
///
/// The sort is stable, so rows with equal symbols keep their upstream order.
/// The header is not a data row and always stays first.
pub fn sort_results(mut table: PriceTable) -> PriceTable {
    table.rows_mut().sort_by(|a, b| a.symbol().cmp(b.symbol()));
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PriceRow;

    fn row(symbol: &str, price: f64) -> PriceRow {
        PriceRow(symbol.to_string(), price)
    }

    #[test]
    fn test_sorts_by_symbol() {
        let table = PriceTable::from(vec![
            row("ETHUSDT", 50.0),
            row("BNBUSDT", 300.0),
            row("BTCUSDT", 100.5),
        ]);

        let sorted = sort_results(table);
        let symbols: Vec<&str> = sorted.rows().iter().map(|r| r.symbol()).collect();
        assert_eq!(symbols, vec!["BNBUSDT", "BTCUSDT", "ETHUSDT"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let table = PriceTable::from(vec![
            row("BTCUSDT", 2.0),
            row("AAAUSDT", 9.0),
            row("BTCUSDT", 1.0),
        ]);

        let sorted = sort_results(table);
        assert_eq!(
            sorted.rows(),
            &[row("AAAUSDT", 9.0), row("BTCUSDT", 2.0), row("BTCUSDT", 1.0)]
        );
    }

    #[test]
    fn test_deterministic() {
        let table = PriceTable::from(vec![row("B", 1.0), row("A", 2.0), row("C", 3.0)]);
        assert_eq!(sort_results(table.clone()), sort_results(table));
    }
}
