//! Ticker symbol hygiene shared by every ticker source.

use std::collections::HashSet;

/// Returns true for a non-empty, ASCII-alphanumeric symbol.
#[must_use]
pub fn is_valid_symbol(symbol: &str) -> bool {
    !symbol.is_empty() && symbol.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Keeps valid symbols in their original order, trimmed and deduplicated.
///
/// ```
/// use stock_metrics_core::ticker::filter_symbols;
///
/// let symbols = filter_symbols(["AAPL", "BRK-B", " MSFT ", "AAPL", ""]);
/// assert_eq!(symbols, vec!["AAPL", "MSFT"]);
/// ```
pub fn filter_symbols<I, S>(symbols: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut kept = Vec::new();

    for symbol in symbols {
        let symbol = symbol.as_ref().trim();
        if !is_valid_symbol(symbol) {
            if !symbol.is_empty() {
                tracing::warn!("Dropping invalid ticker symbol: {:?}", symbol);
            }
            continue;
        }
        if seen.insert(symbol.to_string()) {
            kept.push(symbol.to_string());
        }
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_symbols() {
        assert!(is_valid_symbol("AAPL"));
        assert!(is_valid_symbol("X"));
        assert!(is_valid_symbol("TSM2"));
    }

    #[test]
    fn test_invalid_symbols() {
        assert!(!is_valid_symbol(""));
        assert!(!is_valid_symbol("BRK-B"));
        assert!(!is_valid_symbol("BF.A"));
        assert!(!is_valid_symbol("^GSPC"));
        assert!(!is_valid_symbol("ÄPPL"));
    }

    #[test]
    fn test_filter_preserves_order() {
        let symbols = filter_symbols(vec!["NVDA", "AMD", "INTC"]);
        assert_eq!(symbols, vec!["NVDA", "AMD", "INTC"]);
    }

    #[test]
    fn test_filter_drops_duplicates_and_junk() {
        let symbols = filter_symbols(vec!["NVDA", "nvda", "NVDA", "EURUSD=X", "  "]);
        assert_eq!(symbols, vec!["NVDA", "nvda"]);
    }
}
