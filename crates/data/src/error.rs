//! Error types for the Yahoo Finance integration.

use thiserror::Error;

/// Errors that can occur when fetching tickers or prices.
#[derive(Debug, Error)]
pub enum YahooError {
    /// API request failed.
    #[error("API error: {status_code} - {message}")]
    Api {
        /// HTTP status code.
        status_code: u16,
        /// Response body or error description.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimit {
        /// Seconds to wait before retry.
        retry_after_secs: u64,
    },

    /// Network error.
    #[error("network error: {0}")]
    Network(String),

    /// Request timeout.
    #[error("request timeout: {0}")]
    Timeout(String),

    /// Response body did not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The screener returned a table without any rows.
    #[error("screener '{screener}' returned no tickers")]
    EmptyTable {
        /// Screener identifier.
        screener: String,
    },

    /// Symbol rejected before a request was made.
    #[error("invalid symbol: {0:?}")]
    InvalidSymbol(String),

    /// Lookback range string not understood.
    #[error("invalid lookback '{0}'. Valid values: 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max")]
    InvalidLookback(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl YahooError {
    /// Creates an API error from status code and message.
    pub fn api(status_code: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status_code,
            message: message.into(),
        }
    }

    /// Creates a malformed response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Returns true if the server reported the resource as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status_code: 404, .. })
    }
}

impl From<reqwest::Error> for YahooError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Network(format!("connection failed: {err}"))
        } else if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for YahooError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedResponse(err.to_string())
    }
}

/// Result type alias for Yahoo operations.
pub type Result<T> = std::result::Result<T, YahooError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_construction() {
        let err = YahooError::api(404, "Not Found");
        assert!(err.is_not_found());
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn test_server_error_is_not_missing_data() {
        let err = YahooError::api(503, "service unavailable");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_rate_limit_display() {
        let err = YahooError::RateLimit {
            retry_after_secs: 30,
        };
        assert!(err.to_string().contains("30"));
    }

    #[test]
    fn test_empty_table_display() {
        let err = YahooError::EmptyTable {
            screener: "day_gainers".to_string(),
        };
        assert_eq!(err.to_string(), "screener 'day_gainers' returned no tickers");
    }

    #[test]
    fn test_json_error_maps_to_malformed() {
        let err: YahooError = serde_json::from_str::<serde_json::Value>("{oops")
            .unwrap_err()
            .into();
        assert!(matches!(err, YahooError::MalformedResponse(_)));
    }
}
