//! Error types for data providers.

use ronda_traits::RondaError;
use thiserror::Error;

/// Errors that can occur while fetching market data.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Missing API key.
    #[error("RONDA_API_KEY environment variable not set")]
    MissingApiKey,

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned an error.
    #[error("Provider API error: {0}")]
    Api(String),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, retry later")]
    RateLimitExceeded,

    /// Symbol not found.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// No data available.
    #[error("No data available for {0}")]
    NoData(String),
}

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Provider failures all surface to the pipeline as unavailable data;
/// the pipeline decides whether that is fatal for the ticker.
impl From<ProviderError> for RondaError {
    fn from(err: ProviderError) -> Self {
        Self::DataUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converts_to_data_unavailable() {
        let err: RondaError = ProviderError::SymbolNotFound("ZZZZ".to_string()).into();
        assert!(matches!(err, RondaError::DataUnavailable(_)));
        assert!(err.to_string().contains("ZZZZ"));
    }
}
