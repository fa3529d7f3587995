//! HTTP provider client implementation.

use crate::{
    error::{ProviderError, Result},
    types::{
        price_history_from_bars, snapshots_from_reports, CompanyProfile, FinancialRatios,
        GrowthRates, PriceBar,
    },
};
use reqwest::Client;
use ronda_traits::{Date, FundamentalSnapshot, PriceHistory};
use std::env;

/// Base URL for the provider's stable API.
const BASE_URL: &str = "https://financialmodelingprep.com/stable";

/// Environment variable holding the API key.
const API_KEY_VAR: &str = "RONDA_API_KEY";

/// HTTP client for end-of-day prices and fundamentals.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl ProviderClient {
    /// Create a new client with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Create a client from the `RONDA_API_KEY` environment variable.
    ///
    /// This will also load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment variable is not set.
    pub fn from_env() -> Result<Self> {
        // Try to load .env file (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_key = env::var(API_KEY_VAR).map_err(|_| ProviderError::MissingApiKey)?;
        Ok(Self::new(api_key))
    }

    /// Point the client at a different base URL. Used by tests to target
    /// a local stub server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build a URL with the API key.
    fn url(&self, endpoint: &str) -> String {
        if endpoint.contains('?') {
            format!("{}/{endpoint}&apikey={}", self.base_url, self.api_key)
        } else {
            format!("{}/{endpoint}?apikey={}", self.base_url, self.api_key)
        }
    }

    /// Make a GET request and parse the JSON response.
    async fn get<T: serde::de::DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = self.url(endpoint);
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimitExceeded);
        }
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::Api("HTTP 404".to_string()));
        }
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(format!("HTTP {status}: {text}")));
        }

        let text = response.text().await?;
        if text.contains("\"Error Message\"") || text.contains("\"error\"") {
            return Err(ProviderError::Api(text));
        }

        serde_json::from_str(&text).map_err(ProviderError::Json)
    }

    /// Fetch daily bars for a symbol over a date range and assemble them
    /// into a validated, ascending price history.
    ///
    /// # Errors
    ///
    /// [`ProviderError::SymbolNotFound`] when the provider has no bars for
    /// the symbol in the range.
    pub async fn historical_prices(
        &self,
        symbol: &str,
        from: Date,
        to: Date,
    ) -> Result<PriceHistory> {
        let endpoint = format!(
            "historical-price-eod/full?symbol={}&from={}&to={}",
            symbol.to_uppercase(),
            from.format("%Y-%m-%d"),
            to.format("%Y-%m-%d"),
        );
        let bars: Vec<PriceBar> = self.get(&endpoint).await?;
        if bars.is_empty() {
            return Err(ProviderError::SymbolNotFound(symbol.to_uppercase()));
        }
        price_history_from_bars(&symbol.to_uppercase(), &bars)
    }

    /// Fetch financial ratios per reporting period.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn ratios(&self, symbol: &str, limit: u32) -> Result<Vec<FinancialRatios>> {
        let endpoint = format!("ratios?symbol={}&limit={limit}", symbol.to_uppercase());
        self.get(&endpoint).await
    }

    /// Fetch year-over-year growth rates per reporting period.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn growth(&self, symbol: &str, limit: u32) -> Result<Vec<GrowthRates>> {
        let endpoint = format!(
            "income-statement-growth?symbol={}&limit={limit}",
            symbol.to_uppercase()
        );
        self.get(&endpoint).await
    }

    /// Fetch the company profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn profile(&self, symbol: &str) -> Result<Option<CompanyProfile>> {
        let endpoint = format!("profile?symbol={}", symbol.to_uppercase());
        let profiles: Vec<CompanyProfile> = self.get(&endpoint).await?;
        Ok(profiles.into_iter().next())
    }

    /// Fetch and merge fundamentals into date-ascending snapshots.
    ///
    /// Ratios are the backbone; a ticker with no ratio history yields an
    /// empty vector rather than an error, since the pipeline degrades
    /// gracefully without fundamentals. Growth and profile fetch failures
    /// are likewise tolerated.
    ///
    /// # Errors
    ///
    /// Propagates rate limiting, since retrying other endpoints would
    /// only make it worse.
    pub async fn fundamentals(&self, symbol: &str) -> Result<Vec<FundamentalSnapshot>> {
        let ratios = match self.ratios(symbol, 20).await {
            Ok(ratios) => ratios,
            Err(ProviderError::RateLimitExceeded) => return Err(ProviderError::RateLimitExceeded),
            Err(_) => return Ok(Vec::new()),
        };
        let growth = self.growth(symbol, 20).await.unwrap_or_default();
        let profile = self.profile(symbol).await.unwrap_or(None);
        Ok(snapshots_from_reports(
            &symbol.to_uppercase(),
            &ratios,
            &growth,
            profile.as_ref(),
        ))
    }
}
