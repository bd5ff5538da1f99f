//! FoodData Central API client.

use async_trait::async_trait;
use nutrilog_core::{DataType, FoodCandidate, FoodDetail};
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use crate::config::FdcConfig;
use crate::database::FoodDatabase;
use crate::error::FetchError;
use crate::http::HttpClient;

// ============================================================================
// Constants
// ============================================================================

/// Search endpoint, relative to the base URL.
const SEARCH_ENDPOINT: &str = "foods/search";

/// Detail endpoint prefix, relative to the base URL.
const DETAIL_ENDPOINT: &str = "food/";

// ============================================================================
// API Response Types
// ============================================================================

/// Response from the search endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    foods: Vec<SearchFood>,
    #[serde(default)]
    total_hits: Option<u64>,
}

/// One hit of a search response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchFood {
    fdc_id: u64,
    #[serde(default)]
    description: String,
    #[serde(default)]
    brand_owner: Option<String>,
    #[serde(default)]
    data_type: DataType,
    #[serde(default)]
    score: Option<f64>,
}

impl From<SearchFood> for FoodCandidate {
    fn from(food: SearchFood) -> Self {
        Self {
            fdc_id: food.fdc_id,
            name: food.description,
            brand: food.brand_owner,
            data_type: food.data_type,
            score: food.score,
        }
    }
}

// ============================================================================
// API Client
// ============================================================================

/// FoodData Central client.
#[derive(Debug, Clone)]
pub struct FdcClient {
    http: HttpClient,
    config: FdcConfig,
}

impl FdcClient {
    /// Creates a client from a config.
    ///
    /// Requests are limited to the configured base URL's host.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: FdcConfig) -> Result<Self, FetchError> {
        let mut http = HttpClient::with_timeout(config.timeout)?.with_retry_strategy(config.retry.clone());
        if let Some(host) = config.base_url.host_str() {
            http = http.with_allowed_domains(vec![host.to_string()]);
        }

        Ok(Self { http, config })
    }

    /// Creates a client configured from the environment.
    ///
    /// # Errors
    ///
    /// Fails with [`FetchError::Config`] when the API key is missing.
    pub fn from_env() -> Result<Self, FetchError> {
        Self::new(FdcConfig::from_env()?)
    }

    /// Returns the client config.
    pub fn config(&self) -> &FdcConfig {
        &self.config
    }

    /// Builds an authenticated endpoint URL.
    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, FetchError> {
        let mut url = self
            .config
            .base_url
            .join(path)
            .map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        url.query_pairs_mut()
            .append_pair("api_key", self.config.api_key.expose())
            .extend_pairs(params);

        Ok(url)
    }

    /// Builds the search URL for a trimmed query.
    fn search_url(&self, query: &str) -> Result<Url, FetchError> {
        let page_size = self.config.page_size.to_string();
        let data_types = self.config.data_type_param();
        self.endpoint(
            SEARCH_ENDPOINT,
            &[
                ("query", query),
                ("pageSize", &page_size),
                ("requireAllWords", "true"),
                ("dataType", &data_types),
            ],
        )
    }
}

#[async_trait]
impl FoodDatabase for FdcClient {
    fn id(&self) -> &str {
        "fdc"
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<FoodCandidate>, FetchError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.search_url(query)?;
        let response: SearchResponse = self.http.get_json(&url).await?;

        debug!(
            hits = response.foods.len(),
            total_hits = ?response.total_hits,
            "Search completed"
        );

        Ok(response.foods.into_iter().map(FoodCandidate::from).collect())
    }

    #[instrument(skip(self))]
    async fn fetch_detail(&self, fdc_id: u64) -> Result<FoodDetail, FetchError> {
        let url = self.endpoint(&format!("{DETAIL_ENDPOINT}{fdc_id}"), &[])?;
        let detail: FoodDetail = self.http.get_json(&url).await?;

        debug!(nutrients = detail.food_nutrients.len(), "Detail fetched");
        Ok(detail)
    }
}

// ============================================================================
// Tests
// ============================================================================
