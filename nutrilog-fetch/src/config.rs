//! FoodData Central client configuration.
//!
//! Configuration comes from the process environment. The API key is
//! required: a missing key is an error at construction time, never a silent
//! unauthenticated request.

use std::fmt;
use std::time::Duration;

use nutrilog_core::DataType;
use url::Url;

use crate::error::ConfigError;
use crate::http::RetryStrategy;

// ============================================================================
// Constants
// ============================================================================

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "USDA_API_KEY";

/// Environment variable overriding the API base URL.
pub const BASE_URL_VAR: &str = "USDA_API_BASE_URL";

/// Environment variable overriding the request timeout in seconds.
pub const TIMEOUT_VAR: &str = "USDA_TIMEOUT_SECS";

/// Environment variable overriding the number of request attempts.
pub const MAX_ATTEMPTS_VAR: &str = "USDA_MAX_ATTEMPTS";

/// FoodData Central v1 base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1/";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Page size requested from the search endpoint.
pub const SEARCH_PAGE_SIZE: u32 = 25;

// ============================================================================
// API Key
// ============================================================================

/// API key for the remote database. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps a key. Blank keys are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingApiKey`] if the key is blank.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            return Err(ConfigError::MissingApiKey {
                var: API_KEY_VAR.to_string(),
            });
        }
        Ok(Self(key))
    }

    /// Returns the raw key for building requests.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(REDACTED)")
    }
}

// ============================================================================
// Fdc Config
// ============================================================================

/// Settings for [`FdcClient`](crate::FdcClient).
#[derive(Debug, Clone)]
pub struct FdcConfig {
    /// API key sent as the `api_key` query parameter.
    pub api_key: ApiKey,
    /// Base URL, always ending in `/`.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Search page size.
    pub page_size: u32,
    /// Source categories a search is restricted to.
    pub data_types: Vec<DataType>,
    /// Retry behaviour for transient failures.
    pub retry: RetryStrategy,
}

impl FdcConfig {
    /// Creates a config with defaults and the given key.
    ///
    /// # Panics
    ///
    /// Never in practice: [`DEFAULT_BASE_URL`] is a valid constant.
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            page_size: SEARCH_PAGE_SIZE,
            data_types: DataType::SEARCHABLE.to_vec(),
            retry: RetryStrategy::default(),
        }
    }

    /// Loads the config from the process environment.
    ///
    /// # Errors
    ///
    /// Fails if the API key is missing or any override is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Loads the config through a variable lookup function.
    ///
    /// # Errors
    ///
    /// Fails if the API key is missing or any override is malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = lookup(API_KEY_VAR).ok_or_else(|| ConfigError::MissingApiKey {
            var: API_KEY_VAR.to_string(),
        })?;
        let mut config = Self::new(ApiKey::new(key)?);

        if let Some(base) = lookup(BASE_URL_VAR) {
            config = config.with_base_url(&base)?;
        }

        if let Some(raw) = lookup(TIMEOUT_VAR) {
            let secs = parse_positive(TIMEOUT_VAR, &raw)?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = lookup(MAX_ATTEMPTS_VAR) {
            let attempts = parse_positive(MAX_ATTEMPTS_VAR, &raw)?;
            let attempts = u32::try_from(attempts).map_err(|_| ConfigError::Invalid {
                var: MAX_ATTEMPTS_VAR.to_string(),
                reason: "too large".to_string(),
            })?;
            config.retry = RetryStrategy::new(attempts);
        }

        Ok(config)
    }

    /// Sets the base URL, adding a trailing slash if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the URL does not parse or has no host.
    pub fn with_base_url(mut self, base: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::Invalid {
            var: BASE_URL_VAR.to_string(),
            reason,
        };

        let mut base = base.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let url = Url::parse(&base).map_err(|e| invalid(e.to_string()))?;
        if url.host_str().is_none() {
            return Err(invalid("URL has no host".to_string()));
        }

        self.base_url = url;
        Ok(self)
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry strategy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryStrategy) -> Self {
        self.retry = retry;
        self
    }

    /// Returns the `dataType` search parameter value.
    pub fn data_type_param(&self) -> String {
        self.data_types
            .iter()
            .map(|d| d.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn parse_positive(var: &str, raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ConfigError::Invalid {
            var: var.to_string(),
            reason: format!("expected a positive integer, got {raw:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_missing_key_fails_fast() {
        let err = FdcConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingApiKey {
                var: API_KEY_VAR.to_string()
            }
        );
    }

    #[test]
    fn test_blank_key_fails() {
        let err = FdcConfig::from_lookup(lookup(&[(API_KEY_VAR, "   ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey { .. }));
    }

    #[test]
    fn test_defaults() {
        let config = FdcConfig::from_lookup(lookup(&[(API_KEY_VAR, "abc123")])).unwrap();
        assert_eq!(config.api_key.expose(), "abc123");
        assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.page_size, 25);
        assert_eq!(config.data_type_param(), "Branded,Foundation,Survey (FNDDS)");
    }

    #[test]
    fn test_overrides() {
        let config = FdcConfig::from_lookup(lookup(&[
            (API_KEY_VAR, "abc123"),
            (BASE_URL_VAR, "http://localhost:8080/fdc/v1"),
            (TIMEOUT_VAR, "5"),
            (MAX_ATTEMPTS_VAR, "1"),
        ]))
        .unwrap();

        assert_eq!(config.base_url.as_str(), "http://localhost:8080/fdc/v1/");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.retry.max_attempts, 1);
    }

    #[test]
    fn test_invalid_timeout() {
        let err = FdcConfig::from_lookup(lookup(&[(API_KEY_VAR, "k"), (TIMEOUT_VAR, "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var, .. } if var == TIMEOUT_VAR));
    }

    #[test]
    fn test_invalid_base_url() {
        let err = FdcConfig::from_lookup(lookup(&[(API_KEY_VAR, "k"), (BASE_URL_VAR, "not a url")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var, .. } if var == BASE_URL_VAR));
    }

    #[test]
    fn test_debug_hides_key() {
        let config = FdcConfig::new(ApiKey::new("super-secret").unwrap());
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }
}
