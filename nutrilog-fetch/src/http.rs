//! HTTP client with tracing, retries, redaction, and domain allowlist.
//!
//! This module provides a wrapped HTTP client that adds:
//! - Request/response tracing with credentials redacted from URLs
//! - Domain allowlist for security
//! - Retries for connection failures, timeouts, and rate limiting
//! - Status and JSON handling for the remote database
//!
//! A `Retry-After` longer than the strategy's longest wait is not honoured:
//! the request fails with [`FetchError::RateLimited`] right away, so one
//! throttled detail fetch cannot hold up a whole lookup.

use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::FetchError;

/// User agent string for NutriLog.
const USER_AGENT: &str = concat!("NutriLog/", env!("CARGO_PKG_VERSION"));

/// Body reported when an error response cannot be read.
const UNKNOWN_ERROR_BODY: &str = "Unknown USDA error";

/// Query parameters whose values never appear in logs.
const SENSITIVE_PARAMS: &[&str] = &["api_key", "apikey", "token"];

// ============================================================================
// Retry Strategy
// ============================================================================

/// When and how long to wait before repeating a request.
///
/// Connect errors, timeouts and HTTP 429 are retried; everything else fails
/// on the first attempt. Waits double per attempt up to `max_delay`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryStrategy {
    /// Attempts per request, the first one included. At least 1.
    pub max_attempts: u32,
    /// Wait after the first failed attempt.
    pub base_delay: Duration,
    /// Longest wait between attempts, computed or server-requested.
    pub max_delay: Duration,
}

impl RetryStrategy {
    /// Up to `max_attempts` attempts with 1 s, 2 s, 4 s ... waits capped at 30 s.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }

    /// A single attempt.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Sets the first wait.
    #[must_use]
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Sets the longest wait.
    #[must_use]
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Wait after failed attempt number `attempt` (1-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Wait before retrying a 429, or `None` to give up.
    ///
    /// A server-requested wait beyond `max_delay` gives up.
    pub fn rate_limit_wait(&self, retry_after: Option<u64>, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }
        match retry_after.map(Duration::from_secs) {
            Some(wait) if wait > self.max_delay => None,
            Some(wait) => Some(wait),
            None => Some(self.delay_for_attempt(attempt)),
        }
    }

    /// Whether a transport error is worth another attempt.
    pub fn should_retry(&self, error: &reqwest::Error) -> bool {
        error.is_connect() || error.is_timeout()
    }
}

impl Default for RetryStrategy {
    fn default() -> Self {
        Self::new(3)
    }
}

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client wrapper with tracing, retries, and domain allowlist.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    retry_strategy: RetryStrategy,
    allowed_domains: Option<Vec<String>>,
}

impl HttpClient {
    /// Creates a new HTTP client with a custom timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be built, which
    /// only happens with a broken TLS configuration.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            inner: client,
            retry_strategy: RetryStrategy::default(),
            allowed_domains: None,
        })
    }

    /// Sets the retry strategy for this client.
    #[must_use]
    pub fn with_retry_strategy(mut self, strategy: RetryStrategy) -> Self {
        self.retry_strategy = strategy;
        self
    }

    /// Restricts requests to the given domains and their subdomains.
    #[must_use]
    pub fn with_allowed_domains(mut self, domains: Vec<String>) -> Self {
        self.allowed_domains = Some(domains);
        self
    }

    /// Checks if a URL's domain is allowed.
    fn is_domain_allowed(&self, url: &Url) -> Result<(), FetchError> {
        let Some(ref allowed) = self.allowed_domains else {
            return Ok(()); // No restrictions
        };

        let host = url
            .host_str()
            .ok_or_else(|| FetchError::InvalidUrl("No host in URL".to_string()))?;

        let allowed = allowed
            .iter()
            .any(|domain| host == domain || host.ends_with(&format!(".{domain}")));

        if allowed {
            Ok(())
        } else {
            Err(FetchError::DomainNotAllowed(host.to_string()))
        }
    }

    /// Performs a GET request, retrying transient failures.
    ///
    /// Non-success statuses become [`FetchError::Status`] carrying the body.
    #[instrument(skip_all, fields(url = %redact_url(url)))]
    pub async fn get(&self, url: &Url) -> Result<Response, FetchError> {
        self.is_domain_allowed(url)?;

        let max_attempts = self.retry_strategy.max_attempts;
        let mut attempts = 0;

        loop {
            attempts += 1;
            debug!(attempt = attempts, "GET request");

            let result = self.inner.get(url.clone()).send().await;

            match result {
                Ok(response) => {
                    let status = response.status();
                    debug!(status = %status, "Response received");

                    if status.is_success() {
                        return Ok(response);
                    }

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        let retry_after = retry_after_secs(&response);
                        if let Some(wait) = self.retry_strategy.rate_limit_wait(retry_after, attempts) {
                            warn!(wait_secs = wait.as_secs(), "Rate limited, waiting before retry");
                            tokio::time::sleep(wait).await;
                            continue;
                        }
                        warn!(retry_after = ?retry_after, attempts, "Rate limited, giving up");
                        return Err(FetchError::RateLimited { retry_after });
                    }

                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| UNKNOWN_ERROR_BODY.to_string());
                    return Err(FetchError::Status {
                        status: status.as_u16(),
                        body,
                    });
                }
                Err(e) => {
                    if attempts < max_attempts && self.retry_strategy.should_retry(&e) {
                        let delay = self.retry_strategy.delay_for_attempt(attempts);
                        warn!(
                            error = %e.without_url(),
                            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                            "Request failed, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(e.without_url().into());
                }
            }
        }
    }

    /// Performs a GET request and decodes the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, FetchError> {
        let response = self.get(url).await?;
        let body = response.text().await.map_err(reqwest::Error::without_url)?;

        serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, len = body.len(), "Failed to parse response");
            FetchError::Json(e)
        })
    }
}

fn retry_after_secs(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

// ============================================================================
// Redaction
// ============================================================================

/// Renders a URL for logs with credential query values replaced.
pub fn redact_url(url: &Url) -> String {
    if url.query().is_none() {
        return url.to_string();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let value = if SENSITIVE_PARAMS.contains(&k.as_ref()) {
                "REDACTED".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), value)
        })
        .collect();

    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

// ============================================================================
// Tests
// ============================================================================
