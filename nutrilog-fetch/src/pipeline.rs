//! Lookup pipeline turning a free-text query into nutrition results.
//!
//! A lookup searches the database, keeps the first [`MAX_CANDIDATES`]
//! candidates and fetches every candidate's detail concurrently. Each detail
//! is normalized on its own; a failing candidate degrades to a placeholder
//! with no macros instead of failing the whole lookup. Results always come
//! back in candidate order.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use nutrilog_core::{FoodCandidate, NutritionResult, normalize};
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::database::FoodDatabase;
use crate::error::FetchError;

/// Candidates enriched per lookup.
pub const MAX_CANDIDATES: usize = 10;

/// Results kept for typeahead suggestions.
pub const SUGGESTION_LIMIT: usize = 5;

// ============================================================================
// Detail Attempt
// ============================================================================

/// Record of one candidate's detail fetch.
#[derive(Debug, Clone)]
pub struct DetailAttempt {
    /// Candidate identifier.
    pub fdc_id: u64,
    /// Whether fetch and normalization both succeeded.
    pub success: bool,
    /// Error if the attempt failed.
    pub error: Option<String>,
    /// How long the attempt took.
    pub duration: Duration,
}

impl DetailAttempt {
    /// Creates a successful attempt record.
    pub fn success(fdc_id: u64, duration: Duration) -> Self {
        Self {
            fdc_id,
            success: true,
            error: None,
            duration,
        }
    }

    /// Creates a failed attempt record.
    pub fn failure(fdc_id: u64, error: impl Into<String>, duration: Duration) -> Self {
        Self {
            fdc_id,
            success: false,
            error: Some(error.into()),
            duration,
        }
    }
}

// ============================================================================
// Lookup Outcome
// ============================================================================

/// The outcome of a lookup with per-candidate diagnostics.
#[derive(Debug, Clone)]
pub struct LookupOutcome {
    /// Results in candidate order.
    pub results: Vec<NutritionResult>,
    /// One attempt per enriched candidate, in candidate order.
    pub attempts: Vec<DetailAttempt>,
    /// Candidates returned by the search before truncation.
    pub total_hits: usize,
    /// Total duration of the lookup.
    pub duration: Duration,
}

impl LookupOutcome {
    fn empty(duration: Duration) -> Self {
        Self {
            results: Vec::new(),
            attempts: Vec::new(),
            total_hits: 0,
            duration,
        }
    }

    /// Returns the number of candidates that degraded to placeholders.
    pub fn failures(&self) -> usize {
        self.attempts.iter().filter(|a| !a.success).count()
    }

    /// Returns all errors that occurred.
    pub fn errors(&self) -> Vec<&str> {
        self.attempts
            .iter()
            .filter_map(|a| a.error.as_deref())
            .collect()
    }
}

// ============================================================================
// Lookup Pipeline
// ============================================================================

/// Search, truncate, concurrent enrichment, ordered merge.
#[derive(Clone)]
pub struct LookupPipeline {
    database: Arc<dyn FoodDatabase>,
    max_candidates: usize,
}

impl fmt::Debug for LookupPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupPipeline")
            .field("database", &self.database.id())
            .field("max_candidates", &self.max_candidates)
            .finish()
    }
}

impl LookupPipeline {
    /// Creates a pipeline over a database.
    pub fn new(database: Arc<dyn FoodDatabase>) -> Self {
        Self {
            database,
            max_candidates: MAX_CANDIDATES,
        }
    }

    /// Overrides the number of candidates enriched per lookup.
    #[must_use]
    pub fn with_max_candidates(mut self, max: usize) -> Self {
        self.max_candidates = max;
        self
    }

    /// Returns the underlying database's identifier.
    pub fn database_id(&self) -> &str {
        self.database.id()
    }

    /// Runs a full lookup.
    ///
    /// # Errors
    ///
    /// Only search-stage failures are returned; detail failures become
    /// placeholders.
    pub async fn lookup(&self, query: &str) -> Result<Vec<NutritionResult>, FetchError> {
        Ok(self.lookup_with_report(query).await?.results)
    }

    /// Runs a lookup and keeps the first [`SUGGESTION_LIMIT`] results.
    ///
    /// # Errors
    ///
    /// Same as [`lookup`](Self::lookup).
    pub async fn suggest(&self, query: &str) -> Result<Vec<NutritionResult>, FetchError> {
        let mut results = self.lookup(query).await?;
        results.truncate(SUGGESTION_LIMIT);
        Ok(results)
    }

    /// Fetches and normalizes a single food by identifier.
    ///
    /// Unlike a lookup, failures are returned rather than degraded.
    ///
    /// # Errors
    ///
    /// Returns the fetch or normalization error.
    #[instrument(skip(self))]
    pub async fn lookup_one(&self, fdc_id: u64) -> Result<NutritionResult, FetchError> {
        let detail = self.database.fetch_detail(fdc_id).await?;
        Ok(normalize(fdc_id, &detail)?)
    }

    /// Runs a full lookup and reports every detail attempt.
    ///
    /// # Errors
    ///
    /// Only search-stage failures are returned.
    #[instrument(skip(self), fields(database = self.database.id()))]
    pub async fn lookup_with_report(&self, query: &str) -> Result<LookupOutcome, FetchError> {
        let start = Instant::now();

        if query.trim().is_empty() {
            return Ok(LookupOutcome::empty(start.elapsed()));
        }

        let mut candidates = self.database.search(query).await?;
        let total_hits = candidates.len();
        candidates.truncate(self.max_candidates);

        if candidates.is_empty() {
            debug!("No candidates");
            return Ok(LookupOutcome::empty(start.elapsed()));
        }

        debug!(total_hits, enriching = candidates.len(), "Enriching candidates");

        let (results, attempts): (Vec<_>, Vec<_>) =
            join_all(candidates.iter().map(|candidate| self.enrich(candidate)))
                .await
                .into_iter()
                .unzip();

        let outcome = LookupOutcome {
            results,
            attempts,
            total_hits,
            duration: start.elapsed(),
        };

        info!(
            results = outcome.results.len(),
            failures = outcome.failures(),
            duration = ?outcome.duration,
            "Lookup completed"
        );

        Ok(outcome)
    }

    /// Fetches and normalizes one candidate, never failing.
    async fn enrich(&self, candidate: &FoodCandidate) -> (NutritionResult, DetailAttempt) {
        let start = Instant::now();
        let fdc_id = candidate.fdc_id;

        let outcome = self
            .database
            .fetch_detail(fdc_id)
            .await
            .and_then(|detail| normalize(fdc_id, &detail).map_err(FetchError::from));
        let duration = start.elapsed();

        match outcome {
            Ok(result) => (result, DetailAttempt::success(fdc_id, duration)),
            Err(error) => {
                warn!(
                    fdc_id,
                    error = %error,
                    duration = ?duration,
                    "Detail failed, using placeholder"
                );
                (
                    NutritionResult::placeholder(candidate),
                    DetailAttempt::failure(fdc_id, error.to_string(), duration),
                )
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
