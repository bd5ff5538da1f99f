//! JSON output formatting.

use anyhow::Result;
use nutrilog_core::{NutritionResult, ValidationError};
use nutrilog_fetch::{DetailAttempt, FetchError, LookupOutcome};
use serde::Serialize;

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for one food.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodOutput<'a> {
    pub fdc_id: u64,
    pub name: &'a str,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serving_size: Option<f64>,
    /// Whether the food can be logged.
    pub complete: bool,
}

impl<'a> From<&'a NutritionResult> for FoodOutput<'a> {
    fn from(result: &'a NutritionResult) -> Self {
        Self {
            fdc_id: result.fdc_id,
            name: &result.name,
            calories: result.calories,
            protein: result.protein,
            carbs: result.carbs,
            fat: result.fat,
            serving_size: result.serving_size,
            complete: result.has_complete_macros(),
        }
    }
}

/// JSON output for a search.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutput<'a> {
    pub query: &'a str,
    pub total_hits: usize,
    pub failures: usize,
    pub duration_ms: u64,
    pub results: Vec<FoodOutput<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<Vec<AttemptOutput>>,
}

/// One detail attempt.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptOutput {
    pub fdc_id: u64,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u64,
}

impl From<&DetailAttempt> for AttemptOutput {
    fn from(attempt: &DetailAttempt) -> Self {
        Self {
            fdc_id: attempt.fdc_id,
            success: attempt.success,
            error: attempt.error.clone(),
            duration_ms: millis(attempt.duration),
        }
    }
}

/// JSON output for suggestions.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestOutput<'a> {
    pub query: &'a str,
    pub suggestions: Vec<FoodOutput<'a>>,
}

/// JSON output for a failed operation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOutput {
    pub error: String,
    /// `validation`, `remote` or `local`.
    pub kind: &'static str,
}

impl ErrorOutput {
    /// Classifies a fetch error.
    pub fn from_fetch(err: &FetchError) -> Self {
        let kind = match err {
            FetchError::Validation(_) => "validation",
            err if err.is_remote() => "remote",
            _ => "local",
        };
        Self {
            error: err.user_message(),
            kind,
        }
    }

    /// Wraps a validation error.
    pub fn from_validation(err: &ValidationError) -> Self {
        Self {
            error: err.to_string(),
            kind: "validation",
        }
    }

    /// Wraps any other message.
    pub fn local(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            kind: "local",
        }
    }
}

fn millis(duration: std::time::Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats a lookup outcome.
    pub fn format_search(&self, query: &str, outcome: &LookupOutcome, report: bool) -> Result<String> {
        let output = SearchOutput {
            query,
            total_hits: outcome.total_hits,
            failures: outcome.failures(),
            duration_ms: millis(outcome.duration),
            results: outcome.results.iter().map(FoodOutput::from).collect(),
            attempts: report.then(|| outcome.attempts.iter().map(AttemptOutput::from).collect()),
        };
        self.format(&output)
    }

    /// Formats plain results.
    pub fn format_results(&self, results: &[NutritionResult]) -> Result<String> {
        let outputs: Vec<FoodOutput<'_>> = results.iter().map(FoodOutput::from).collect();
        self.format(&outputs)
    }

    /// Formats suggestions.
    pub fn format_suggestions(&self, query: &str, results: &[NutritionResult]) -> Result<String> {
        self.format(&SuggestOutput {
            query,
            suggestions: results.iter().map(FoodOutput::from).collect(),
        })
    }

    /// Formats one food.
    pub fn format_food(&self, result: &NutritionResult) -> Result<String> {
        self.format(&FoodOutput::from(result))
    }

    /// Formats an error.
    pub fn format_error(&self, error: &ErrorOutput) -> Result<String> {
        self.format(error)
    }
}

// ============================================================================
// Tests
// ============================================================================
