//! Application state management.

use nutrilog_core::{DailyTotals, GoalProgress, Goals, LogId, LoggedFood, MealMacros, NutritionResult};
use serde::Serialize;
use tracing::debug;

use crate::error::StoreError;
use crate::goals_store::GoalsStore;
use crate::log_store::FoodLog;

/// Point-in-time view of the day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    /// Logged entries in insertion order.
    pub entries: Vec<LoggedFood>,
    /// Totals over the entries.
    pub totals: DailyTotals,
    /// Current goals.
    pub goals: Goals,
    /// Progress toward each goal.
    pub progress: GoalProgress,
}

/// Session state: today's log plus goals.
///
/// Constructed once and passed to whatever needs it; clones share state.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Today's log.
    pub log: FoodLog,
    /// Daily goals.
    pub goals: GoalsStore,
}

impl AppState {
    /// Creates state with an empty log and default goals.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates state with an empty log and the given goals.
    pub fn with_goals(goals: Goals) -> Self {
        Self {
            log: FoodLog::new(),
            goals: GoalsStore::with_goals(goals),
        }
    }

    /// Logs a food.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] if any macro is unknown.
    pub async fn log_food(&self, result: &NutritionResult) -> Result<LoggedFood, StoreError> {
        Ok(self.log.add(result).await?)
    }

    /// Logs a meal entered by hand.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] if the name is blank.
    pub async fn log_meal(&self, name: &str, macros: MealMacros) -> Result<LoggedFood, StoreError> {
        Ok(self.log.add_manual(name, macros).await?)
    }

    /// Removes a logged food.
    ///
    /// Unknown or already-removed identifiers are a no-op returning `None`.
    pub async fn remove_food(&self, log_id: LogId) -> Option<LoggedFood> {
        let removed = self.log.remove(log_id).await;
        if removed.is_none() {
            debug!(log_id = %log_id, "Nothing to remove");
        }
        removed
    }

    /// Combines current totals and goals.
    pub async fn progress(&self) -> GoalProgress {
        let totals = self.log.totals().await;
        let goals = self.goals.get().await;
        GoalProgress::compute(&totals, &goals)
    }

    /// Captures entries, totals, goals and progress together.
    pub async fn summary(&self) -> DaySummary {
        let entries = self.log.entries().await;
        let totals = DailyTotals::from_entries(&entries);
        let goals = self.goals.get().await;
        debug!(entries = entries.len(), "Building day summary");

        DaySummary {
            progress: GoalProgress::compute(&totals, &goals),
            entries,
            totals,
            goals,
        }
    }

    /// Renders the day summary as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] if encoding fails.
    pub async fn summary_json(&self, pretty: bool) -> Result<String, StoreError> {
        let summary = self.summary().await;
        let json = if pretty {
            serde_json::to_string_pretty(&summary)?
        } else {
            serde_json::to_string(&summary)?
        };
        Ok(json)
    }
}
