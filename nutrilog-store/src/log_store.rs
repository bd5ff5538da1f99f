//! Daily food log.
//!
//! Holds the ordered list of logged foods and publishes recomputed totals
//! after every mutation.

use chrono::Utc;
use nutrilog_core::{DailyTotals, LogId, LoggedFood, MealMacros, NutritionResult, ValidationError};
use std::sync::Arc;
use tokio::sync::{RwLock, watch};
use tracing::{debug, info};

// ============================================================================
// Inner State
// ============================================================================

/// Internal state for the food log.
struct FoodLogInner {
    /// Entries in insertion order.
    entries: Vec<LoggedFood>,
    /// Identifier for the next entry. Never reused.
    next_id: LogId,
}

impl Default for FoodLogInner {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: LogId::new(1),
        }
    }
}

// ============================================================================
// Food Log
// ============================================================================

/// Today's log of eaten foods.
///
/// Cloning shares the same log. Observable via [`subscribe`](Self::subscribe).
#[derive(Clone)]
pub struct FoodLog {
    inner: Arc<RwLock<FoodLogInner>>,
    totals: Arc<watch::Sender<DailyTotals>>,
}

impl Default for FoodLog {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FoodLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FoodLog")
            .field("totals", &*self.totals.borrow())
            .finish_non_exhaustive()
    }
}

impl FoodLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        let (totals, _) = watch::channel(DailyTotals::default());
        Self {
            inner: Arc::new(RwLock::new(FoodLogInner::default())),
            totals: Arc::new(totals),
        }
    }

    /// Appends a food to the log.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IncompleteNutrition`] if any macro of the
    /// result is unknown. The log is left unchanged.
    pub async fn add(&self, result: &NutritionResult) -> Result<LoggedFood, ValidationError> {
        self.insert(|log_id| LoggedFood::from_result(log_id, result, Utc::now()))
            .await
    }

    /// Appends a meal entered by hand.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyMealName`] for a blank name. The log is
    /// left unchanged.
    pub async fn add_manual(&self, name: &str, macros: MealMacros) -> Result<LoggedFood, ValidationError> {
        self.insert(|log_id| LoggedFood::manual(log_id, name, macros, Utc::now()))
            .await
    }

    /// Builds an entry under the next id and appends it; the id is only
    /// consumed on success.
    async fn insert<F>(&self, build: F) -> Result<LoggedFood, ValidationError>
    where
        F: FnOnce(LogId) -> Result<LoggedFood, ValidationError>,
    {
        let entry = {
            let mut inner = self.inner.write().await;
            let entry = build(inner.next_id)?;
            inner.next_id = inner.next_id.next();
            inner.entries.push(entry.clone());
            self.publish(&inner);
            entry
        };

        info!(
            log_id = %entry.log_id,
            name = %entry.name,
            manual = entry.is_manual(),
            "Food logged"
        );
        Ok(entry)
    }

    /// Removes an entry. Unknown identifiers are a no-op.
    pub async fn remove(&self, log_id: LogId) -> Option<LoggedFood> {
        let removed = {
            let mut inner = self.inner.write().await;
            let index = inner.entries.iter().position(|e| e.log_id == log_id)?;
            let removed = inner.entries.remove(index);
            self.publish(&inner);
            removed
        };

        info!(log_id = %log_id, name = %removed.name, "Food removed");
        Some(removed)
    }

    /// Recomputes totals over the current entries.
    pub async fn totals(&self) -> DailyTotals {
        DailyTotals::from_entries(&self.inner.read().await.entries)
    }

    /// Returns all entries in insertion order.
    pub async fn entries(&self) -> Vec<LoggedFood> {
        self.inner.read().await.entries.clone()
    }

    /// Returns one entry.
    pub async fn get(&self, log_id: LogId) -> Option<LoggedFood> {
        self.inner
            .read()
            .await
            .entries
            .iter()
            .find(|e| e.log_id == log_id)
            .cloned()
    }

    /// Returns the number of entries.
    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    /// Returns true if nothing is logged.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.entries.is_empty()
    }

    /// Removes every entry. Identifiers keep counting up.
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.entries.clear();
        self.publish(&inner);
        debug!("Log cleared");
    }

    /// Subscribes to totals, republished after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<DailyTotals> {
        self.totals.subscribe()
    }

    fn publish(&self, inner: &FoodLogInner) {
        self.totals
            .send_replace(DailyTotals::from_entries(&inner.entries));
    }
}
