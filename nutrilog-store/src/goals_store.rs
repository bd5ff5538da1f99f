//! Daily goals store and edit workflow.
//!
//! Goals are replaced atomically. Editing happens on a [`GoalsDraft`] that
//! only touches the store when committed.

use nutrilog_core::{Goals, MacroKind, parse_goal_input};
use std::sync::Arc;
use tokio::sync::{RwLock, watch};
use tracing::info;

// ============================================================================
// Goals Store
// ============================================================================

/// Current daily goals.
///
/// Cloning shares the same goals. Observable via [`subscribe`](Self::subscribe).
#[derive(Debug, Clone)]
pub struct GoalsStore {
    inner: Arc<RwLock<Goals>>,
    notify: Arc<watch::Sender<Goals>>,
}

impl Default for GoalsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GoalsStore {
    /// Creates a store holding the default goals.
    pub fn new() -> Self {
        Self::with_goals(Goals::default())
    }

    /// Creates a store holding specific goals.
    pub fn with_goals(goals: Goals) -> Self {
        let (notify, _) = watch::channel(goals);
        Self {
            inner: Arc::new(RwLock::new(goals)),
            notify: Arc::new(notify),
        }
    }

    /// Returns the current goals.
    pub async fn get(&self) -> Goals {
        *self.inner.read().await
    }

    /// Replaces all four goals at once.
    pub async fn set(&self, goals: Goals) {
        let mut current = self.inner.write().await;
        *current = goals;
        self.notify.send_replace(goals);
        info!(
            calories = goals.calories,
            protein = goals.protein,
            fat = goals.fat,
            carbs = goals.carbs,
            "Goals updated"
        );
    }

    /// Restores the default goals.
    pub async fn reset(&self) {
        self.set(Goals::default()).await;
    }

    /// Subscribes to goal changes.
    pub fn subscribe(&self) -> watch::Receiver<Goals> {
        self.notify.subscribe()
    }

    /// Starts an edit from the current goals.
    pub async fn edit(&self) -> GoalsDraft {
        GoalsDraft::new(self.get().await)
    }
}

// ============================================================================
// Goals Draft
// ============================================================================

/// Scratch copy of the goals being edited.
///
/// Dropping the draft discards it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalsDraft {
    draft: Goals,
}

impl GoalsDraft {
    /// Starts a draft from existing goals.
    pub fn new(goals: Goals) -> Self {
        Self { draft: goals }
    }

    /// Sets one field from raw text input. Returns the stored value.
    ///
    /// Non-digits are ignored, empty input is 0 and overflow saturates.
    pub fn set_input(&mut self, kind: MacroKind, input: &str) -> u32 {
        let value = parse_goal_input(input);
        self.draft.set(kind, value);
        value
    }

    /// Sets one field directly.
    pub fn set(&mut self, kind: MacroKind, value: u32) {
        self.draft.set(kind, value);
    }

    /// Returns the draft goals.
    pub fn goals(&self) -> Goals {
        self.draft
    }

    /// Writes the draft to the store in one replace.
    pub async fn commit(self, store: &GoalsStore) -> Goals {
        store.set(self.draft).await;
        self.draft
    }

    /// Abandons the draft.
    pub fn discard(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_defaults_on_first_use() {
        let store = GoalsStore::new();
        let goals = store.get().await;
        assert_eq!(goals.calories, 2000);
        assert_eq!(goals.protein, 150);
        assert_eq!(goals.fat, 70);
        assert_eq!(goals.carbs, 250);
    }

    #[tokio::test]
    async fn test_set_and_reset() {
        let store = GoalsStore::new();
        let custom = Goals {
            calories: 1800,
            protein: 120,
            fat: 60,
            carbs: 200,
        };

        store.set(custom).await;
        assert_eq!(store.get().await, custom);

        store.reset().await;
        assert_eq!(store.get().await, Goals::default());
    }

    #[tokio::test]
    async fn test_draft_commit() {
        let store = GoalsStore::new();
        let mut draft = store.edit().await;

        assert_eq!(draft.set_input(MacroKind::Calories, "1,850 kcal"), 1850);
        assert_eq!(draft.set_input(MacroKind::Protein, ""), 0);
        assert_eq!(draft.set_input(MacroKind::Fat, "99999999999"), u32::MAX);

        // Nothing visible before commit.
        assert_eq!(store.get().await, Goals::default());

        let committed = draft.commit(&store).await;
        assert_eq!(store.get().await, committed);
        assert_eq!(committed.calories, 1850);
        assert_eq!(committed.protein, 0);
        assert_eq!(committed.fat, u32::MAX);
        assert_eq!(committed.carbs, 250);
    }

    #[tokio::test]
    async fn test_draft_discard_leaves_store() {
        let store = GoalsStore::new();
        let mut draft = store.edit().await;
        draft.set(MacroKind::Carbs, 10);
        draft.discard();

        assert_eq!(store.get().await, Goals::default());
    }

    #[tokio::test]
    async fn test_subscribe_sees_single_update() {
        let store = GoalsStore::new();
        let mut rx = store.subscribe();

        let mut draft = store.edit().await;
        draft.set(MacroKind::Calories, 2500);
        draft.set(MacroKind::Protein, 180);
        draft.commit(&store).await;

        rx.changed().await.unwrap();
        let seen = *rx.borrow_and_update();
        assert_eq!(seen.calories, 2500);
        assert_eq!(seen.protein, 180);
        assert!(!rx.has_changed().unwrap());
    }
}
