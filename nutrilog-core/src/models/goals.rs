//! Daily goals and progress toward them.

use serde::{Deserialize, Serialize};

use super::log::DailyTotals;
use super::nutrient::MacroKind;

// ============================================================================
// Goals
// ============================================================================

/// Daily target values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goals {
    /// Energy target in kcal.
    pub calories: u32,
    /// Protein target in grams.
    pub protein: u32,
    /// Fat target in grams.
    pub fat: u32,
    /// Carbohydrate target in grams.
    pub carbs: u32,
}

impl Default for Goals {
    fn default() -> Self {
        Self {
            calories: 2000,
            protein: 150,
            fat: 70,
            carbs: 250,
        }
    }
}

impl Goals {
    /// Returns the target for one macro.
    pub fn get(&self, kind: MacroKind) -> u32 {
        match kind {
            MacroKind::Calories => self.calories,
            MacroKind::Protein => self.protein,
            MacroKind::Carbs => self.carbs,
            MacroKind::Fat => self.fat,
        }
    }

    /// Sets the target for one macro.
    pub fn set(&mut self, kind: MacroKind, value: u32) {
        match kind {
            MacroKind::Calories => self.calories = value,
            MacroKind::Protein => self.protein = value,
            MacroKind::Carbs => self.carbs = value,
            MacroKind::Fat => self.fat = value,
        }
    }
}

/// Parses a goal keystroke buffer, keeping only ASCII digits.
///
/// Empty input yields 0 and overflow saturates at `u32::MAX`.
pub fn parse_goal_input(input: &str) -> u32 {
    input
        .chars()
        .filter_map(|c| c.to_digit(10))
        .fold(0u32, |acc, d| acc.saturating_mul(10).saturating_add(d))
}

// ============================================================================
// Progress
// ============================================================================

/// Progress of one macro toward its goal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroProgress {
    /// Which macro.
    pub kind: MacroKind,
    /// Current total.
    pub current: f64,
    /// Target.
    pub goal: u32,
    /// Percent of goal reached, capped at 100.
    pub percent: f64,
    /// True if the current total exceeds the goal.
    pub over_goal: bool,
}

impl MacroProgress {
    /// Computes progress for one macro.
    pub fn new(kind: MacroKind, current: f64, goal: u32) -> Self {
        let goal_f = f64::from(goal);
        let percent = if goal > 0 {
            (current / goal_f * 100.0).min(100.0)
        } else {
            0.0
        };

        Self {
            kind,
            current,
            goal,
            percent,
            over_goal: current > goal_f,
        }
    }
}

/// Current totals compared with goals, one entry per macro.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    /// Energy progress.
    pub calories: MacroProgress,
    /// Protein progress.
    pub protein: MacroProgress,
    /// Fat progress.
    pub fat: MacroProgress,
    /// Carbohydrate progress.
    pub carbs: MacroProgress,
}

impl GoalProgress {
    /// Compares totals against goals.
    pub fn compute(totals: &DailyTotals, goals: &Goals) -> Self {
        let row = |kind| MacroProgress::new(kind, totals.get(kind), goals.get(kind));
        Self {
            calories: row(MacroKind::Calories),
            protein: row(MacroKind::Protein),
            fat: row(MacroKind::Fat),
            carbs: row(MacroKind::Carbs),
        }
    }

    /// Rows in goals-screen order (calories, protein, fat, carbs).
    pub fn rows(&self) -> [MacroProgress; 4] {
        [self.calories, self.protein, self.fat, self.carbs]
    }
}
