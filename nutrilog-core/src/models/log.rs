//! Logged foods and the totals derived from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use super::food::NutritionResult;
use super::nutrient::MacroKind;
use crate::error::ValidationError;

// ============================================================================
// Log Id
// ============================================================================

/// Identifier of one entry in the daily log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogId(u64);

impl LogId {
    /// Wraps a raw identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns the identifier that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for LogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LogId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

// ============================================================================
// Manual Entry
// ============================================================================

/// Macros typed in by hand for a meal that was not looked up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MealMacros {
    /// Energy in kcal.
    pub calories: f64,
    /// Protein in grams.
    pub protein: f64,
    /// Carbohydrate in grams.
    pub carbs: f64,
    /// Total fat in grams.
    pub fat: f64,
}

impl MealMacros {
    /// Parses the four input fields leniently with [`parse_macro_input`].
    pub fn from_inputs(calories: &str, protein: &str, carbs: &str, fat: &str) -> Self {
        Self {
            calories: parse_macro_input(calories),
            protein: parse_macro_input(protein),
            carbs: parse_macro_input(carbs),
            fat: parse_macro_input(fat),
        }
    }
}

/// Parses one typed macro amount.
///
/// Blank, unparsable, non-finite and negative input all yield 0.
pub fn parse_macro_input(input: &str) -> f64 {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
        .unwrap_or(0.0)
}

// ============================================================================
// Logged Food
// ============================================================================

/// A food the user committed to today's log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedFood {
    /// Log entry identifier.
    pub log_id: LogId,
    /// Remote identifier of the food, if it came from the database.
    pub fdc_id: Option<u64>,
    /// Display name.
    pub name: String,
    /// Energy in kcal.
    pub calories: f64,
    /// Protein in grams.
    pub protein: f64,
    /// Carbohydrate in grams.
    pub carbs: f64,
    /// Total fat in grams.
    pub fat: f64,
    /// When the entry was added.
    pub logged_at: DateTime<Utc>,
}

impl LoggedFood {
    /// Builds a log entry from a normalized result.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IncompleteNutrition`] when any of the four
    /// macros is unknown. A measured zero is accepted.
    pub fn from_result(
        log_id: LogId,
        result: &NutritionResult,
        logged_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let (Some(calories), Some(protein), Some(carbs), Some(fat)) =
            (result.calories, result.protein, result.carbs, result.fat)
        else {
            return Err(ValidationError::IncompleteNutrition {
                name: result.name.clone(),
            });
        };

        Ok(Self {
            log_id,
            fdc_id: Some(result.fdc_id),
            name: result.name.clone(),
            calories,
            protein,
            carbs,
            fat,
            logged_at,
        })
    }

    /// Builds a log entry for a meal entered by hand.
    ///
    /// The entry has no remote identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyMealName`] when the name is blank.
    pub fn manual(
        log_id: LogId,
        name: &str,
        macros: MealMacros,
        logged_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyMealName);
        }

        Ok(Self {
            log_id,
            fdc_id: None,
            name: name.to_string(),
            calories: macros.calories,
            protein: macros.protein,
            carbs: macros.carbs,
            fat: macros.fat,
            logged_at,
        })
    }

    /// Whether the entry was typed in rather than looked up.
    pub fn is_manual(&self) -> bool {
        self.fdc_id.is_none()
    }

    /// Returns the value of one macro.
    pub fn get(&self, kind: MacroKind) -> f64 {
        match kind {
            MacroKind::Calories => self.calories,
            MacroKind::Protein => self.protein,
            MacroKind::Carbs => self.carbs,
            MacroKind::Fat => self.fat,
        }
    }
}

// ============================================================================
// Daily Totals
// ============================================================================

/// Sums of each macro over the current log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTotals {
    /// Total energy in kcal.
    pub total_calories: f64,
    /// Total protein in grams.
    pub total_protein: f64,
    /// Total carbohydrate in grams.
    pub total_carbs: f64,
    /// Total fat in grams.
    pub total_fat: f64,
}

impl DailyTotals {
    /// Folds a full collection of entries into totals.
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a LoggedFood>,
    {
        entries.into_iter().fold(Self::default(), |mut acc, food| {
            acc.total_calories += food.calories;
            acc.total_protein += food.protein;
            acc.total_carbs += food.carbs;
            acc.total_fat += food.fat;
            acc
        })
    }

    /// Returns the total for one macro.
    pub fn get(&self, kind: MacroKind) -> f64 {
        match kind {
            MacroKind::Calories => self.total_calories,
            MacroKind::Protein => self.total_protein,
            MacroKind::Carbs => self.total_carbs,
            MacroKind::Fat => self.total_fat,
        }
    }
}
