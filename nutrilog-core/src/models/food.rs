//! Search candidates and normalized nutrition results.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::nutrient::MacroKind;

// ============================================================================
// Data Type
// ============================================================================

/// Source category of a food in the remote database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DataType {
    /// Branded food products.
    Branded,
    /// Foundation foods.
    Foundation,
    /// Survey foods (FNDDS).
    #[serde(rename = "Survey (FNDDS)")]
    SurveyFndds,
    /// Standard Reference legacy foods.
    #[serde(rename = "SR Legacy")]
    SrLegacy,
    /// Experimental foods.
    Experimental,
    /// Any category this client does not know about.
    #[default]
    #[serde(other)]
    Unknown,
}

impl DataType {
    /// Categories a search is restricted to.
    pub const SEARCHABLE: [DataType; 3] = [
        DataType::Branded,
        DataType::Foundation,
        DataType::SurveyFndds,
    ];

    /// Returns the wire name of this category.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Branded => "Branded",
            Self::Foundation => "Foundation",
            Self::SurveyFndds => "Survey (FNDDS)",
            Self::SrLegacy => "SR Legacy",
            Self::Experimental => "Experimental",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Food Candidate
// ============================================================================

/// A search hit before nutrient details are fetched.
///
/// Candidates keep the order the remote database returned them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodCandidate {
    /// Remote food identifier.
    pub fdc_id: u64,
    /// Display name.
    pub name: String,
    /// Brand owner, for branded foods.
    pub brand: Option<String>,
    /// Source category.
    pub data_type: DataType,
    /// Relevance score (higher is more relevant).
    pub score: Option<f64>,
}

impl FoodCandidate {
    /// Creates a candidate with no brand or score.
    pub fn new(fdc_id: u64, name: impl Into<String>) -> Self {
        Self {
            fdc_id,
            name: name.into(),
            brand: None,
            data_type: DataType::Unknown,
            score: None,
        }
    }
}

// ============================================================================
// Nutrition Result
// ============================================================================

/// Normalized nutrition for one food.
///
/// Each macro is either a measured value or `None`; a missing measurement is
/// never reported as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionResult {
    /// Remote food identifier.
    pub fdc_id: u64,
    /// Display name.
    pub name: String,
    /// Energy in kcal.
    pub calories: Option<f64>,
    /// Protein in grams.
    pub protein: Option<f64>,
    /// Carbohydrate in grams.
    pub carbs: Option<f64>,
    /// Total fat in grams.
    pub fat: Option<f64>,
    /// Serving size.
    pub serving_size: Option<f64>,
}

impl NutritionResult {
    /// Creates a result with every macro and the serving size unknown.
    pub fn empty(fdc_id: u64, name: impl Into<String>) -> Self {
        Self {
            fdc_id,
            name: name.into(),
            calories: None,
            protein: None,
            carbs: None,
            fat: None,
            serving_size: None,
        }
    }

    /// Stand-in used when a candidate's detail could not be loaded.
    pub fn placeholder(candidate: &FoodCandidate) -> Self {
        Self::empty(candidate.fdc_id, candidate.name.clone())
    }

    /// Returns the value of one macro.
    pub fn get(&self, kind: MacroKind) -> Option<f64> {
        match kind {
            MacroKind::Calories => self.calories,
            MacroKind::Protein => self.protein,
            MacroKind::Carbs => self.carbs,
            MacroKind::Fat => self.fat,
        }
    }

    /// Sets the value of one macro.
    pub fn set(&mut self, kind: MacroKind, value: Option<f64>) {
        match kind {
            MacroKind::Calories => self.calories = value,
            MacroKind::Protein => self.protein = value,
            MacroKind::Carbs => self.carbs = value,
            MacroKind::Fat => self.fat = value,
        }
    }

    /// Returns true if all four macros are known.
    pub fn has_complete_macros(&self) -> bool {
        MacroKind::ALL.iter().all(|k| self.get(*k).is_some())
    }

    /// Returns true if at least one macro is known.
    pub fn has_any_macro(&self) -> bool {
        MacroKind::ALL.iter().any(|k| self.get(*k).is_some())
    }
}
