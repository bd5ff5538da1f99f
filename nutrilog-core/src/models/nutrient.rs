//! Macro kinds, the nutrient lookup tables, and raw detail records.
//!
//! The detail records mirror the FoodData Central `food/{id}` response. Every
//! field is optional because database entries are inconsistent: some omit
//! nutrient IDs, some omit amounts.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Macro Kind
// ============================================================================

/// One of the four tracked nutrient quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacroKind {
    /// Energy in kcal.
    Calories,
    /// Protein in grams.
    Protein,
    /// Carbohydrate in grams.
    Carbs,
    /// Total fat in grams.
    Fat,
}

impl MacroKind {
    /// All macro kinds in display order.
    pub const ALL: [MacroKind; 4] = [
        MacroKind::Calories,
        MacroKind::Protein,
        MacroKind::Carbs,
        MacroKind::Fat,
    ];

    /// FoodData Central nutrient IDs that identify this macro.
    pub fn nutrient_ids(self) -> &'static [u32] {
        match self {
            Self::Calories => &[1008],
            Self::Protein => &[1003],
            Self::Carbs => &[1005],
            Self::Fat => &[1004],
        }
    }

    /// Nutrient names used when an entry carries no matching ID.
    pub fn nutrient_names(self) -> &'static [&'static str] {
        match self {
            Self::Calories => &["Energy"],
            Self::Protein => &["Protein"],
            Self::Carbs => &["Carbohydrate, by difference"],
            Self::Fat => &["Total lipid (fat)"],
        }
    }

    /// Returns the display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Calories => "Calories",
            Self::Protein => "Protein",
            Self::Carbs => "Carbs",
            Self::Fat => "Fat",
        }
    }

    /// Returns the unit suffix.
    pub fn unit(self) -> &'static str {
        match self {
            Self::Calories => "kcal",
            _ => "g",
        }
    }
}

impl fmt::Display for MacroKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Raw Detail Records
// ============================================================================

/// Raw nutrient detail for one food, as returned by the remote database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodDetail {
    /// Remote identifier, when echoed back.
    #[serde(default)]
    pub fdc_id: Option<u64>,
    /// Food description (display name).
    #[serde(default)]
    pub description: Option<String>,
    /// Serving size amount.
    #[serde(default)]
    pub serving_size: Option<f64>,
    /// Serving size unit (usually `g`).
    #[serde(default)]
    pub serving_size_unit: Option<String>,
    /// Nutrient entries.
    #[serde(default)]
    pub food_nutrients: Vec<FoodNutrient>,
}

/// One nutrient entry of a [`FoodDetail`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FoodNutrient {
    /// Which nutrient this entry measures.
    #[serde(default)]
    pub nutrient: Option<NutrientRef>,
    /// Measured amount per serving basis. Absent means "not measured".
    #[serde(default)]
    pub amount: Option<f64>,
}

/// Nutrient identity inside a [`FoodNutrient`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutrientRef {
    /// Numeric nutrient ID (e.g. 1008 for energy).
    #[serde(default)]
    pub id: Option<u32>,
    /// Legacy nutrient number (e.g. "208").
    #[serde(default)]
    pub number: Option<String>,
    /// Nutrient name (e.g. "Energy").
    #[serde(default)]
    pub name: Option<String>,
    /// Unit name (e.g. "kcal").
    #[serde(default)]
    pub unit_name: Option<String>,
}

impl FoodNutrient {
    /// Creates an entry tagged with a nutrient ID.
    pub fn with_id(id: u32, amount: Option<f64>) -> Self {
        Self {
            nutrient: Some(NutrientRef {
                id: Some(id),
                ..Default::default()
            }),
            amount,
        }
    }

    /// Creates an entry carrying only a nutrient name.
    pub fn with_name(name: impl Into<String>, amount: Option<f64>) -> Self {
        Self {
            nutrient: Some(NutrientRef {
                name: Some(name.into()),
                ..Default::default()
            }),
            amount,
        }
    }

    /// Returns the nutrient ID, if any.
    pub fn nutrient_id(&self) -> Option<u32> {
        self.nutrient.as_ref().and_then(|n| n.id)
    }

    /// Returns the nutrient name, if any.
    pub fn nutrient_name(&self) -> Option<&str> {
        self.nutrient.as_ref().and_then(|n| n.name.as_deref())
    }
}
