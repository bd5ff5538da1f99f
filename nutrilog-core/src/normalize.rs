//! Nutrient normalization.
//!
//! Turns a raw [`FoodDetail`] into a [`NutritionResult`]. Each macro is
//! resolved by nutrient ID first; only when no entry carries a matching ID is
//! the nutrient name consulted. The first matching entry wins, and its amount
//! is taken as-is: a matched entry with no amount stays `None`.

use crate::error::CoreError;
use crate::models::{FoodDetail, FoodNutrient, MacroKind, NutritionResult};

/// Normalizes the detail record of food `fdc_id`.
///
/// # Errors
///
/// Returns [`CoreError::InvalidData`] when the record has no usable
/// description, since a result must always carry a name.
pub fn normalize(fdc_id: u64, detail: &FoodDetail) -> Result<NutritionResult, CoreError> {
    let name = detail
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| CoreError::InvalidData(format!("food {fdc_id} has no description")))?;

    let mut result = NutritionResult::empty(fdc_id, name);
    for kind in MacroKind::ALL {
        result.set(kind, resolve_macro(&detail.food_nutrients, kind));
    }
    result.serving_size = detail.serving_size;

    Ok(result)
}

/// Resolves one macro from a nutrient list.
pub fn resolve_macro(nutrients: &[FoodNutrient], kind: MacroKind) -> Option<f64> {
    let ids = kind.nutrient_ids();
    let names = kind.nutrient_names();

    let by_id = nutrients
        .iter()
        .find(|n| n.nutrient_id().is_some_and(|id| ids.contains(&id)));
    if let Some(entry) = by_id {
        return entry.amount;
    }

    nutrients
        .iter()
        .find(|n| n.nutrient_name().is_some_and(|name| names.contains(&name)))
        .and_then(|entry| entry.amount)
}
