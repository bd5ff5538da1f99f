//! Domain models for NutriLog.
//!
//! ## Submodules
//!
//! - [`food`] - Search candidates and normalized results
//! - [`nutrient`] - Macro kinds, nutrient tables, raw detail records
//! - [`log`] - Logged foods and daily totals
//! - [`goals`] - Daily goals and progress

mod food;
mod goals;
mod log;
mod nutrient;

pub use food::{DataType, FoodCandidate, NutritionResult};
pub use goals::{parse_goal_input, GoalProgress, Goals, MacroProgress};
pub use log::{parse_macro_input, DailyTotals, LogId, LoggedFood, MealMacros};
pub use nutrient::{FoodDetail, FoodNutrient, MacroKind, NutrientRef};
#[cfg(test)]
mod serde_tests;
