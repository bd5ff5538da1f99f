// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `NutriLog` Core
//!
//! Core types, models, and nutrient normalization for `NutriLog`.
//!
//! This crate has no I/O. It provides:
//!
//! - Domain models (candidates, normalized results, log entries, goals)
//! - The nutrient normalizer (ID-first, name-fallback macro resolution)
//! - Error and validation types
//!
//! ## Key Types
//!
//! ### Search & Nutrition
//! - [`FoodCandidate`] - Search hit before detail enrichment
//! - [`NutritionResult`] - Normalized per-food macros (each nullable)
//! - [`FoodDetail`] - Raw detail record from the remote database
//! - [`MacroKind`] - The four tracked macros and their nutrient tables
//!
//! ### Log & Goals
//! - [`LoggedFood`] - Entry in the daily log (all macros required)
//! - [`DailyTotals`] - Sums over the log
//! - [`Goals`] / [`GoalProgress`] - Daily targets and progress toward them

pub mod error;
pub mod models;
pub mod normalize;

// Re-export error types
pub use error::{CoreError, MIN_QUERY_CHARS, ValidationError};

// Re-export all model types
pub use models::{
    // Search & nutrition
    DataType,
    FoodCandidate,
    FoodDetail,
    FoodNutrient,
    MacroKind,
    NutrientRef,
    NutritionResult,
    // Log
    DailyTotals,
    LogId,
    LoggedFood,
    MealMacros,
    parse_macro_input,
    // Goals
    GoalProgress,
    Goals,
    MacroProgress,
    parse_goal_input,
};

pub use normalize::{normalize, resolve_macro};
