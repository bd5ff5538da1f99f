// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # NutriLog Store
//!
//! State management for the NutriLog application.
//!
//! This crate provides:
//!
//! - **FoodLog**: Today's logged foods with totals published on a watch channel
//! - **GoalsStore**: Daily goals with a draft/commit edit workflow
//! - **AppState**: Both of the above, shared by cloning
//!
//! ## Usage
//!
//! ```ignore
//! use nutrilog_store::AppState;
//!
//! let state = AppState::new();
//!
//! // Log a fully normalized result
//! state.log_food(&result).await?;
//!
//! // Subscribe to totals
//! let mut rx = state.log.subscribe();
//! while rx.changed().await.is_ok() {
//!     println!("Calories: {}", rx.borrow().total_calories);
//! }
//! ```

pub mod error;
pub mod goals_store;
pub mod log_store;
pub mod state;

pub use error::StoreError;
pub use goals_store::{GoalsDraft, GoalsStore};
pub use log_store::FoodLog;
pub use state::{AppState, DaySummary};
