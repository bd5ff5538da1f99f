// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # NutriLog Fetch
//!
//! Food lookup for the NutriLog application.
//!
//! ## Databases
//!
//! - [`database::FoodDatabase`] - Trait for search and detail sources
//! - [`fdc::FdcClient`] - USDA FoodData Central client
//! - [`catalog::StaticCatalog`] - Built-in offline catalog
//!
//! ## Lookup
//!
//! - [`pipeline::LookupPipeline`] - Search, concurrent enrichment, ordered merge
//! - [`session::SearchSession`] - Debounced suggestions and sequenced searches
//!
//! ## Infrastructure
//!
//! - [`http::HttpClient`] - HTTP client with redaction, allowlist and retries
//! - [`config::FdcConfig`] - Environment-driven client configuration
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use nutrilog_fetch::{FdcClient, LookupPipeline};
//!
//! let client = FdcClient::from_env()?;
//! let pipeline = LookupPipeline::new(Arc::new(client));
//!
//! for result in pipeline.lookup("greek yogurt").await? {
//!     println!("{} {:?}", result.name, result.calories);
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod database;
pub mod error;
pub mod fdc;
pub mod http;
pub mod pipeline;
pub mod session;

#[cfg(test)]
mod testing;

// Re-export key types at crate root

// Errors
pub use error::{ConfigError, FetchError};

// Databases
pub use catalog::{CATALOG_FOODS, CatalogFood, StaticCatalog};
pub use database::FoodDatabase;
pub use fdc::FdcClient;

// Configuration & transport
pub use config::{ApiKey, FdcConfig};
pub use http::{HttpClient, RetryStrategy, redact_url};

// Lookup
pub use pipeline::{DetailAttempt, LookupOutcome, LookupPipeline, MAX_CANDIDATES, SUGGESTION_LIMIT};
pub use session::{DEBOUNCE, LookupReply, SearchSession, SuggestionEvent};
