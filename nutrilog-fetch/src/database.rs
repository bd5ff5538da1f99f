//! Food database trait.
//!
//! A food database answers the two questions the lookup pipeline asks:
//! which foods match a query, and what a given food's nutrient detail is.
//! [`FdcClient`](crate::FdcClient) talks to FoodData Central;
//! [`StaticCatalog`](crate::StaticCatalog) serves a built-in list offline.

use async_trait::async_trait;
use nutrilog_core::{FoodCandidate, FoodDetail};

use crate::error::FetchError;

/// Source of food candidates and nutrient details.
#[async_trait]
pub trait FoodDatabase: Send + Sync {
    /// Returns a short identifier for logs (e.g. "fdc", "catalog").
    fn id(&self) -> &str;

    /// Searches for foods matching `query`.
    ///
    /// A query that is empty after trimming returns an empty list without
    /// contacting the database. Results keep the database's relevance order.
    async fn search(&self, query: &str) -> Result<Vec<FoodCandidate>, FetchError>;

    /// Fetches the raw nutrient detail for one food.
    async fn fetch_detail(&self, fdc_id: u64) -> Result<FoodDetail, FetchError>;
}
