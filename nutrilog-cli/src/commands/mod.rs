//! CLI command implementations.

pub mod food;
pub mod goals;
pub mod search;
pub mod session;
pub mod suggest;

use std::sync::Arc;

use anyhow::Result;
use nutrilog_fetch::{FdcClient, FoodDatabase, LookupPipeline, StaticCatalog};
use tracing::debug;

use crate::Cli;

/// Builds the lookup pipeline over the selected database.
///
/// The remote client needs `USDA_API_KEY`; `--offline` needs nothing.
pub fn build_pipeline(cli: &Cli) -> Result<LookupPipeline> {
    let database: Arc<dyn FoodDatabase> = if cli.offline {
        Arc::new(StaticCatalog::new())
    } else {
        Arc::new(FdcClient::from_env()?)
    };

    debug!(database = database.id(), "Database selected");
    Ok(LookupPipeline::new(database))
}
