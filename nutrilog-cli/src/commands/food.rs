//! Food command - one food by identifier.

use anyhow::Result;
use clap::Args;

use crate::commands::build_pipeline;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the food command.
#[derive(Args)]
pub struct FoodArgs {
    /// FoodData Central id (catalog id with --offline).
    pub fdc_id: u64,
}

/// Runs the food command.
pub async fn run(args: &FoodArgs, cli: &Cli) -> Result<()> {
    let pipeline = build_pipeline(cli)?;
    let result = pipeline.lookup_one(args.fdc_id).await?;

    match cli.format {
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format_food(&result)?);
        }
        OutputFormat::Text => {
            println!("{}", TextFormatter::new(cli.use_colors()).format_food(&result));
        }
    }

    Ok(())
}
