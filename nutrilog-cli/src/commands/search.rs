//! Search command - full lookup with nutrition for each match.

use anyhow::Result;
use clap::Args;
use nutrilog_core::ValidationError;
use tracing::info;

use crate::commands::build_pipeline;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Search terms (joined with spaces).
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Show per-food fetch diagnostics.
    #[arg(long)]
    pub report: bool,
}

/// Runs the search command.
pub async fn run(args: &SearchArgs, cli: &Cli) -> Result<()> {
    let joined = args.query.join(" ");
    let query = ValidationError::check_query(&joined)?;

    let pipeline = build_pipeline(cli)?;
    info!(query, database = pipeline.database_id(), "Searching");

    let outcome = pipeline.lookup_with_report(query).await?;

    match cli.format {
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_search(query, &outcome, args.report)?);
        }
        OutputFormat::Text => {
            let formatter = TextFormatter::new(cli.use_colors());
            println!("{}", formatter.format_results(&outcome.results));
            if args.report && !outcome.attempts.is_empty() {
                println!();
                println!("{}", formatter.format_report(&outcome));
            }
        }
    }

    if outcome.results.is_empty() {
        std::process::exit(ExitCode::NoResults as i32);
    }

    Ok(())
}
