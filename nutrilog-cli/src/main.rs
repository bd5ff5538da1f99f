// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! NutriLog CLI - food search and daily macro tracking from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Search FoodData Central (needs USDA_API_KEY)
//! nutrilog search greek yogurt
//!
//! # Typeahead suggestions
//! nutrilog suggest chick
//!
//! # One food by FDC id
//! nutrilog food 171688
//!
//! # Default goals
//! nutrilog goals
//!
//! # Interactive log (default when no command is given)
//! nutrilog session
//!
//! # Built-in catalog, no API key
//! nutrilog --offline search apple
//!
//! # JSON output
//! nutrilog --format json --pretty search banana
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use nutrilog_fetch::{ConfigError, FetchError};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{food, goals, search, session, suggest};

// ============================================================================
// CLI Definition
// ============================================================================

/// NutriLog CLI - food search and daily macro tracking.
#[derive(Parser)]
#[command(name = "nutrilog")]
#[command(about = "Food search and daily macro tracking CLI")]
#[command(long_about = r#"
NutriLog looks up foods in USDA FoodData Central, logs what you eat,
and tracks calories, protein, carbs and fat against daily goals.

Set USDA_API_KEY to your FoodData Central key, or pass --offline to use
the built-in catalog of common foods.

Examples:
  nutrilog search greek yogurt     # Full lookup
  nutrilog suggest chick           # Typeahead suggestions
  nutrilog food 171688             # One food by FDC id
  nutrilog goals                   # Default goals
  nutrilog session                 # Interactive log
"#)]
#[command(version)]
#[command(author = "NutriLog Contributors")]
pub struct Cli {
    /// Subcommand to run. If none, starts an interactive session.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Use the built-in food catalog instead of FoodData Central.
    #[arg(long, global = true)]
    pub offline: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Search for foods and show their macros.
    #[command(visible_alias = "s")]
    Search(search::SearchArgs),

    /// Show typeahead suggestions for partial input.
    Suggest(suggest::SuggestArgs),

    /// Show one food by its FoodData Central id.
    #[command(visible_alias = "f")]
    Food(food::FoodArgs),

    /// Show the default daily goals.
    #[command(visible_alias = "g")]
    Goals,

    /// Interactive session: search, log foods, track goals.
    Session,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// General error.
    Error = 1,
    /// Configuration missing or invalid.
    Config = 2,
    /// Search returned nothing.
    NoResults = 3,
}

impl Cli {
    /// Returns true if text output should carry ANSI colors.
    pub fn use_colors(&self) -> bool {
        !self.no_color && self.format == OutputFormat::Text
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new(
                "nutrilog=debug,nutrilog_core=debug,nutrilog_fetch=debug,nutrilog_store=debug,info",
            )
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Maps an error to the process exit code.
fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<FetchError>() {
        Some(FetchError::Config(_)) => ExitCode::Config,
        _ if err.downcast_ref::<ConfigError>().is_some() => ExitCode::Config,
        _ => ExitCode::Error,
    }
}

/// Message shown for a failed command.
fn error_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<FetchError>() {
        Some(fetch) => fetch.user_message(),
        None => err.to_string(),
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Some(Commands::Search(args)) => search::run(args, &cli).await,
        Some(Commands::Suggest(args)) => suggest::run(args, &cli).await,
        Some(Commands::Food(args)) => food::run(args, &cli).await,
        Some(Commands::Goals) => goals::run(&cli).await,
        Some(Commands::Session) | None => session::run(&cli).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {}", error_message(&e));
            if cli.verbose {
                eprintln!("Caused by: {e:#}");
            }
        }
        std::process::exit(exit_code_for(&e) as i32);
    }

    Ok(())
}
