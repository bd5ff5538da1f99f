//! Suggest command - typeahead suggestions for partial input.
//!
//! Feeds the input to a search session one keystroke at a time, the way a
//! search box would, and prints the suggestions published for the final text.

use anyhow::Result;
use clap::Args;
use nutrilog_core::MIN_QUERY_CHARS;
use nutrilog_fetch::{SearchSession, SuggestionEvent};
use std::time::Duration;
use tracing::debug;

use crate::commands::build_pipeline;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the suggest command.
#[derive(Args)]
pub struct SuggestArgs {
    /// Partial input, as typed so far.
    pub query: String,

    /// Delay between simulated keystrokes in milliseconds.
    #[arg(long, default_value = "0")]
    pub keystroke_ms: u64,
}

/// Runs the suggest command.
pub async fn run(args: &SuggestArgs, cli: &Cli) -> Result<()> {
    let final_query = args.query.trim();
    if final_query.chars().count() < MIN_QUERY_CHARS {
        if !cli.quiet {
            let formatter = TextFormatter::new(cli.use_colors());
            println!(
                "{}",
                formatter.format_hint(&format!("Type at least {MIN_QUERY_CHARS} characters for suggestions."))
            );
        }
        return Ok(());
    }

    let pipeline = build_pipeline(cli)?;
    let (session, mut events) = SearchSession::new(pipeline);

    let mut typed = String::new();
    for ch in args.query.chars() {
        typed.push(ch);
        session.on_query_changed(&typed);
        if args.keystroke_ms > 0 {
            tokio::time::sleep(Duration::from_millis(args.keystroke_ms)).await;
        }
    }

    while let Some(event) = events.recv().await {
        match event {
            SuggestionEvent::Ready { query, results, .. } if query == final_query => {
                match cli.format {
                    OutputFormat::Json => {
                        let formatter = JsonFormatter::new(cli.pretty);
                        println!("{}", formatter.format_suggestions(&query, &results)?);
                    }
                    OutputFormat::Text => {
                        let formatter = TextFormatter::new(cli.use_colors());
                        println!("{}", formatter.format_results(&results));
                    }
                }
                break;
            }
            SuggestionEvent::Failed { query, message, .. } if query == final_query => {
                anyhow::bail!(message);
            }
            other => debug!(event = ?other, "Skipping intermediate suggestion event"),
        }
    }

    Ok(())
}
