//! Goals command - show the default daily goals.

use anyhow::Result;
use nutrilog_store::AppState;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Runs the goals command.
pub async fn run(cli: &Cli) -> Result<()> {
    let state = AppState::new();
    let goals = state.goals.get().await;

    match cli.format {
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format(&goals)?);
        }
        OutputFormat::Text => {
            println!("{}", TextFormatter::new(cli.use_colors()).format_goals(&goals));
        }
    }

    Ok(())
}
