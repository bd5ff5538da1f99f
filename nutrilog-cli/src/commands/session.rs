//! Session command - interactive search, log and goals.
//!
//! Reads one command per line from stdin. Errors are reported inline and
//! never end the session.

use std::io::{IsTerminal, Write};
use std::str::FromStr;

use anyhow::Result;
use nutrilog_core::{LogId, LoggedFood, MacroKind, MealMacros, NutritionResult};
use nutrilog_fetch::{LookupPipeline, LookupReply, SearchSession};
use nutrilog_store::{AppState, StoreError};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::commands::build_pipeline;
use crate::output::{ErrorOutput, JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

const HELP: &str = "\
Commands:
  search <query>                        Look up foods
  add <n>                               Log result n of the last search
  add-custom <name> <cal> <protein> <carbs> <fat>
                                        Log a meal by hand (bad amounts count as 0)
  remove <id>                           Remove log entry #id
  log                                   Show today's log
  totals                                Show today's totals
  goals                                 Show goals and progress
  goals set <cal> <protein> <fat> <carbs>
                                        Replace all goals
  goals reset                           Restore default goals
  help                                  Show this help
  quit                                  Leave the session";

// ============================================================================
// Commands
// ============================================================================

/// One line of session input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Look up foods.
    Search(String),
    /// Log a result of the last search (1-based).
    Add(usize),
    /// Log a meal by hand: name, then raw calories, protein, carbs, fat.
    AddCustom(String, [String; 4]),
    /// Remove a log entry.
    Remove(LogId),
    /// Show the log.
    Log,
    /// Show totals.
    Totals,
    /// Show goals and progress.
    Goals,
    /// Replace goals from raw inputs (calories, protein, fat, carbs).
    SetGoals([String; 4]),
    /// Restore default goals.
    ResetGoals,
    /// Show help.
    Help,
    /// End the session.
    Quit,
}

impl FromStr for SessionCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match verb.to_lowercase().as_str() {
            "search" | "s" => Ok(Self::Search(rest.to_string())),
            "add" | "a" => rest
                .parse::<usize>()
                .ok()
                .filter(|&n| n > 0)
                .map(Self::Add)
                .ok_or_else(|| "Usage: add <n> (result number from the last search)".to_string()),
            "add-custom" | "custom" => parse_custom(rest),
            "remove" | "rm" => rest
                .trim_start_matches('#')
                .parse::<LogId>()
                .map(Self::Remove)
                .map_err(|_| "Usage: remove <id> (log entry number)".to_string()),
            "log" => Ok(Self::Log),
            "totals" => Ok(Self::Totals),
            "goals" => parse_goals(rest),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(format!("Unknown command: {other}. Type 'help' for commands.")),
        }
    }
}

/// The last four words are the amounts; everything before is the name.
fn parse_custom(rest: &str) -> Result<SessionCommand, String> {
    let words: Vec<&str> = rest.split_whitespace().collect();
    let Some(split) = words.len().checked_sub(4).filter(|&n| n > 0) else {
        return Err("Usage: add-custom <name> <cal> <protein> <carbs> <fat>".to_string());
    };

    let name = words[..split].join(" ");
    let amounts = [words[split], words[split + 1], words[split + 2], words[split + 3]].map(str::to_string);
    Ok(SessionCommand::AddCustom(name, amounts))
}

fn parse_goals(rest: &str) -> Result<SessionCommand, String> {
    let mut parts = rest.split_whitespace();
    match parts.next() {
        None => Ok(SessionCommand::Goals),
        Some("reset") => Ok(SessionCommand::ResetGoals),
        Some("set") => {
            let values: Vec<String> = parts.map(str::to_string).collect();
            <[String; 4]>::try_from(values)
                .map(SessionCommand::SetGoals)
                .map_err(|_| "Usage: goals set <cal> <protein> <fat> <carbs>".to_string())
        }
        Some(other) => Err(format!("Unknown goals command: {other}")),
    }
}

// ============================================================================
// Session
// ============================================================================

/// Outcome of one command.
#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
    /// Text to print.
    Output(String),
    /// End the session.
    Quit,
}

/// Interactive session state.
///
/// Searches go through [`SearchSession::submit`] only. A REPL has no
/// keystrokes to debounce, so the suggestion event receiver is dropped at
/// construction and typeahead stays unused here.
pub struct Session {
    state: AppState,
    search: SearchSession,
    last_results: Vec<NutritionResult>,
    format: OutputFormat,
    text: TextFormatter,
    json: JsonFormatter,
}

impl Session {
    /// Creates a session over a pipeline.
    pub fn new(pipeline: LookupPipeline, format: OutputFormat, use_colors: bool, pretty: bool) -> Self {
        let (search, _events) = SearchSession::new(pipeline);
        Self {
            state: AppState::new(),
            search,
            last_results: Vec::new(),
            format,
            text: TextFormatter::new(use_colors),
            json: JsonFormatter::new(pretty),
        }
    }

    /// Returns the session state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Parses and runs one line of input.
    pub async fn handle_line(&mut self, line: &str) -> Result<Reply> {
        match line.parse::<SessionCommand>() {
            Ok(command) => self.execute(command).await,
            Err(message) => self.error(ErrorOutput::local(message)).map(Reply::Output),
        }
    }

    /// Runs one command.
    pub async fn execute(&mut self, command: SessionCommand) -> Result<Reply> {
        debug!(command = ?command, "Executing session command");

        let output = match command {
            SessionCommand::Search(query) => self.search(&query).await?,
            SessionCommand::Add(n) => self.add(n).await?,
            SessionCommand::AddCustom(name, amounts) => self.add_custom(&name, &amounts).await?,
            SessionCommand::Remove(log_id) => self.remove(log_id).await?,
            SessionCommand::Log => {
                let entries = self.state.log.entries().await;
                self.render(&entries, |text| text.format_log(&entries))?
            }
            SessionCommand::Totals => {
                let totals = self.state.log.totals().await;
                self.render(&totals, |text| text.format_totals(&totals))?
            }
            SessionCommand::Goals => self.show_goals().await?,
            SessionCommand::SetGoals(inputs) => {
                let mut draft = self.state.goals.edit().await;
                let kinds = [MacroKind::Calories, MacroKind::Protein, MacroKind::Fat, MacroKind::Carbs];
                for (kind, input) in kinds.into_iter().zip(&inputs) {
                    draft.set_input(kind, input);
                }
                draft.commit(&self.state.goals).await;
                self.show_goals().await?
            }
            SessionCommand::ResetGoals => {
                self.state.goals.reset().await;
                self.show_goals().await?
            }
            SessionCommand::Help => HELP.to_string(),
            SessionCommand::Quit => return Ok(Reply::Quit),
        };

        Ok(Reply::Output(output))
    }

    async fn search(&mut self, query: &str) -> Result<String> {
        match self.search.submit(query).await {
            Ok(LookupReply::Current { results, .. }) => {
                let output = match self.format {
                    OutputFormat::Json => self.json.format_results(&results)?,
                    OutputFormat::Text => self.text.format_results(&results),
                };
                self.last_results = results;
                Ok(output)
            }
            Ok(LookupReply::Superseded { seq }) => {
                debug!(seq, "Search superseded");
                self.error(ErrorOutput::local("Search superseded by a newer one."))
            }
            Err(err) => self.error(ErrorOutput::from_fetch(&err)),
        }
    }

    async fn add(&mut self, n: usize) -> Result<String> {
        let Some(result) = self.last_results.get(n - 1) else {
            return self.error(ErrorOutput::local(format!(
                "No result {n}. Search first, then add a result number."
            )));
        };

        match self.state.log_food(result).await {
            Ok(entry) => {
                info!(log_id = %entry.log_id, "Added from session");
                let message = format!("Added {} (#{})", entry.name, entry.log_id);
                self.render(&entry, |text| text.format_ok(&message))
            }
            Err(StoreError::Validation(err)) => self.error(ErrorOutput::from_validation(&err)),
            Err(err) => Err(err.into()),
        }
    }

    async fn add_custom(&self, name: &str, amounts: &[String; 4]) -> Result<String> {
        let [calories, protein, carbs, fat] = amounts;
        let macros = MealMacros::from_inputs(calories, protein, carbs, fat);

        match self.state.log_meal(name, macros).await {
            Ok(entry) => {
                info!(log_id = %entry.log_id, "Added custom meal from session");
                let message = format!("Added {} (#{})", entry.name, entry.log_id);
                self.render(&entry, |text| text.format_ok(&message))
            }
            Err(StoreError::Validation(err)) => self.error(ErrorOutput::from_validation(&err)),
            Err(err) => Err(err.into()),
        }
    }

    async fn remove(&self, log_id: LogId) -> Result<String> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct RemoveOutput<'a> {
            log_id: LogId,
            removed: Option<&'a LoggedFood>,
        }

        let removed = self.state.remove_food(log_id).await;
        let output = RemoveOutput {
            log_id,
            removed: removed.as_ref(),
        };
        self.render(&output, |text| match &removed {
            Some(entry) => text.format_ok(&format!("Removed {} (#{})", entry.name, entry.log_id)),
            None => text.format_hint(&format!("Nothing to remove (#{log_id})")),
        })
    }

    async fn show_goals(&self) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                #[derive(Serialize)]
                struct GoalsOutput<'a> {
                    goals: &'a nutrilog_core::Goals,
                    progress: &'a nutrilog_core::GoalProgress,
                }

                let goals = self.state.goals.get().await;
                let progress = self.state.progress().await;
                self.json.format(&GoalsOutput {
                    goals: &goals,
                    progress: &progress,
                })
            }
            OutputFormat::Text => {
                let goals = self.state.goals.get().await;
                let progress = self.state.progress().await;
                Ok(format!(
                    "{}\n\n{}",
                    self.text.format_goals(&goals),
                    self.text.format_progress(&progress)
                ))
            }
        }
    }

    fn render<T: Serialize>(&self, data: &T, text: impl FnOnce(&TextFormatter) -> String) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.json.format(data),
            OutputFormat::Text => Ok(text(&self.text)),
        }
    }

    fn error(&self, error: ErrorOutput) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.json.format_error(&error),
            OutputFormat::Text => Ok(self.text.format_error(&error.error)),
        }
    }
}

// ============================================================================
// Runner
// ============================================================================

/// Runs the session command.
pub async fn run(cli: &Cli) -> Result<()> {
    let pipeline = build_pipeline(cli)?;
    let mut session = Session::new(pipeline, cli.format, cli.use_colors(), cli.pretty);

    let interactive = std::io::stdin().is_terminal() && cli.format == OutputFormat::Text;
    if interactive && !cli.quiet {
        println!("NutriLog session ({}). Type 'help' for commands.", session.search.pipeline().database_id());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if interactive {
            print!("> ");
            std::io::stdout().flush()?;
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match session.handle_line(&line).await? {
            Reply::Output(output) => println!("{output}"),
            Reply::Quit => break,
        }
    }

    info!(entries = session.state().log.len().await, "Session ended");
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use nutrilog_fetch::StaticCatalog;
    use std::sync::Arc;

    fn session(format: OutputFormat) -> Session {
        let pipeline = LookupPipeline::new(Arc::new(StaticCatalog::new()));
        Session::new(pipeline, format, false, false)
    }

    async fn output(session: &mut Session, line: &str) -> String {
        match session.handle_line(line).await.unwrap() {
            Reply::Output(output) => output,
            Reply::Quit => panic!("unexpected quit"),
        }
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            "search greek yogurt".parse(),
            Ok(SessionCommand::Search("greek yogurt".to_string()))
        );
        assert_eq!("add 2".parse(), Ok(SessionCommand::Add(2)));
        assert_eq!("remove #3".parse(), Ok(SessionCommand::Remove(LogId::new(3))));
        assert_eq!(
            "add-custom chicken salad 450 35 12 x".parse(),
            Ok(SessionCommand::AddCustom(
                "chicken salad".to_string(),
                ["450", "35", "12", "x"].map(str::to_string)
            ))
        );
        assert_eq!("LOG".parse(), Ok(SessionCommand::Log));
        assert_eq!("goals".parse(), Ok(SessionCommand::Goals));
        assert_eq!("goals reset".parse(), Ok(SessionCommand::ResetGoals));
        assert_eq!(
            "goals set 1800 120 60 200".parse(),
            Ok(SessionCommand::SetGoals([
                "1800".to_string(),
                "120".to_string(),
                "60".to_string(),
                "200".to_string()
            ]))
        );
        assert_eq!("quit".parse(), Ok(SessionCommand::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert!("add 0".parse::<SessionCommand>().is_err());
        assert!("add one".parse::<SessionCommand>().is_err());
        assert!("remove".parse::<SessionCommand>().is_err());
        assert!("add-custom 450 35 12 9".parse::<SessionCommand>().is_err());
        assert!("add-custom".parse::<SessionCommand>().is_err());
        assert!("goals set 1 2 3".parse::<SessionCommand>().is_err());
        assert!("dance".parse::<SessionCommand>().is_err());
    }

    #[tokio::test]
    async fn test_search_add_totals() {
        let mut session = session(OutputFormat::Text);

        let results = output(&mut session, "search banana").await;
        assert!(results.starts_with("Found 1 food"));

        let added = output(&mut session, "add 1").await;
        assert_eq!(added, "✓ Added Banana, medium (#1)");

        let totals = output(&mut session, "totals").await;
        assert!(totals.contains("Calories:  105 kcal"));
    }

    #[tokio::test]
    async fn test_add_without_search() {
        let mut session = session(OutputFormat::Text);
        let reply = output(&mut session, "add 1").await;
        assert!(reply.starts_with("Error: No result 1."));
        assert!(session.state().log.is_empty().await);
    }

    #[tokio::test]
    async fn test_remove_entry() {
        let mut session = session(OutputFormat::Text);
        output(&mut session, "search egg").await;
        output(&mut session, "add 1").await;

        assert_eq!(output(&mut session, "remove 1").await, "✓ Removed Egg (large) (#1)");
        assert_eq!(output(&mut session, "remove 1").await, "Nothing to remove (#1)");
        assert_eq!(output(&mut session, "remove 99").await, "Nothing to remove (#99)");
        assert!(session.state().log.is_empty().await);
    }

    #[tokio::test]
    async fn test_remove_unknown_json() {
        let mut session = session(OutputFormat::Json);
        let reply = output(&mut session, "remove 7").await;
        let value: serde_json::Value = serde_json::from_str(&reply).unwrap();

        assert_eq!(value["logId"], 7);
        assert!(value["removed"].is_null());
        assert!(value.get("error").is_none());
    }

    #[tokio::test]
    async fn test_add_custom_meal() {
        let mut session = session(OutputFormat::Text);

        let added = output(&mut session, "add-custom Chicken salad 450 35 abc 20").await;
        assert_eq!(added, "✓ Added Chicken salad (#1)");

        let entry = &session.state().log.entries().await[0];
        assert!(entry.is_manual());
        assert!(entry.carbs.abs() < 1e-9);

        let totals = output(&mut session, "totals").await;
        assert!(totals.contains("Calories:  450 kcal"));
        assert!(totals.contains("Protein:   35 g"));
    }

    #[tokio::test]
    async fn test_short_search_is_rejected_inline() {
        let mut session = session(OutputFormat::Text);
        let reply = output(&mut session, "search a").await;
        assert_eq!(reply, "Error: Please enter at least 2 characters.");
    }

    #[tokio::test]
    async fn test_set_goals_through_draft() {
        let mut session = session(OutputFormat::Text);
        output(&mut session, "goals set 1,800 120 abc 200").await;

        let goals = session.state().goals.get().await;
        assert_eq!(goals.calories, 1800);
        assert_eq!(goals.protein, 120);
        assert_eq!(goals.fat, 0);
        assert_eq!(goals.carbs, 200);

        output(&mut session, "goals reset").await;
        assert_eq!(session.state().goals.get().await.calories, 2000);
    }

    #[tokio::test]
    async fn test_json_replies() {
        let mut session = session(OutputFormat::Json);

        let results = output(&mut session, "search apple").await;
        let value: serde_json::Value = serde_json::from_str(&results).unwrap();
        assert_eq!(value[0]["name"], "Apple, medium");

        let added = output(&mut session, "add 1").await;
        let value: serde_json::Value = serde_json::from_str(&added).unwrap();
        assert_eq!(value["logId"], 1);

        let error = output(&mut session, "search").await;
        let value: serde_json::Value = serde_json::from_str(&error).unwrap();
        assert_eq!(value["kind"], "validation");
        assert_eq!(value["error"], "Please enter a search term.");
    }

    #[tokio::test]
    async fn test_quit() {
        let mut session = session(OutputFormat::Text);
        assert_eq!(session.handle_line("quit").await.unwrap(), Reply::Quit);
    }
}
