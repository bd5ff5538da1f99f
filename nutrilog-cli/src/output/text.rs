//! Text output formatting with progress bars and colors.

use nutrilog_core::{
    DailyTotals, GoalProgress, Goals, LoggedFood, MacroKind, MacroProgress, NutritionResult,
};
use nutrilog_fetch::LookupOutcome;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

// Progress bar characters
const BAR_FULL: char = '█';
const BAR_EMPTY: char = '░';

/// Shown in place of an unknown macro value.
const UNKNOWN: &str = "?";

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
    bar_width: usize,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self {
            use_colors,
            bar_width: 20,
        }
    }

    /// Set the progress bar width.
    #[cfg(test)]
    pub fn with_bar_width(mut self, width: usize) -> Self {
        self.bar_width = width;
        self
    }

    // ========================================================================
    // Search results
    // ========================================================================

    /// Formats lookup results as a numbered list.
    pub fn format_results(&self, results: &[NutritionResult]) -> String {
        if results.is_empty() {
            return "No foods found.".to_string();
        }

        let noun = if results.len() == 1 { "food" } else { "foods" };
        let mut lines = vec![self.bold(&format!("Found {} {noun}", results.len()))];

        for (i, result) in results.iter().enumerate() {
            lines.push(format!("{:>2}. {}", i + 1, self.format_result_line(result)));
        }

        lines.join("\n")
    }

    /// Formats one result on a single line.
    pub fn format_result_line(&self, result: &NutritionResult) -> String {
        if !result.has_any_macro() {
            return format!("{} {}", result.name, self.dim("(nutrition unavailable)"));
        }

        let macros = MacroKind::ALL
            .iter()
            .map(|&kind| format_macro(kind, result.get(kind)))
            .collect::<Vec<_>>()
            .join(" · ");

        let suffix = if result.has_complete_macros() {
            String::new()
        } else {
            format!(" {}", self.yellow("(incomplete)"))
        };

        format!("{}  {}{suffix}", result.name, self.dim(&macros))
    }

    /// Formats a single food as a detail card.
    pub fn format_food(&self, result: &NutritionResult) -> String {
        let mut lines = vec![
            self.bold(&result.name),
            self.dim(&format!("FDC #{}", result.fdc_id)),
        ];

        if let Some(serving) = result.serving_size {
            lines.push(format!("{:<10} {}", "Serving:", format_number(serving)));
        }

        for kind in MacroKind::ALL {
            let value = result
                .get(kind)
                .map_or_else(|| self.dim(UNKNOWN), |v| format!("{} {}", format_number(v), kind.unit()));
            lines.push(format!("{:<10} {value}", format!("{}:", kind.label())));
        }

        if !result.has_complete_macros() {
            lines.push(self.yellow("Nutritional information incomplete. Cannot add to log."));
        }

        lines.join("\n")
    }

    /// Formats per-candidate diagnostics of a lookup.
    pub fn format_report(&self, outcome: &LookupOutcome) -> String {
        let mut lines = vec![self.dim(&format!(
            "{} hits, {} enriched, {} failed in {:.0?}",
            outcome.total_hits,
            outcome.attempts.len(),
            outcome.failures(),
            outcome.duration
        ))];

        for attempt in &outcome.attempts {
            let status = if attempt.success {
                self.green("✓")
            } else {
                self.red("✗")
            };
            let mut line = format!("  {status} #{} {:.0?}", attempt.fdc_id, attempt.duration);
            if let Some(error) = &attempt.error {
                line.push_str(&format!(" {}", self.dim(error)));
            }
            lines.push(line);
        }

        lines.join("\n")
    }

    // ========================================================================
    // Log & goals
    // ========================================================================

    /// Formats the log entries.
    pub fn format_log(&self, entries: &[LoggedFood]) -> String {
        if entries.is_empty() {
            return self.dim("Nothing logged yet.");
        }

        entries
            .iter()
            .map(|entry| {
                let name = if entry.is_manual() {
                    format!("{} {}", entry.name, self.dim("(custom)"))
                } else {
                    entry.name.clone()
                };
                format!(
                    "#{:<3} {} {name}  {}",
                    entry.log_id.get(),
                    self.dim(&entry.logged_at.format("%H:%M").to_string()),
                    self.dim(&format!(
                        "{} kcal · P {}g · C {}g · F {}g",
                        format_number(entry.calories),
                        format_number(entry.protein),
                        format_number(entry.carbs),
                        format_number(entry.fat)
                    ))
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Formats daily totals.
    pub fn format_totals(&self, totals: &DailyTotals) -> String {
        let mut lines = vec![self.bold("Today")];
        for kind in MacroKind::ALL {
            lines.push(format!(
                "{:<10} {} {}",
                format!("{}:", kind.label()),
                format_number(totals.get(kind)),
                kind.unit()
            ));
        }
        lines.join("\n")
    }

    /// Formats goals.
    pub fn format_goals(&self, goals: &Goals) -> String {
        let mut lines = vec![self.bold("Daily goals")];
        for kind in [MacroKind::Calories, MacroKind::Protein, MacroKind::Fat, MacroKind::Carbs] {
            lines.push(format!(
                "{:<10} {} {}",
                format!("{}:", kind.label()),
                goals.get(kind),
                kind.unit()
            ));
        }
        lines.join("\n")
    }

    /// Formats progress toward goals with bars.
    pub fn format_progress(&self, progress: &GoalProgress) -> String {
        let mut lines = vec![self.bold("Progress")];
        lines.extend(progress.rows().iter().map(|row| self.format_progress_row(row)));
        lines.join("\n")
    }

    fn format_progress_row(&self, row: &MacroProgress) -> String {
        let bar = self.progress_bar(row);
        let amounts = format!(
            "{} / {} {}",
            format_number(row.current),
            row.goal,
            row.kind.unit()
        );
        let mut line = format!(
            "{:<10} {bar} {:>3.0}%  {}",
            format!("{}:", row.kind.label()),
            row.percent,
            amounts
        );
        if row.over_goal {
            line.push_str(&format!(" {}", self.red("over goal")));
        }
        line
    }

    /// Formats a progress bar for one macro.
    pub fn progress_bar(&self, row: &MacroProgress) -> String {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        let filled = ((row.percent / 100.0) * self.bar_width as f64).round() as usize;
        let filled = filled.min(self.bar_width);
        let empty = self.bar_width - filled;

        let bar = format!(
            "{}{}",
            BAR_FULL.to_string().repeat(filled),
            BAR_EMPTY.to_string().repeat(empty)
        );

        self.color_for_progress(row, &bar)
    }

    // ========================================================================
    // Messages
    // ========================================================================

    /// Formats a confirmation message.
    pub fn format_ok(&self, message: &str) -> String {
        format!("{} {message}", self.green("✓"))
    }

    /// Formats an error message.
    pub fn format_error(&self, error: &str) -> String {
        format!("{}: {error}", self.red("Error"))
    }

    /// Formats a hint.
    pub fn format_hint(&self, hint: &str) -> String {
        self.cyan(hint)
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn color_for_progress(&self, row: &MacroProgress, text: &str) -> String {
        if !self.use_colors {
            return text.to_string();
        }

        if row.over_goal {
            self.red(text)
        } else if row.percent >= 90.0 {
            self.yellow(text)
        } else {
            self.green(text)
        }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

/// Formats an amount without trailing zeros (`25`, `0.5`).
pub fn format_number(n: f64) -> String {
    let rounded = (n * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}

fn format_macro(kind: MacroKind, value: Option<f64>) -> String {
    let value = value.map_or_else(|| UNKNOWN.to_string(), format_number);
    match kind {
        MacroKind::Calories => format!("{value} kcal"),
        MacroKind::Protein => format!("P {value}g"),
        MacroKind::Carbs => format!("C {value}g"),
        MacroKind::Fat => format!("F {value}g"),
    }
}

// ============================================================================
// Tests
// ============================================================================
