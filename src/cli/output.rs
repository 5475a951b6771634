//! Styled terminal output for pdfseal
//!
//! Status messages go to stdout, errors to stderr. Quiet mode keeps errors
//! and the data a command was asked to print.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::pipeline::{Outcome, OutcomeStatus};

/// Output handler for consistent CLI formatting
#[derive(Debug, Clone, Copy)]
pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✔").green(), message);
        }
    }

    /// Errors are always shown, even in quiet mode
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✖").red(), message);
    }

    pub fn warning(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("⚠").yellow(), message);
        }
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("ℹ").blue(), message);
        }
    }

    /// Print a message only in verbose mode
    pub fn verbose(&self, message: &str) {
        if self.verbose && !self.quiet {
            println!("{} {}", style("ℹ").dim(), style(message).dim());
        }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn header(&self, title: &str) {
        if !self.quiet {
            println!("\n{}", style(title).bold().underlined());
        }
    }

    pub fn category(&self, category: &str) {
        if !self.quiet {
            println!("\n{}", style(category).bold().cyan());
        }
    }

    /// Print a key-value pair with consistent styling
    pub fn key_value(&self, key: &str, value: &str, highlight: bool) {
        if !self.quiet {
            let styled_value = if highlight {
                style(value).green().bold()
            } else {
                style(value).white()
            };
            println!("  {} {}", style(key).dim(), styled_value);
        }
    }

    pub fn list_item(&self, item: &str) {
        if !self.quiet {
            println!("  • {}", item);
        }
    }

    pub fn blank_line(&self) {
        if !self.quiet {
            println!();
        }
    }

    /// One document's line in a match preview
    pub fn preview_entry(&self, name: &str, matched: bool) {
        if matched {
            println!("  {} {}", style("✔").green(), name);
        } else {
            println!("  {} {} {}", style("⚠").yellow(), name, style("(no credential)").dim());
        }
    }

    /// One document's line in the batch log
    pub fn outcome(&self, outcome: &Outcome) {
        if self.quiet {
            return;
        }
        let line = outcome.to_string();
        match outcome.status() {
            OutcomeStatus::Ok => println!("  {}", style(line).green()),
            OutcomeStatus::Skipped => println!("  {}", style(line).yellow()),
            OutcomeStatus::Failed => println!("  {}", style(line).red()),
        }
    }

    /// Progress bar for a batch; hidden in quiet mode
    pub fn progress_bar(&self, len: u64, message: &str) -> ProgressBar {
        if self.quiet {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len);
        let bar_style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .map(|bar_style| bar_style.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(bar_style);
        pb.set_message(message.to_string());
        pb
    }
}
