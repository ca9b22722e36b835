//! Terminal and JSON output for the CLI.
//!
//! In `--json` mode every human-facing line is suppressed; commands print a
//! single JSON document through [`Output::json`] and errors go to stderr as
//! `{"error": "..."}`.

use std::fmt::Display;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Leading glyph of a message line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Info,
    Success,
    Warn,
    Error,
    Debug,
}

impl Mark {
    fn glyph(self) -> String {
        match self {
            Self::Info => style("ℹ").blue().to_string(),
            Self::Success => style("✓").green().to_string(),
            Self::Warn => style("⚠").yellow().to_string(),
            Self::Error => style("✗").red().to_string(),
            Self::Debug => style("→").dim().to_string(),
        }
    }

    fn to_stderr(self) -> bool {
        matches!(self, Self::Warn | Self::Error | Self::Debug)
    }
}

/// How a health label should be colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Good,
    Pending,
    Bad,
}

/// Colored label for dashboards.
pub fn badge(label: impl Display, tone: Tone) -> String {
    let label = label.to_string();
    match tone {
        Tone::Good => style(label).green().to_string(),
        Tone::Pending => style(label).yellow().to_string(),
        Tone::Bad => style(label).red().to_string(),
    }
}

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    fn line(&self, mark: Mark, msg: &str) {
        if self.json {
            return;
        }
        let text = match mark {
            Mark::Error => style(msg).red().to_string(),
            Mark::Debug => style(msg).dim().to_string(),
            _ => msg.to_string(),
        };
        if mark.to_stderr() {
            eprintln!("{} {}", mark.glyph(), text);
        } else {
            println!("{} {}", mark.glyph(), text);
        }
    }

    pub fn info(&self, msg: &str) {
        self.line(Mark::Info, msg);
    }

    pub fn success(&self, msg: &str) {
        self.line(Mark::Success, msg);
    }

    pub fn warn(&self, msg: &str) {
        self.line(Mark::Warn, msg);
    }

    /// Print an error. Also shown in JSON mode, as a JSON object on stderr.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        self.line(Mark::Error, msg);
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if self.verbose {
            self.line(Mark::Debug, msg);
        }
    }

    /// Print a section title.
    pub fn header(&self, msg: &str) {
        if !self.json {
            println!("\n{}", style(msg).bold().underlined());
        }
    }

    /// Print a multi-line message in a side-barred block.
    pub fn notice(&self, msg: &str) {
        if self.json {
            return;
        }
        println!();
        for line in msg.lines() {
            println!("  {} {}", style("│").cyan(), line);
        }
        println!();
    }

    /// Print a JSON document to stdout.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    pub fn kv(&self, key: &str, value: &str) {
        if !self.json {
            println!("  {}: {}", style(key).dim(), value);
        }
    }

    pub fn list_item(&self, item: &str) {
        if !self.json {
            println!("  {} {}", style("•").dim(), item);
        }
    }

    /// Print a table with a dimmed heading row.
    pub fn table(&self, heading: &[&str], rows: &[Vec<String>]) {
        if self.json {
            return;
        }
        let widths = column_widths(heading, rows);
        let heading: Vec<String> = heading.iter().map(|h| h.to_string()).collect();
        println!("  {}", style(pad_row(&heading, &widths)).dim());
        for row in rows {
            println!("  {}", pad_row(row, &widths));
        }
    }

    /// Spinner shown while waiting on the network. Hidden in JSON mode.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn is_json(&self) -> bool {
        self.json
    }
}

fn column_widths(heading: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = heading.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            match widths.get_mut(i) {
                Some(w) => *w = (*w).max(len),
                None => widths.push(len),
            }
        }
    }
    widths
}

fn pad_row(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:width$}", cell, width = width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}
