// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Rendering analyzed commits as a narrative
//!
//! Each output format is a [`Report`] implementation; [`ReportFormat`] picks
//! one from the command line. Only the console report is ever coloured.

use chronicle_analysis::AnalyzedCommit;
use clap::ValueEnum;
use colored::{ColoredString, Colorize};

use crate::error::ChronicleError;

/// Output formats accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    /// Plain text for the terminal
    #[default]
    Console,
    /// Markdown document
    Markdown,
    /// Pretty-printed JSON array
    Json,
}

impl ReportFormat {
    /// The renderer for this format
    #[must_use]
    pub fn report(self, color: bool) -> Box<dyn Report> {
        match self {
            Self::Console => Box::new(ConsoleReport::new(color)),
            Self::Markdown => Box::new(MarkdownReport),
            Self::Json => Box::new(JsonReport),
        }
    }

    /// Render results with this format, without colour
    ///
    /// # Errors
    ///
    /// Returns `ChronicleError::Render` if serialization fails.
    pub fn render(self, results: &[AnalyzedCommit]) -> Result<String, ChronicleError> {
        self.report(false).render(results)
    }
}

/// When the console report uses ANSI colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Colour when stdout is a terminal and `NO_COLOR` is unset
    #[default]
    Auto,
    /// Always colour
    Always,
    /// Never colour
    Never,
}

impl ColorChoice {
    /// Whether this choice colours output in the current environment
    #[must_use]
    pub fn enabled(self) -> bool {
        match self {
            Self::Auto => colored::control::SHOULD_COLORIZE.should_colorize(),
            Self::Always => true,
            Self::Never => false,
        }
    }

    /// Resolve the choice and make it the process-wide colour setting
    pub fn apply(self) -> bool {
        let enabled = self.enabled();
        colored::control::set_override(enabled);
        enabled
    }
}

/// Turns analyzed commits into a document
pub trait Report {
    /// Render the results in order
    ///
    /// # Errors
    ///
    /// Returns `ChronicleError::Render` if the document cannot be produced.
    fn render(&self, results: &[AnalyzedCommit]) -> Result<String, ChronicleError>;
}

/// Terminal narrative framed by a header and footer
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReport {
    color: bool,
}

impl ConsoleReport {
    /// Console report, with ANSI colours when `color` is set
    #[must_use]
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, text: &str, style: impl FnOnce(&str) -> ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}

impl Report for ConsoleReport {
    fn render(&self, results: &[AnalyzedCommit]) -> Result<String, ChronicleError> {
        let body = results
            .iter()
            .map(|r| {
                let analysis = if r.failed {
                    self.paint(&r.analysis, |s| s.bright_red())
                } else {
                    self.paint(&r.analysis, |s| s.bright_green())
                };
                format!(
                    "{}: {}\n  {} {}",
                    self.paint(&format!("Commit {}", r.commit.hash()), |s| s.bright_yellow()),
                    self.paint(r.commit.message(), |s| s.bright_cyan()),
                    self.paint("->", |s| s.bright_green().bold()),
                    analysis
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        Ok(format!(
            "{}\n\n{body}\n\n{}\n",
            self.paint("=== Code Evolution Narrative ===", |s| s.bright_magenta().bold()),
            self.paint("=== End of Story ===", |s| s.bright_magenta().bold()),
        ))
    }
}

/// One markdown section per commit
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownReport;

impl Report for MarkdownReport {
    fn render(&self, results: &[AnalyzedCommit]) -> Result<String, ChronicleError> {
        let mut sections = vec!["# Code Evolution Narrative\n".to_string()];
        sections.extend(results.iter().map(|r| {
            format!(
                "## Commit {}\n**Message:** {}\n**Analysis:** {}\n",
                r.commit.hash(),
                r.commit.message(),
                r.analysis
            )
        }));
        Ok(sections.join("\n"))
    }
}

/// Machine-readable output
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReport;

impl Report for JsonReport {
    fn render(&self, results: &[AnalyzedCommit]) -> Result<String, ChronicleError> {
        let mut json = serde_json::to_string_pretty(results)?;
        json.push('\n');
        Ok(json)
    }
}
