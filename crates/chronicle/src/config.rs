// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Configuration for the chronicle command line
//!
//! This module provides the `clap` definition of the command line together
//! with the helpers that turn it into logging, provider and history-reading
//! settings.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chronicle_analysis::providers::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use chronicle_analysis::{
    AnalysisError, AnalysisProvider, DEFAULT_CONCURRENCY, FailurePolicy, OfflineProvider,
    OpenAiProvider,
};
use chronicle_git::{DEFAULT_LIMIT, LogFormat};
use clap::Parser;
use clap::builder::RangedU64ValueParser;

use crate::generate::GenerateOptions;
use crate::report::{ColorChoice, ReportFormat};

/// Chronicle - turn your git log into a story
#[derive(Parser, Debug, Clone)]
#[command(name = "chronicle")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Path to the git repository
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Number of most recent commits to analyze
    #[arg(
        short = 'n',
        long,
        default_value_t = DEFAULT_LIMIT,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub limit: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Console)]
    pub format: ReportFormat,

    /// Colour the console report
    #[arg(long, value_enum, value_name = "WHEN", default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// OpenAI API key
    ///
    /// When set, commits are analyzed by the hosted model. Without a key the
    /// offline analyzer is used.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model used for hosted analysis
    #[arg(long, env = "CHRONICLE_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, env = "CHRONICLE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Maximum number of commits analyzed at the same time
    #[arg(
        short = 'j',
        long,
        default_value_t = DEFAULT_CONCURRENCY,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub concurrency: usize,

    /// Give up on a single commit's analysis after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Stop at the first failed analysis instead of reporting it inline
    #[arg(long, default_value = "false")]
    pub fail_fast: bool,

    /// Also read author, date and body of each commit
    #[arg(long, default_value = "false")]
    pub detailed: bool,

    /// Include the files and line counts each commit changed
    #[arg(long, default_value = "false")]
    pub stats: bool,

    /// git executable to run
    #[arg(long, env = "CHRONICLE_GIT", default_value = "git")]
    pub git: String,

    /// Enable verbose logging (debug level)
    ///
    /// Logs are written to stderr so the report on stdout stays clean.
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
            limit: DEFAULT_LIMIT,
            format: ReportFormat::default(),
            color: ColorChoice::default(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            timeout: None,
            fail_fast: false,
            detailed: false,
            stats: false,
            git: "git".to_string(),
            verbose: false,
            quiet: false,
        }
    }
}

/// Which analysis backend a configuration selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Deterministic local formatter
    Offline,
    /// OpenAI-compatible chat completions API
    OpenAi,
}

impl Config {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the repository path doesn't exist or isn't a
    /// directory.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.path.exists() {
            return Err(ConfigError::RepositoryNotFound(self.path.clone()));
        }
        if !self.path.is_dir() {
            return Err(ConfigError::RepositoryNotDirectory(self.path.clone()));
        }
        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }

    /// The backend selected by the presence of an API key
    #[must_use]
    pub fn provider_kind(&self) -> ProviderKind {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => ProviderKind::OpenAi,
            _ => ProviderKind::Offline,
        }
    }

    /// Build the selected analysis provider
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::Config` if the hosted provider cannot be
    /// constructed.
    pub fn provider(&self) -> Result<Arc<dyn AnalysisProvider>, AnalysisError> {
        match (self.provider_kind(), self.api_key.as_deref()) {
            (ProviderKind::OpenAi, Some(key)) => Ok(Arc::new(
                OpenAiProvider::new(key.trim())?
                    .with_model(&self.model)
                    .with_base_url(&self.base_url),
            )),
            _ => Ok(Arc::new(OfflineProvider::new())),
        }
    }

    /// Settings for reading and analyzing history
    #[must_use]
    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            repository: self.path.clone(),
            limit: self.limit,
            log_format: if self.detailed {
                LogFormat::Detailed
            } else {
                LogFormat::Subject
            },
            stats: self.stats,
            git_program: self.git.clone().into(),
            concurrency: self.concurrency,
            failure_policy: if self.fail_fast {
                FailurePolicy::FailFast
            } else {
                FailurePolicy::BestEffort
            },
            timeout: self.timeout.map(Duration::from_secs),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Repository path not found
    #[error("Path '{}' does not exist", .0.display())]
    RepositoryNotFound(PathBuf),

    /// Repository path is not a directory
    #[error("Path '{}' is not a directory", .0.display())]
    RepositoryNotDirectory(PathBuf),
}
