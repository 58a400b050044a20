// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for chronicle

use chronicle_analysis::AnalysisError;
use chronicle_git::GitError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can end a chronicle run
#[derive(Debug, Error)]
pub enum ChronicleError {
    /// Reading history failed
    #[error(transparent)]
    Git(#[from] GitError),

    /// Analysis failed under the fail-fast policy
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// The command line is unusable
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The background history reader panicked or was cancelled
    #[error("History reader task failed: {0}")]
    Task(String),

    /// The report could not be serialized
    #[error("Failed to render report: {0}")]
    Render(#[from] serde_json::Error),
}
