// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for chronicle-analysis

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while analyzing a single commit
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// The provider rejected the credentials (never includes key details)
    #[error("Authentication failed")]
    Auth,

    /// The provider is throttling requests
    #[error("Rate limited, retry after {retry_after} seconds")]
    RateLimited {
        /// Seconds the provider asked to wait
        retry_after: u64,
    },

    /// The request did not reach the provider or the response was cut off
    #[error("Network error: {0}")]
    Transport(String),

    /// The provider answered with an error status
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message reported by the provider
        message: String,
    },

    /// The provider answered without any analysis text
    #[error("No content returned")]
    EmptyResponse,

    /// The call did not finish within the configured limit
    #[error("Analysis timed out after {0:?}")]
    Timeout(Duration),

    /// The provider is misconfigured
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other provider failure
    #[error("Analysis failed: {0}")]
    Other(String),
}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AnalysisError::Other(format!("Malformed response: {err}"))
        } else if err.is_timeout() {
            AnalysisError::Transport("Request timed out".to_string())
        } else {
            AnalysisError::Transport(err.to_string())
        }
    }
}
