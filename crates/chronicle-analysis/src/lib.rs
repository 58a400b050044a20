// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! chronicle-analysis: commit analysis for chronicle
//!
//! This library crate defines the [`AnalysisProvider`] capability, ships an
//! offline formatter and an OpenAI-compatible client, and runs providers over
//! many commits through the order-preserving [`AnalysisPipeline`].

#![warn(missing_docs)]

pub mod error;
pub mod pipeline;
pub mod provider;
pub mod providers;

pub use error::AnalysisError;
pub use pipeline::{AnalysisPipeline, AnalyzedCommit, DEFAULT_CONCURRENCY, FailurePolicy};
pub use provider::AnalysisProvider;
pub use providers::{OfflineProvider, OpenAiProvider};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::AnalysisError;
    pub use crate::pipeline::{AnalysisPipeline, AnalyzedCommit, FailurePolicy};
    pub use crate::provider::AnalysisProvider;
}
