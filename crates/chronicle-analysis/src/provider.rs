// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! The analysis capability consumed by the pipeline

use async_trait::async_trait;
use chronicle_git::Commit;

use crate::error::AnalysisError;

/// Something that can turn one commit into analysis text
///
/// Implementations may be pure formatters or network clients; the pipeline
/// makes no assumption about how long a call takes. Calls for different
/// commits run concurrently, so implementations must be `Send + Sync`.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &str;

    /// Analyze a single commit
    ///
    /// # Errors
    ///
    /// Returns an `AnalysisError` describing why this commit could not be
    /// analyzed. The error only concerns this commit.
    async fn analyze(&self, commit: &Commit) -> Result<String, AnalysisError>;
}
