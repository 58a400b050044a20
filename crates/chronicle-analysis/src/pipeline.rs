// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Ordered, bounded-concurrency commit analysis
//!
//! The pipeline hands every commit to an [`AnalysisProvider`], keeping at most
//! `concurrency` calls in flight. Calls complete in any order, but results are
//! released strictly in input order: the i-th result always belongs to the
//! i-th commit.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use chronicle_analysis::{AnalysisPipeline, OfflineProvider};
//! use chronicle_git::Commit;
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! let pipeline = AnalysisPipeline::new(Arc::new(OfflineProvider::new())).concurrency(4);
//! let results = rt
//!     .block_on(pipeline.analyze(vec![Commit::new("abc", "feat: add thing")]))
//!     .unwrap();
//! assert_eq!(results[0].commit.hash(), "abc");
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chronicle_git::Commit;
use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::AnalysisError;
use crate::provider::AnalysisProvider;

/// Concurrent provider calls allowed when nothing else is configured
pub const DEFAULT_CONCURRENCY: usize = 8;

/// A commit paired with the outcome of its analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzedCommit {
    /// The analyzed commit
    pub commit: Commit,
    /// Analysis text, or a placeholder describing the failure
    pub analysis: String,
    /// Whether `analysis` is a failure placeholder
    #[serde(default)]
    pub failed: bool,
}

impl AnalyzedCommit {
    /// Pair a commit with successful analysis text
    #[must_use]
    pub fn new(commit: Commit, analysis: impl Into<String>) -> Self {
        Self {
            commit,
            analysis: analysis.into(),
            failed: false,
        }
    }

    /// Pair a commit with a placeholder for a failed analysis
    #[must_use]
    pub fn failed(commit: Commit, error: &AnalysisError) -> Self {
        Self {
            commit,
            analysis: format!("Error analyzing commit: {error}"),
            failed: true,
        }
    }
}

/// What to do when the provider fails for one commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Record a placeholder in that commit's slot and keep going
    #[default]
    BestEffort,
    /// Stop at the first failure and return it
    FailFast,
}

/// Fans commits out to a provider and fans results back in, in order
#[derive(Clone)]
pub struct AnalysisPipeline {
    provider: Arc<dyn AnalysisProvider>,
    concurrency: usize,
    policy: FailurePolicy,
    timeout: Option<Duration>,
}

impl fmt::Debug for AnalysisPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisPipeline")
            .field("provider", &self.provider.name())
            .field("concurrency", &self.concurrency)
            .field("policy", &self.policy)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl AnalysisPipeline {
    /// Create a pipeline with default concurrency and the best-effort policy
    #[must_use]
    pub fn new(provider: Arc<dyn AnalysisProvider>) -> Self {
        Self {
            provider,
            concurrency: DEFAULT_CONCURRENCY,
            policy: FailurePolicy::default(),
            timeout: None,
        }
    }

    /// Cap the number of concurrent provider calls (at least one)
    #[must_use]
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Choose how provider failures are handled
    #[must_use]
    pub fn policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fail provider calls that take longer than `timeout`
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The concurrency cap
    #[must_use]
    pub fn max_concurrency(&self) -> usize {
        self.concurrency
    }

    /// The failure policy
    #[must_use]
    pub fn failure_policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Analyze a batch of commits
    ///
    /// At most `min(commits.len(), concurrency)` provider calls run at once.
    /// An empty batch returns immediately without calling the provider.
    ///
    /// # Errors
    ///
    /// Only with [`FailurePolicy::FailFast`]: the first failure in input
    /// order. Calls still in flight at that point are cancelled.
    pub async fn analyze(&self, commits: Vec<Commit>) -> Result<Vec<AnalyzedCommit>, AnalysisError> {
        if commits.is_empty() {
            return Ok(Vec::new());
        }

        let width = self.concurrency.min(commits.len());
        info!(
            commits = commits.len(),
            concurrency = width,
            provider = self.provider.name(),
            "Analyzing commits"
        );

        let input = stream::iter(commits.into_iter().map(Ok::<_, AnalysisError>));
        self.ordered(input, width).try_collect().await
    }

    /// Analyze a lazily produced sequence of commits
    ///
    /// Input is pulled only as capacity frees up, at most `concurrency`
    /// items ahead of the consumer; dropping the returned stream therefore
    /// stops new provider calls. Upstream errors are passed through in their
    /// position, and provider errors are converted into `E` under
    /// [`FailurePolicy::FailFast`].
    pub fn analyze_stream<S, E>(
        &self,
        commits: S,
    ) -> impl Stream<Item = Result<AnalyzedCommit, E>> + use<S, E>
    where
        S: Stream<Item = Result<Commit, E>>,
        E: From<AnalysisError>,
    {
        self.ordered(commits, self.concurrency)
    }

    fn ordered<S, E>(
        &self,
        commits: S,
        width: usize,
    ) -> impl Stream<Item = Result<AnalyzedCommit, E>> + use<S, E>
    where
        S: Stream<Item = Result<Commit, E>>,
        E: From<AnalysisError>,
    {
        let pipeline = self.clone();
        commits
            .map(move |item| {
                let pipeline = pipeline.clone();
                async move {
                    let commit = item?;
                    pipeline.analyze_commit(commit).await.map_err(E::from)
                }
            })
            .buffered(width)
    }

    /// Analyze one commit, applying the timeout and failure policy
    ///
    /// # Errors
    ///
    /// Only with [`FailurePolicy::FailFast`], when the provider fails.
    pub async fn analyze_commit(&self, commit: Commit) -> Result<AnalyzedCommit, AnalysisError> {
        let outcome = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.provider.analyze(&commit))
                .await
                .unwrap_or(Err(AnalysisError::Timeout(limit))),
            None => self.provider.analyze(&commit).await,
        };

        match outcome {
            Ok(analysis) => {
                debug!(hash = commit.hash(), "Commit analyzed");
                Ok(AnalyzedCommit::new(commit, analysis))
            }
            Err(e) => match self.policy {
                FailurePolicy::BestEffort => {
                    warn!(
                        hash = commit.hash(),
                        provider = self.provider.name(),
                        error = %e,
                        "Commit analysis failed, keeping placeholder"
                    );
                    Ok(AnalyzedCommit::failed(commit, &e))
                }
                FailurePolicy::FailFast => Err(e),
            },
        }
    }
}
