// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Read history and analyze it end to end
//!
//! `git log` is read synchronously on a blocking thread and handed to the
//! async analysis pipeline through a bounded channel, so at most
//! `concurrency` parsed commits wait ahead of the pipeline. Dropping the
//! returned stream closes the channel, which stops the reader and kills the
//! `git` process.

use std::ffi::OsString;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Poll, ready};
use std::time::Duration;

use chronicle_analysis::{
    AnalysisPipeline, AnalysisProvider, AnalyzedCommit, DEFAULT_CONCURRENCY, FailurePolicy,
};
use chronicle_git::{Commit, DEFAULT_LIMIT, HistoryReader, LogFormat};
use futures::stream::{self, Stream, TryStreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::error::ChronicleError;

/// Everything needed to read and analyze a repository's recent history
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Repository to read
    pub repository: PathBuf,
    /// Number of most recent commits
    pub limit: usize,
    /// Fields extracted per commit
    pub log_format: LogFormat,
    /// Look up changed files and line counts per commit
    pub stats: bool,
    /// git executable
    pub git_program: OsString,
    /// Concurrent analysis calls
    pub concurrency: usize,
    /// Handling of per-commit analysis failures
    pub failure_policy: FailurePolicy,
    /// Limit on a single analysis call
    pub timeout: Option<Duration>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self::new(".")
    }
}

impl GenerateOptions {
    /// Default settings for the repository at `repository`
    #[must_use]
    pub fn new(repository: impl Into<PathBuf>) -> Self {
        Self {
            repository: repository.into(),
            limit: DEFAULT_LIMIT,
            log_format: LogFormat::default(),
            stats: false,
            git_program: OsString::from("git"),
            concurrency: DEFAULT_CONCURRENCY,
            failure_policy: FailurePolicy::default(),
            timeout: None,
        }
    }

    fn history_reader(&self) -> HistoryReader {
        HistoryReader::new(&self.repository)
            .limit(self.limit)
            .format(self.log_format)
            .stats(self.stats)
            .program(&self.git_program)
    }

    fn pipeline(&self, provider: Arc<dyn AnalysisProvider>) -> AnalysisPipeline {
        let pipeline = AnalysisPipeline::new(provider)
            .concurrency(self.concurrency)
            .policy(self.failure_policy);
        match self.timeout {
            Some(timeout) => pipeline.timeout(timeout),
            None => pipeline,
        }
    }
}

/// Read and analyze the configured history, collecting every result
///
/// Results are in history order, newest commit first.
///
/// # Errors
///
/// Returns the first history error, or under
/// [`FailurePolicy::FailFast`] the first analysis error.
pub async fn generate(
    options: &GenerateOptions,
    provider: Arc<dyn AnalysisProvider>,
) -> Result<Vec<AnalyzedCommit>, ChronicleError> {
    let results: Vec<AnalyzedCommit> = generate_stream(options, provider).try_collect().await?;
    info!(
        commits = results.len(),
        failed = results.iter().filter(|r| r.failed).count(),
        "Chronicle generated"
    );
    Ok(results)
}

/// Read and analyze the configured history as a stream
///
/// Must be polled inside a tokio runtime. Items arrive in history order; a
/// history failure is yielded after the commits that preceded it.
pub fn generate_stream(
    options: &GenerateOptions,
    provider: Arc<dyn AnalysisProvider>,
) -> impl Stream<Item = Result<AnalyzedCommit, ChronicleError>> + use<> {
    let commits = spawn_history(options.history_reader(), options.concurrency);
    options.pipeline(provider).analyze_stream(commits)
}

/// Run the history reader on a blocking thread, forwarding its items
///
/// Spawning is deferred until the stream is first polled.
fn spawn_history(
    reader: HistoryReader,
    capacity: usize,
) -> impl Stream<Item = Result<Commit, ChronicleError>> {
    let mut state: Option<(
        mpsc::Receiver<Result<Commit, ChronicleError>>,
        Option<tokio::task::JoinHandle<()>>,
    )> = None;
    let mut reader = Some(reader);

    stream::poll_fn(move |cx| {
        if let Some(reader) = reader.take() {
            let (tx, rx) = mpsc::channel(capacity.max(1));
            let handle = tokio::task::spawn_blocking(move || read_history(&reader, &tx));
            state = Some((rx, Some(handle)));
        }

        let Some((rx, handle)) = state.as_mut() else {
            return Poll::Ready(None);
        };

        if let Some(item) = ready!(rx.poll_recv(cx)) {
            return Poll::Ready(Some(item));
        }

        // Channel closed: report a reader that died without sending its error
        let Some(join) = handle.as_mut() else {
            return Poll::Ready(None);
        };
        let joined = ready!(Pin::new(join).poll(cx));
        *handle = None;
        Poll::Ready(joined.err().map(|e| Err(ChronicleError::Task(e.to_string()))))
    })
}

fn read_history(reader: &HistoryReader, tx: &mpsc::Sender<Result<Commit, ChronicleError>>) {
    let history = match reader.stream() {
        Ok(history) => history,
        Err(e) => {
            let _ = tx.blocking_send(Err(e.into()));
            return;
        }
    };

    for item in history {
        if tx.blocking_send(item.map_err(ChronicleError::from)).is_err() {
            debug!("History consumer dropped, stopping git");
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_defaults() {
        let options = GenerateOptions::new("/repo");
        assert_eq!(options.repository, PathBuf::from("/repo"));
        assert_eq!(options.limit, DEFAULT_LIMIT);
        assert_eq!(options.log_format, LogFormat::Subject);
        assert!(!options.stats);
        assert_eq!(options.git_program, "git");
        assert_eq!(options.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(options.failure_policy, FailurePolicy::BestEffort);
        assert!(options.timeout.is_none());
    }

    #[test]
    fn test_history_reader_arguments() {
        let options = GenerateOptions {
            limit: 7,
            ..GenerateOptions::new("/repo")
        };
        let args = options.history_reader().args();
        assert!(args.iter().any(|a| a == "-n"));
        assert!(args.iter().any(|a| a == "7"));
        assert!(args.iter().any(|a| a == "/repo"));
    }

    #[test]
    fn test_pipeline_settings() {
        let options = GenerateOptions {
            concurrency: 0,
            failure_policy: FailurePolicy::FailFast,
            ..GenerateOptions::default()
        };
        let pipeline = options.pipeline(Arc::new(chronicle_analysis::OfflineProvider::new()));
        assert_eq!(pipeline.max_concurrency(), 1);
        assert_eq!(pipeline.failure_policy(), FailurePolicy::FailFast);
    }

    #[tokio::test]
    async fn test_missing_program_is_reported() {
        let options = GenerateOptions {
            git_program: OsString::from("chronicle-no-such-git-binary"),
            ..GenerateOptions::default()
        };
        let result = generate(&options, Arc::new(chronicle_analysis::OfflineProvider::new())).await;
        assert!(matches!(
            result,
            Err(ChronicleError::Git(chronicle_git::GitError::ToolInvocation { .. }))
        ));
    }

    #[tokio::test]
    async fn test_zero_limit_is_reported() {
        let options = GenerateOptions {
            limit: 0,
            ..GenerateOptions::default()
        };
        let result = generate(&options, Arc::new(chronicle_analysis::OfflineProvider::new())).await;
        assert!(matches!(
            result,
            Err(ChronicleError::Git(chronicle_git::GitError::InvalidLimit(0)))
        ));
    }
}
