// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Streaming history reader backed by the `git` CLI
//!
//! [`HistoryReader`] spawns one `git log` process and exposes its output as a
//! lazy [`History`] iterator. Commits are handed out while git is still
//! running; the exit status is checked once stdout has been drained.

use std::ffi::{OsStr, OsString};
use std::io::{self, BufReader, Read};
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

use crate::commit::Commit;
use crate::error::GitError;
use crate::parser::{LogFormat, RecordParser, RecordReader};
use crate::stats::DiffStat;

/// Number of commits read when no limit is given
pub const DEFAULT_LIMIT: usize = 5;

/// Upper bound on the stderr text kept for error reports
const STDERR_CAPTURE_LIMIT: u64 = 64 * 1024;

/// Builder for a `git log` invocation
#[derive(Debug, Clone)]
pub struct HistoryReader {
    program: OsString,
    repository: PathBuf,
    limit: usize,
    format: LogFormat,
    stats: bool,
}

impl HistoryReader {
    /// Read history of the repository at `repository`
    ///
    /// The path is handed to `git -C` as is; checking that it names a
    /// directory is up to the caller.
    #[must_use]
    pub fn new(repository: impl Into<PathBuf>) -> Self {
        Self {
            program: OsString::from("git"),
            repository: repository.into(),
            limit: DEFAULT_LIMIT,
            format: LogFormat::default(),
            stats: false,
        }
    }

    /// Read at most `limit` of the most recent commits
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Select which fields are extracted
    #[must_use]
    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Also look up the files and line counts each commit changed
    ///
    /// This runs one `git show --numstat` per yielded commit.
    #[must_use]
    pub fn stats(mut self, stats: bool) -> Self {
        self.stats = stats;
        self
    }

    /// Run a different git executable
    #[must_use]
    pub fn program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    /// The repository path
    #[must_use]
    pub fn repository(&self) -> &Path {
        &self.repository
    }

    /// Arguments passed to git
    #[must_use]
    pub fn args(&self) -> Vec<OsString> {
        vec![
            OsString::from("-C"),
            self.repository.clone().into_os_string(),
            OsString::from("log"),
            OsString::from("-n"),
            OsString::from(self.limit.to_string()),
            OsString::from("--no-color"),
            OsString::from("-z"),
            OsString::from(format!("--pretty=tformat:{}", self.format.pretty_format())),
        ]
    }

    /// Spawn git and return the lazy commit sequence
    ///
    /// # Errors
    ///
    /// Returns `GitError::InvalidLimit` for a zero limit and
    /// `GitError::ToolInvocation` if the process cannot be started. Failures
    /// of the running process are reported through the returned iterator.
    pub fn stream(&self) -> Result<History, GitError> {
        if self.limit == 0 {
            return Err(GitError::InvalidLimit(self.limit));
        }

        let mut child = Command::new(&self.program)
            .args(self.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| GitError::ToolInvocation {
                program: display_program(&self.program),
                source,
            })?;

        info!(
            path = %self.repository.display(),
            limit = self.limit,
            format = ?self.format,
            stats = self.stats,
            "Reading commit history"
        );

        let stderr = child.stderr.take().map(drain_stderr);
        let Some(stdout) = child.stdout.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(GitError::Io(io::Error::other("git stdout was not captured")));
        };

        Ok(History {
            records: RecordReader::new(BufReader::new(stdout), RecordParser::new(self.format)),
            child: Some(child),
            stderr,
            stats: self.stats.then(|| StatsQuery {
                program: self.program.clone(),
                repository: self.repository.clone(),
            }),
            yielded: 0,
            finished: false,
        })
    }
}

/// Stream the `limit` most recent commits of the repository at `path`
///
/// # Errors
///
/// See [`HistoryReader::stream`].
pub fn stream_history(path: impl Into<PathBuf>, limit: usize) -> Result<History, GitError> {
    HistoryReader::new(path).limit(limit).stream()
}

fn display_program(program: &OsStr) -> String {
    program.to_string_lossy().into_owned()
}

/// Collect stderr on a separate thread so git never blocks on a full pipe
fn drain_stderr(mut stderr: impl Read + Send + 'static) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut captured = Vec::new();
        let _ = (&mut stderr)
            .take(STDERR_CAPTURE_LIMIT)
            .read_to_end(&mut captured);
        let _ = io::copy(&mut stderr, &mut io::sink());
        String::from_utf8_lossy(&captured).into_owned()
    })
}

/// Runs `git show --numstat` for single commits
#[derive(Debug, Clone)]
struct StatsQuery {
    program: OsString,
    repository: PathBuf,
}

impl StatsQuery {
    fn args(&self, hash: &str) -> Vec<OsString> {
        vec![
            OsString::from("-C"),
            self.repository.clone().into_os_string(),
            OsString::from("show"),
            OsString::from("--numstat"),
            OsString::from("--format="),
            OsString::from("--no-color"),
            OsString::from(hash),
        ]
    }

    fn run(&self, hash: &str) -> Result<DiffStat, GitError> {
        let output = Command::new(&self.program)
            .args(self.args(hash))
            .stdin(Stdio::null())
            .output()
            .map_err(|source| GitError::ToolInvocation {
                program: display_program(&self.program),
                source,
            })?;

        if !output.status.success() {
            return Err(GitError::ToolExit {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(DiffStat::from_numstat(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Lazy, single-pass sequence of commits from one `git log` process
///
/// Each item is yielded as soon as its record has been read. After the last
/// record the process exit status is checked; a failure is reported as a
/// final `Err(GitError::ToolExit)` item following any commits already
/// yielded. Dropping the iterator early kills the process.
pub struct History {
    records: RecordReader<BufReader<ChildStdout>>,
    child: Option<Child>,
    stderr: Option<JoinHandle<String>>,
    stats: Option<StatsQuery>,
    yielded: usize,
    finished: bool,
}

impl History {
    /// Number of commits yielded so far
    #[must_use]
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    /// OS process id of the `git log` process, until it has been reaped
    #[must_use]
    pub fn id(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }

    /// Statistics lookups are best-effort: a failure leaves the commit as is
    fn attach_stats(&self, commit: Commit) -> Commit {
        let Some(query) = &self.stats else {
            return commit;
        };
        if commit.hash().is_empty() || commit.hash().starts_with('-') {
            debug!(hash = commit.hash(), "Not a revision, skipping diff stats");
            return commit;
        }
        match query.run(commit.hash()) {
            Ok(stats) => commit.with_stats(stats),
            Err(e) => {
                warn!(hash = commit.hash(), error = %e, "Could not read diff stats");
                commit
            }
        }
    }

    fn finish(&mut self) -> Result<(), GitError> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        let status = child.wait()?;
        let stderr = self
            .stderr
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();

        if self.records.skipped() > 0 {
            debug!(skipped = self.records.skipped(), "Dropped malformed records");
        }

        if status.success() {
            debug!(commits = self.yielded, "git log finished");
            Ok(())
        } else {
            warn!(code = ?status.code(), commits = self.yielded, "git log failed");
            Err(GitError::ToolExit {
                code: status.code(),
                stderr,
            })
        }
    }

    fn terminate(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Iterator for History {
    type Item = Result<Commit, GitError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.records.next() {
            Some(Ok(commit)) => {
                self.yielded += 1;
                Some(Ok(self.attach_stats(commit)))
            }
            Some(Err(e)) => {
                self.finished = true;
                self.terminate();
                Some(Err(GitError::Io(e)))
            }
            None => {
                self.finished = true;
                self.finish().err().map(Err)
            }
        }
    }
}

impl FusedIterator for History {}

impl Drop for History {
    fn drop(&mut self) {
        self.terminate();
    }
}
