// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! chronicle-git: streaming commit history for chronicle
//!
//! This library crate runs `git log` with NUL-terminated records and parses
//! its output incrementally into [`Commit`] records, optionally enriched
//! with per-commit change statistics.
//!
//! # Example
//!
//! ```no_run
//! use chronicle_git::{HistoryReader, LogFormat};
//!
//! let history = HistoryReader::new(".")
//!     .limit(10)
//!     .format(LogFormat::Detailed)
//!     .stream()
//!     .expect("spawn git");
//!
//! for commit in history {
//!     let commit = commit.expect("read commit");
//!     println!("{} - {}", commit.hash(), commit.message());
//! }
//! ```

#![warn(missing_docs)]

pub mod commit;
pub mod error;
pub mod parser;
pub mod reader;
pub mod stats;

pub use commit::Commit;
pub use error::GitError;
pub use parser::{LogFormat, RecordParser, RecordReader, parse_log_output};
pub use reader::{DEFAULT_LIMIT, History, HistoryReader, stream_history};
pub use stats::DiffStat;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::commit::Commit;
    pub use crate::error::GitError;
    pub use crate::parser::{LogFormat, RecordParser};
    pub use crate::reader::{History, HistoryReader, stream_history};
    pub use crate::stats::DiffStat;
}
