// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Commit record type

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::stats::DiffStat;

/// One commit as reported by `git log`
///
/// Commits are only built by the record parser and are read-only afterwards.
/// Author, date and body are populated by
/// [`LogFormat::Detailed`](crate::LogFormat::Detailed); change statistics by
/// [`HistoryReader::stats`](crate::HistoryReader::stats).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    hash: String,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stats: Option<DiffStat>,
}

impl Commit {
    /// Create a commit carrying only the hash and subject line
    #[must_use]
    pub fn new(hash: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            message: message.into(),
            author: None,
            date: None,
            body: None,
            stats: None,
        }
    }

    /// Attach the author name
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Attach the author date
    #[must_use]
    pub fn with_date(mut self, date: DateTime<FixedOffset>) -> Self {
        self.date = Some(date);
        self
    }

    /// Attach the message body (everything after the subject line)
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Attach the files and line counts the commit changed
    #[must_use]
    pub fn with_stats(mut self, stats: DiffStat) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Abbreviated hash as printed by `%h`
    #[must_use]
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Subject line
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Author name, when extracted
    #[must_use]
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    /// Author date, when extracted and parseable
    #[must_use]
    pub fn date(&self) -> Option<DateTime<FixedOffset>> {
        self.date
    }

    /// Message body, when extracted and non-empty
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Change statistics, when extracted
    #[must_use]
    pub fn stats(&self) -> Option<&DiffStat> {
        self.stats.as_ref()
    }
}
