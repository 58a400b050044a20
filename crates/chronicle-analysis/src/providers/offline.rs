// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Offline analysis: a deterministic formatter with no I/O

use async_trait::async_trait;
use chronicle_git::Commit;

use crate::error::AnalysisError;
use crate::provider::AnalysisProvider;

/// Number of body characters quoted in the details line
const BODY_PREVIEW_CHARS: usize = 50;

/// Provider used when no hosted model is configured
///
/// Always succeeds and never touches the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineProvider;

impl OfflineProvider {
    /// Create an offline provider
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Format the analysis text for a commit
    #[must_use]
    pub fn describe(commit: &Commit) -> String {
        let mut text = format!(
            "LLM Analysis: This change evolves the codebase by '{}'",
            commit.message()
        );

        match (commit.author(), commit.date()) {
            (Some(author), Some(date)) => {
                text.push_str(&format!(" (by {author} on {})", date.format("%Y-%m-%d")));
            }
            (Some(author), None) => text.push_str(&format!(" (by {author})")),
            (None, Some(date)) => text.push_str(&format!(" (on {})", date.format("%Y-%m-%d"))),
            (None, None) => {}
        }
        text.push('.');

        if let Some(stats) = commit.stats() {
            text.push_str(&format!(
                " It modified {} file(s), added {} lines and removed {} lines.",
                stats.files_changed(),
                stats.added(),
                stats.removed()
            ));
            if !stats.files().is_empty() {
                text.push_str(&format!("\nFiles changed: {}.", stats.files().join(", ")));
            }
        }

        if let Some(body) = commit.body() {
            let preview: String = body.chars().take(BODY_PREVIEW_CHARS).collect();
            text.push_str(&format!("\nDetails: {preview}..."));
        }

        text
    }
}

#[async_trait]
impl AnalysisProvider for OfflineProvider {
    fn name(&self) -> &str {
        "offline"
    }

    async fn analyze(&self, commit: &Commit) -> Result<String, AnalysisError> {
        Ok(Self::describe(commit))
    }
}
