// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Per-commit change statistics from `git show --numstat`

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Files touched by a commit and the lines it added and removed
///
/// Binary files count as changed files but contribute no lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStat {
    files: Vec<String>,
    added: usize,
    removed: usize,
}

impl DiffStat {
    /// Parse `--numstat` output, one `added<TAB>removed<TAB>path` line per file
    ///
    /// Lines that do not have that shape are ignored.
    #[must_use]
    pub fn from_numstat(output: &str) -> Self {
        output
            .lines()
            .filter(|line| !line.trim().is_empty())
            .fold(Self::default(), |stat, line| {
                let mut fields = line.splitn(3, '\t');
                match (fields.next(), fields.next(), fields.next()) {
                    (Some(added), Some(removed), Some(path)) if !path.is_empty() => {
                        stat.with_file(path, line_count(added), line_count(removed))
                    }
                    _ => {
                        debug!(line, "Ignoring malformed numstat line");
                        stat
                    }
                }
            })
    }

    /// Add one changed file
    #[must_use]
    pub fn with_file(mut self, path: impl Into<String>, added: usize, removed: usize) -> Self {
        self.files.push(path.into());
        self.added += added;
        self.removed += removed;
        self
    }

    /// Paths of the changed files, in `git show` order
    #[must_use]
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Number of changed files
    #[must_use]
    pub fn files_changed(&self) -> usize {
        self.files.len()
    }

    /// Lines added across all files
    #[must_use]
    pub fn added(&self) -> usize {
        self.added
    }

    /// Lines removed across all files
    #[must_use]
    pub fn removed(&self) -> usize {
        self.removed
    }
}

/// Binary files report `-` instead of a count
fn line_count(field: &str) -> usize {
    field.trim().parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn test_numstat_totals() {
        let stat = DiffStat::from_numstat("2\t1\tsrc/lib.rs\n10\t0\tREADME.md\n");
        assert_eq!(stat.files().to_vec(), vec!["src/lib.rs", "README.md"]);
        assert_eq!(stat.files_changed(), 2);
        assert_eq!(stat.added(), 12);
        assert_eq!(stat.removed(), 1);
    }

    #[test]
    fn test_binary_files_count_without_lines() {
        let stat = DiffStat::from_numstat("-\t-\tlogo.png\n3\t3\tmain.rs\n");
        assert_eq!(stat.files_changed(), 2);
        assert_eq!(stat.added(), 3);
        assert_eq!(stat.removed(), 3);
    }

    #[test]
    fn test_renames_and_tabs_stay_in_path() {
        let stat = DiffStat::from_numstat("0\t0\tsrc/{old => new}.rs\n1\t0\tweird\tname\n");
        assert_eq!(stat.files().to_vec(), vec!["src/{old => new}.rs", "weird\tname"]);
    }

    #[test]
    fn test_empty_and_malformed_output() {
        assert_eq!(DiffStat::from_numstat(""), DiffStat::default());
        assert_eq!(DiffStat::from_numstat("\n\nnot numstat\n1\t2\n"), DiffStat::default());
    }
}
