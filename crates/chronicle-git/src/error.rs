// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for chronicle-git

use thiserror::Error;

/// Errors that can occur while reading commit history
#[derive(Debug, Error)]
pub enum GitError {
    /// The git executable could not be started
    #[error("Failed to launch {program}: {source}")]
    ToolInvocation {
        /// The program that was invoked
        program: String,
        /// The underlying spawn error
        #[source]
        source: std::io::Error,
    },

    /// git ran but exited with a failure status
    #[error("git exited with {}: {}", describe_code(.code), .stderr.trim())]
    ToolExit {
        /// Exit code, or `None` when the process was terminated by a signal
        code: Option<i32>,
        /// Captured diagnostic output
        stderr: String,
    },

    /// Reading the process output failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A history request must ask for at least one commit
    #[error("Invalid commit limit: {0} (must be at least 1)")]
    InvalidLimit(usize),
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

impl GitError {
    /// Exit code of a failed git invocation, if any
    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::ToolExit { code, .. } => *code,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_exit_display() {
        let err = GitError::ToolExit {
            code: Some(128),
            stderr: "fatal: not a git repository\n".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "git exited with status 128: fatal: not a git repository"
        );
        assert_eq!(err.exit_code(), Some(128));
    }

    #[test]
    fn test_tool_exit_signal_display() {
        let err = GitError::ToolExit {
            code: None,
            stderr: String::new(),
        };
        assert_eq!(err.to_string(), "git exited with a signal: ");
        assert_eq!(err.exit_code(), None);
    }

    #[test]
    fn test_tool_invocation_display() {
        let err = GitError::ToolInvocation {
            program: "no-such-git".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().starts_with("Failed to launch no-such-git"));
        assert_eq!(err.exit_code(), None);
    }

    #[test]
    fn test_invalid_limit_display() {
        let err = GitError::InvalidLimit(0);
        assert_eq!(
            err.to_string(),
            "Invalid commit limit: 0 (must be at least 1)"
        );
    }
}
