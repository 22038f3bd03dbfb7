//! Typed failures of git subprocesses.

use thiserror::Error;

/// Errors from running git.
#[derive(Debug, Error)]
pub enum GitError {
    #[error("Failed to spawn git {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("git {command} printed no output")]
    EmptyOutput { command: String },
}
