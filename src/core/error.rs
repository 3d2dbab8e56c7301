//! Error types for the terminal runtime.
//!
//! - [`CommandError`] - failures inside a command implementation
//! - [`TimerError`] - a delayed callback was cancelled
//! - [`PersistError`] - filesystem snapshot encoding and storage
//! - [`TransportError`] - remote shell passthrough
//!
//! Mistakes made by the user (unknown command, bad path, missing operand) are
//! not errors in this sense: commands print them and return a non-zero exit
//! code.

/// A command implementation failed. Caught at the dispatch boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    Failed(String),

    #[error("interrupted: {0}")]
    Interrupted(#[from] TimerError),
}

/// Delayed callbacks that never ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TimerError {
    #[error("timer cancelled")]
    Cancelled,
}

/// Errors while saving or restoring the filesystem snapshot.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot has no root node")]
    MissingRoot,

    #[error("snapshot root must be a directory")]
    RootNotDirectory,

    #[error("storage not available")]
    StorageUnavailable,

    #[error("failed to write snapshot")]
    WriteFailed,
}

/// Errors on the remote shell channel.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("not connected")]
    NotConnected,

    #[error("malformed message: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("send failed: {0}")]
    Send(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_error_display() {
        let e = CommandError::Failed("boom".into());
        assert_eq!(format!("{e}"), "boom");

        let e: CommandError = TimerError::Cancelled.into();
        assert_eq!(format!("{e}"), "interrupted: timer cancelled");
    }

    #[test]
    fn test_persist_error_from_json() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e: PersistError = err.into();
        assert!(format!("{e}").starts_with("malformed snapshot:"));
    }
}
