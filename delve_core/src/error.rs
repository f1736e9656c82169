//! Validation and execution errors raised by command handlers.
//!
//! None of these are fatal: the executor turns every `EngineError` into a
//! failed `CommandResult` whose output is the error's display text.

use std::path::PathBuf;

/// Errors produced while executing a single command.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("{command}: missing operand")]
    MissingOperand { command: String },

    #[error("{command}: too many arguments")]
    TooManyArguments { command: String },

    #[error("{command}: {}: Not a directory", .path.display())]
    NotADirectory { command: String, path: PathBuf },

    #[error("{command}: {}: No such file or directory", .path.display())]
    NoSuchPath { command: String, path: PathBuf },

    #[error("{0}: command not found")]
    UnknownCommand(String),

    #[error("{command}: {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command}: failed to start native process: {source}")]
    NativeSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command}: timed out after {seconds} seconds")]
    NativeTimeout { command: String, seconds: u64 },
}

impl EngineError {
    /// Wrap an I/O error raised while running `command`.
    pub fn io(command: &str, source: std::io::Error) -> Self {
        Self::Io {
            command: command.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_read_like_shell_errors() {
        let err = EngineError::NotADirectory {
            command: "cd".into(),
            path: PathBuf::from("/tmp/file.txt"),
        };
        assert_eq!(err.to_string(), "cd: /tmp/file.txt: Not a directory");

        let err = EngineError::MissingOperand {
            command: "mv".into(),
        };
        assert_eq!(err.to_string(), "mv: missing operand");

        let err = EngineError::UnknownCommand("frobnicate".into());
        assert_eq!(err.to_string(), "frobnicate: command not found");
    }

    #[test]
    fn test_timeout_message_includes_seconds() {
        let err = EngineError::NativeTimeout {
            command: "tree".into(),
            seconds: 5,
        };
        assert!(err.to_string().contains("5 seconds"));
    }
}
