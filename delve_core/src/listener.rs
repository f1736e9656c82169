//! Observational hooks around command execution.
//!
//! Listeners see every command the executor dispatches, including ones that a
//! middleware cancels, but unlike middleware they can never influence the
//! outcome.

use crate::context::CommandResult;
use std::path::Path;

/// Observer notified before and after each dispatched command.
pub trait ExecutionListener {
    fn before_execute(&mut self, _command: &str, _args: &[String], _current_dir: &Path) {}

    fn after_execute(&mut self, _command: &str, _args: &[String], _result: &CommandResult) {}
}

/// Emits one `tracing` event per hook.
#[derive(Debug, Default)]
pub struct LoggingListener;

impl ExecutionListener for LoggingListener {
    fn before_execute(&mut self, command: &str, args: &[String], current_dir: &Path) {
        tracing::debug!("before_execute: {} {:?} in {:?}", command, args, current_dir);
    }

    fn after_execute(&mut self, command: &str, _args: &[String], result: &CommandResult) {
        tracing::debug!(
            "after_execute: {} success={} end_dir={:?}",
            command,
            result.is_success(),
            result.context().end_dir
        );
    }
}
