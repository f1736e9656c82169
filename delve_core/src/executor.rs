//! # Command Executor
//!
//! The engine proper. An `Executor` owns the working directory, the native
//! runner, the middleware chain, the execution listeners, and the history log.
//!
//! ## Execution Flow
//!
//! 1. **Tokenize**: the input line is split on whitespace into a lowercase
//!    command name and its arguments.
//! 2. **Expand**: wildcard arguments are resolved against the working
//!    directory (see [`crate::wildcard`]).
//! 3. **Before-hooks**: listeners are notified, then middleware may cancel.
//!    A cancelled command never reaches its handler and its context stays empty.
//! 4. **Dispatch**: `cd` and `mv` have dedicated handlers; the pass-through
//!    commands run as native processes. Mutating pass-through commands are
//!    bracketed by snapshots of the working directory and diffed.
//! 5. **After-hooks**: every middleware observes the final result, then the
//!    listeners do.
//! 6. **History**: the command, its arguments, and its result are appended.
//!
//! Everything happens synchronously under `&mut self`, so no two commands ever
//! overlap on the same working directory or snapshot window.

use anyhow::{Context, Result, anyhow};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::constants;
use crate::context::{CommandContext, CommandResult};
use crate::error::EngineError;
use crate::handlers::{self, HandlerOutput, navigation, relocate};
use crate::history::{HistoryEntry, HistoryLog};
use crate::listener::ExecutionListener;
use crate::middleware::{Middleware, MiddlewareChain};
use crate::native::{self, NativeRunner};
use crate::snapshot::{self, Snapshot};
use crate::utils::time::elapsed_ms;
use crate::wildcard;

/// Split an input line into a lowercase command name and its arguments.
///
/// Returns `None` for blank input.
pub fn tokenize(input: &str) -> Option<(String, Vec<String>)> {
    let mut parts = input.split_whitespace();
    let command = parts.next()?.to_lowercase();
    Some((command, parts.map(str::to_string).collect()))
}

pub struct Executor {
    cwd: PathBuf,
    home: PathBuf,
    runner: Box<dyn NativeRunner>,
    middleware: MiddlewareChain,
    listeners: Vec<Box<dyn ExecutionListener>>,
    history: HistoryLog,
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("cwd", &self.cwd)
            .field("home", &self.home)
            .field("middleware", &self.middleware)
            .field("listeners", &self.listeners.len())
            .field("history", &self.history.len())
            .finish()
    }
}

impl Executor {
    /// Create an executor whose working directory (and home) is `working_dir`.
    ///
    /// Fails if the directory does not exist.
    pub fn new(working_dir: impl AsRef<Path>) -> Result<Self> {
        let working_dir = working_dir.as_ref();
        let cwd = std::fs::canonicalize(working_dir).with_context(|| {
            format!("Failed to resolve working directory {}", working_dir.display())
        })?;
        if !cwd.is_dir() {
            return Err(anyhow!("Working directory {} is not a directory", cwd.display()));
        }

        Ok(Self {
            home: cwd.clone(),
            cwd,
            runner: native::default_runner(None),
            middleware: MiddlewareChain::new(),
            listeners: Vec::new(),
            history: HistoryLog::new(),
        })
    }

    /// Replace the native runner.
    pub fn with_runner(mut self, runner: Box<dyn NativeRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn working_dir(&self) -> &Path {
        &self.cwd
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn add_middleware(&mut self, middleware: impl Middleware + 'static) {
        self.middleware.push(Box::new(middleware));
    }

    /// Remove middleware by name. Returns true if any was removed.
    pub fn remove_middleware(&mut self, name: &str) -> bool {
        self.middleware.remove(name)
    }

    pub fn middleware_names(&self) -> Vec<&str> {
        self.middleware.names()
    }

    pub fn add_listener(&mut self, listener: impl ExecutionListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryLog {
        &mut self.history
    }

    /// Execute one input line through the full pipeline.
    pub fn execute(&mut self, input: &str) -> CommandResult {
        let Some((command, args)) = tokenize(input) else {
            return CommandResult::success("", CommandContext::new("", self.cwd.clone()));
        };
        let args = self.expand(&command, &args);
        self.run_pipeline(&command, args)
    }

    /// Wildcard-expand `args` against the working directory.
    pub fn expand(&self, command: &str, args: &[String]) -> Vec<String> {
        wildcard::expand(args, command, &self.cwd)
    }

    /// Run an already tokenized and expanded command through middleware,
    /// dispatch, and history.
    pub fn run_pipeline(&mut self, command: &str, args: Vec<String>) -> CommandResult {
        let mut context = CommandContext::new(command, self.cwd.clone());

        for listener in &mut self.listeners {
            listener.before_execute(command, &args, &self.cwd);
        }

        if let Some((name, message)) = self.middleware.run_before(command, &args, &context) {
            tracing::info!("'{}' cancelled by middleware '{}': {}", command, name, message);
            let result = CommandResult::failure(message, context);
            self.notify_after(command, &args, &result);
            return self.record(command, args, result);
        }

        let outcome = self.dispatch(command, &args, &mut context);

        if command != "cd"
            && let Some(dir) = handlers::end_dir_for(&context.start_dir, &args)
        {
            context.set_end_dir(&dir);
        }

        let result = match outcome {
            Ok(HandlerOutput {
                success: true,
                output,
            }) => CommandResult::success(output, context),
            Ok(HandlerOutput { output, .. }) => CommandResult::failure(output, context),
            Err(e) => {
                tracing::debug!("'{}' failed: {}", command, e);
                CommandResult::failure(e.to_string(), context)
            }
        };

        self.middleware
            .run_after(command, &args, result.context(), &result);
        self.notify_after(command, &args, &result);
        self.record(command, args, result)
    }

    /// Fail a command without dispatching it, e.g. on a boundary violation.
    pub fn reject(
        &mut self,
        command: &str,
        args: Vec<String>,
        message: impl Into<String>,
    ) -> CommandResult {
        let result = CommandResult::failure(message, CommandContext::new(command, self.cwd.clone()));
        self.record(command, args, result)
    }

    /// Append to history and hand the result back.
    pub fn record(&mut self, command: &str, args: Vec<String>, result: CommandResult) -> CommandResult {
        self.history
            .append(HistoryEntry::new(command, args, result.clone()));
        result
    }

    fn notify_after(&mut self, command: &str, args: &[String], result: &CommandResult) {
        for listener in &mut self.listeners {
            listener.after_execute(command, args, result);
        }
    }

    fn dispatch(
        &mut self,
        command: &str,
        args: &[String],
        context: &mut CommandContext,
    ) -> Result<HandlerOutput, EngineError> {
        match command {
            "cd" => {
                let start = Instant::now();
                let outcome = navigation::change_directory(&mut self.cwd, &self.home, args, context);
                context.execution_time_ms = elapsed_ms(start);
                outcome
            }
            "mv" => {
                let start = Instant::now();
                let outcome = relocate::move_paths(&self.cwd, args, context);
                context.execution_time_ms = elapsed_ms(start);
                outcome
            }
            c if constants::is_passthrough(c) => self.run_native(c, args, context),
            other => Err(EngineError::UnknownCommand(other.to_string())),
        }
    }

    fn run_native(
        &mut self,
        command: &str,
        args: &[String],
        context: &mut CommandContext,
    ) -> Result<HandlerOutput, EngineError> {
        let before = constants::is_mutating(command).then(|| {
            let snapshot = Snapshot::capture(&self.cwd);
            let targets: Vec<PathBuf> = handlers::operands(args)
                .into_iter()
                .map(|a| handlers::resolve(&self.cwd, a))
                .collect();
            snapshot.prime_checksums(&targets);
            snapshot
        });

        let start = Instant::now();
        let native = self.runner.run(command, args, &self.cwd);
        context.execution_time_ms = elapsed_ms(start);
        let native = native?;

        if let Some(before) = before {
            let after = Snapshot::capture(&self.cwd);
            snapshot::diff(&before, &after, context);
        }

        if constants::is_read(command)
            && native.success()
            && let Some(last) = handlers::operands(args).last()
        {
            context.read = Some(handlers::resolve(&self.cwd, last));
        }

        Ok(HandlerOutput {
            success: native.success(),
            output: native.output,
        })
    }
}
