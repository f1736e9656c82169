use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::error::SandboxError;
use super::paths::{normalize_path_lexically, resolve_for_validation};
use crate::config::EngineConfig;
use crate::constants::DONE_TOKEN;
use crate::context::{CommandContext, CommandResult};
use crate::executor::{Executor, tokenize};
use crate::handlers::operands;
use crate::history::HistoryLog;
use crate::listener::ExecutionListener;
use crate::middleware::Middleware;
use crate::native;

/// Executor confined to a sandbox root.
#[derive(Debug)]
pub struct SandboxedExecutor {
    inner: Executor,
    root: PathBuf,
    protected: Option<PathBuf>,
    confine_reads: bool,
}

impl SandboxedExecutor {
    /// Build a sandboxed executor from configuration.
    ///
    /// The sandbox root is created if missing. Failing to create or resolve it
    /// is fatal here rather than at command time.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let root = prepare_root(&config.sandbox_root)?;

        let protected = config.protected_path(&root).map(|path| {
            std::fs::canonicalize(&path).unwrap_or_else(|_| normalize_path_lexically(&path))
        });

        let inner = Executor::new(&root)?
            .with_runner(native::default_runner(config.command_timeout()));

        tracing::info!(
            "Sandbox ready: root={:?}, protected={:?}, confine_reads={}",
            root,
            protected,
            config.confine_reads
        );

        Ok(Self {
            inner,
            root,
            protected,
            confine_reads: config.confine_reads,
        })
    }

    /// Sandbox rooted at `root` with default settings and an optional
    /// root-relative protected directory.
    pub fn new(root: impl Into<PathBuf>, protected_dir: Option<&str>) -> Result<Self> {
        let config = EngineConfig {
            sandbox_root: root.into(),
            protected_dir: protected_dir.map(PathBuf::from),
            ..EngineConfig::default()
        };
        Self::from_config(&config)
    }

    /// Replace the native runner of the wrapped executor.
    pub fn with_runner(mut self, runner: Box<dyn native::NativeRunner>) -> Self {
        self.inner = self.inner.with_runner(runner);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn protected(&self) -> Option<&Path> {
        self.protected.as_deref()
    }

    pub fn working_dir(&self) -> &Path {
        self.inner.working_dir()
    }

    pub fn history(&self) -> &HistoryLog {
        self.inner.history()
    }

    pub fn add_middleware(&mut self, middleware: impl Middleware + 'static) {
        self.inner.add_middleware(middleware);
    }

    pub fn remove_middleware(&mut self, name: &str) -> bool {
        self.inner.remove_middleware(name)
    }

    pub fn add_listener(&mut self, listener: impl ExecutionListener + 'static) {
        self.inner.add_listener(listener);
    }

    pub fn executor(&self) -> &Executor {
        &self.inner
    }

    pub fn executor_mut(&mut self) -> &mut Executor {
        &mut self.inner
    }

    /// Execute one input line with boundary enforcement.
    pub fn execute(&mut self, input: &str) -> CommandResult {
        let Some((command, args)) = tokenize(input) else {
            return self.inner.execute(input);
        };

        if command == DONE_TOKEN {
            tracing::debug!("Control token '{}' received", DONE_TOKEN);
            let context = CommandContext::new(DONE_TOKEN, self.working_dir().to_path_buf());
            return self
                .inner
                .record(&command, args, CommandResult::success("", context));
        }

        let args = self.inner.expand(&command, &args);

        if let Err(violation) = self.check(&command, &args) {
            tracing::warn!("Sandbox violation in '{} {:?}': {}", command, args, violation);
            return self.inner.reject(&command, args, violation.to_string());
        }

        self.inner.run_pipeline(&command, args)
    }

    /// Validate every path operand of `command` before anything runs.
    pub fn check(&self, command: &str, args: &[String]) -> Result<(), SandboxError> {
        let operands = operands(args);

        match command {
            "cd" => {
                if let Some(target) = operands.first() {
                    self.ensure_inside(target)?;
                }
            }
            "mv" => {
                if let Some((destination, sources)) = operands.split_last() {
                    for source in sources {
                        let resolved = self.ensure_inside(source)?;
                        self.ensure_not_protected(&resolved)?;
                    }
                    self.ensure_inside(destination)?;
                }
            }
            "rm" => {
                for target in &operands {
                    let resolved = self.ensure_inside(target)?;
                    self.ensure_not_protected(&resolved)?;
                }
            }
            "mkdir" | "touch" => {
                for target in &operands {
                    self.ensure_inside(target)?;
                }
            }
            "ls" | "cat" | "tree" if self.confine_reads => {
                for target in &operands {
                    self.ensure_inside(target)?;
                }
            }
            _ => {}
        }

        Ok(())
    }

    fn ensure_inside(&self, arg: &str) -> Result<PathBuf, SandboxError> {
        resolve_for_validation(self.working_dir(), arg)
            .filter(|resolved| resolved.starts_with(&self.root))
            .ok_or_else(|| SandboxError::PathOutsideSandbox {
                path: PathBuf::from(arg),
                root: self.root.clone(),
            })
    }

    /// The root, the protected directory, and anything containing the
    /// protected directory can never be moved or deleted.
    fn ensure_not_protected(&self, resolved: &Path) -> Result<(), SandboxError> {
        let shields_protected = self
            .protected
            .as_ref()
            .is_some_and(|p| p.starts_with(resolved));
        if resolved == self.root || shields_protected {
            return Err(SandboxError::ProtectedPath {
                path: resolved.to_path_buf(),
            });
        }
        Ok(())
    }
}

fn prepare_root(root: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(root).map_err(|e| SandboxError::RootUnavailable {
        path: root.to_path_buf(),
        reason: e.to_string(),
    })?;
    std::fs::canonicalize(root)
        .with_context(|| format!("Failed to canonicalize sandbox root {}", root.display()))
}
