//! Per-invocation command context and the immutable command result.
//!
//! A fresh [`CommandContext`] is produced for every command. Handlers and the
//! snapshot diff fill it in; once the pipeline wraps it into a
//! [`CommandResult`] it is read-only for every consumer.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Navigation state and detected filesystem effects of one command.
///
/// Invariant: after rename resolution `created` and `deleted` are disjoint,
/// and no path that appears in `renamed` (as key or value) is left in either.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandContext {
    pub command: String,
    pub start_dir: PathBuf,
    pub end_dir: PathBuf,
    pub created: BTreeSet<PathBuf>,
    pub deleted: BTreeSet<PathBuf>,
    pub modified: BTreeSet<PathBuf>,
    /// Old absolute path -> new absolute path.
    pub renamed: BTreeMap<PathBuf, PathBuf>,
    /// File whose content was inspected by a read-type command.
    pub read: Option<PathBuf>,
    pub execution_time_ms: u64,
}

impl CommandContext {
    /// Create an empty context; `end_dir` starts out equal to `start_dir`.
    pub fn new(command: impl Into<String>, start_dir: impl Into<PathBuf>) -> Self {
        let start_dir = start_dir.into();
        Self {
            command: command.into(),
            end_dir: start_dir.clone(),
            start_dir,
            created: BTreeSet::new(),
            deleted: BTreeSet::new(),
            modified: BTreeSet::new(),
            renamed: BTreeMap::new(),
            read: None,
            execution_time_ms: 0,
        }
    }

    /// Record a move, transferring ownership of both paths out of the
    /// created/deleted sets.
    pub fn record_rename(&mut self, from: PathBuf, to: PathBuf) {
        self.deleted.remove(&from);
        self.created.remove(&to);
        self.created.remove(&from);
        self.deleted.remove(&to);
        self.renamed.insert(from, to);
    }

    /// True when no filesystem effect was detected.
    pub fn is_unchanged(&self) -> bool {
        self.created.is_empty()
            && self.deleted.is_empty()
            && self.modified.is_empty()
            && self.renamed.is_empty()
    }

    /// Total number of detected effects.
    pub fn change_count(&self) -> usize {
        self.created.len() + self.deleted.len() + self.modified.len() + self.renamed.len()
    }

    /// Whether the command left the working area it started in.
    pub fn changed_directory(&self) -> bool {
        self.start_dir != self.end_dir
    }

    /// Check the created/deleted/renamed disjointness invariant.
    pub fn is_consistent(&self) -> bool {
        self.created.is_disjoint(&self.deleted)
            && self.renamed.iter().all(|(from, to)| {
                !self.created.contains(from)
                    && !self.created.contains(to)
                    && !self.deleted.contains(from)
                    && !self.deleted.contains(to)
            })
    }

    /// Human-readable one-line-per-effect summary, used by the CLI.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();
        let mut push_all = |label: &str, paths: &BTreeSet<PathBuf>| {
            for path in paths {
                lines.push(format!("{label} {}", path.display()));
            }
        };
        push_all("+", &self.created);
        push_all("-", &self.deleted);
        push_all("~", &self.modified);
        for (from, to) in &self.renamed {
            lines.push(format!("> {} -> {}", from.display(), to.display()));
        }
        if self.changed_directory() {
            lines.push(format!("@ {}", self.end_dir.display()));
        }
        lines.join("\n")
    }

    pub(crate) fn set_end_dir(&mut self, dir: &Path) {
        self.end_dir = dir.to_path_buf();
    }
}

/// Outcome of one command: success flag, output text, and the owning context.
///
/// Fields are private; consumers only ever read a result.
#[derive(Debug, Clone, Serialize)]
pub struct CommandResult {
    success: bool,
    output: String,
    context: CommandContext,
}

impl CommandResult {
    pub fn success(output: impl Into<String>, context: CommandContext) -> Self {
        Self {
            success: true,
            output: output.into(),
            context,
        }
    }

    pub fn failure(message: impl Into<String>, context: CommandContext) -> Self {
        Self {
            success: false,
            output: message.into(),
            context,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn context(&self) -> &CommandContext {
        &self.context
    }

    pub fn into_context(self) -> CommandContext {
        self.context
    }
}
