//! Append-only log of executed commands.
//!
//! The engine appends one [`HistoryEntry`] at the end of every invocation and
//! never rewrites or drops entries. Retention is the caller's business: it can
//! export the log with [`HistoryLog::to_json`] and [`HistoryLog::clear`] it.

use serde::Serialize;
use std::time::SystemTime;

use crate::context::CommandResult;

/// One executed command. Immutable once appended.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    command: String,
    args: Vec<String>,
    result: CommandResult,
    #[serde(with = "crate::utils::time")]
    timestamp: SystemTime,
}

impl HistoryEntry {
    pub fn new(command: impl Into<String>, args: Vec<String>, result: CommandResult) -> Self {
        Self {
            command: command.into(),
            args,
            result,
            timestamp: SystemTime::now(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn result(&self) -> &CommandResult {
        &self.result
    }

    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        tracing::trace!("History append #{}: {}", self.entries.len(), entry.command);
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Drop every entry. Only ever called by the owner of the log.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Pretty-printed JSON array of all entries.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
