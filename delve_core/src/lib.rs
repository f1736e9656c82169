//! # Delve Core
//!
//! A sandboxed shell-command execution engine. It accepts line-oriented
//! shell-style commands (`cd`, `mv`, `rm`, `ls`, `cat`, `mkdir`, `touch`, `pwd`,
//! `tree`), runs them against a real directory subtree, and reports back a
//! structured [`context::CommandContext`] describing what changed: created,
//! deleted, modified, and renamed paths plus the navigation state before and
//! after the command.
//!
//! ## Pipeline
//!
//! ```text
//! input -> tokenize -> wildcard expansion -> middleware (before)
//!       -> handler / native process -> snapshot diff
//!       -> middleware (after) -> history -> CommandResult
//! ```
//!
//! ## Modules
//!
//! - **`executor`**: The engine. Owns the working directory, the middleware
//!   chain, the listeners and the history log.
//! - **`snapshot`**: Before/after directory snapshots and the diff that turns
//!   them into created/deleted/modified/renamed sets.
//! - **`wildcard`**: `*` and `?` expansion against the working directory.
//! - **`handlers`**: `cd`, `mv`, and the native pass-through for everything else.
//! - **`native`**: One process runner per host family behind a single trait.
//! - **`middleware`** / **`listener`**: Interception hooks for external logic.
//! - **`sandbox`**: Boundary layer that confines commands to a root directory
//!   and shields a protected subtree.
//! - **`history`**: Append-only log of executed commands.
//!
//! The engine is single-threaded and blocking by construction: every command
//! takes `&mut self` on the executor and is fully processed before returning.

pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod executor;
pub mod handlers;
pub mod history;
pub mod listener;
pub mod middleware;
pub mod native;
pub mod sandbox;
pub mod shell;
pub mod snapshot;
pub mod utils;
pub mod wildcard;

pub use context::{CommandContext, CommandResult};
pub use error::EngineError;
pub use executor::Executor;
pub use history::{HistoryEntry, HistoryLog};
pub use listener::ExecutionListener;
pub use middleware::{Middleware, Verdict};
pub use sandbox::{SandboxError, SandboxedExecutor};
