//! # Sandbox Boundary Layer
//!
//! A wrapping executor that confines navigation and mutation to a configured
//! root directory and shields a protected subtree (e.g. inventory storage).
//!
//! ## Rules
//!
//! - `cd` targets must resolve inside the root.
//! - `mv` sources and destination must resolve inside the root; the protected
//!   directory (or anything containing it) can never be a source.
//! - `rm` targets are validated one by one before anything is deleted; a single
//!   bad target fails the whole command. The protected directory, anything
//!   containing it, and the root itself can never be deleted.
//! - `mkdir` and `touch` targets must resolve inside the root.
//! - With `confine_reads`, `ls`, `cat`, and `tree` operands are confined too.
//! - The reserved token `done` always succeeds without touching the
//!   filesystem. It is a control signal for external logic.
//!
//! Violations fail closed: they are logged and rejected before any handler
//! runs, and paths are never silently clamped into the root.

mod core;
mod error;
mod paths;

pub use core::SandboxedExecutor;
pub use error::SandboxError;
pub use paths::{normalize_path_lexically, resolve_for_validation};
