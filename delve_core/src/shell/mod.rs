//! # Shell Module
//!
//! Entry point and CLI logic for the `delve` binary.
//!
//! - **`cli`**: Argument parsing, configuration merge, and mode dispatch.
//! - **`modes`**: Single-command mode and the interactive REPL.
//! - **`render`**: Text and JSON rendering of command results.

pub mod cli;
pub mod modes;
pub mod render;

pub use cli::{Cli, run};
