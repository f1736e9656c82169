//! # Single Command Mode
//!
//! Executes one command line, prints the rendered result, and reports success
//! through the exit code.

use anyhow::Result;
use std::io::Write;

use crate::sandbox::SandboxedExecutor;
use crate::shell::render::{OutputFormat, render};

/// Run `line` and return the exit code (0 on success, 1 on failure).
pub fn run_single<W: Write>(
    executor: &mut SandboxedExecutor,
    line: &str,
    mut out: W,
    format: OutputFormat,
) -> Result<i32> {
    let result = executor.execute(line);
    let rendered = render(&result, format);
    if !rendered.is_empty() {
        writeln!(out, "{rendered}")?;
    }
    Ok(if result.is_success() { 0 } else { 1 })
}
