//! # REPL Mode
//!
//! Reads commands line by line until end of input or `exit`/`quit`, printing
//! each rendered result. The exit code reflects the last command.

use anyhow::Result;
use std::io::{BufRead, Write};

use crate::sandbox::SandboxedExecutor;
use crate::shell::render::{OutputFormat, render};

const PROMPT: &str = "$ ";

pub fn run_repl<R: BufRead, W: Write>(
    executor: &mut SandboxedExecutor,
    input: R,
    mut out: W,
    format: OutputFormat,
) -> Result<i32> {
    let mut code = 0;
    let interactive = format == OutputFormat::Text;

    if interactive {
        write!(out, "{PROMPT}")?;
        out.flush()?;
    }

    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim();
        if matches!(trimmed, "exit" | "quit") {
            break;
        }

        if !trimmed.is_empty() {
            let result = executor.execute(trimmed);
            code = if result.is_success() { 0 } else { 1 };
            let rendered = render(&result, format);
            if !rendered.is_empty() {
                writeln!(out, "{rendered}")?;
            }
        }

        if interactive {
            write!(out, "{PROMPT}")?;
            out.flush()?;
        }
    }

    Ok(code)
}
