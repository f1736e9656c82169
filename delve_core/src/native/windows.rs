use std::path::Path;
use std::process::Command;
use std::time::Duration;

use super::{NativeOutput, NativeRunner, run_command};
use crate::error::EngineError;

/// Runs commands through `cmd /C` after translating them with [`translate`].
#[derive(Debug, Clone, Default)]
pub struct WindowsRunner {
    timeout: Option<Duration>,
}

impl WindowsRunner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl NativeRunner for WindowsRunner {
    fn run(
        &self,
        command: &str,
        args: &[String],
        working_dir: &Path,
    ) -> Result<NativeOutput, EngineError> {
        let script = translate(command, args);
        tracing::debug!("Translated '{}' to cmd script: {}", command, script);
        run_command(command, cmd_process(&script, working_dir), self.timeout)
    }
}

/// `cmd /C <script>`. The script already carries `cmd` quoting and is passed
/// verbatim, never through the MSVC argument escaping.
#[cfg(windows)]
fn cmd_process(script: &str, working_dir: &Path) -> Command {
    use std::os::windows::process::CommandExt;

    let mut process = Command::new("cmd");
    process.arg("/C").raw_arg(script).current_dir(working_dir);
    process
}

#[cfg(not(windows))]
fn cmd_process(script: &str, working_dir: &Path) -> Command {
    let mut process = Command::new("cmd");
    process.arg("/C").arg(script).current_dir(working_dir);
    process
}

/// Translate a Unix-style command into an equivalent `cmd.exe` sequence.
///
/// Unix flags (arguments starting with `-`) are dropped; operands are quoted
/// and their separators converted.
pub fn translate(command: &str, args: &[String]) -> String {
    let operands: Vec<String> = args
        .iter()
        .filter(|a| !a.starts_with('-'))
        .map(|a| a.replace('/', "\\"))
        .collect();
    let quoted = || {
        operands
            .iter()
            .map(|o| format!("\"{o}\""))
            .collect::<Vec<_>>()
            .join(" ")
    };

    match command {
        "ls" if operands.is_empty() => "dir /B".to_string(),
        "ls" => format!("dir /B {}", quoted()),
        "cat" => format!("type {}", quoted()),
        "pwd" => "cd".to_string(),
        "tree" if operands.is_empty() => "tree /F".to_string(),
        "tree" => format!("tree /F {}", quoted()),
        "mkdir" => format!("mkdir {}", quoted()),
        "rm" | "touch" if operands.is_empty() => {
            format!("echo {command}: missing operand 1>&2 & exit /b 1")
        }
        "rm" => per_target(&operands, |t| {
            format!(
                "(if exist \"{t}\\*\" (rmdir /S /Q \"{t}\") else if exist \"{t}\" (del /F /Q \"{t}\") else (echo rm: cannot remove '{t}': No such file or directory 1>&2 & exit /b 1))"
            )
        }),
        "touch" => per_target(&operands, |t| {
            format!(
                "(if exist \"{t}\" (copy /b \"{t}\" +,, \"{t}\" >nul) else (type nul > \"{t}\"))"
            )
        }),
        other if operands.is_empty() => other.to_string(),
        other => format!("{other} {}", quoted()),
    }
}

fn per_target(operands: &[String], step: impl Fn(&str) -> String) -> String {
    operands
        .iter()
        .map(|t| step(t))
        .collect::<Vec<_>>()
        .join(" & ")
}
