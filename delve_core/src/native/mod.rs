//! # Native Process Dispatch
//!
//! The display, read, and mutation commands (`ls`, `cat`, `pwd`, `tree`, `rm`,
//! `mkdir`, `touch`) are forwarded to a native process. Platform quirks live
//! behind the [`NativeRunner`] trait with one implementation per host family:
//!
//! - **Unix**: the command runs directly with its arguments.
//! - **Windows**: the command is translated into an equivalent `cmd /C`
//!   sequence (directory listing, `type`, recursive delete with per-target
//!   existence checks, and so on).
//!
//! Output is captured from both standard streams and returned trimmed.

mod process;
mod unix;
mod windows;

pub use process::{run_command, run_process};
pub use unix::UnixRunner;
pub use windows::{WindowsRunner, translate};

use crate::error::EngineError;
use std::path::Path;
use std::time::Duration;

/// Captured result of one native process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeOutput {
    /// Combined stdout and stderr, trimmed.
    pub output: String,
    /// Exit code, or `None` if the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl NativeOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs a command as a native process in a working directory.
pub trait NativeRunner {
    fn run(
        &self,
        command: &str,
        args: &[String],
        working_dir: &Path,
    ) -> Result<NativeOutput, EngineError>;
}

/// The runner for the current host family.
pub fn default_runner(timeout: Option<Duration>) -> Box<dyn NativeRunner> {
    #[cfg(windows)]
    {
        Box::new(WindowsRunner::new(timeout))
    }

    #[cfg(not(windows))]
    {
        Box::new(UnixRunner::new(timeout))
    }
}
