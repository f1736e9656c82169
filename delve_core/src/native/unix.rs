use std::path::Path;
use std::time::Duration;

use super::{NativeOutput, NativeRunner, run_process};
use crate::error::EngineError;

/// Runs commands directly: `ls -la dir` spawns `ls` with `["-la", "dir"]`.
#[derive(Debug, Clone, Default)]
pub struct UnixRunner {
    timeout: Option<Duration>,
}

impl UnixRunner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl NativeRunner for UnixRunner {
    fn run(
        &self,
        command: &str,
        args: &[String],
        working_dir: &Path,
    ) -> Result<NativeOutput, EngineError> {
        run_process(command, command, args, working_dir, self.timeout)
    }
}
