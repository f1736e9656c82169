//! Command handlers.
//!
//! - **`navigation`**: `cd`, the only command that moves the executor's
//!   working directory.
//! - **`relocate`**: `mv`, which records its effects exactly instead of relying
//!   on snapshot inference.
//! - Everything else goes through the native pass-through (see
//!   [`crate::native`]) and the snapshot diff.
//!
//! Path arguments are resolved lexically against the working directory.

pub mod navigation;
pub mod relocate;

use std::path::{Path, PathBuf};

use crate::sandbox::normalize_path_lexically;

/// What a handler reports back to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HandlerOutput {
    pub success: bool,
    pub output: String,
}

impl HandlerOutput {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
        }
    }
}

/// Arguments that are not flags.
pub fn operands(args: &[String]) -> Vec<&str> {
    args.iter()
        .map(String::as_str)
        .filter(|a| !a.starts_with('-'))
        .collect()
}

/// Resolve `arg` against `cwd` and normalize `.` and `..` away.
pub fn resolve(cwd: &Path, arg: &str) -> PathBuf {
    normalize_path_lexically(&cwd.join(arg))
}

/// `endDir` for every command except `cd`: the parent of the last non-flag
/// argument. `None` when there is no such argument.
///
/// This assumes the most recently referenced path's parent is the operative
/// directory. Multi-target commands whose targets live in different
/// directories only report the last one.
pub fn end_dir_for(cwd: &Path, args: &[String]) -> Option<PathBuf> {
    let last = args.iter().rev().find(|a| !a.starts_with('-'))?;
    resolve(cwd, last).parent().map(Path::to_path_buf)
}
