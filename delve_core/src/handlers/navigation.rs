//! `cd`: change the executor's working directory.

use std::path::{Path, PathBuf};

use super::{HandlerOutput, operands, resolve};
use crate::context::CommandContext;
use crate::error::EngineError;

/// Resolve the single operand (or `home` without one) and move `cwd` there.
///
/// `cwd` is only updated on success; a failed `cd` leaves it untouched.
pub fn change_directory(
    cwd: &mut PathBuf,
    home: &Path,
    args: &[String],
    context: &mut CommandContext,
) -> Result<HandlerOutput, EngineError> {
    let target = match operands(args).as_slice() {
        [] => home.to_path_buf(),
        [one] => resolve(cwd, one),
        _ => {
            return Err(EngineError::TooManyArguments {
                command: "cd".into(),
            });
        }
    };

    let metadata = std::fs::metadata(&target).map_err(|_| EngineError::NoSuchPath {
        command: "cd".into(),
        path: target.clone(),
    })?;
    if !metadata.is_dir() {
        return Err(EngineError::NotADirectory {
            command: "cd".into(),
            path: target,
        });
    }

    let target = std::fs::canonicalize(&target).map_err(|e| EngineError::io("cd", e))?;
    tracing::debug!("cd: {:?} -> {:?}", cwd, target);
    context.set_end_dir(&target);
    *cwd = target;
    Ok(HandlerOutput::ok(""))
}
