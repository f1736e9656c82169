//! `mv`: move or rename files and directories.
//!
//! The move is known exactly, so it is written straight into
//! `CommandContext::renamed` and no snapshot diff runs. A file replaced at
//! the destination is also reported in `CommandContext::modified`.

use std::path::{Path, PathBuf};

use super::{HandlerOutput, operands, resolve};
use crate::context::CommandContext;
use crate::error::EngineError;

/// Move every source to the destination (the last operand).
///
/// When the destination is an existing directory, each source is moved into
/// it under its own name. All sources are checked before anything moves.
pub fn move_paths(
    cwd: &Path,
    args: &[String],
    context: &mut CommandContext,
) -> Result<HandlerOutput, EngineError> {
    let operands = operands(args);
    let Some((destination, sources)) = operands.split_last() else {
        return Err(missing_operand());
    };
    if sources.is_empty() {
        return Err(missing_operand());
    }

    let destination = resolve(cwd, destination);
    let into_directory = destination.is_dir();
    if sources.len() > 1 && !into_directory {
        return Err(EngineError::NotADirectory {
            command: "mv".into(),
            path: destination,
        });
    }

    let mut moves: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(sources.len());
    for source in sources {
        let source = resolve(cwd, source);
        if std::fs::symlink_metadata(&source).is_err() {
            return Err(EngineError::NoSuchPath {
                command: "mv".into(),
                path: source,
            });
        }
        let target = match (into_directory, source.file_name()) {
            (true, Some(name)) => destination.join(name),
            _ => destination.clone(),
        };
        moves.push((source, target));
    }

    for (source, target) in moves {
        let overwrites = std::fs::symlink_metadata(&target).is_ok_and(|m| !m.is_dir());
        std::fs::rename(&source, &target).map_err(|e| EngineError::io("mv", e))?;
        tracing::debug!("mv: {:?} -> {:?} (overwrote: {})", source, target, overwrites);
        context.record_rename(source, target.clone());
        // The previous content at the target is gone.
        if overwrites {
            context.modified.insert(target);
        }
    }

    Ok(HandlerOutput::ok(""))
}

fn missing_operand() -> EngineError {
    EngineError::MissingOperand {
        command: "mv".into(),
    }
}
