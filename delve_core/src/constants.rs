//! Constants shared across the engine.

/// Commands handled by the native pass-through.
pub const PASSTHROUGH_COMMANDS: &[&str] = &["ls", "cat", "pwd", "tree", "rm", "mkdir", "touch"];

/// Commands whose effects are reconstructed from before/after snapshots.
pub const MUTATING_COMMANDS: &[&str] = &["rm", "mkdir", "touch"];

/// Commands that inspect file content and populate `CommandContext::read`.
pub const READ_COMMANDS: &[&str] = &["cat"];

/// Reserved control token intercepted by the sandbox boundary layer.
pub const DONE_TOKEN: &str = "done";

/// Default sandbox root used when no configuration is supplied.
pub const DEFAULT_SANDBOX_ROOT: &str = "sandbox";

/// Default log level for the `delve` binary.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Name of the log file written under the project cache directory.
pub const LOG_FILE_NAME: &str = "delve.log";

/// Returns true if the command mutates the filesystem and needs a snapshot diff.
pub fn is_mutating(command: &str) -> bool {
    MUTATING_COMMANDS.contains(&command)
}

/// Returns true if the command is forwarded to a native process.
pub fn is_passthrough(command: &str) -> bool {
    PASSTHROUGH_COMMANDS.contains(&command)
}

/// Returns true if the command reads file content.
pub fn is_read(command: &str) -> bool {
    READ_COMMANDS.contains(&command)
}
