use std::path::PathBuf;

/// Errors raised by the sandbox boundary layer.
#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    #[error("Path '{}' is outside the sandbox root '{}'", .path.display(), .root.display())]
    PathOutsideSandbox { path: PathBuf, root: PathBuf },

    #[error("Path '{}' is protected and cannot be moved or deleted", .path.display())]
    ProtectedPath { path: PathBuf },

    #[error("Sandbox root '{}' is unavailable: {reason}", .path.display())]
    RootUnavailable { path: PathBuf, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outside_message_names_both_paths() {
        let err = SandboxError::PathOutsideSandbox {
            path: PathBuf::from("../outside.txt"),
            root: PathBuf::from("/world"),
        };
        let msg = err.to_string();
        assert!(msg.contains("../outside.txt"));
        assert!(msg.contains("/world"));
    }
}
