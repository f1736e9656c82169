//! # Logging Initialization
//!
//! Centralized setup for the `tracing` subscriber used by the `delve` binary
//! and by tests.
//!
//! - **Environment Filter**: `RUST_LOG` wins when set; otherwise the given level
//!   applies to everything and `delve_core` logs at `debug`.
//! - **File Logging**: with `log_to_file = true`, a daily rolling log file is
//!   written to the user cache directory (via `directories`), without ANSI
//!   colors. Stdout stays free for command output.
//! - **Stderr Fallback**: when the cache directory cannot be determined or is
//!   not writable, logs go to stderr with colors.
//!
//! Initialization happens at most once per process; later calls are no-ops.

use anyhow::Result;
use directories::ProjectDirs;
use std::{io::stderr, path::Path, sync::Once};
use tracing_subscriber::{EnvFilter, fmt::layer, prelude::*};

use crate::constants::LOG_FILE_NAME;

static INIT: Once = Once::new();

/// Initialize verbose logging for tests (trace level, stderr).
pub fn init_test_logging() {
    let _ = init_logging("trace", false);
}

/// Install the global tracing subscriber.
pub fn init_logging(log_level: &str, log_to_file: bool) -> Result<()> {
    INIT.call_once(|| {
        let env_filter = || {
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("{log_level},delve_core=debug")))
        };

        if log_to_file
            && let Some(proj_dirs) = ProjectDirs::from("com", "Delve", "delve")
        {
            let log_dir = proj_dirs.cache_dir();

            // rolling::daily panics on permission errors, so check first.
            if can_write(log_dir) {
                let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME);
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

                let installed = tracing_subscriber::registry()
                    .with(env_filter())
                    .with(layer().with_writer(non_blocking).with_ansi(false))
                    .try_init()
                    .is_ok();
                if installed {
                    // Leaked so buffered lines are flushed at exit.
                    Box::leak(Box::new(guard));
                    return;
                }
            }
        }

        let _ = tracing_subscriber::registry()
            .with(env_filter())
            .with(layer().with_writer(stderr).with_ansi(true))
            .try_init();
    });

    Ok(())
}

/// Create `dir` if needed and check that a file can be written into it.
fn can_write(dir: &Path) -> bool {
    if std::fs::create_dir_all(dir).is_err() {
        return false;
    }

    let test_file = dir.join(".delve_log_test");
    match std::fs::write(&test_file, "test") {
        Ok(()) => {
            let _ = std::fs::remove_file(&test_file);
            true
        }
        Err(_) => false,
    }
}
