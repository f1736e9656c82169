//! Shared fixtures for integration tests.
//!
//! `FsRunner` performs the pass-through commands in-process with `std::fs`,
//! so scenario tests behave the same on every host. `RecordingRunner` only
//! records what it was asked to run.

#![allow(dead_code)]

use delve_core::error::EngineError;
use delve_core::native::{NativeOutput, NativeRunner};
use delve_core::sandbox::SandboxedExecutor;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

pub fn args(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn ok(output: impl Into<String>) -> NativeOutput {
    NativeOutput {
        output: output.into(),
        exit_code: Some(0),
    }
}

fn fail(output: impl Into<String>) -> NativeOutput {
    NativeOutput {
        output: output.into(),
        exit_code: Some(1),
    }
}

/// In-process emulation of the native commands.
#[derive(Debug, Default)]
pub struct FsRunner;

impl NativeRunner for FsRunner {
    fn run(
        &self,
        command: &str,
        args: &[String],
        working_dir: &Path,
    ) -> Result<NativeOutput, EngineError> {
        let flags: String = args
            .iter()
            .filter(|a| a.starts_with('-'))
            .flat_map(|a| a.chars().skip(1))
            .collect();
        let targets: Vec<PathBuf> = args
            .iter()
            .filter(|a| !a.starts_with('-'))
            .map(|a| working_dir.join(a))
            .collect();

        let outcome = match command {
            "pwd" => ok(working_dir.display().to_string()),
            "mkdir" => {
                for target in &targets {
                    let created = if flags.contains('p') {
                        fs::create_dir_all(target)
                    } else {
                        fs::create_dir(target)
                    };
                    if let Err(e) = created {
                        return Ok(fail(format!("mkdir: {}: {e}", target.display())));
                    }
                }
                ok("")
            }
            "touch" => {
                for target in &targets {
                    let touched = if target.exists() {
                        fs::OpenOptions::new()
                            .write(true)
                            .open(target)
                            .and_then(|f| f.set_modified(SystemTime::now() + Duration::from_secs(60)))
                    } else {
                        fs::File::create(target).map(|_| ())
                    };
                    if let Err(e) = touched {
                        return Ok(fail(format!("touch: {}: {e}", target.display())));
                    }
                }
                ok("")
            }
            "rm" => {
                let recursive = flags.contains('r') || flags.contains('R');
                for target in &targets {
                    let removed = if target.is_dir() && recursive {
                        fs::remove_dir_all(target)
                    } else {
                        fs::remove_file(target)
                    };
                    if let Err(e) = removed {
                        return Ok(fail(format!("rm: cannot remove {}: {e}", target.display())));
                    }
                }
                ok("")
            }
            "cat" => {
                let mut out = String::new();
                for target in &targets {
                    match fs::read_to_string(target) {
                        Ok(content) => out.push_str(&content),
                        Err(e) => return Ok(fail(format!("cat: {}: {e}", target.display()))),
                    }
                }
                ok(out.trim().to_string())
            }
            "ls" | "tree" => {
                let dir = targets.first().cloned().unwrap_or_else(|| working_dir.to_path_buf());
                let mut names: Vec<String> = match fs::read_dir(&dir) {
                    Ok(entries) => entries
                        .filter_map(|e| e.ok())
                        .map(|e| e.file_name().to_string_lossy().into_owned())
                        .collect(),
                    Err(e) => return Ok(fail(format!("{command}: {}: {e}", dir.display()))),
                };
                names.sort();
                ok(names.join("\n"))
            }
            other => fail(format!("{other}: unsupported")),
        };
        Ok(outcome)
    }
}

/// Records every invocation and reports success with empty output.
#[derive(Debug, Clone, Default)]
pub struct RecordingRunner {
    pub calls: Rc<RefCell<Vec<(String, Vec<String>)>>>,
}

impl NativeRunner for RecordingRunner {
    fn run(
        &self,
        command: &str,
        args: &[String],
        _working_dir: &Path,
    ) -> Result<NativeOutput, EngineError> {
        self.calls
            .borrow_mut()
            .push((command.to_string(), args.to_vec()));
        Ok(ok(""))
    }
}

/// A temp dir holding `world/` (the sandbox root, with `inventory/`) and a
/// sibling `outside.txt` that must never be touched.
pub struct World {
    pub temp: TempDir,
    pub base: PathBuf,
    pub root: PathBuf,
}

impl World {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let base = fs::canonicalize(temp.path()).unwrap();
        let root = base.join("world");
        fs::create_dir_all(root.join("inventory")).unwrap();
        fs::write(root.join("inventory/sword.item"), "sharp").unwrap();
        fs::write(base.join("outside.txt"), "keep out").unwrap();
        Self { temp, base, root }
    }

    pub fn sandbox(&self) -> SandboxedExecutor {
        SandboxedExecutor::new(&self.root, Some("inventory"))
            .unwrap()
            .with_runner(Box::new(FsRunner))
    }
}
