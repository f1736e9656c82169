use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use super::NativeOutput;
use crate::error::EngineError;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Spawn `program` with `args` in `working_dir` and wait for it (see
/// [`run_command`]).
pub fn run_process(
    command: &str,
    program: &str,
    args: &[String],
    working_dir: &Path,
    timeout: Option<Duration>,
) -> Result<NativeOutput, EngineError> {
    let mut process = Command::new(program);
    process.args(args).current_dir(working_dir);
    run_command(command, process, timeout)
}

/// Spawn a prepared `process`, drain both output streams, and wait for it to
/// exit.
///
/// With a `timeout`, a process that is still running when it expires is
/// killed and `EngineError::NativeTimeout` is returned. Without one, a hung
/// process blocks the caller.
pub fn run_command(
    command: &str,
    mut process: Command,
    timeout: Option<Duration>,
) -> Result<NativeOutput, EngineError> {
    tracing::debug!("Spawning native process for '{}': {:?}", command, process);

    let mut child = process
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| EngineError::NativeSpawn {
            command: command.to_string(),
            source,
        })?;

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let status = match timeout {
        None => child.wait().map_err(|e| EngineError::io(command, e))?,
        Some(limit) => {
            let started = Instant::now();
            loop {
                if let Some(status) = child.try_wait().map_err(|e| EngineError::io(command, e))? {
                    break status;
                }
                if started.elapsed() >= limit {
                    tracing::warn!("Killing '{}' after {:?}", command, limit);
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(EngineError::NativeTimeout {
                        command: command.to_string(),
                        seconds: limit.as_secs(),
                    });
                }
                thread::sleep(POLL_INTERVAL);
            }
        }
    };

    let stdout = stdout.join().unwrap_or_default();
    let stderr = stderr.join().unwrap_or_default();
    let output = combine(&stdout, &stderr);

    tracing::debug!("Native process '{}' exited with {:?}", command, status.code());
    Ok(NativeOutput {
        output,
        exit_code: status.code(),
    })
}

fn drain<R: Read + Send + 'static>(stream: Option<R>) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut stream) = stream {
            let _ = stream.read_to_end(&mut buf);
        }
        buf
    })
}

fn combine(stdout: &[u8], stderr: &[u8]) -> String {
    let stdout = String::from_utf8_lossy(stdout);
    let stderr = String::from_utf8_lossy(stderr);
    let (stdout, stderr) = (stdout.trim(), stderr.trim());
    match (stdout.is_empty(), stderr.is_empty()) {
        (false, false) => format!("{stdout}\n{stderr}"),
        (true, _) => stderr.to_string(),
        (false, true) => stdout.to_string(),
    }
}
