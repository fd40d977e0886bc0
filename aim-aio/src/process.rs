// aim-aio/src/process.rs
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::Output as StdOutput;
use std::process::Stdio;

use aim_common::error::{AimError, Result};
use tokio::process::Command;
use tracing::{debug, error};

/// Runs an external command to completion and captures its output.
pub async fn run_command_async(
    command: &str,
    args: &[String],
    cwd: Option<PathBuf>,
    envs: Option<HashMap<String, String>>,
) -> Result<StdOutput> {
    debug!(
        "Async Running command: {} {:?} (cwd: {:?}, envs: {:?})",
        command,
        args,
        cwd,
        envs.as_ref().map(|e| e.keys().collect::<Vec<_>>()) // Log only keys for envs
    );

    let mut cmd = Command::new(command);
    cmd.args(args);
    cmd.kill_on_drop(true);

    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    if let Some(env_map) = envs {
        cmd.envs(env_map);
    }

    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    cmd.stdin(Stdio::null());

    match cmd.output().await {
        Ok(output) => {
            if !output.status.success() {
                debug!("Async Command failed with status: {}", output.status);
                let stdout = String::from_utf8_lossy(&output.stdout);
                let stderr = String::from_utf8_lossy(&output.stderr);
                if !stdout.trim().is_empty() {
                    debug!("Stdout:\n{}", stdout.trim());
                }
                if !stderr.trim().is_empty() {
                    debug!("Stderr:\n{}", stderr.trim());
                }
            } else {
                debug!("Async Command finished successfully.");
            }
            Ok(output)
        }
        Err(e) => {
            error!("Async Failed to execute command {}: {}", command, e);
            Err(AimError::CommandExec(format!("{command}: {e}")))
        }
    }
}

/// Starts a command without waiting for it; stdout and stderr are appended to
/// `log_file`. Returns the child's pid.
pub fn spawn_detached(
    command: &str,
    args: &[String],
    cwd: Option<&Path>,
    log_file: &Path,
) -> Result<u32> {
    debug!(
        "Spawning detached command: {} {:?} (log: {})",
        command,
        args,
        log_file.display()
    );
    if let Some(parent) = log_file.parent() {
        crate::fs::create_dir_all(parent)?;
    }
    let log = OpenOptions::new().create(true).append(true).open(log_file)?;
    let log_err = log.try_clone()?;

    let mut cmd = std::process::Command::new(command);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::from(log))
        .stderr(Stdio::from(log_err));
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    let child = cmd.spawn().map_err(|e| {
        error!("Failed to spawn {}: {}", command, e);
        AimError::CommandExec(format!("{command}: {e}"))
    })?;
    debug!("Detached command {} started with pid {}", command, child.id());
    Ok(child.id())
}
