// aim-core/src/command.rs
use std::fmt;
use std::path::{Path, PathBuf};

use aim_common::error::{AimError, Result};
use async_trait::async_trait;
use tracing::debug;

/// One external program invocation of an install plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    description: String,
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
}

impl Command {
    pub fn new(
        description: impl Into<String>,
        program: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            description: description.into(),
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
        }
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description)
    }
}

/// Executes install plan commands, either to completion or detached.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs to completion; a non-zero exit is an error. Returns stdout.
    async fn run(&self, command: &Command) -> Result<String>;

    /// Starts the command without waiting for it and returns its pid.
    fn spawn(&self, command: &Command) -> Result<u32>;
}

/// Runs commands on the local host, sending detached output to `log_file`.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    log_file: PathBuf,
}

impl ShellRunner {
    pub fn new(log_file: impl Into<PathBuf>) -> Self {
        Self {
            log_file: log_file.into(),
        }
    }

    pub fn log_file(&self) -> &Path {
        &self.log_file
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, command: &Command) -> Result<String> {
        debug!("Running '{}': {}", command.description(), command.command_line());
        let output = aim_aio::run_command_async(
            command.program(),
            command.args(),
            command.cwd().map(Path::to_path_buf),
            None,
        )
        .await?;
        if !output.status.success() {
            return Err(AimError::CommandExec(format!(
                "'{}' exited with {}: {}",
                command.command_line(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn spawn(&self, command: &Command) -> Result<u32> {
        aim_aio::spawn_detached(
            command.program(),
            command.args(),
            command.cwd(),
            &self.log_file,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_and_display() {
        let cmd = Command::new("Unpack bundle", "tar", ["-xzf", "cdec.tar.gz"]);
        assert_eq!(cmd.command_line(), "tar -xzf cdec.tar.gz");
        assert_eq!(cmd.to_string(), "Unpack bundle");
        assert!(cmd.cwd().is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shell_runner_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ShellRunner::new(dir.path().join("install.log"));

        let ok = Command::new("echo", "sh", ["-c", "echo done"]);
        assert_eq!(runner.run(&ok).await.unwrap().trim(), "done");

        let failing = Command::new("fail", "sh", ["-c", "exit 3"]);
        assert!(matches!(
            runner.run(&failing).await,
            Err(AimError::CommandExec(_))
        ));
    }
}
