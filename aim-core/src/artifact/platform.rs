// aim-core/src/artifact/platform.rs
use std::path::{Path, PathBuf};
use std::sync::Arc;

use aim_common::error::{AimError, Result};
use aim_common::model::{InstallOptions, InstallOutcome, InstallType, Version};
use aim_net::validation::combine_paths;
use aim_net::Transport;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use super::ArtifactCapabilities;
use crate::command::{Command, CommandRunner};

pub const PLATFORM_ARTIFACT_NAME: &str = "cdec";

const UNPACK: &str = "Unpack installation bundle";
const CONFIGURE_NODES: &str = "Prepare node configuration";
const PREREQUISITES: &str = "Install platform prerequisites";
const DEPLOY: &str = "Deploy and start platform services";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiInfo {
    ide_version: String,
}

/// The platform runtime. Installing it is a staged plan whose steps are
/// driven by the caller one `install` call at a time.
#[derive(Clone)]
pub struct PlatformArtifact {
    api_endpoint: String,
    transport: Arc<dyn Transport>,
    runner: Arc<dyn CommandRunner>,
    install_dir: PathBuf,
}

impl PlatformArtifact {
    pub fn new(
        api_endpoint: impl Into<String>,
        transport: Arc<dyn Transport>,
        runner: Arc<dyn CommandRunner>,
        install_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            api_endpoint: api_endpoint.into(),
            transport,
            runner,
            install_dir: install_dir.into(),
        }
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    fn step_descriptions(install_type: InstallType) -> &'static [&'static str] {
        match install_type {
            InstallType::SingleNode => &[UNPACK, PREREQUISITES, DEPLOY],
            InstallType::MultiNode => &[UNPACK, CONFIGURE_NODES, PREREQUISITES, DEPLOY],
        }
    }

    fn script(&self, description: &str, script: &str, install_type: InstallType) -> Command {
        Command::new(
            description,
            "sh",
            [format!("bin/{script}"), install_type.as_str().to_string()],
        )
        .with_cwd(&self.install_dir)
    }

    /// Every command of the plan for `install_type`, in execution order.
    pub fn install_plan(&self, binaries: &Path, install_type: InstallType) -> Vec<Command> {
        Self::step_descriptions(install_type)
            .iter()
            .map(|&description| match description {
                UNPACK => Command::new(
                    UNPACK,
                    "tar",
                    [
                        "-xzf".to_string(),
                        binaries.display().to_string(),
                        "-C".to_string(),
                        self.install_dir.display().to_string(),
                    ],
                ),
                CONFIGURE_NODES => self.script(description, "configure-nodes.sh", install_type),
                PREREQUISITES => self.script(description, "install-prerequisites.sh", install_type),
                _ => self.script(description, "deploy.sh", install_type),
            })
            .collect()
    }

    /// The command for `options.step`; a step outside the plan is rejected
    /// before anything runs.
    pub fn install_command(&self, binaries: &Path, options: &InstallOptions) -> Result<Command> {
        let mut plan = self.install_plan(binaries, options.install_type);
        let total = plan.len();
        let index = options.step as usize;
        if index == 0 || index > total {
            return Err(AimError::InvalidStep {
                artifact: PLATFORM_ARTIFACT_NAME.to_string(),
                step: options.step,
                total,
            });
        }
        Ok(plan.swap_remove(index - 1))
    }
}

#[async_trait]
impl ArtifactCapabilities for PlatformArtifact {
    fn name(&self) -> &str {
        PLATFORM_ARTIFACT_NAME
    }

    fn priority(&self) -> i32 {
        2
    }

    fn describe(&self) -> String {
        "Codenvy platform".to_string()
    }

    async fn installed_version(&self, auth_token: &str) -> Result<Option<Version>> {
        let url = combine_paths(&self.api_endpoint, "");
        let body = match self.transport.option(&url, auth_token).await {
            Ok(body) => body,
            Err(e) => {
                debug!("Platform API at {} not reachable, treating as not installed: {}", url, e);
                return Ok(None);
            }
        };
        let api_info: ApiInfo = serde_json::from_str(&body)?;
        Version::parse(&api_info.ide_version).map(Some)
    }

    async fn install(&self, binaries: &Path, options: &InstallOptions) -> Result<InstallOutcome> {
        let command = self.install_command(binaries, options)?;
        let total = Self::step_descriptions(options.install_type).len();

        if (options.step as usize) < total {
            let pid = self.runner.spawn(&command)?;
            info!(
                "Step {} of {} ({}) started with pid {}",
                options.step, total, command, pid
            );
            return Ok(InstallOutcome::InProgress(options.clone()));
        }

        self.runner.run(&command).await?;
        info!("Final step {} of {} ({}) completed", options.step, total, command);
        Ok(InstallOutcome::Completed)
    }

    fn install_info(&self, options: &InstallOptions) -> Result<Vec<String>> {
        Ok(Self::step_descriptions(options.install_type)
            .iter()
            .enumerate()
            .map(|(i, description)| format!("Step {}: {}", i + 1, description))
            .collect())
    }
}
