// aim-core/src/artifact/manager.rs
use std::path::{Path, PathBuf};

use aim_common::error::Result;
use aim_common::model::{InstallOptions, InstallOutcome, Version};
use async_trait::async_trait;
use tracing::{debug, info};

use super::ArtifactCapabilities;

pub const MANAGER_ARTIFACT_NAME: &str = "installation-manager";

/// The installation manager itself. Its installed version is the version of
/// the running binary and installing replaces that binary in one step.
#[derive(Debug, Clone)]
pub struct ManagerArtifact {
    current_version: Version,
    binary_path: PathBuf,
}

impl ManagerArtifact {
    pub fn new(current_version: Version, binary_path: impl Into<PathBuf>) -> Self {
        Self {
            current_version,
            binary_path: binary_path.into(),
        }
    }

    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }
}

#[async_trait]
impl ArtifactCapabilities for ManagerArtifact {
    fn name(&self) -> &str {
        MANAGER_ARTIFACT_NAME
    }

    fn priority(&self) -> i32 {
        1
    }

    fn describe(&self) -> String {
        "Installation manager".to_string()
    }

    async fn installed_version(&self, _auth_token: &str) -> Result<Option<Version>> {
        Ok(Some(self.current_version.clone()))
    }

    async fn install(&self, binaries: &Path, _options: &InstallOptions) -> Result<InstallOutcome> {
        debug!(
            "Replacing {} with {}",
            self.binary_path.display(),
            binaries.display()
        );
        aim_aio::fs::atomic_copy_file(binaries, &self.binary_path, 0o755)?;
        info!("Installation manager binary replaced at {}", self.binary_path.display());
        Ok(InstallOutcome::Completed)
    }

    fn install_info(&self, _options: &InstallOptions) -> Result<Vec<String>> {
        Ok(vec![format!(
            "Replace the installation manager binary at {}",
            self.binary_path.display()
        )])
    }
}
