// aim-core/src/manager/install.rs
use aim_common::error::{AimError, Result};
use aim_common::model::{ArtifactProperties, InstallOptions, InstallOutcome, Version};
use tracing::{debug, info};

use super::InstallationManager;
use crate::artifact::{Artifact, ArtifactCapabilities};
use crate::download_cache::{DownloadCache, DownloadedArtifactIndex};

impl InstallationManager {
    /// Installs a downloaded version of `artifact`. Only upgrades are allowed.
    /// A staged install hands back [`InstallOutcome::InProgress`] until its
    /// final step has run.
    pub async fn install(
        &self,
        auth_token: &str,
        artifact: &Artifact,
        version: &str,
        options: &InstallOptions,
    ) -> Result<InstallOutcome> {
        let version_to_install = Version::parse(version)?;

        if let Some(installed) = artifact.installed_version(auth_token).await? {
            if installed >= version_to_install {
                debug!(
                    "Refusing to install {} {} over installed {}",
                    artifact.name(),
                    version_to_install,
                    installed
                );
                return Err(AimError::AlreadyInstalled {
                    artifact: artifact.name().to_string(),
                    version: version_to_install.to_string(),
                });
            }
        }

        let cache = DownloadCache::new(self.config.download_dir(), &self.metadata);
        let binaries = cache
            .verified_binary(artifact, &version_to_install)
            .await?
            .ok_or_else(|| AimError::BinaryNotFound {
                artifact: artifact.name().to_string(),
                version: version_to_install.to_string(),
            })?;

        info!(
            "Installing {} {} (step {}, {})",
            artifact.name(),
            version_to_install,
            options.step,
            options.install_type
        );
        let outcome = artifact.install(&binaries, options).await?;
        match &outcome {
            InstallOutcome::Completed => {
                info!("{} {} installed", artifact.name(), version_to_install)
            }
            InstallOutcome::InProgress(in_flight) => info!(
                "{} {} installation in progress at step {}",
                artifact.name(),
                version_to_install,
                in_flight.step
            ),
        }
        Ok(outcome)
    }

    pub fn get_install_info(&self, artifact: &Artifact, options: &InstallOptions) -> Result<Vec<String>> {
        artifact.install_info(options)
    }

    pub async fn get_downloaded_artifacts(&self) -> Result<DownloadedArtifactIndex> {
        DownloadCache::new(self.config.download_dir(), &self.metadata)
            .scan(&self.artifacts)
            .await
    }

    /// Properties of `version`, or of the latest version when `None`.
    pub async fn get_artifact_properties(
        &self,
        artifact: &Artifact,
        version: Option<&Version>,
    ) -> Result<ArtifactProperties> {
        self.metadata.properties(artifact.name(), version).await
    }
}
