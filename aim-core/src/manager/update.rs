// aim-core/src/manager/update.rs
use std::collections::BTreeMap;

use aim_common::error::Result;
use aim_common::model::Version;
use tracing::debug;

use super::InstallationManager;
use crate::artifact::{Artifact, ArtifactCapabilities};

impl InstallationManager {
    /// Installed version of every artifact; artifacts that are not installed
    /// are left out.
    pub async fn get_installed_artifacts(&self, auth_token: &str) -> Result<BTreeMap<Artifact, Version>> {
        let mut installed = BTreeMap::new();
        for artifact in &self.artifacts {
            match artifact.installed_version(auth_token).await? {
                Some(version) => {
                    installed.insert(artifact.clone(), version);
                }
                None => debug!("Artifact '{}' is not installed", artifact.name()),
            }
        }
        Ok(installed)
    }

    /// Latest version of every artifact as published by the repository.
    pub async fn get_latest_versions_to_download(&self) -> Result<BTreeMap<Artifact, Version>> {
        let mut latest = BTreeMap::new();
        for artifact in &self.artifacts {
            let version = self.metadata.latest_version(artifact.name()).await?;
            debug!("Latest version of '{}' is {}", artifact.name(), version);
            latest.insert(artifact.clone(), version);
        }
        Ok(latest)
    }

    /// Installed artifacts whose latest version differs from the installed one.
    pub async fn get_updates(&self, auth_token: &str) -> Result<BTreeMap<Artifact, Version>> {
        let installed = self.get_installed_artifacts(auth_token).await?;
        let latest = self.get_latest_versions_to_download().await?;

        Ok(latest
            .into_iter()
            .filter(|(artifact, latest_version)| {
                installed
                    .get(artifact)
                    .is_some_and(|current| current != latest_version)
            })
            .collect())
    }
}
