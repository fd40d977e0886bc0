// aim-core/src/manager/download.rs
use std::path::PathBuf;

use aim_common::error::{AimError, Result};
use aim_common::model::{ArtifactProperties, UserCredentials, Version};
use tempfile::NamedTempFile;
use tracing::{debug, error, info};

use super::InstallationManager;
use crate::artifact::{Artifact, ArtifactCapabilities};
use crate::download_cache::DownloadCache;

impl InstallationManager {
    /// Fetches the binary of `version` into the download directory, verifying
    /// entitlement first and the checksum last. Returns the binary's path.
    pub async fn download(
        &self,
        credentials: &UserCredentials,
        artifact: &Artifact,
        version: &Version,
    ) -> Result<PathBuf> {
        let properties = self.metadata.properties(artifact.name(), Some(version)).await?;
        let file_name = properties.file_name()?;
        let account_id = self
            .check_entitlement(credentials, artifact, version, &properties)
            .await?;

        let lock = self.download_lock(artifact, version);
        let result = {
            let _guard = lock.lock().await;
            self.fetch_binary(credentials, artifact, version, &properties, file_name, account_id)
                .await
        };
        drop(lock);
        self.release_download_lock(artifact, version);
        result
    }

    /// Transfer and verification of one target; callers hold its download lock.
    async fn fetch_binary(
        &self,
        credentials: &UserCredentials,
        artifact: &Artifact,
        version: &Version,
        properties: &ArtifactProperties,
        file_name: &str,
        account_id: Option<String>,
    ) -> Result<PathBuf> {
        let cache = DownloadCache::new(self.config.download_dir(), &self.metadata);
        if let Some(existing) = cache.verified_binary(artifact, version).await? {
            info!(
                "{} {} already downloaded to {}",
                artifact.name(),
                version,
                existing.display()
            );
            return Ok(existing);
        }

        if let Some(size) = properties.size() {
            self.check_enough_disk_space(size)?;
        }

        let target_dir = self.config.artifact_version_dir(artifact.name(), version);
        aim_aio::fs::create_dir_all(&target_dir)?;
        let target = target_dir.join(file_name);

        let url = self
            .metadata
            .download_url(artifact.name(), version, account_id.as_deref());
        let token = account_id.as_ref().map(|_| credentials.token.as_str());

        // Removed on drop unless persisted.
        let temp_path = NamedTempFile::new_in(&target_dir)?.into_temp_path();
        debug!("Downloading {} into {}", url, temp_path.display());
        let written = self.ports.transport.download(&url, token, &temp_path).await?;

        let expected = properties.checksum()?;
        let actual = aim_aio::compute_checksum_async(&temp_path).await?;
        if !actual.eq_ignore_ascii_case(expected) {
            error!(
                "Checksum mismatch for {} {}: expected {}, got {}",
                artifact.name(),
                version,
                expected,
                actual
            );
            return Err(AimError::IntegrityCheckFailed {
                artifact: artifact.name().to_string(),
                version: version.to_string(),
                expected: expected.to_string(),
                actual,
            });
        }

        temp_path
            .persist(&target)
            .map_err(|e| AimError::from(e.error))?;
        info!(
            "Downloaded {} {} ({} bytes) to {}",
            artifact.name(),
            version,
            written,
            target.display()
        );
        Ok(target)
    }

    /// Resolves the latest published version and downloads it.
    pub async fn download_latest(
        &self,
        credentials: &UserCredentials,
        artifact: &Artifact,
    ) -> Result<(Version, PathBuf)> {
        let version = self.metadata.latest_version(artifact.name()).await?;
        let path = self.download(credentials, artifact, &version).await?;
        Ok((version, path))
    }

    /// Returns the owning account id when the artifact is protected.
    async fn check_entitlement(
        &self,
        credentials: &UserCredentials,
        artifact: &Artifact,
        version: &Version,
        properties: &ArtifactProperties,
    ) -> Result<Option<String>> {
        let subscription = properties.subscription();
        if !properties.authentication_required() && subscription.is_none() {
            return Ok(None);
        }

        let denied = |reason: String| AimError::AccessDenied {
            artifact: artifact.name().to_string(),
            version: version.to_string(),
            reason,
        };

        let owner = self
            .accounts
            .owner_account(&credentials.token, credentials.account_id.as_deref())
            .await?
            .ok_or_else(|| denied("no account with the owner role".to_string()))?;
        let account_id = owner.account_reference.id;

        if let Some(service_id) = subscription {
            let subscribed = self
                .accounts
                .has_subscription(&account_id, &credentials.token, service_id)
                .await?;
            if !subscribed {
                return Err(denied(format!(
                    "account '{account_id}' has no '{service_id}' subscription"
                )));
            }
        }

        debug!(
            "Account '{}' is entitled to {} {}",
            account_id,
            artifact.name(),
            version
        );
        Ok(Some(account_id))
    }
}
