// aim-core/src/download_cache.rs
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use aim_common::error::Result;
use aim_common::model::Version;
use aim_net::ArtifactMetadataClient;
use tracing::{debug, warn};

use crate::artifact::{Artifact, ArtifactCapabilities};

/// Verified local binaries, per artifact and ascending version.
pub type DownloadedArtifactIndex = BTreeMap<Artifact, BTreeMap<Version, PathBuf>>;

/// Read-only view over `<download_dir>/<artifact>/<version>/<file>`. The
/// directory tree is the only source of truth and is rescanned on every query.
pub struct DownloadCache<'a> {
    download_dir: &'a Path,
    metadata: &'a ArtifactMetadataClient,
}

impl<'a> DownloadCache<'a> {
    pub fn new(download_dir: &'a Path, metadata: &'a ArtifactMetadataClient) -> Self {
        Self {
            download_dir,
            metadata,
        }
    }

    /// Builds the index of binaries whose checksum matches the repository.
    /// A metadata failure for any version aborts the whole scan.
    pub async fn scan(&self, artifacts: &[Artifact]) -> Result<DownloadedArtifactIndex> {
        let mut index = DownloadedArtifactIndex::new();
        for artifact in artifacts {
            let artifact_dir = self.download_dir.join(artifact.name());
            let mut versions = BTreeMap::new();

            for (dir_name, _) in aim_aio::fs::list_subdirectories(&artifact_dir)? {
                let version = match Version::parse(&dir_name) {
                    Ok(v) => v,
                    Err(_) => {
                        debug!(
                            "Skipping {}/{}: not a version directory",
                            artifact.name(),
                            dir_name
                        );
                        continue;
                    }
                };
                if let Some(path) = self.verified_binary(artifact, &version).await? {
                    versions.insert(version, path);
                }
            }

            if !versions.is_empty() {
                index.insert(artifact.clone(), versions);
            }
        }
        Ok(index)
    }

    /// Path of the binary for `version` when present and intact. The
    /// repository is only consulted once the version directory exists.
    pub async fn verified_binary(&self, artifact: &Artifact, version: &Version) -> Result<Option<PathBuf>> {
        let version_dir = self.download_dir.join(artifact.name()).join(version.to_string());
        if !version_dir.is_dir() {
            debug!("No download directory {}", version_dir.display());
            return Ok(None);
        }

        let properties = self.metadata.properties(artifact.name(), Some(version)).await?;
        let path = version_dir.join(properties.file_name()?);

        if !path.is_file() {
            debug!("No binary at {}", path.display());
            return Ok(None);
        }

        let expected = properties.checksum()?;
        let actual = aim_aio::compute_checksum_async(&path).await?;
        if !actual.eq_ignore_ascii_case(expected) {
            warn!(
                "Ignoring {} {}: checksum {} does not match expected {}",
                artifact.name(),
                version,
                actual,
                expected
            );
            return Ok(None);
        }
        Ok(Some(path))
    }
}
