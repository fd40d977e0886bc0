// aim-net/src/repository.rs
use std::sync::Arc;

use aim_common::error::Result;
use aim_common::model::{ArtifactProperties, Version};
use tracing::debug;

use crate::http::Transport;
use crate::validation::combine_paths;

/// Reads artifact property sets from the update repository and builds the
/// download locations of artifact binaries.
#[derive(Clone)]
pub struct ArtifactMetadataClient {
    transport: Arc<dyn Transport>,
    update_endpoint: String,
}

impl ArtifactMetadataClient {
    pub fn new(transport: Arc<dyn Transport>, update_endpoint: impl Into<String>) -> Self {
        Self {
            transport,
            update_endpoint: update_endpoint.into(),
        }
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub fn update_endpoint(&self) -> &str {
        &self.update_endpoint
    }

    pub fn properties_url(&self, artifact: &str, version: Option<&Version>) -> String {
        let path = match version {
            Some(v) => format!("repository/properties/{artifact}/{v}"),
            None => format!("repository/properties/{artifact}"),
        };
        combine_paths(&self.update_endpoint, &path)
    }

    /// Fetches and validates the properties of `artifact`; the latest version's
    /// properties when `version` is `None`.
    pub async fn properties(
        &self,
        artifact: &str,
        version: Option<&Version>,
    ) -> Result<ArtifactProperties> {
        let url = self.properties_url(artifact, version);
        debug!("Fetching properties of '{}' from {}", artifact, url);
        let body = self.transport.get(&url).await?;
        let properties = ArtifactProperties::from_json(artifact, &body)?;
        properties.validate(version)?;
        Ok(properties)
    }

    pub async fn latest_version(&self, artifact: &str) -> Result<Version> {
        self.properties(artifact, None).await?.version()
    }

    /// Public binaries are served without an account; protected ones are
    /// addressed through the owning account id.
    pub fn download_url(&self, artifact: &str, version: &Version, account_id: Option<&str>) -> String {
        let path = match account_id {
            Some(id) => format!("repository/download/{artifact}/{version}/{id}"),
            None => format!("repository/public/download/{artifact}/{version}"),
        };
        combine_paths(&self.update_endpoint, &path)
    }
}
