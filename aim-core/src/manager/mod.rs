// aim-core/src/manager/mod.rs
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use aim_aio::DiskSpaceProbe;
use aim_common::config::{ConfigStore, InstallationManagerConfig};
use aim_common::error::{AimError, Result};
use aim_common::model::Version;
use aim_net::validation::validate_url;
use aim_net::{AccountService, ArtifactMetadataClient, Transport};
use tracing::{debug, error, info, warn};

use crate::artifact::{Artifact, ArtifactCapabilities};

mod download;
mod install;
mod update;

/// External capabilities the orchestrator works through.
#[derive(Clone)]
pub struct ManagerPorts {
    pub transport: Arc<dyn Transport>,
    pub disk_space: Arc<dyn DiskSpaceProbe>,
    pub config_store: Arc<dyn ConfigStore>,
}

type DownloadLocks = Mutex<HashMap<(String, Version), Arc<tokio::sync::Mutex<()>>>>;

/// Computes updates, enforces upgrade rules, downloads and installs artifacts.
pub struct InstallationManager {
    artifacts: Vec<Artifact>,
    ports: ManagerPorts,
    metadata: ArtifactMetadataClient,
    accounts: AccountService,
    config: InstallationManagerConfig,
    download_locks: DownloadLocks,
}

impl InstallationManager {
    pub fn new(
        mut artifacts: Vec<Artifact>,
        ports: ManagerPorts,
        api_endpoint: impl Into<String>,
        config: InstallationManagerConfig,
    ) -> Self {
        artifacts.sort();
        artifacts.dedup();
        let metadata = ArtifactMetadataClient::new(ports.transport.clone(), config.update_endpoint());
        let accounts = AccountService::new(ports.transport.clone(), api_endpoint);
        Self {
            artifacts,
            ports,
            metadata,
            accounts,
            config,
            download_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Known artifacts in installation order.
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    pub fn artifact(&self, name: &str) -> Result<&Artifact> {
        Artifact::by_name(&self.artifacts, name)
            .ok_or_else(|| AimError::Generic(format!("Artifact '{name}' not found")))
    }

    pub fn config(&self) -> &InstallationManagerConfig {
        &self.config
    }

    /// The non-empty configuration entries.
    pub fn get_config(&self) -> BTreeMap<String, String> {
        self.config.to_properties()
    }

    /// Validates and persists `config`, and routes traffic through its proxy.
    /// On failure the current configuration stays in effect.
    pub fn set_config(&mut self, config: InstallationManagerConfig) -> Result<()> {
        if !config.update_endpoint.is_empty() {
            validate_url(config.update_endpoint())?;
        }
        config.validate_proxy()?;
        let download_dir = config.validate_download_dir()?;
        debug!("Download directory {} is usable", download_dir.display());

        self.ports
            .transport
            .configure_proxy(config.proxy_url(), config.proxy_port())?;

        let values = config.to_properties();
        if let Err(e) = self.ports.config_store.save(&values) {
            error!("Failed to persist configuration: {}", e);
            if let Err(restore) = self
                .ports
                .transport
                .configure_proxy(self.config.proxy_url(), self.config.proxy_port())
            {
                warn!("Failed to restore the previous proxy: {}", restore);
            }
            return Err(e);
        }

        self.metadata =
            ArtifactMetadataClient::new(self.ports.transport.clone(), config.update_endpoint());
        self.config = config;
        info!("Configuration updated ({} entries)", values.len());
        Ok(())
    }

    /// Fails when the download directory's filesystem has less than
    /// `required` bytes free.
    pub fn check_enough_disk_space(&self, required: u64) -> Result<()> {
        let available = self
            .ports
            .disk_space
            .available_bytes(self.config.download_dir())?;
        debug!("Disk space: required {} bytes, available {} bytes", required, available);
        if required > available {
            return Err(AimError::InsufficientDiskSpace {
                required,
                available,
            });
        }
        Ok(())
    }

    fn download_lock(&self, artifact: &Artifact, version: &Version) -> Arc<tokio::sync::Mutex<()>> {
        let key = (artifact.name().to_string(), version.clone());
        let mut locks = self
            .download_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        locks.entry(key).or_default().clone()
    }

    /// Forgets the lock of a target once no download holds or awaits it.
    fn release_download_lock(&self, artifact: &Artifact, version: &Version) {
        let key = (artifact.name().to_string(), version.clone());
        let mut locks = self
            .download_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if locks.get(&key).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(&key);
        }
    }

    /// Number of targets with a download in flight.
    pub fn active_downloads(&self) -> usize {
        self.download_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}
