// aim-common/src/config.rs
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{AimError, Result};
use super::model::Version;

pub const DOWNLOAD_DIR_KEY: &str = "download_dir";
pub const PROXY_URL_KEY: &str = "proxy_url";
pub const PROXY_PORT_KEY: &str = "proxy_port";
pub const UPDATE_ENDPOINT_KEY: &str = "update_endpoint";

const DEFAULT_UPDATE_ENDPOINT: &str = "https://codenvy.com/update";
const CONFIG_FILENAME: &str = "im.json";

/// Durable key/value storage for the manager configuration.
pub trait ConfigStore: Send + Sync {
    fn load(&self) -> Result<BTreeMap<String, String>>;
    fn save(&self, values: &BTreeMap<String, String>) -> Result<()>;
}

/// Process-wide settings of the installation manager. An empty string means
/// the value is not set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallationManagerConfig {
    pub download_dir: String,
    pub proxy_url: String,
    pub proxy_port: String,
    pub update_endpoint: String,
}

impl InstallationManagerConfig {
    /// Defaults, overlaid by the persisted values, overlaid by `AIM_*` variables.
    pub fn load(store: &dyn ConfigStore) -> Result<Self> {
        Self::load_with(store, |key| env::var(key).ok())
    }

    pub fn load_with(
        store: &dyn ConfigStore,
        env_lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        debug!("Loading installation manager configuration");
        let mut config = Self::defaults();

        let persisted = store.load()?;
        debug!("Persisted configuration has {} entries", persisted.len());
        config.overlay(&persisted);

        let from_env: BTreeMap<String, String> = [
            ("AIM_DOWNLOAD_DIR", DOWNLOAD_DIR_KEY),
            ("AIM_PROXY_URL", PROXY_URL_KEY),
            ("AIM_PROXY_PORT", PROXY_PORT_KEY),
            ("AIM_UPDATE_ENDPOINT", UPDATE_ENDPOINT_KEY),
        ]
        .into_iter()
        .filter_map(|(var, key)| {
            env_lookup(var)
                .filter(|v| !v.is_empty())
                .map(|v| (key.to_string(), v))
        })
        .collect();
        config.overlay(&from_env);

        debug!("Configuration loaded successfully.");
        Ok(config)
    }

    pub fn defaults() -> Self {
        Self {
            download_dir: default_data_dir().join("updates").display().to_string(),
            proxy_url: String::new(),
            proxy_port: String::new(),
            update_endpoint: DEFAULT_UPDATE_ENDPOINT.to_string(),
        }
    }

    pub fn from_properties(values: &BTreeMap<String, String>) -> Self {
        let mut config = Self::default();
        config.overlay(values);
        config
    }

    fn overlay(&mut self, values: &BTreeMap<String, String>) {
        for (key, value) in values {
            match key.as_str() {
                DOWNLOAD_DIR_KEY => self.download_dir = value.clone(),
                PROXY_URL_KEY => self.proxy_url = value.clone(),
                PROXY_PORT_KEY => self.proxy_port = value.clone(),
                UPDATE_ENDPOINT_KEY => self.update_endpoint = value.clone(),
                other => debug!("Ignoring unknown configuration key '{}'", other),
            }
        }
    }

    /// The non-empty fields, keyed by their persisted names.
    pub fn to_properties(&self) -> BTreeMap<String, String> {
        [
            (DOWNLOAD_DIR_KEY, &self.download_dir),
            (PROXY_URL_KEY, &self.proxy_url),
            (PROXY_PORT_KEY, &self.proxy_port),
            (UPDATE_ENDPOINT_KEY, &self.update_endpoint),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
    }

    /// Checks that the download directory is absolute and exists, creating it
    /// when missing.
    pub fn validate_download_dir(&self) -> Result<PathBuf> {
        let path = PathBuf::from(&self.download_dir);
        if self.download_dir.is_empty() {
            return Err(AimError::InvalidPath {
                path,
                reason: "download directory is not set".to_string(),
            });
        }
        if !path.is_absolute() {
            return Err(AimError::InvalidPath {
                path,
                reason: "download directory must be an absolute path".to_string(),
            });
        }
        if path.exists() && !path.is_dir() {
            return Err(AimError::InvalidPath {
                path,
                reason: "exists and is not a directory".to_string(),
            });
        }
        std::fs::create_dir_all(&path).map_err(|e| AimError::InvalidPath {
            path: path.clone(),
            reason: format!("can't create directory: {e}"),
        })?;
        Ok(path)
    }

    /// The proxy port, when set, must be a TCP port number.
    pub fn validate_proxy(&self) -> Result<()> {
        if !self.proxy_port.is_empty() && self.proxy_port.parse::<u16>().is_err() {
            return Err(AimError::Config(format!(
                "Proxy port '{}' is not a valid port number",
                self.proxy_port
            )));
        }
        Ok(())
    }

    pub fn download_dir(&self) -> &Path {
        Path::new(&self.download_dir)
    }

    pub fn update_endpoint(&self) -> &str {
        &self.update_endpoint
    }

    pub fn proxy_url(&self) -> Option<&str> {
        Some(self.proxy_url.as_str()).filter(|s| !s.is_empty())
    }

    pub fn proxy_port(&self) -> Option<&str> {
        Some(self.proxy_port.as_str()).filter(|s| !s.is_empty())
    }

    pub fn artifact_dir(&self, artifact_name: &str) -> PathBuf {
        self.download_dir().join(artifact_name)
    }

    pub fn artifact_version_dir(&self, artifact_name: &str, version: &Version) -> PathBuf {
        self.artifact_dir(artifact_name).join(version.to_string())
    }
}

/// Base directory for state owned by aim (config file, logs, downloads).
pub fn default_data_dir() -> PathBuf {
    ProjectDirs::from("", "", "aim").map_or_else(
        || env::temp_dir().join("aim"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

pub fn default_config_path() -> PathBuf {
    default_data_dir().join(CONFIG_FILENAME)
}

pub fn logs_dir() -> PathBuf {
    default_data_dir().join("logs")
}
