// aim-aio/src/json_io.rs
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use aim_common::config::ConfigStore;
use aim_common::error::Result;
use tracing::debug;

use crate::fs::atomic_write_file;

/// Keeps the manager configuration in a pretty-printed JSON object on disk.
#[derive(Debug, Clone)]
pub struct JsonConfigStore {
    path: PathBuf,
}

impl JsonConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for JsonConfigStore {
    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.is_file() {
            debug!(
                "Config file {} not found, starting from defaults",
                self.path.display()
            );
            return Ok(BTreeMap::new());
        }
        debug!("Reading JSON config from: {}", self.path.display());
        let bytes = std::fs::read(&self.path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn save(&self, values: &BTreeMap<String, String>) -> Result<()> {
        debug!("Writing JSON config to: {}", self.path.display());
        let json_bytes = serde_json::to_vec_pretty(values)?;
        atomic_write_file(&self.path, &json_bytes)
    }
}
