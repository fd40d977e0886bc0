// aim-core/tests/common/mod.rs
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use aim_aio::DiskSpaceProbe;
use aim_common::config::{ConfigStore, InstallationManagerConfig};
use aim_common::error::{AimError, Result};
use aim_common::model::Version;
use aim_core::{
    Artifact, Command, CommandRunner, InstallationManager, ManagerArtifact, ManagerPorts,
    PlatformArtifact,
};
use aim_net::Transport;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tempfile::TempDir;

pub const UPDATE_ENDPOINT: &str = "http://update.com/endpoint";
pub const API_ENDPOINT: &str = "http://api.com/api";
pub const TOKEN: &str = "auth-token";

/// Answers requests by the longest registered URL suffix; unknown URLs fail
/// like an unreachable server.
#[derive(Default)]
pub struct FakeTransport {
    bodies: Mutex<BTreeMap<String, String>>,
    binaries: Mutex<BTreeMap<String, Vec<u8>>>,
    downloads: Mutex<Vec<(String, Option<String>)>>,
    proxies: Mutex<Vec<(Option<String>, Option<String>)>>,
}

impl FakeTransport {
    pub fn respond(&self, suffix: &str, body: &str) {
        self.bodies
            .lock()
            .unwrap()
            .insert(suffix.to_string(), body.to_string());
    }

    pub fn serve_binary(&self, suffix: &str, content: &[u8]) {
        self.binaries
            .lock()
            .unwrap()
            .insert(suffix.to_string(), content.to_vec());
    }

    /// URL and token of every download request, in order.
    pub fn downloads(&self) -> Vec<(String, Option<String>)> {
        self.downloads.lock().unwrap().clone()
    }

    /// Proxy url and port of every reconfiguration, in order.
    pub fn proxies(&self) -> Vec<(Option<String>, Option<String>)> {
        self.proxies.lock().unwrap().clone()
    }

    fn lookup<T: Clone>(map: &Mutex<BTreeMap<String, T>>, url: &str) -> Result<T> {
        map.lock()
            .unwrap()
            .iter()
            .filter(|(suffix, _)| url.ends_with(suffix.as_str()))
            .max_by_key(|(suffix, _)| suffix.len())
            .map(|(_, value)| value.clone())
            .ok_or_else(|| AimError::RepositoryUnavailable {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            })
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, url: &str) -> Result<String> {
        Self::lookup(&self.bodies, url)
    }

    async fn get_with_token(&self, url: &str, _token: &str) -> Result<String> {
        Self::lookup(&self.bodies, url)
    }

    async fn option(&self, url: &str, _token: &str) -> Result<String> {
        Self::lookup(&self.bodies, url)
    }

    async fn download(&self, url: &str, token: Option<&str>, dest: &Path) -> Result<u64> {
        self.downloads
            .lock()
            .unwrap()
            .push((url.to_string(), token.map(str::to_string)));
        let content = Self::lookup(&self.binaries, url)?;
        std::fs::write(dest, &content)?;
        Ok(content.len() as u64)
    }

    fn configure_proxy(&self, proxy_url: Option<&str>, proxy_port: Option<&str>) -> Result<()> {
        self.proxies
            .lock()
            .unwrap()
            .push((proxy_url.map(str::to_string), proxy_port.map(str::to_string)));
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Run(String),
    Spawn(String),
}

#[derive(Default)]
pub struct RecordingRunner {
    invocations: Mutex<Vec<Invocation>>,
}

impl RecordingRunner {
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, command: &Command) -> Result<String> {
        self.invocations
            .lock()
            .unwrap()
            .push(Invocation::Run(command.description().to_string()));
        Ok(String::new())
    }

    fn spawn(&self, command: &Command) -> Result<u32> {
        let mut invocations = self.invocations.lock().unwrap();
        invocations.push(Invocation::Spawn(command.description().to_string()));
        Ok(1000 + invocations.len() as u32)
    }
}

pub struct FixedDiskSpace(pub u64);

impl DiskSpaceProbe for FixedDiskSpace {
    fn available_bytes(&self, _path: &Path) -> Result<u64> {
        Ok(self.0)
    }
}

#[derive(Default)]
pub struct MemoryConfigStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryConfigStore {
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.values.lock().unwrap().clone()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Result<BTreeMap<String, String>> {
        Ok(self.snapshot())
    }

    fn save(&self, values: &BTreeMap<String, String>) -> Result<()> {
        *self.values.lock().unwrap() = values.clone();
        Ok(())
    }
}

pub fn sha256_hex(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

pub fn properties_json(version: &str, file: &str, content: &[u8]) -> String {
    format!(
        r#"{{"version":"{version}","file":"{file}","sha256":"{}","size":{}}}"#,
        sha256_hex(content),
        content.len()
    )
}

pub fn v(s: &str) -> Version {
    Version::parse(s).unwrap()
}

/// A manager over both artifacts with all ports faked and every path inside
/// a temporary directory.
pub struct Fixture {
    pub dir: TempDir,
    pub transport: Arc<FakeTransport>,
    pub runner: Arc<RecordingRunner>,
    pub store: Arc<MemoryConfigStore>,
    pub manager: InstallationManager,
}

impl Fixture {
    pub fn new(manager_version: &str, available_bytes: u64) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let transport = Arc::new(FakeTransport::default());
        let runner = Arc::new(RecordingRunner::default());
        let store = Arc::new(MemoryConfigStore::default());

        let artifacts = vec![
            Artifact::Platform(PlatformArtifact::new(
                API_ENDPOINT,
                transport.clone(),
                runner.clone(),
                dir.path().join("platform"),
            )),
            Artifact::Manager(ManagerArtifact::new(
                v(manager_version),
                dir.path().join("bin").join("aim"),
            )),
        ];
        let ports = ManagerPorts {
            transport: transport.clone(),
            disk_space: Arc::new(FixedDiskSpace(available_bytes)),
            config_store: store.clone(),
        };
        let config = InstallationManagerConfig {
            download_dir: dir.path().join("updates").display().to_string(),
            update_endpoint: UPDATE_ENDPOINT.to_string(),
            ..Default::default()
        };
        let manager = InstallationManager::new(artifacts, ports, API_ENDPOINT, config);

        Self {
            dir,
            transport,
            runner,
            store,
            manager,
        }
    }

    pub fn artifact(&self, name: &str) -> Artifact {
        self.manager.artifact(name).unwrap().clone()
    }

    pub fn download_dir(&self) -> PathBuf {
        self.dir.path().join("updates")
    }

    /// Reports the platform as installed at `version`.
    pub fn platform_installed(&self, version: &str) {
        self.transport
            .respond("api.com/api/", &format!(r#"{{"ideVersion":"{version}"}}"#));
    }

    /// Publishes `version` properties and places a binary with `content` in
    /// the download directory, whose checksum matches `published`.
    pub fn place_download(&self, artifact: &str, version: &str, content: &[u8], published: &[u8]) -> PathBuf {
        let file = format!("{artifact}-{version}.bin");
        self.transport.respond(
            &format!("repository/properties/{artifact}/{version}"),
            &properties_json(version, &file, published),
        );
        let dir = self.download_dir().join(artifact).join(version);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(&file);
        std::fs::write(&path, content).unwrap();
        path
    }
}
