// aim-core/src/artifact/mod.rs
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;

use aim_common::error::Result;
use aim_common::model::{InstallOptions, InstallOutcome, Version};
use async_trait::async_trait;

pub mod manager;
pub mod platform;

pub use manager::ManagerArtifact;
pub use platform::PlatformArtifact;

/// What every installable product offers to the orchestrator.
#[async_trait]
pub trait ArtifactCapabilities: Send + Sync {
    fn name(&self) -> &str;

    /// Lower values install first.
    fn priority(&self) -> i32;

    fn describe(&self) -> String;

    /// `None` when the artifact is not installed.
    async fn installed_version(&self, auth_token: &str) -> Result<Option<Version>>;

    async fn install(&self, binaries: &Path, options: &InstallOptions) -> Result<InstallOutcome>;

    fn install_info(&self, options: &InstallOptions) -> Result<Vec<String>>;
}

/// The closed set of products the manager knows how to install.
#[derive(Clone)]
pub enum Artifact {
    Platform(PlatformArtifact),
    Manager(ManagerArtifact),
}

impl Artifact {
    fn inner(&self) -> &dyn ArtifactCapabilities {
        match self {
            Artifact::Platform(a) => a,
            Artifact::Manager(a) => a,
        }
    }

    pub fn by_name<'a>(artifacts: &'a [Artifact], name: &str) -> Option<&'a Artifact> {
        artifacts.iter().find(|a| a.name() == name)
    }
}

#[async_trait]
impl ArtifactCapabilities for Artifact {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn priority(&self) -> i32 {
        self.inner().priority()
    }

    fn describe(&self) -> String {
        self.inner().describe()
    }

    async fn installed_version(&self, auth_token: &str) -> Result<Option<Version>> {
        self.inner().installed_version(auth_token).await
    }

    async fn install(&self, binaries: &Path, options: &InstallOptions) -> Result<InstallOutcome> {
        self.inner().install(binaries, options).await
    }

    fn install_info(&self, options: &InstallOptions) -> Result<Vec<String>> {
        self.inner().install_info(options)
    }
}

impl PartialEq for Artifact {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for Artifact {}

impl Hash for Artifact {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

impl Ord for Artifact {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority()
            .cmp(&other.priority())
            .then_with(|| self.name().cmp(other.name()))
    }
}

impl PartialOrd for Artifact {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Artifact").field(&self.name()).finish()
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
