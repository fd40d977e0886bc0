// aim-core/src/lib.rs
//! Artifacts, the download cache and the installation manager orchestrator

pub mod artifact;
pub mod command;
pub mod download_cache;
pub mod manager;

pub use artifact::{Artifact, ArtifactCapabilities, ManagerArtifact, PlatformArtifact};
pub use command::{Command, CommandRunner, ShellRunner};
pub use download_cache::{DownloadCache, DownloadedArtifactIndex};
pub use manager::{InstallationManager, ManagerPorts};
