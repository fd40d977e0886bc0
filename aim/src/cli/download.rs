// aim/src/cli/download.rs
use aim_common::error::Result;
use aim_common::model::Version;
use aim_core::{ArtifactCapabilities, InstallationManager};
use clap::Args;
use colored::Colorize;

use super::GlobalArgs;

#[derive(Args, Debug)]
pub struct DownloadArgs {
    pub artifact: String,

    /// Defaults to the latest published version
    #[arg(id = "artifact_version", value_name = "VERSION")]
    pub version: Option<String>,
}

impl DownloadArgs {
    pub async fn run(&self, manager: &InstallationManager, globals: &GlobalArgs) -> Result<()> {
        let artifact = manager.artifact(&self.artifact)?;
        let credentials = globals.credentials();

        let (version, path) = match &self.version {
            Some(raw) => {
                let version = Version::parse(raw)?;
                let path = manager.download(&credentials, artifact, &version).await?;
                (version, path)
            }
            None => manager.download_latest(&credentials, artifact).await?,
        };

        println!(
            "{} {} {} -> {}",
            "Downloaded".green().bold(),
            artifact.name().cyan(),
            version,
            path.display()
        );
        Ok(())
    }
}
