// aim/src/cli/install.rs
use aim_common::error::Result;
use aim_common::model::{InstallOptions, InstallOutcome, InstallType};
use aim_core::{ArtifactCapabilities, InstallationManager};
use clap::Args;
use colored::Colorize;

use super::GlobalArgs;

#[derive(Args, Debug)]
pub struct InstallArgs {
    pub artifact: String,

    #[arg(id = "artifact_version", value_name = "VERSION")]
    pub version: String,

    #[arg(long, default_value_t = InstallType::SingleNode)]
    pub install_type: InstallType,

    /// 1-based step of a staged install
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub step: u32,
}

impl InstallArgs {
    pub async fn run(&self, manager: &InstallationManager, globals: &GlobalArgs) -> Result<()> {
        let artifact = manager.artifact(&self.artifact)?;
        let options = InstallOptions::new(self.install_type, self.step);

        match manager
            .install(globals.auth_token(), artifact, &self.version, &options)
            .await?
        {
            InstallOutcome::Completed => {
                println!(
                    "{} {} {}",
                    "Installed".green().bold(),
                    artifact.name().cyan(),
                    self.version
                );
            }
            InstallOutcome::InProgress(in_flight) => {
                let total = manager.get_install_info(artifact, &in_flight)?.len();
                let next = in_flight.next_step();
                println!(
                    "{} step {} of {} started for {} {}",
                    "Install".yellow().bold(),
                    in_flight.step,
                    total,
                    artifact.name().cyan(),
                    self.version
                );
                println!(
                    "When it finishes, continue with: aim install {} {} --install-type {} --step {}",
                    artifact.name(),
                    self.version,
                    next.install_type,
                    next.step
                );
            }
        }
        Ok(())
    }
}
