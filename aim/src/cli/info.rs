// aim/src/cli/info.rs
use aim_common::error::Result;
use aim_common::model::{InstallOptions, InstallType};
use aim_core::{ArtifactCapabilities, InstallationManager};
use clap::Args;
use colored::Colorize;

#[derive(Args, Debug)]
pub struct InfoArgs {
    pub artifact: String,

    #[arg(long, default_value_t = InstallType::SingleNode)]
    pub install_type: InstallType,

    #[arg(long, default_value_t = 1)]
    pub step: u32,
}

impl InfoArgs {
    pub fn run(&self, manager: &InstallationManager) -> Result<()> {
        let artifact = manager.artifact(&self.artifact)?;
        let options = InstallOptions::new(self.install_type, self.step);

        println!("{} ({})", artifact.name().cyan().bold(), artifact.describe());
        for line in manager.get_install_info(artifact, &options)? {
            println!("  {line}");
        }
        Ok(())
    }
}
