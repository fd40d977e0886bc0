// aim/src/cli/downloads.rs
use aim_common::error::Result;
use aim_core::{ArtifactCapabilities, InstallationManager};
use clap::Args;
use colored::Colorize;
use prettytable::{format, Cell, Row, Table};

#[derive(Args, Debug)]
pub struct Downloads {}

impl Downloads {
    pub async fn run(&self, manager: &InstallationManager) -> Result<()> {
        let index = manager.get_downloaded_artifacts().await?;
        if index.is_empty() {
            println!(
                "{} in {}",
                "No verified downloads".yellow(),
                manager.config().download_dir().display()
            );
            return Ok(());
        }

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
        table.add_row(Row::new(vec![
            Cell::new("Artifact").style_spec("b"),
            Cell::new("Version").style_spec("b"),
            Cell::new("File").style_spec("b"),
        ]));
        for (artifact, versions) in &index {
            for (version, path) in versions {
                table.add_row(Row::new(vec![
                    Cell::new(artifact.name()).style_spec("Fb"),
                    Cell::new(&version.to_string()),
                    Cell::new(&path.display().to_string()),
                ]));
            }
        }
        table.printstd();
        Ok(())
    }
}
