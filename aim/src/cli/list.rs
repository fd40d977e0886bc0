// aim/src/cli/list.rs
use aim_common::error::Result;
use aim_core::{ArtifactCapabilities, InstallationManager};
use clap::Args;
use colored::Colorize;
use prettytable::{format, Cell, Row, Table};

use super::GlobalArgs;

#[derive(Args, Debug)]
pub struct List {}

impl List {
    pub async fn run(&self, manager: &InstallationManager, globals: &GlobalArgs) -> Result<()> {
        let installed = manager.get_installed_artifacts(globals.auth_token()).await?;
        if installed.is_empty() {
            println!("{}", "No artifacts installed".yellow());
            return Ok(());
        }

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
        table.add_row(Row::new(vec![
            Cell::new("Artifact").style_spec("b"),
            Cell::new("Description").style_spec("b"),
            Cell::new("Installed").style_spec("b"),
        ]));
        for (artifact, version) in &installed {
            table.add_row(Row::new(vec![
                Cell::new(artifact.name()).style_spec("Fb"),
                Cell::new(&artifact.describe()),
                Cell::new(&version.to_string()),
            ]));
        }
        table.printstd();
        Ok(())
    }
}
