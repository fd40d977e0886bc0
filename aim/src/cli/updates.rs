// aim/src/cli/updates.rs
use aim_common::error::Result;
use aim_core::{ArtifactCapabilities, InstallationManager};
use clap::Args;
use colored::Colorize;
use prettytable::{format, Cell, Row, Table};

use super::GlobalArgs;

#[derive(Args, Debug)]
pub struct Updates {}

impl Updates {
    pub async fn run(&self, manager: &InstallationManager, globals: &GlobalArgs) -> Result<()> {
        let updates = manager.get_updates(globals.auth_token()).await?;
        if updates.is_empty() {
            println!("{}", "Everything is up to date".green());
            return Ok(());
        }

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
        table.add_row(Row::new(vec![
            Cell::new("Artifact").style_spec("b"),
            Cell::new("Available").style_spec("b"),
        ]));
        for (artifact, version) in &updates {
            table.add_row(Row::new(vec![
                Cell::new(artifact.name()).style_spec("Fb"),
                Cell::new(&version.to_string()).style_spec("Fg"),
            ]));
        }
        table.printstd();
        println!(
            "{} update(s) available; fetch them with {}",
            updates.len(),
            "aim download <artifact>".cyan()
        );
        Ok(())
    }
}
