// aim/src/cli/config.rs
use aim_common::error::Result;
use aim_core::InstallationManager;
use clap::Args;
use colored::Colorize;
use prettytable::{format, Cell, Row, Table};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Absolute directory holding downloaded artifacts
    #[arg(long)]
    pub download_dir: Option<String>,

    /// Proxy host; pass an empty value to clear it
    #[arg(long)]
    pub proxy_url: Option<String>,

    #[arg(long)]
    pub proxy_port: Option<String>,

    /// Base URL of the update repository
    #[arg(long)]
    pub update_endpoint: Option<String>,
}

impl ConfigArgs {
    fn has_changes(&self) -> bool {
        self.download_dir.is_some()
            || self.proxy_url.is_some()
            || self.proxy_port.is_some()
            || self.update_endpoint.is_some()
    }

    pub fn run(&self, manager: &mut InstallationManager) -> Result<()> {
        if self.has_changes() {
            let mut config = manager.config().clone();
            if let Some(dir) = &self.download_dir {
                config.download_dir = dir.clone();
            }
            if let Some(url) = &self.proxy_url {
                config.proxy_url = url.clone();
            }
            if let Some(port) = &self.proxy_port {
                config.proxy_port = port.clone();
            }
            if let Some(endpoint) = &self.update_endpoint {
                config.update_endpoint = endpoint.clone();
            }
            manager.set_config(config)?;
            println!("{}", "Configuration updated".green());
        }

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
        table.add_row(Row::new(vec![
            Cell::new("Key").style_spec("b"),
            Cell::new("Value").style_spec("b"),
        ]));
        for (key, value) in manager.get_config() {
            table.add_row(Row::new(vec![
                Cell::new(&key).style_spec("Fb"),
                Cell::new(&value),
            ]));
        }
        table.printstd();
        Ok(())
    }
}
