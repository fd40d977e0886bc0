// aim/src/cli.rs
//! Command-line surface of aim.
use aim_common::error::Result;
use aim_common::model::UserCredentials;
use aim_core::InstallationManager;
use clap::{ArgAction, Args, Parser, Subcommand};

pub mod config;
pub mod download;
pub mod downloads;
pub mod info;
pub mod install;
pub mod list;
pub mod updates;

use crate::cli::config::ConfigArgs;
use crate::cli::download::DownloadArgs;
use crate::cli::downloads::Downloads;
use crate::cli::info::InfoArgs;
use crate::cli::install::InstallArgs;
use crate::cli::list::List;
use crate::cli::updates::Updates;

pub const DEFAULT_API_ENDPOINT: &str = "https://codenvy.com/api";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, name = "aim", bin_name = "aim")]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(flatten)]
    pub globals: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Authentication token for the platform and account APIs
    #[arg(long, env = "AIM_AUTH_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Account to resolve entitlements against
    #[arg(long, global = true)]
    pub account_id: Option<String>,

    #[arg(long, env = "AIM_API_ENDPOINT", global = true, default_value = DEFAULT_API_ENDPOINT)]
    pub api_endpoint: String,
}

impl GlobalArgs {
    pub fn auth_token(&self) -> &str {
        self.token.as_deref().unwrap_or_default()
    }

    pub fn credentials(&self) -> UserCredentials {
        UserCredentials::new(self.auth_token(), self.account_id.clone())
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show or change the configuration
    Config(ConfigArgs),
    /// List installed artifacts
    List(List),
    /// Show available updates
    Updates(Updates),
    /// List verified downloads
    Downloads(Downloads),
    /// Download an artifact
    Download(DownloadArgs),
    /// Install a downloaded artifact
    Install(InstallArgs),
    /// Describe the install plan of an artifact
    Info(InfoArgs),
}

impl Command {
    pub async fn run(&self, manager: &mut InstallationManager, globals: &GlobalArgs) -> Result<()> {
        match self {
            Self::Config(command) => command.run(manager),
            Self::List(command) => command.run(manager, globals).await,
            Self::Updates(command) => command.run(manager, globals).await,
            Self::Downloads(command) => command.run(manager).await,
            Self::Download(command) => command.run(manager, globals).await,
            Self::Install(command) => command.run(manager, globals).await,
            Self::Info(command) => command.run(manager),
        }
    }
}
