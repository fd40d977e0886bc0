// aim/src/main.rs
use std::process;
use std::sync::Arc;

use aim_aio::{JsonConfigStore, SystemDiskSpace};
use aim_common::config::{default_config_path, default_data_dir, logs_dir, InstallationManagerConfig};
use aim_common::error::{AimError, Result};
use aim_common::model::Version;
use aim_core::{
    Artifact, InstallationManager, ManagerArtifact, ManagerPorts, PlatformArtifact, ShellRunner,
};
use aim_net::{ReqwestTransport, Transport};
use clap::Parser;
use colored::Colorize;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

mod cli;
use cli::{CliArgs, GlobalArgs};

fn init_logging(verbose: u8) {
    let level_filter = match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let max_log_level = level_filter.into_level().unwrap_or(tracing::Level::INFO);

    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var("AIM_LOG")
        .from_env_lossy();

    let log_dir = logs_dir();
    if verbose > 0 && std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::daily(&log_dir, "aim.log");
        let (non_blocking_appender, guard) = tracing_appender::non_blocking(file_appender);

        let stderr_writer = std::io::stderr.with_max_level(max_log_level);
        let file_writer = non_blocking_appender.with_max_level(max_log_level);

        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(stderr_writer.and(file_writer))
            .with_ansi(true)
            .without_time()
            .try_init();

        // Flushes the file writer for the life of the process.
        Box::leak(Box::new(guard));

        debug!(
            "Verbose logging enabled. Writing logs to: {}/aim.log",
            log_dir.display()
        );
    } else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .without_time()
            .try_init();
    }
}

fn build_manager(globals: &GlobalArgs) -> Result<InstallationManager> {
    let config_store = Arc::new(JsonConfigStore::new(default_config_path()));
    let config = InstallationManagerConfig::load(config_store.as_ref())?;
    debug!("Loaded configuration from {}", config_store.path().display());

    let transport: Arc<dyn Transport> =
        Arc::new(ReqwestTransport::new(config.proxy_url(), config.proxy_port())?);
    let runner = Arc::new(ShellRunner::new(logs_dir().join("install.log")));
    let current_exe = std::env::current_exe()
        .map_err(|e| AimError::Generic(format!("Can't locate the running binary: {e}")))?;

    let artifacts = vec![
        Artifact::Platform(PlatformArtifact::new(
            globals.api_endpoint.clone(),
            transport.clone(),
            runner,
            default_data_dir().join("platform"),
        )),
        Artifact::Manager(ManagerArtifact::new(
            Version::parse(env!("CARGO_PKG_VERSION"))?,
            current_exe,
        )),
    ];
    let ports = ManagerPorts {
        transport,
        disk_space: Arc::new(SystemDiskSpace),
        config_store,
    };
    Ok(InstallationManager::new(
        artifacts,
        ports,
        globals.api_endpoint.clone(),
        config,
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();
    init_logging(cli_args.verbose);

    let mut manager = match build_manager(&cli_args.globals) {
        Ok(manager) => manager,
        Err(e) => {
            error!("Initialisation failed: {:#}", e);
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            process::exit(1);
        }
    };

    if let Err(e) = cli_args
        .command
        .run(&mut manager, &cli_args.globals)
        .await
    {
        error!("Command failed: {:#}", e);
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        process::exit(1);
    }

    debug!("Command completed successfully.");
    Ok(())
}
