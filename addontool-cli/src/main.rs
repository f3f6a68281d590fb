//! Addontool - manage a catalog of git-hosted addons for a game-engine project
//!
//! Main entry point: argument parsing, logging setup and dispatch

use anyhow::Result;
use clap::{CommandFactory, Parser, ValueEnum};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use addontool_core::config::ToolConfig;

mod catalog_cli;

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "addontool",
    about = "Sync addon repositories, build the addon catalog and install addons",
    version
)]
struct Cli {
    /// Create the catalog from a repository description file
    #[clap(long, value_name = "DESCRIPTION_FILE")]
    init: Option<PathBuf>,

    /// Re-sync all repositories and relink the current catalog
    #[clap(long)]
    update: bool,

    /// Install an addon (optionally prefixed with its addon-group and '/')
    #[clap(long, value_name = "[GROUP/]ADDON")]
    install: Option<String>,

    /// Install target directory (defaults to the current directory)
    #[clap(long = "install_output", value_name = "DIR")]
    install_output: Option<PathBuf>,

    /// Folder for repository checkouts and the catalog (default: ~/.addons)
    #[clap(long = "repo_folder", value_name = "DIR")]
    repo_folder: Option<PathBuf>,

    /// Show all addon-groups of the current catalog
    #[clap(long = "list_addon_groups")]
    list_addon_groups: bool,

    /// Show the addons of one group (see --addon_group)
    #[clap(long = "show_addons")]
    show_addons: bool,

    /// Addon-group for --show_addons (defaults to the catalog's default group)
    #[clap(long = "addon_group", value_name = "GROUP")]
    addon_group: Option<String>,

    /// Skip writing addon_repo.html
    #[clap(long = "no_html")]
    no_html: bool,

    /// Read settings from this file instead of the user config directory
    #[clap(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output internal logs (same as --log-level debug)
    #[clap(long)]
    verbose: bool,

    /// Set log level
    #[clap(long, default_value = "info")]
    log_level: LogLevel,
}

impl Cli {
    fn has_action(&self) -> bool {
        self.init.is_some()
            || self.update
            || self.install.is_some()
            || self.list_addon_groups
            || self.show_addons
    }

    /// Config file settings with command-line overrides applied
    fn tool_config(&self) -> Result<ToolConfig> {
        let mut config = match &self.config {
            Some(path) => ToolConfig::load_from_path(path)?,
            None => ToolConfig::load()?,
        };

        if let Some(repo_folder) = &self.repo_folder {
            config.repo_folder = repo_folder.clone();
        }
        if self.no_html {
            config.html_output = false;
        }

        Ok(config)
    }
}

/// Initialize tracing with CLI flags
///
/// `RUST_LOG` wins when set; otherwise --verbose or --log-level decide.
fn initialize_tracing(log_level: &LogLevel, verbose: bool) {
    let directive = if verbose {
        LogLevel::Debug.to_filter_directive()
    } else {
        log_level.to_filter_directive()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr) // listings go to stdout
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(&cli.log_level, cli.verbose);

    if !cli.has_action() {
        Cli::command().print_help()?;
        return Ok(());
    }

    let config = cli.tool_config()?;
    debug!("Using repo folder {}", config.repo_folder.display());

    if let Some(description) = &cli.init {
        catalog_cli::execute_init(description, &config).await?;
    }

    if cli.update {
        catalog_cli::execute_update(&config).await?;
    }

    if let Some(selector) = &cli.install {
        let destination = match &cli.install_output {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        catalog_cli::execute_install(selector, &destination, &config)?;
    }

    if cli.list_addon_groups {
        catalog_cli::execute_list_groups(&config)?;
    }

    if cli.show_addons {
        catalog_cli::execute_show_addons(cli.addon_group.as_deref(), &config)?;
    }

    Ok(())
}
