use crate::init_config::CmdConfig;
use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use clap_verbosity_flag::InfoLevel;
use directories::ProjectDirs;
use std::path::PathBuf;

mod cmd;
mod config;
mod init_config;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// config file to use instead of ~/.config/skyns/config.toml
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// portal URL, overrides the one in the config file
    #[arg(short, long, value_name = "URL")]
    portal: Option<String>,

    #[command(flatten)]
    verbosity: clap_verbosity_flag::Verbosity<InfoLevel>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Modify the skyns config
    Config {
        #[command(subcommand)]
        cmd: CmdConfig,
    },
    /// Point a registry entry at a skylink and print its skyns:// URI
    Update {
        /// Seed the registry key pair is derived from
        #[arg(short, long)]
        seed: String,
        /// Data key naming the entry
        #[arg(short = 'k', long)]
        data_key: String,
        /// Skylink in base64 or base32 form, or a portal URL containing one
        skylink: String,
        /// Only read the current entry and show what would be written
        #[arg(long, action = ArgAction::SetTrue)]
        dry_run: bool,
    },
    /// Show the current registry entry for a seed and data key
    Entry {
        /// Seed the registry key pair is derived from
        #[arg(short, long)]
        seed: String,
        /// Data key naming the entry
        #[arg(short = 'k', long)]
        data_key: String,
    },
    /// Print a skylink in its base64 and base32 forms
    Skylink {
        /// Skylink in base64 or base32 form, or a portal URL containing one
        skylink: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    // stdout carries command output only
    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity)
        .with_writer(std::io::stderr)
        .init();

    // Configs live under ~/.config/skyns/config.toml unless --config is given
    let config_file = match cli.config {
        Some(path) => path,
        None => ProjectDirs::from("", "", "skyns")
            .context("failed to determine config directory path")?
            .config_dir()
            .join("config.toml"),
    };

    cmd::run_command(config_file, cli.portal, cli.cmd).await
}
