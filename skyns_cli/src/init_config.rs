use std::{fs, io::Write, path::Path};

use anyhow::Context;
use clap::Subcommand;
use skyns_portal::PortalConfig;
use toml_edit::{DocumentMut, Item, Table, value};
use tracing::info;

use crate::config::SkynsConfig;

#[derive(Subcommand)]
pub enum CmdConfig {
    /// Creates the config file if it doesn't exist and fills in missing defaults
    Init,
    /// Sets the portal used for registry reads and writes
    SetPortal {
        /// Portal URL, e.g. https://siasky.net
        url: String,
        /// Seconds the portal may spend looking up an entry
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },
    /// Prints the effective config
    Show,
}

impl CmdConfig {
    pub fn run(self, config_file: &Path) -> anyhow::Result<()> {
        let mut doc = if config_file.exists() {
            fs::read_to_string(config_file)?
        } else {
            "".to_owned()
        }
        .parse::<DocumentMut>()
        .context("could not parse config file")?;

        let defaults = PortalConfig::default();
        let portal = doc
            .entry("portal")
            .or_insert(Item::Table(Table::new()))
            .as_table_mut()
            .context("'portal' in config file is not a table")?;

        match self {
            Self::Show => {
                let config = SkynsConfig::load(config_file)?;
                print!("{}", toml::to_string(&config)?);
                return Ok(());
            }
            Self::Init => {
                portal.entry("url").or_insert(value(defaults.url));
                portal
                    .entry("timeout_secs")
                    .or_insert(timeout_value(defaults.timeout_secs)?);
            }
            Self::SetPortal { url, timeout } => {
                portal.insert("url", value(url));
                if let Some(timeout) = timeout {
                    portal.insert("timeout_secs", timeout_value(timeout)?);
                }
            }
        }

        info!("writing to config file {config_file:?}");
        write_atomic(config_file, &doc.to_string())
    }
}

/// TOML integers are signed; larger timeouts would not load back as `u64`.
fn timeout_value(secs: u64) -> anyhow::Result<Item> {
    let secs = i64::try_from(secs).context("timeout too large")?;
    Ok(value(secs))
}

fn write_atomic(config_file: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = config_file.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = config_file.with_extension("tmp");
    let mut tmp = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&tmp_path)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.sync_all()?;
    fs::rename(&tmp_path, config_file)?;
    Ok(())
}
