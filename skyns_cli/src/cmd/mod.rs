use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use skyns_portal::PortalClient;

use crate::config::SkynsConfig;

mod entry;
mod skylink;
mod update;

pub use entry::run_entry;
pub use skylink::run_skylink;
pub use update::run_update;

pub async fn run_command(
    config_file: PathBuf,
    portal_override: Option<String>,
    cmd: crate::Commands,
) -> Result<()> {
    match cmd {
        crate::Commands::Config { cmd } => {
            cmd.run(&config_file)?;
            Ok(())
        }
        crate::Commands::Update {
            seed,
            data_key,
            skylink,
            dry_run,
        } => {
            let client = portal_client(&config_file, portal_override)?;
            run_update(client, seed, data_key, skylink, dry_run).await
        }
        crate::Commands::Entry { seed, data_key } => {
            let client = portal_client(&config_file, portal_override)?;
            run_entry(client, &seed, &data_key).await
        }
        crate::Commands::Skylink { skylink } => {
            let client = portal_client(&config_file, portal_override)?;
            run_skylink(&client, &skylink)
        }
    }
}

fn portal_client(config_file: &Path, portal_override: Option<String>) -> Result<Arc<PortalClient>> {
    let mut config = SkynsConfig::load(config_file)?;
    if let Some(url) = portal_override {
        config.portal.url = url;
    }
    Ok(Arc::new(PortalClient::new(config.portal)?))
}
