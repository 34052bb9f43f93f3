use std::sync::Arc;

use anyhow::{Result, bail};
use skyns_core::{RegistryForm, RegistryUpdateFlow, Skylink, next_revision};
use skyns_portal::PortalClient;
use tracing::info;

pub async fn run_update(
    client: Arc<PortalClient>,
    seed: String,
    data_key: String,
    skylink: String,
    dry_run: bool,
) -> Result<()> {
    if let Ok(parsed) = Skylink::parse(&skylink) {
        info!("Base32 Skylink: {}", client.skylink_url(&parsed));
    }
    let flow = RegistryUpdateFlow::new(client);

    if dry_run {
        let parsed = Skylink::parse(&skylink)?;
        let current = flow.current_entry(&seed, &data_key).await?;
        let revision = next_revision(current.as_ref().map(|signed| &signed.entry));
        println!("would write revision {revision} pointing at {parsed}");
        println!("{}", flow.registry_uri(&seed, &data_key)?);
        return Ok(());
    }

    let mut form = RegistryForm::new(seed, data_key, skylink);
    if !form.submit(&flow).await {
        bail!("registry update did not complete");
    }
    if let Some(uri) = form.copy() {
        println!("{uri}");
    }
    Ok(())
}
