use std::sync::Arc;

use anyhow::Result;
use skyns_core::RegistryUpdateFlow;
use skyns_portal::PortalClient;

pub async fn run_entry(client: Arc<PortalClient>, seed: &str, data_key: &str) -> Result<()> {
    let flow = RegistryUpdateFlow::new(client);
    let uri = flow.registry_uri(seed, data_key)?;

    match flow.current_entry(seed, data_key).await? {
        Some(signed) => {
            println!("uri:       {uri}");
            println!("revision:  {}", signed.entry.revision);
            println!("data:      {}", String::from_utf8_lossy(&signed.entry.data));
            println!("signature: {}", hex::encode(signed.signature.to_bytes()));
        }
        None => {
            println!("uri:       {uri}");
            println!("no entry yet; the next update writes revision 0");
        }
    }
    Ok(())
}
