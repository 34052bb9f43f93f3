use anyhow::Result;
use skyns_core::Skylink;
use skyns_portal::PortalClient;

pub fn run_skylink(client: &PortalClient, skylink: &str) -> Result<()> {
    let skylink = Skylink::parse(skylink)?;
    println!("base64: {}", skylink.to_base64());
    println!("base32: {}", skylink.to_base32());
    println!("portal: {}", client.skylink_url(&skylink));
    Ok(())
}
