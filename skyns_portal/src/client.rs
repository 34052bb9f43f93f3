use std::time::Duration;

use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use skyns_core::keys::ED25519_ALGORITHM;
use skyns_core::{
    PrivateKey, PublicKey, RegistryClient, RegistryEntry, SignedRegistryEntry, Skylink,
    hash_data_key,
};
use tracing::{debug, warn};
use url::Url;

use crate::Error;
use crate::config::PortalConfig;

const REGISTRY_ENDPOINT: &str = "skynet/registry";

/// Registry access through a Skynet portal.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct PortalClient {
    portal_url: Url,
    registry_api_url: Url,
    timeout_secs: u64,
    http_client: reqwest::Client,
}

impl PortalClient {
    pub fn new(config: PortalConfig) -> Result<Self, Error> {
        let base = config.url.trim_end_matches('/');
        let portal_url = Url::parse(base)?;
        if portal_url.host_str().is_none() {
            return Err(Error::InvalidPortalUrl(config.url));
        }
        let registry_api_url = Url::parse(&format!("{base}/{REGISTRY_ENDPOINT}"))?;

        // the portal gets `timeout_secs` for its network lookup, plus a second to answer
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.saturating_add(1)))
            .build()?;

        Ok(Self {
            portal_url,
            registry_api_url,
            timeout_secs: config.timeout_secs,
            http_client,
        })
    }

    pub fn portal_url(&self) -> &Url {
        &self.portal_url
    }

    /// `<portal scheme>://<base32 skylink>.<portal host>`
    pub fn skylink_url(&self, skylink: &Skylink) -> String {
        let scheme = self.portal_url.scheme();
        let host = self.portal_url.host_str().unwrap_or_default();
        match self.portal_url.port() {
            Some(port) => format!("{scheme}://{}.{host}:{port}", skylink.to_base32()),
            None => format!("{scheme}://{}.{host}", skylink.to_base32()),
        }
    }

    fn registry_lookup_url(&self, public_key: &PublicKey, data_key: &str) -> Url {
        let mut url = self.registry_api_url.clone();
        url.query_pairs_mut()
            .append_pair("publickey", &public_key.to_portal_string())
            .append_pair("datakey", &hex::encode(hash_data_key(data_key)))
            .append_pair("timeout", &self.timeout_secs.to_string());
        url
    }

    async fn fetch_entry(
        &self,
        public_key: &PublicKey,
        data_key: &str,
    ) -> Result<Option<SignedRegistryEntry>, Error> {
        let url = self.registry_lookup_url(public_key, data_key);
        debug!("GET {url}");

        let res = self.http_client.get(url).send().await?;
        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(Error::HttpFailWithBody(status.as_u16(), body));
        }

        let body = res.bytes().await?;
        let res: RegistryGetResponse = serde_json::from_slice(&body)?;

        // entries written by other tools may carry more data than we write
        let entry = RegistryEntry {
            data_key: data_key.to_owned(),
            revision: res.revision,
            data: Bytes::from(hex::decode(&res.data)?),
        };
        let signed = SignedRegistryEntry::from_parts(entry, &hex::decode(&res.signature)?)?;

        if !signed.verify(public_key) {
            warn!(
                public_key = %public_key,
                data_key,
                "portal returned registry entry with invalid signature, ignoring it"
            );
            return Ok(None);
        }
        Ok(Some(signed))
    }

    async fn publish_entry(&self, private_key: &PrivateKey, entry: RegistryEntry) -> Result<(), Error> {
        let public_key = private_key.public_key();
        let SignedRegistryEntry { entry, signature } = entry.sign(private_key);

        let req = RegistrySetRequest {
            public_key: RegistryPublicKey {
                algorithm: ED25519_ALGORITHM,
                key: public_key.as_bytes().to_vec(),
            },
            data_key: hex::encode(entry.hashed_data_key()),
            revision: entry.revision,
            data: entry.data.to_vec(),
            signature: signature.to_bytes().to_vec(),
        };
        debug!(revision = entry.revision, "POST {}", self.registry_api_url);

        let res = self
            .http_client
            .post(self.registry_api_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(&req)?)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(Error::HttpFailWithBody(status.as_u16(), body));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RegistryClient for PortalClient {
    async fn get_entry(
        &self,
        public_key: &PublicKey,
        data_key: &str,
    ) -> anyhow::Result<Option<SignedRegistryEntry>> {
        Ok(self.fetch_entry(public_key, data_key).await?)
    }

    async fn set_entry(&self, private_key: &PrivateKey, entry: RegistryEntry) -> anyhow::Result<()> {
        Ok(self.publish_entry(private_key, entry).await?)
    }

    fn entry_url(&self, public_key: &PublicKey, data_key: &str) -> String {
        self.registry_lookup_url(public_key, data_key).into()
    }
}

// Models

#[derive(Deserialize)]
struct RegistryGetResponse {
    data: String,
    revision: u64,
    signature: String,
}

#[derive(Serialize)]
struct RegistryPublicKey {
    algorithm: &'static str,
    key: Vec<u8>,
}

#[derive(Serialize)]
struct RegistrySetRequest {
    #[serde(rename = "publickey")]
    public_key: RegistryPublicKey,
    #[serde(rename = "datakey")]
    data_key: String,
    revision: u64,
    data: Vec<u8>,
    signature: Vec<u8>,
}
