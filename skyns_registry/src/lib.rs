//! In-process registry for skyns.
//!
//! [`MemoryRegistry`] implements [`skyns_core::RegistryClient`] without a
//! network. It applies the same acceptance rules as a Skynet portal:
//!
//! - the entry signature must verify against the writer's public key
//! - the revision must be strictly greater than the stored one
//! - the data must fit into a registry entry
//!
//! Useful for testing and for dry runs of an update.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::{Result, anyhow, bail};
use skyns_core::{
    PrivateKey, PublicKey, RegistryClient, RegistryEntry, SignedRegistryEntry, hash_data_key,
    registry::MAX_ENTRY_DATA_SIZE,
};
use tracing::debug;

/// Base URL used by [`MemoryRegistry::entry_url`].
pub const MEMORY_REGISTRY_URL: &str = "memory://registry";

type EntryKey = ([u8; 32], [u8; 32]);

#[derive(Debug, Default)]
pub struct MemoryRegistry {
    data: RwLock<HashMap<EntryKey, SignedRegistryEntry>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.data.read().map(|data| data.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stores an already signed entry after checking it like a portal would.
    pub fn insert_signed(&self, public_key: &PublicKey, signed: SignedRegistryEntry) -> Result<()> {
        if signed.entry.data.len() > MAX_ENTRY_DATA_SIZE {
            bail!(
                "entry data too large: {} bytes (max: {MAX_ENTRY_DATA_SIZE})",
                signed.entry.data.len()
            );
        }
        if !signed.verify(public_key) {
            bail!("invalid registry entry signature");
        }

        let key = entry_key(public_key, &signed.entry.data_key);
        let mut data = self
            .data
            .write()
            .map_err(|_| anyhow!("memory registry lock poisoned"))?;
        if let Some(existing) = data.get(&key)
            && existing.entry.revision >= signed.entry.revision
        {
            bail!(
                "revision number too low: have {}, got {}",
                existing.entry.revision,
                signed.entry.revision
            );
        }
        debug!(
            public_key = %public_key,
            revision = signed.entry.revision,
            "memory registry stored entry"
        );
        data.insert(key, signed);
        Ok(())
    }
}

fn entry_key(public_key: &PublicKey, data_key: &str) -> EntryKey {
    (*public_key.as_bytes(), hash_data_key(data_key))
}

#[async_trait::async_trait]
impl RegistryClient for MemoryRegistry {
    async fn get_entry(
        &self,
        public_key: &PublicKey,
        data_key: &str,
    ) -> Result<Option<SignedRegistryEntry>> {
        let data = self
            .data
            .read()
            .map_err(|_| anyhow!("memory registry lock poisoned"))?;
        Ok(data.get(&entry_key(public_key, data_key)).cloned())
    }

    async fn set_entry(&self, private_key: &PrivateKey, entry: RegistryEntry) -> Result<()> {
        let public_key = private_key.public_key();
        self.insert_signed(&public_key, entry.sign(private_key))
    }

    fn entry_url(&self, public_key: &PublicKey, data_key: &str) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("publickey", &public_key.to_portal_string())
            .append_pair("datakey", &hex::encode(hash_data_key(data_key)))
            .finish();
        format!("{MEMORY_REGISTRY_URL}?{query}")
    }
}
