//! The registry update flow: point a registry entry at a skylink.
//!
//! One update is strictly sequential: derive keys, read the current entry,
//! write the next revision, then turn the lookup URL into a `skyns://` URI.
//! The write is never issued before the read completes. Nothing is retried;
//! if another writer bumps the revision in between, the registry rejects the
//! write and the caller sees [`UpdateError::WriteRejected`].

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info};

use crate::codec::CodecError;
use crate::keys::{KeyDerivation, KeyPair, SeedKeyDerivation};
use crate::registry::{
    RegistryClient, RegistryEntry, RegistryEntryError, SignedRegistryEntry, next_revision,
};
use crate::skylink::{Skylink, SkylinkError};
use crate::uri::{RegistryUri, RegistryUriError};

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum UpdateError {
    #[error("seed and data key are required for registry updates")]
    MissingInput,

    #[error("malformed skylink: {0}")]
    MalformedSkylink(#[source] SkylinkError),

    #[error("failed to decode skylink: {0}")]
    Decode(#[from] CodecError),

    #[error("invalid registry entry: {0}")]
    InvalidEntry(#[from] RegistryEntryError),

    #[error("failed to read registry entry: {0:#}")]
    ReadFailed(anyhow::Error),

    #[error("registry rejected write: {0:#}")]
    WriteRejected(anyhow::Error),

    #[error("invalid registry entry url: {0}")]
    InvalidEntryUrl(#[from] RegistryUriError),
}

impl From<SkylinkError> for UpdateError {
    fn from(err: SkylinkError) -> Self {
        match err {
            SkylinkError::Decode(err) => UpdateError::Decode(err),
            err => UpdateError::MalformedSkylink(err),
        }
    }
}

/// Points registry entries at skylinks.
///
/// Holds the shared registry client; cloning the flow shares it.
#[derive(Debug)]
pub struct RegistryUpdateFlow<R, K = SeedKeyDerivation> {
    registry: Arc<R>,
    keys: K,
}

impl<R, K: Clone> Clone for RegistryUpdateFlow<R, K> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            keys: self.keys.clone(),
        }
    }
}

impl<R: RegistryClient> RegistryUpdateFlow<R> {
    pub fn new(registry: Arc<R>) -> Self {
        Self::with_key_derivation(registry, SeedKeyDerivation)
    }
}

impl<R: RegistryClient, K: KeyDerivation> RegistryUpdateFlow<R, K> {
    pub fn with_key_derivation(registry: Arc<R>, keys: K) -> Self {
        Self { registry, keys }
    }

    pub fn registry(&self) -> &Arc<R> {
        &self.registry
    }

    /// Writes `skylink` to the entry `(key pair of seed, data_key)` and
    /// returns the entry's `skyns://` URI.
    ///
    /// Empty `seed` or `data_key` fail with [`UpdateError::MissingInput`]
    /// before any registry call is made.
    pub async fn update(
        &self,
        seed: &str,
        data_key: &str,
        skylink: &str,
    ) -> Result<RegistryUri, UpdateError> {
        check_inputs(seed, data_key)?;

        let skylink = Skylink::parse(skylink)?;
        debug!(skylink = %skylink, base32 = %skylink.to_base32(), "parsed skylink");

        let KeyPair {
            public_key,
            private_key,
        } = self.keys.key_pair_from_seed(seed);

        let existing = self
            .registry
            .get_entry(&public_key, data_key)
            .await
            .map_err(UpdateError::ReadFailed)?;
        let revision = next_revision(existing.as_ref().map(|signed| &signed.entry));
        debug!(
            public_key = %public_key,
            data_key,
            revision,
            "writing registry entry"
        );

        // the skylink is stored in its canonical text form
        let entry = RegistryEntry::new(data_key, revision, Bytes::from(skylink.to_base64()))?;
        self.registry
            .set_entry(&private_key, entry)
            .await
            .map_err(UpdateError::WriteRejected)?;

        let entry_url = self.registry.entry_url(&public_key, data_key);
        info!("registry entry updated: {entry_url}");

        let uri = RegistryUri::from_entry_url(&entry_url)?;
        info!("update the name record with: {uri}");
        Ok(uri)
    }

    /// Reads the entry `(key pair of seed, data_key)` without modifying it.
    pub async fn current_entry(
        &self,
        seed: &str,
        data_key: &str,
    ) -> Result<Option<SignedRegistryEntry>, UpdateError> {
        check_inputs(seed, data_key)?;
        let keys = self.keys.key_pair_from_seed(seed);
        self.registry
            .get_entry(&keys.public_key, data_key)
            .await
            .map_err(UpdateError::ReadFailed)
    }

    /// The `skyns://` URI for `(key pair of seed, data_key)`; no registry call.
    pub fn registry_uri(&self, seed: &str, data_key: &str) -> Result<RegistryUri, UpdateError> {
        check_inputs(seed, data_key)?;
        let keys = self.keys.key_pair_from_seed(seed);
        let entry_url = self.registry.entry_url(&keys.public_key, data_key);
        Ok(RegistryUri::from_entry_url(&entry_url)?)
    }
}

fn check_inputs(seed: &str, data_key: &str) -> Result<(), UpdateError> {
    if seed.is_empty() || data_key.is_empty() {
        return Err(UpdateError::MissingInput);
    }
    Ok(())
}
