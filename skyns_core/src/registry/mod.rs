//! The registry abstraction used by the update flow.
//!
//! The registry is a remote, mutable key-value store. Entries are owned by
//! an Ed25519 key pair and addressed by `(public key, data key)`; see
//! [`types`] for the entry format and signing rules.

pub mod types;

pub use types::{
    MAX_ENTRY_DATA_SIZE, RegistryEntry, RegistryEntryError, SignedRegistryEntry, hash_data_key,
    next_revision,
};

use crate::keys::{PrivateKey, PublicKey};
use anyhow::Result;
use async_trait::async_trait;

/// Client for a Skynet registry.
///
/// # Semantics
///
/// Registries only accept an entry whose revision is strictly greater than
/// the revision they currently hold. Concurrent writers racing on the same
/// `(public key, data key)` will see one of their writes rejected; nothing
/// in this trait coordinates them.
///
/// A single client is meant to be shared for the lifetime of the process.
/// Implementations hold no per-call state.
///
/// # Example
///
/// ```ignore
/// use skyns_core::{RegistryClient, RegistryEntry, KeyDerivation, SeedKeyDerivation};
/// use skyns_registry::MemoryRegistry;
///
/// async fn demo() -> anyhow::Result<()> {
///     let registry = MemoryRegistry::new();
///     let keys = SeedKeyDerivation.key_pair_from_seed("my seed");
///
///     let current = registry.get_entry(&keys.public_key, "my-site").await?;
///     let revision = skyns_core::next_revision(current.as_ref().map(|s| &s.entry));
///
///     let entry = RegistryEntry::new("my-site", revision, &b"..."[..])?;
///     registry.set_entry(&keys.private_key, entry).await?;
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait RegistryClient: std::fmt::Debug + Send + Sync {
    /// Retrieves the current entry for `(public_key, data_key)`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(SignedRegistryEntry))` if an entry is found.
    /// * `Ok(None)` if no entry exists for the key.
    /// * `Err(anyhow::Error)` if the registry could not be queried.
    async fn get_entry(
        &self,
        public_key: &PublicKey,
        data_key: &str,
    ) -> Result<Option<SignedRegistryEntry>>;

    /// Signs `entry` with `private_key` and publishes it.
    ///
    /// # Returns
    ///
    /// * `Ok(())` once the registry accepted the entry.
    /// * `Err(anyhow::Error)` if the registry rejected the entry (for example
    ///   because its revision is not newer than the stored one) or could not
    ///   be reached.
    async fn set_entry(&self, private_key: &PrivateKey, entry: RegistryEntry) -> Result<()>;

    /// URL under which the entry for `(public_key, data_key)` can be looked up.
    ///
    /// The query string carries `publickey` and `datakey` parameters.
    fn entry_url(&self, public_key: &PublicKey, data_key: &str) -> String;
}

#[async_trait]
impl<T: RegistryClient + ?Sized + Send + Sync> RegistryClient for std::sync::Arc<T> {
    async fn get_entry(
        &self,
        public_key: &PublicKey,
        data_key: &str,
    ) -> Result<Option<SignedRegistryEntry>> {
        (**self).get_entry(public_key, data_key).await
    }

    async fn set_entry(&self, private_key: &PrivateKey, entry: RegistryEntry) -> Result<()> {
        (**self).set_entry(private_key, entry).await
    }

    fn entry_url(&self, public_key: &PublicKey, data_key: &str) -> String {
        (**self).entry_url(public_key, data_key)
    }
}

#[async_trait]
impl<T: RegistryClient + ?Sized + Send + Sync> RegistryClient for Box<T> {
    async fn get_entry(
        &self,
        public_key: &PublicKey,
        data_key: &str,
    ) -> Result<Option<SignedRegistryEntry>> {
        (**self).get_entry(public_key, data_key).await
    }

    async fn set_entry(&self, private_key: &PrivateKey, entry: RegistryEntry) -> Result<()> {
        (**self).set_entry(private_key, entry).await
    }

    fn entry_url(&self, public_key: &PublicKey, data_key: &str) -> String {
        (**self).entry_url(public_key, data_key)
    }
}
