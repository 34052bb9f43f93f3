use std::sync::Arc;

use bytes::Bytes;
use skyns_core::{
    KeyDerivation, KeyPair, PrivateKey, PublicKey, RegistryClient, RegistryEntry,
    RegistryUpdateFlow, SeedKeyDerivation, SignedRegistryEntry, Skylink, UpdateError,
    hash_data_key, next_revision,
};
use skyns_registry::MemoryRegistry;

const SKYLINK: &str = "XABvi7JtJbQSMAcDwnUnmp2FKDPjg8_tTTFP4BwMSxVdEg";
const SKYLINK_BASE32: &str = "bg06v2tidkir84hg0s1s4t97jaeoaa1jse1svrad657u070c9calq4g";

/// Full update against the in-process registry:
///
/// - the first write lands at revision 0, later writes increment it
/// - the stored payload is the canonical skylink, whatever form was entered
/// - the URI carries the portal-style public key and hashed data key
#[tokio::test]
async fn update_against_memory_registry() {
    let registry = Arc::new(MemoryRegistry::new());
    let flow = RegistryUpdateFlow::new(registry.clone());
    let keys = SeedKeyDerivation.key_pair_from_seed("test-seed");

    let uri = flow
        .update("test-seed", "test-key", &format!("sia://{SKYLINK}"))
        .await
        .expect("first update");
    assert_eq!(
        uri.to_string(),
        format!(
            "skyns://ed25519%3A{}/{}",
            keys.public_key.to_hex(),
            hex::encode(hash_data_key("test-key"))
        )
    );

    let stored = registry
        .get_entry(&keys.public_key, "test-key")
        .await
        .unwrap()
        .expect("entry stored");
    assert_eq!(stored.entry.revision, 0);
    assert_eq!(stored.entry.data.as_ref(), SKYLINK.as_bytes());

    // base32 subdomain input resolves to the same skylink
    let second = flow
        .update(
            "test-seed",
            "test-key",
            &format!("https://{SKYLINK_BASE32}.siasky.net/"),
        )
        .await
        .expect("second update");
    assert_eq!(second, uri);

    let stored = registry
        .get_entry(&keys.public_key, "test-key")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.entry.revision, 1);
    assert_eq!(
        Skylink::parse(std::str::from_utf8(&stored.entry.data).unwrap()).unwrap(),
        Skylink::parse(SKYLINK).unwrap()
    );
}

/// Two writers that read the same revision: the registry accepts the first
/// write and rejects the second.
#[tokio::test]
async fn concurrent_writer_loses() {
    let registry = Arc::new(MemoryRegistry::new());
    let flow = RegistryUpdateFlow::new(registry.clone());
    let keys = SeedKeyDerivation.key_pair_from_seed("test-seed");

    flow.update("test-seed", "test-key", SKYLINK).await.unwrap();

    // a competing writer publishes revision 1 behind our back
    let competing = RegistryEntry::new("test-key", 1, &b"competing"[..]).unwrap();
    // and we then try to publish revision 1 too
    let ours = RegistryEntry::new("test-key", 1, SKYLINK.as_bytes().to_vec()).unwrap();

    registry
        .set_entry(&keys.private_key, competing)
        .await
        .unwrap();
    assert!(registry.set_entry(&keys.private_key, ours).await.is_err());

    // the flow itself re-reads, so a fresh submit succeeds at revision 2
    flow.update("test-seed", "test-key", SKYLINK).await.unwrap();
    let stored = registry
        .get_entry(&keys.public_key, "test-key")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.entry.revision, 2);
}

#[tokio::test]
async fn oversized_data_is_never_written() {
    let registry = MemoryRegistry::new();
    let keys = SeedKeyDerivation.key_pair_from_seed("test-seed");

    // built directly, bypassing the size check in RegistryEntry::new
    let entry = RegistryEntry {
        data_key: "test-key".into(),
        revision: 0,
        data: Bytes::from(vec![1u8; 65]),
    };

    let err = registry
        .insert_signed(&keys.public_key, entry.clone().sign(&keys.private_key))
        .unwrap_err();
    assert!(err.to_string().contains("too large"));

    assert!(registry.set_entry(&keys.private_key, entry).await.is_err());
    assert!(registry.is_empty());
    assert!(
        registry
            .get_entry(&keys.public_key, "test-key")
            .await
            .unwrap()
            .is_none()
    );
}

/// Lets another writer publish the next revision right after every read,
/// so the caller always writes against a stale revision.
#[derive(Debug)]
struct RacedRegistry {
    inner: MemoryRegistry,
    competitor: KeyPair,
}

#[async_trait::async_trait]
impl RegistryClient for RacedRegistry {
    async fn get_entry(
        &self,
        public_key: &PublicKey,
        data_key: &str,
    ) -> anyhow::Result<Option<SignedRegistryEntry>> {
        let current = self.inner.get_entry(public_key, data_key).await?;
        let revision = next_revision(current.as_ref().map(|signed| &signed.entry));
        let competing = RegistryEntry::new(data_key, revision, &b"competing"[..])?;
        self.inner
            .set_entry(&self.competitor.private_key, competing)
            .await?;
        Ok(current)
    }

    async fn set_entry(&self, private_key: &PrivateKey, entry: RegistryEntry) -> anyhow::Result<()> {
        self.inner.set_entry(private_key, entry).await
    }

    fn entry_url(&self, public_key: &PublicKey, data_key: &str) -> String {
        self.inner.entry_url(public_key, data_key)
    }
}

#[tokio::test]
async fn lost_race_surfaces_as_write_rejected() {
    let registry = Arc::new(RacedRegistry {
        inner: MemoryRegistry::new(),
        competitor: SeedKeyDerivation.key_pair_from_seed("test-seed"),
    });
    let flow = RegistryUpdateFlow::new(registry.clone());

    let err = flow
        .update("test-seed", "test-key", SKYLINK)
        .await
        .unwrap_err();
    assert!(matches!(err, UpdateError::WriteRejected(_)), "{err:?}");
    assert!(err.to_string().contains("revision number too low"));

    // the competing write is what the registry kept
    let keys = SeedKeyDerivation.key_pair_from_seed("test-seed");
    let stored = registry
        .inner
        .get_entry(&keys.public_key, "test-key")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.entry.revision, 0);
    assert_eq!(stored.entry.data.as_ref(), b"competing");
}
