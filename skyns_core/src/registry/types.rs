//! Registry entry data structures and their signing rules.
//!
//! A registry entry is a small mutable record owned by an Ed25519 key pair.
//! It is addressed by `(public key, hash_data_key(data_key))` and replaced by
//! publishing a new entry with a higher revision.
//!
//! ## Signed message
//!
//! The signature covers the BLAKE2b-256 hash of:
//!
//! - 32 bytes: hashed data key (see [`hash_data_key`])
//! - 8 bytes: data length (little-endian)
//! - N bytes: data
//! - 8 bytes: revision (little-endian)

use crate::keys::{PrivateKey, PublicKey};
use blake2::Blake2b;
use blake2::Digest;
use blake2::digest::consts::U32;
use bytes::Bytes;
use ed25519_dalek::Signature;

pub type Blake2b256 = Blake2b<U32>;

/// Maximum number of data bytes a registry entry may carry.
pub const MAX_ENTRY_DATA_SIZE: usize = 64;

/// Size of an Ed25519 signature in bytes.
pub const SIGNATURE_SIZE: usize = 64;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegistryEntryError {
    #[error("entry data too large: {size} bytes (max: {max})")]
    DataTooLarge { size: usize, max: usize },

    #[error("invalid signature length: expected {expected}, got {actual}")]
    InvalidSignatureLength { expected: usize, actual: usize },
}

/// Hashes a data key into the 32-byte form the registry is keyed by.
pub fn hash_data_key(data_key: &str) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update((data_key.len() as u64).to_le_bytes());
    hasher.update(data_key.as_bytes());
    hasher.finalize().into()
}

/// Revision for the next write given the entry currently stored, if any.
///
/// A missing entry counts as revision "-1", so the first write is revision 0.
pub fn next_revision(existing: Option<&RegistryEntry>) -> u64 {
    match existing {
        Some(entry) => entry.revision.saturating_add(1),
        None => 0,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    /// The human-readable key; only its hash is sent over the wire.
    pub data_key: String,

    /// Monotonically increasing version number. The registry keeps the
    /// entry with the highest revision.
    pub revision: u64,

    pub data: Bytes,
}

impl RegistryEntry {
    pub fn new(
        data_key: impl Into<String>,
        revision: u64,
        data: impl Into<Bytes>,
    ) -> Result<Self, RegistryEntryError> {
        let data = data.into();
        if data.len() > MAX_ENTRY_DATA_SIZE {
            return Err(RegistryEntryError::DataTooLarge {
                size: data.len(),
                max: MAX_ENTRY_DATA_SIZE,
            });
        }
        Ok(Self {
            data_key: data_key.into(),
            revision,
            data,
        })
    }

    pub fn hashed_data_key(&self) -> [u8; 32] {
        hash_data_key(&self.data_key)
    }

    /// The hash that gets signed by the entry owner.
    pub fn hash(&self) -> [u8; 32] {
        let mut hasher = Blake2b256::new();
        hasher.update(self.hashed_data_key());
        hasher.update((self.data.len() as u64).to_le_bytes());
        hasher.update(&self.data);
        hasher.update(self.revision.to_le_bytes());
        hasher.finalize().into()
    }

    pub fn sign(self, private_key: &PrivateKey) -> SignedRegistryEntry {
        let signature = private_key.sign(&self.hash());
        SignedRegistryEntry {
            entry: self,
            signature,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRegistryEntry {
    pub entry: RegistryEntry,
    pub signature: Signature,
}

impl SignedRegistryEntry {
    /// Reassembles an entry received from a registry.
    pub fn from_parts(entry: RegistryEntry, signature: &[u8]) -> Result<Self, RegistryEntryError> {
        let signature = Signature::from_slice(signature).map_err(|_| {
            RegistryEntryError::InvalidSignatureLength {
                expected: SIGNATURE_SIZE,
                actual: signature.len(),
            }
        })?;
        Ok(Self { entry, signature })
    }

    pub fn verify(&self, public_key: &PublicKey) -> bool {
        public_key.verify(&self.entry.hash(), &self.signature)
    }
}
