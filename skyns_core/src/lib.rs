//! Core skyns types and the registry update flow.
//!
//! This crate defines the shared types and traits used by all skyns crates.
//!
//! ## Protocol types (wire-stable)
//!
//! - Skylinks and their text encodings (`skylink::Skylink`, `codec`)
//! - Registry entries, data key hashing and the signed message
//!   (`registry::types`)
//! - Seed-derived Ed25519 keys (`keys`)
//!
//! These must match what Skynet portals and other clients produce;
//! changing them changes which entries a seed controls.
//!
//! ## Convenience APIs (non-wire)
//!
//! - The registry abstraction (`RegistryClient`); implementations in
//!   `skyns_registry` (MemoryRegistry) and `skyns_portal` (PortalClient)
//! - The update flow (`RegistryUpdateFlow`) and its form state
//!   (`RegistryForm`)
//! - `skyns://` URIs (`RegistryUri`)

pub mod codec;
pub mod flow;
pub mod form;
pub mod keys;
pub mod registry;
pub mod skylink;
pub mod uri;

// --- Core Public Surface ---

pub use codec::CodecError;
pub use skylink::{Skylink, SkylinkError};

pub use keys::{KeyDerivation, KeyPair, PrivateKey, PublicKey, SeedKeyDerivation};

pub use registry::{
    RegistryClient, RegistryEntry, RegistryEntryError, SignedRegistryEntry, hash_data_key,
    next_revision,
};

pub use flow::{RegistryUpdateFlow, UpdateError};
pub use form::RegistryForm;
pub use uri::{RegistryUri, RegistryUriError};
