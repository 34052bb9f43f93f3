//! Deterministic Ed25519 key pairs derived from a seed string.
//!
//! ## Key Derivation
//!
//! ```text
//! seed (UTF-8 string, any length)
//!     |
//!     v
//! PBKDF2-HMAC-SHA256(seed, salt = "", rounds = 1000) -> 32 bytes
//!     |
//!     v
//! Ed25519 signing key (secret seed) -> verifying key (registry public key)
//! ```
//!
//! The parameters match the Skynet client libraries, so a seed used there
//! controls the same registry entries here.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use sha2::Sha256;
use std::fmt;

/// PBKDF2 iteration count used for seed stretching.
pub const PBKDF2_ROUNDS: u32 = 1000;

/// Size of an Ed25519 public key in bytes.
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Algorithm name the portal expects in front of hex encoded public keys.
pub const ED25519_ALGORITHM: &str = "ed25519";

/// Registry public key (Ed25519 verifying key).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey(VerifyingKey);

impl PublicKey {
    pub fn from_bytes(bytes: &[u8; PUBLIC_KEY_SIZE]) -> Result<Self, ed25519_dalek::SignatureError> {
        VerifyingKey::from_bytes(bytes).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        self.0.as_bytes()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }

    /// `ed25519:<hex>`, the form used in portal query strings.
    pub fn to_portal_string(&self) -> String {
        format!("{ED25519_ALGORITHM}:{}", self.to_hex())
    }

    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        self.0.verify(message, signature).is_ok()
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PublicKey").field(&self.to_hex()).finish()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_portal_string())
    }
}

/// Registry private key (Ed25519 signing key).
#[derive(Clone)]
pub struct PrivateKey(SigningKey);

impl PrivateKey {
    pub fn from_seed_bytes(seed: &[u8; 32]) -> Self {
        Self(SigningKey::from_bytes(seed))
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.0.verifying_key())
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        self.0.sign(message)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
pub struct KeyPair {
    pub public_key: PublicKey,
    pub private_key: PrivateKey,
}

impl From<PrivateKey> for KeyPair {
    fn from(private_key: PrivateKey) -> Self {
        Self {
            public_key: private_key.public_key(),
            private_key,
        }
    }
}

/// Turns a seed string into a registry key pair.
///
/// Implementations must be deterministic: the same seed always yields the
/// same key pair.
pub trait KeyDerivation: fmt::Debug + Send + Sync {
    fn key_pair_from_seed(&self, seed: &str) -> KeyPair;
}

/// PBKDF2-HMAC-SHA256 seed stretching into an Ed25519 key pair.
#[derive(Clone, Copy, Debug, Default)]
pub struct SeedKeyDerivation;

impl KeyDerivation for SeedKeyDerivation {
    fn key_pair_from_seed(&self, seed: &str) -> KeyPair {
        let mut secret = [0u8; 32];
        pbkdf2::pbkdf2_hmac::<Sha256>(seed.as_bytes(), b"", PBKDF2_ROUNDS, &mut secret);
        PrivateKey::from_seed_bytes(&secret).into()
    }
}
