//! Input and output state of a single registry update form.

use tracing::warn;

use crate::flow::RegistryUpdateFlow;
use crate::keys::KeyDerivation;
use crate::registry::RegistryClient;
use crate::uri::RegistryUri;

/// Seed, data key and skylink as entered by the user, plus the URI of the
/// last successful update and whether it has been copied since.
#[derive(Debug, Clone, Default)]
pub struct RegistryForm {
    pub seed: String,
    pub data_key: String,
    pub skylink: String,
    registry_uri: Option<RegistryUri>,
    copied: bool,
}

impl RegistryForm {
    pub fn new(
        seed: impl Into<String>,
        data_key: impl Into<String>,
        skylink: impl Into<String>,
    ) -> Self {
        Self {
            seed: seed.into(),
            data_key: data_key.into(),
            skylink: skylink.into(),
            ..Self::default()
        }
    }

    /// Runs the update with the current inputs.
    ///
    /// Returns `true` once the registry accepted the new entry. Failures are
    /// logged and otherwise only reported as "did not complete"; the URI from
    /// an earlier successful submit stays in place.
    pub async fn submit<R, K>(&mut self, flow: &RegistryUpdateFlow<R, K>) -> bool
    where
        R: RegistryClient,
        K: KeyDerivation,
    {
        self.copied = false;
        match flow.update(&self.seed, &self.data_key, &self.skylink).await {
            Ok(uri) => {
                self.registry_uri = Some(uri);
                true
            }
            Err(err) => {
                warn!("failed to update registry entry: {err}");
                false
            }
        }
    }

    pub fn registry_uri(&self) -> Option<&RegistryUri> {
        self.registry_uri.as_ref()
    }

    /// Marks the current URI as copied and returns its text.
    pub fn copy(&mut self) -> Option<String> {
        let text = self.registry_uri.as_ref()?.to_string();
        self.copied = true;
        Some(text)
    }

    pub fn copied(&self) -> bool {
        self.copied
    }
}
