use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use skyns_portal::PortalConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(default)]
pub struct SkynsConfig {
    pub portal: PortalConfig,
}

impl SkynsConfig {
    /// Reads the config file, falling back to defaults if it does not exist.
    pub fn load(config_file: &Path) -> anyhow::Result<Self> {
        if !config_file.exists() {
            return Ok(Self::default());
        }
        let toml_content = std::fs::read_to_string(config_file)
            .with_context(|| format!("failed to read {}", config_file.display()))?;
        toml::from_str(&toml_content)
            .with_context(|| format!("could not parse config file {}", config_file.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyns_portal::{DEFAULT_PORTAL_URL, DEFAULT_TIMEOUT_SECS};

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SkynsConfig::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.portal.url, DEFAULT_PORTAL_URL);
        assert_eq!(config.portal.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[portal]\nurl = \"https://skynetfree.net\"\n").unwrap();

        let config = SkynsConfig::load(&path).unwrap();
        assert_eq!(config.portal.url, "https://skynetfree.net");
        assert_eq!(config.portal.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[portal]\ntimeout_secs = \"soon\"\n").unwrap();
        assert!(SkynsConfig::load(&path).is_err());
    }
}
