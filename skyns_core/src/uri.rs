//! `skyns://` URIs pointing at a registry entry.
//!
//! A registry URI is what gets published as a DNS-style record (for example
//! a Handshake TXT record) so resolvers can find the entry. It is built from
//! the `publickey` and `datakey` query parameters of the registry's lookup URL,
//! copied verbatim (still percent-encoded).

use std::fmt;
use std::str::FromStr;

pub const REGISTRY_URI_SCHEME: &str = "skyns";

const PUBLIC_KEY_PARAM: &str = "publickey";
const DATA_KEY_PARAM: &str = "datakey";

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RegistryUriError {
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("url has no query string")]
    MissingQuery,
    #[error("url query has no '{0}' parameter")]
    MissingParam(&'static str),
    #[error("not a {REGISTRY_URI_SCHEME}:// uri: {0}")]
    InvalidUri(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegistryUri {
    public_key: String,
    data_key: String,
}

impl RegistryUri {
    /// Builds the URI from a registry lookup URL such as
    /// `https://siasky.net/skynet/registry?publickey=ed25519%3A...&datakey=...`.
    pub fn from_entry_url(entry_url: &str) -> Result<Self, RegistryUriError> {
        let url = url::Url::parse(entry_url)?;
        let query = url.query().ok_or(RegistryUriError::MissingQuery)?;

        let param = |name: &'static str| {
            query
                .split('&')
                .filter_map(|pair| pair.split_once('='))
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_owned())
                .filter(|value| !value.is_empty())
                .ok_or(RegistryUriError::MissingParam(name))
        };

        Ok(Self {
            public_key: param(PUBLIC_KEY_PARAM)?,
            data_key: param(DATA_KEY_PARAM)?,
        })
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn data_key(&self) -> &str {
        &self.data_key
    }
}

impl fmt::Display for RegistryUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{REGISTRY_URI_SCHEME}://{}/{}",
            self.public_key, self.data_key
        )
    }
}

impl FromStr for RegistryUri {
    type Err = RegistryUriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RegistryUriError::InvalidUri(s.to_owned());
        let rest = s
            .strip_prefix(REGISTRY_URI_SCHEME)
            .and_then(|rest| rest.strip_prefix("://"))
            .ok_or_else(invalid)?;
        let (public_key, data_key) = rest.split_once('/').ok_or_else(invalid)?;
        if public_key.is_empty() || data_key.is_empty() || data_key.contains('/') {
            return Err(invalid());
        }
        Ok(Self {
            public_key: public_key.to_owned(),
            data_key: data_key.to_owned(),
        })
    }
}
