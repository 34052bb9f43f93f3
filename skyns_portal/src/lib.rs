//! Skynet portal registry client.
//!
//! [`PortalClient`] implements [`skyns_core::RegistryClient`] on top of a
//! portal's `/skynet/registry` HTTP endpoint.

mod client;
mod config;

pub use client::PortalClient;
pub use config::{DEFAULT_PORTAL_URL, DEFAULT_TIMEOUT_SECS, PortalConfig};

use hex::FromHexError;
use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("Got HTTP {0} with content '{1}'")]
    HttpFailWithBody(u16, String),

    #[error("invalid portal url: {0}")]
    InvalidPortalUrl(String),

    #[error(transparent)]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
    #[error(transparent)]
    Hex(#[from] FromHexError),
    #[error(transparent)]
    Entry(#[from] skyns_core::RegistryEntryError),
}
