//! Asynchronous SuperHub client.
//!
//! Endpoint methods are grouped by resource in the sibling modules
//! ([`crate::server`], [`crate::node`], [`crate::user`], [`crate::payment`]).

use crate::Result;
use superhub_core::{Client, ClientBuilder, Credentials, SuperhubClientConfig};

/// Typed client for the SuperHub API.
#[derive(Debug, Clone)]
pub struct SuperhubClient {
    core: Client,
}

impl SuperhubClient {
    /// Anonymous client against the production API.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Client::new().map(Self::from_core)
    }

    /// Client against the production API using the given credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_credentials(credentials: impl Into<Credentials>) -> Result<Self> {
        Client::with_credentials(credentials).map(Self::from_core)
    }

    /// Client described by a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn from_config(config: &SuperhubClientConfig) -> Result<Self> {
        ClientBuilder::from_config(config)?
            .build()
            .map(Self::from_core)
    }

    /// Wrap an already configured base client.
    #[must_use]
    pub const fn from_core(core: Client) -> Self {
        Self { core }
    }

    /// Start configuring the underlying base client.
    #[must_use]
    pub fn builder() -> ClientBuilder {
        Client::builder()
    }

    /// The underlying base client, for endpoints without a typed wrapper.
    #[must_use]
    pub const fn core(&self) -> &Client {
        &self.core
    }

    /// Effective API root.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.core.base_url()
    }
}

impl From<Client> for SuperhubClient {
    fn from(core: Client) -> Self {
        Self::from_core(core)
    }
}
