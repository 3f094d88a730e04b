//! Base client, its builder and endpoint URL resolution.
//!
//! A [`Client`] is stateless apart from its base URL, credentials and
//! transport handle. Cloning is cheap and clones share the transport.

use crate::config::SuperhubClientConfig;
use crate::credentials::Credentials;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Production API root used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.superhub.host/v1";

const USER_AGENT: &str = concat!("superhub-rust/", env!("CARGO_PKG_VERSION"));

/// Dispatches a fully built HTTP request.
///
/// Implemented for [`reqwest::Client`]. Timeouts, pooling and cancellation
/// belong to the implementation, not to this crate.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and return the raw response.
    async fn execute(&self, request: reqwest::Request) -> reqwest::Result<reqwest::Response>;
}

#[async_trait]
impl Transport for reqwest::Client {
    async fn execute(&self, request: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        reqwest::Client::execute(self, request).await
    }
}

/// Builder for [`Client`].
#[derive(Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    credentials: Option<Credentials>,
    transport: Option<Arc<dyn Transport>>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Create a builder with every setting left at its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a builder from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the configuration fails validation.
    pub fn from_config(config: &SuperhubClientConfig) -> Result<Self> {
        config.validate_config()?;

        Ok(Self {
            base_url: Some(config.base_url.clone()),
            credentials: Some(config.credentials()),
            transport: None,
            timeout: config.timeout(),
            connect_timeout: config.connect_timeout(),
        })
    }

    /// Override the API root. An empty string selects [`DEFAULT_BASE_URL`].
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the authorization strategy.
    #[must_use]
    pub fn with_credentials(mut self, credentials: impl Into<Credentials>) -> Self {
        self.credentials = Some(credentials.into());
        self
    }

    /// Use an existing reqwest client as the transport.
    #[must_use]
    pub fn with_http_client(self, http: reqwest::Client) -> Self {
        self.with_transport(http)
    }

    /// Use a custom transport.
    #[must_use]
    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Request timeout for the default transport.
    ///
    /// Ignored when a transport is supplied explicitly.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Connect timeout for the default transport.
    ///
    /// Ignored when a transport is supplied explicitly.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the default HTTP client cannot be built.
    pub fn build(self) -> Result<Client> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }

                let http = builder.build().map_err(|err| {
                    Error::ConfigError(format!("Failed to build HTTP client: {err}"))
                })?;
                Arc::new(http) as Arc<dyn Transport>
            }
        };

        Ok(Client {
            base_url: self.base_url.unwrap_or_default(),
            credentials: Arc::new(self.credentials.unwrap_or_default()),
            transport,
        })
    }
}

/// Base SuperHub client: API root, credentials and transport.
#[derive(Clone)]
pub struct Client {
    base_url: String,
    credentials: Arc<Credentials>,
    pub(crate) transport: Arc<dyn Transport>,
}

impl Client {
    /// Anonymous client against [`DEFAULT_BASE_URL`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the default HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        ClientBuilder::new().build()
    }

    /// Client against [`DEFAULT_BASE_URL`] using the given credentials.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the default HTTP client cannot be built.
    pub fn with_credentials(credentials: impl Into<Credentials>) -> Result<Self> {
        ClientBuilder::new().with_credentials(credentials).build()
    }

    /// Start a [`ClientBuilder`].
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Effective API root.
    #[must_use]
    pub fn base_url(&self) -> &str {
        if self.base_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            &self.base_url
        }
    }

    /// Authorization strategy applied to every request.
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Resolve an endpoint path against the base URL.
    ///
    /// Path segments are joined POSIX style, so leading and trailing slashes
    /// on either side do not change the result. Scheme, host, port and any
    /// query on the base URL are preserved.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedUrl`] if the base URL cannot be parsed.
    pub fn resolve(&self, endpoint: &str) -> Result<Url> {
        let base = self.base_url();
        let mut url = Url::parse(base)?;

        if url.cannot_be_a_base() {
            return Err(Error::MalformedUrl(format!(
                "Base URL `{base}` cannot carry a path"
            )));
        }

        let joined = join_paths(url.path(), endpoint);
        url.set_path(&joined);
        Ok(url)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url())
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

/// Join and clean two slash-separated paths.
///
/// Empty and `.` segments are dropped and `..` removes the previous segment.
/// The result is always absolute and never ends in a slash.
fn join_paths(base: &str, endpoint: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in base.split('/').chain(endpoint.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment),
        }
    }

    format!("/{}", segments.join("/"))
}
