//! Configuration structures for SuperHub clients.
//!
//! [`SuperhubClientConfig`] can be deserialized from any serde source or read
//! from the environment, validated, and turned into a [`ClientBuilder`].
//!
//! [`ClientBuilder`]: crate::client::ClientBuilder

use crate::client::DEFAULT_BASE_URL;
use crate::credentials::Credentials;
use crate::Error;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Environment variable holding the API root.
pub const ENV_BASE_URL: &str = "SUPERHUB_BASE_URL";
/// Environment variable holding the persistent token id.
pub const ENV_TOKEN_ID: &str = "SUPERHUB_TOKEN_ID";
/// Environment variable holding the persistent token secret.
pub const ENV_ACCESS_TOKEN: &str = "SUPERHUB_ACCESS_TOKEN";
/// Environment variable holding the request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "SUPERHUB_TIMEOUT_SECS";

/// Configuration for a SuperHub client instance.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_token_pair", skip_on_field_errors = false))]
pub struct SuperhubClientConfig {
    /// API root, e.g. `https://api.superhub.host/v1`
    #[validate(url)]
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Persistent token identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<Uuid>,

    /// Persistent token secret
    #[serde(default, skip_serializing)]
    pub access_token: Option<String>,

    /// Request timeout in seconds; unset leaves the transport without one
    #[validate(range(min = 1, max = 300))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Connect timeout in seconds
    #[validate(range(min = 1, max = 60))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn validate_token_pair(config: &SuperhubClientConfig) -> Result<(), ValidationError> {
    if config.token_id.is_some() != config.access_token.is_some() {
        let mut error = ValidationError::new("token_pair");
        error.message = Some("token_id and access_token must be set together".into());
        return Err(error);
    }
    Ok(())
}

impl SuperhubClientConfig {
    /// Create a configuration for the given API root.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(base_url: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            base_url: base_url.into(),
            ..Self::default()
        };

        config.validate_config()?;
        Ok(config)
    }

    /// Read the configuration from `SUPERHUB_*` environment variables.
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or the result fails
    /// validation.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let mut config = Self::default();

        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config.base_url = base_url;
        }
        if let Some(token_id) = lookup(ENV_TOKEN_ID) {
            let id = Uuid::parse_str(token_id.trim()).map_err(|e| {
                Error::ConfigError(format!("Invalid {ENV_TOKEN_ID}: {e}"))
            })?;
            config.token_id = Some(id);
        }
        if let Some(access_token) = lookup(ENV_ACCESS_TOKEN) {
            config.access_token = Some(access_token);
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            let seconds = timeout.trim().parse::<u64>().map_err(|e| {
                Error::ConfigError(format!("Invalid {ENV_TIMEOUT_SECS}: {e}"))
            })?;
            config.request_timeout_secs = Some(seconds);
        }

        config.validate_config()?;
        Ok(config)
    }

    /// Set the persistent token.
    #[must_use]
    pub fn with_token(mut self, id: Uuid, access_token: impl Into<String>) -> Self {
        self.token_id = Some(id);
        self.access_token = Some(access_token.into());
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = Some(seconds);
        self
    }

    /// Set connect timeout in seconds.
    #[must_use]
    pub const fn with_connect_timeout(mut self, seconds: u64) -> Self {
        self.connect_timeout_secs = Some(seconds);
        self
    }

    /// Run field and schema validation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing every failed rule.
    pub fn validate_config(&self) -> Result<(), Error> {
        self.validate().map_err(Error::from)
    }

    /// Credentials described by this configuration.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        match (self.token_id, &self.access_token) {
            (Some(id), Some(token)) => Credentials::persistent(id, token.clone()),
            _ => Credentials::Empty,
        }
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Get the connect timeout as a Duration.
    #[must_use]
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for SuperhubClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token_id: None,
            access_token: None,
            request_timeout_secs: None,
            connect_timeout_secs: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientBuilder;
    use std::collections::HashMap;

    const TOKEN_ID: &str = "0d7c3a7e-52b5-4a53-a0b4-5b0f0a7c5e21";

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = SuperhubClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.timeout().is_none());
        assert!(config.credentials().is_empty());
        assert!(config.validate_config().is_ok());
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        assert!(SuperhubClientConfig::new("http://127.0.0.1:8080/v3").is_ok());

        let err = SuperhubClientConfig::new("not a url").unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_token_pair_must_be_complete() {
        let mut config = SuperhubClientConfig::default();
        config.token_id = Some(Uuid::nil());
        assert!(config.validate_config().is_err());

        let config = SuperhubClientConfig::default().with_token(Uuid::nil(), "secret");
        assert!(config.validate_config().is_ok());
        assert!(matches!(
            config.credentials(),
            Credentials::PersistentToken(token) if token.access_token() == "secret"
        ));
    }

    #[test]
    fn test_timeout_range() {
        let config = SuperhubClientConfig::default().with_timeout(0);
        assert!(config.validate_config().is_err());

        let config = SuperhubClientConfig::default()
            .with_timeout(45)
            .with_connect_timeout(5);
        assert!(config.validate_config().is_ok());
        assert_eq!(config.timeout(), Some(Duration::from_secs(45)));
        assert_eq!(config.connect_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: SuperhubClientConfig = serde_json::from_str(&format!(
            r#"{{"token_id":"{TOKEN_ID}","access_token":"abc","request_timeout_secs":10}}"#
        ))
        .unwrap();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.token_id.unwrap().to_string(), TOKEN_ID);
        assert_eq!(config.request_timeout_secs, Some(10));
    }

    #[test]
    fn test_access_token_never_serialized() {
        let config = SuperhubClientConfig::default().with_token(Uuid::nil(), "do-not-print");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("do-not-print"));
        assert!(json.contains("token_id"));
    }

    #[test]
    fn test_from_lookup() {
        let config = SuperhubClientConfig::from_lookup(lookup_from(&[
            (ENV_BASE_URL, "http://127.0.0.1:8080/v3/"),
            (ENV_TOKEN_ID, TOKEN_ID),
            (ENV_ACCESS_TOKEN, "abc"),
            (ENV_TIMEOUT_SECS, " 20 "),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "http://127.0.0.1:8080/v3/");
        assert_eq!(config.timeout(), Some(Duration::from_secs(20)));
        assert!(!config.credentials().is_empty());
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let err = SuperhubClientConfig::from_lookup(lookup_from(&[(ENV_TOKEN_ID, "nope")]))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_TOKEN_ID));

        let err = SuperhubClientConfig::from_lookup(lookup_from(&[(ENV_TIMEOUT_SECS, "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_TIMEOUT_SECS));

        // Secret without id is a half-configured token.
        assert!(
            SuperhubClientConfig::from_lookup(lookup_from(&[(ENV_ACCESS_TOKEN, "x")])).is_err()
        );
    }

    #[test]
    fn test_builder_from_config() {
        let config = SuperhubClientConfig::new("http://127.0.0.1:8080/v3")
            .unwrap()
            .with_token(Uuid::nil(), "abc")
            .with_timeout(15);

        let client = ClientBuilder::from_config(&config).unwrap().build().unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:8080/v3");
        assert!(!client.credentials().is_empty());

        let broken = SuperhubClientConfig::default().with_timeout(1000);
        assert!(ClientBuilder::from_config(&broken).is_err());
    }
}
