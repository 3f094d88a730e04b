//! Request authorization strategies.
//!
//! A client carries exactly one [`Credentials`] value. Applying it only ever
//! touches outbound request headers.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use secrecy::{ExposeSecret, SecretString};
use tracing::warn;
use uuid::Uuid;

/// Scheme tag used in the `Authorization` header for persistent tokens.
pub const PERSISTENT_SCHEME: &str = "Persistent";

/// Header carrying the secret half of a persistent token.
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";

/// Authorization strategy applied to every outbound request.
#[derive(Debug, Default)]
pub enum Credentials {
    /// No authorization headers are sent.
    #[default]
    Empty,
    /// Long-lived token pair sent as `Authorization` + `X-Access-Token`.
    PersistentToken(PersistentToken),
}

impl Credentials {
    /// Shorthand for [`Credentials::PersistentToken`].
    #[must_use]
    pub fn persistent(id: Uuid, access_token: impl Into<String>) -> Self {
        Self::PersistentToken(PersistentToken::new(id, access_token))
    }

    /// Returns true when no authorization is applied.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Sets the authorization headers for this strategy.
    ///
    /// Never fails. Headers not owned by the strategy are left as they are.
    pub fn authorize(&self, headers: &mut HeaderMap) {
        match self {
            Self::Empty => {}
            Self::PersistentToken(token) => token.authorize(headers),
        }
    }
}

impl From<PersistentToken> for Credentials {
    fn from(token: PersistentToken) -> Self {
        Self::PersistentToken(token)
    }
}

/// Opaque identifier plus secret access token.
#[derive(Debug)]
pub struct PersistentToken {
    id: Uuid,
    access_token: SecretString,
}

impl PersistentToken {
    /// Create a token from its identifier and secret.
    #[must_use]
    pub fn new(id: Uuid, access_token: impl Into<String>) -> Self {
        Self {
            id,
            access_token: SecretString::from(access_token.into()),
        }
    }

    /// Token identifier sent in the `Authorization` header.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Secret half of the token.
    #[must_use]
    pub fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }

    fn authorize(&self, headers: &mut HeaderMap) {
        let authorization = format!("{PERSISTENT_SCHEME} {}", self.id);
        match HeaderValue::from_str(&authorization) {
            Ok(value) => {
                headers.insert(AUTHORIZATION, value);
            }
            Err(err) => warn!(error = %err, "persistent token id is not a valid header value"),
        }

        match HeaderValue::from_str(self.access_token.expose_secret()) {
            Ok(mut value) => {
                value.set_sensitive(true);
                headers.insert(HeaderName::from_static(ACCESS_TOKEN_HEADER), value);
            }
            Err(err) => warn!(error = %err, "access token is not a valid header value"),
        }
    }
}
