//! Bearer token issued by the OAuth token endpoint.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::fmt;

/// Raw token endpoint response.
#[derive(Clone, Debug, Deserialize)]
pub struct AccessTokenResponse {
    /// The bearer credential.
    pub access_token: String,
    /// Lifetime of the credential in seconds.
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Token type, normally `"bearer"`.
    #[serde(default)]
    pub token_type: Option<String>,
    /// Granted scopes, space separated.
    #[serde(default)]
    pub scope: Option<String>,
}

/// A bearer credential and the instant it stops being valid.
///
/// The client fetches one token and keeps it for its lifetime; it does not
/// refresh. Use [`expired`](Self::expired) to decide when to build a new
/// client.
///
/// # Example
///
/// ```rust
/// use flair_api::AccessToken;
///
/// let token = AccessToken::new("token".to_string(), Some(3600));
/// assert!(!token.expired());
/// assert_eq!(token.secret(), "token");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    secret: String,
    expires_in: Option<i64>,
    expires: Option<DateTime<Utc>>,
    scope: Option<String>,
}

impl AccessToken {
    /// Creates a token that expires `expires_in` seconds from now.
    ///
    /// A lifetime too large to represent as an instant is treated as no
    /// expiry.
    #[must_use]
    pub fn new(secret: String, expires_in: Option<i64>) -> Self {
        let expires = expires_in
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime));
        Self {
            secret,
            expires_in,
            expires,
            scope: None,
        }
    }

    /// Builds a token from the token endpoint's response.
    #[must_use]
    pub fn from_response(response: AccessTokenResponse) -> Self {
        let mut token = Self::new(response.access_token, response.expires_in);
        token.scope = response.scope;
        token
    }

    /// Returns the raw bearer credential.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Returns the lifetime the server reported, in seconds.
    #[must_use]
    pub const fn expires_in(&self) -> Option<i64> {
        self.expires_in
    }

    /// Returns when this token expires, if the server reported a lifetime.
    #[must_use]
    pub const fn expires(&self) -> Option<DateTime<Utc>> {
        self.expires
    }

    /// Returns the granted scopes, if the server reported them.
    #[must_use]
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Returns `true` if this token has expired.
    ///
    /// Tokens without a reported lifetime never expire.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.expires.is_some_and(|expires| Utc::now() > expires)
    }

}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"*****")
            .field("expires_in", &self.expires_in)
            .field("expires", &self.expires)
            .finish_non_exhaustive()
    }
}
