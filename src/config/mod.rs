//! Configuration types for the Flair API client.
//!
//! This module provides the configuration used to construct a
//! [`FlairClient`](crate::FlairClient).
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`FlairConfig`]: The configuration struct holding all client settings
//! - [`FlairConfigBuilder`]: A builder for constructing [`FlairConfig`] instances
//! - [`ClientId`]: A validated OAuth client id
//! - [`ClientSecret`]: A validated OAuth client secret with masked debug output
//! - [`ApiRootUrl`]: The validated base URL of the API server
//!
//! # Example
//!
//! ```rust
//! use flair_api::{FlairConfig, ClientId, ClientSecret, ApiRootUrl};
//! use std::time::Duration;
//!
//! let config = FlairConfig::builder()
//!     .client_id(ClientId::new("my-client-id").unwrap())
//!     .client_secret(ClientSecret::new("my-secret").unwrap())
//!     .api_root(ApiRootUrl::new("https://api.flair.co/").unwrap())
//!     .timeout(Duration::from_secs(10))
//!     .build()
//!     .unwrap();
//! ```

mod newtypes;

pub use newtypes::{ApiRootUrl, ClientId, ClientSecret};

use std::time::Duration;

use crate::clients::DataType;
use crate::error::ConfigError;

/// Default API server.
pub const DEFAULT_API_ROOT: &str = "https://api.flair.co/";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding the OAuth client id.
pub const ENV_CLIENT_ID: &str = "FLAIR_CLIENT_ID";

/// Environment variable holding the OAuth client secret.
pub const ENV_CLIENT_SECRET: &str = "FLAIR_CLIENT_SECRET";

/// Environment variable overriding the API root.
pub const ENV_API_ROOT: &str = "FLAIR_API_ROOT";

/// Configuration for the Flair API client.
///
/// # Thread Safety
///
/// `FlairConfig` is `Clone`, `Send`, and `Sync`.
///
/// # Timeouts
///
/// The configured timeout bounds every request the client sends, reads and
/// writes alike.
#[derive(Clone, Debug)]
pub struct FlairConfig {
    client_id: ClientId,
    client_secret: ClientSecret,
    api_root: ApiRootUrl,
    timeout: Duration,
    data_type: DataType,
    user_agent_prefix: Option<String>,
}

impl FlairConfig {
    /// Creates a new builder for constructing a `FlairConfig`.
    #[must_use]
    pub fn builder() -> FlairConfigBuilder {
        FlairConfigBuilder::new()
    }

    /// Builds a configuration from `FLAIR_CLIENT_ID`, `FLAIR_CLIENT_SECRET`
    /// and the optional `FLAIR_API_ROOT`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] if a required variable is unset,
    /// or a validation error if a value is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let client_id =
            std::env::var(ENV_CLIENT_ID).map_err(|_| ConfigError::MissingEnvVar {
                name: ENV_CLIENT_ID,
            })?;
        let client_secret =
            std::env::var(ENV_CLIENT_SECRET).map_err(|_| ConfigError::MissingEnvVar {
                name: ENV_CLIENT_SECRET,
            })?;

        let mut builder = Self::builder()
            .client_id(ClientId::new(client_id)?)
            .client_secret(ClientSecret::new(client_secret)?);

        if let Ok(root) = std::env::var(ENV_API_ROOT) {
            builder = builder.api_root(ApiRootUrl::new(root)?);
        }

        builder.build()
    }

    /// Returns the OAuth client id.
    #[must_use]
    pub const fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    /// Returns the OAuth client secret.
    #[must_use]
    pub const fn client_secret(&self) -> &ClientSecret {
        &self.client_secret
    }

    /// Returns the API root URL.
    #[must_use]
    pub const fn api_root(&self) -> &ApiRootUrl {
        &self.api_root
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the content type used for request bodies of writes.
    #[must_use]
    pub const fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

// Verify FlairConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<FlairConfig>();
};

/// Builder for constructing [`FlairConfig`] instances.
///
/// Required fields are `client_id` and `client_secret`.
///
/// # Defaults
///
/// - `api_root`: [`DEFAULT_API_ROOT`]
/// - `timeout`: [`DEFAULT_TIMEOUT`]
/// - `data_type`: [`DataType::JsonApi`]
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct FlairConfigBuilder {
    client_id: Option<ClientId>,
    client_secret: Option<ClientSecret>,
    api_root: Option<ApiRootUrl>,
    timeout: Option<Duration>,
    data_type: Option<DataType>,
    user_agent_prefix: Option<String>,
}

impl FlairConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the OAuth client id (required).
    #[must_use]
    pub fn client_id(mut self, id: ClientId) -> Self {
        self.client_id = Some(id);
        self
    }

    /// Sets the OAuth client secret (required).
    #[must_use]
    pub fn client_secret(mut self, secret: ClientSecret) -> Self {
        self.client_secret = Some(secret);
        self
    }

    /// Sets the API root URL.
    #[must_use]
    pub fn api_root(mut self, root: ApiRootUrl) -> Self {
        self.api_root = Some(root);
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the content type sent with write requests.
    ///
    /// Older deployments of the API expect `application/json`; use
    /// [`DataType::Json`] for those.
    #[must_use]
    pub const fn data_type(mut self, data_type: DataType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`FlairConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `client_id` or
    /// `client_secret` are not set.
    pub fn build(self) -> Result<FlairConfig, ConfigError> {
        let client_id = self
            .client_id
            .ok_or(ConfigError::MissingRequiredField { field: "client_id" })?;
        let client_secret = self
            .client_secret
            .ok_or(ConfigError::MissingRequiredField {
                field: "client_secret",
            })?;
        let api_root = match self.api_root {
            Some(root) => root,
            None => ApiRootUrl::new(DEFAULT_API_ROOT)?,
        };

        Ok(FlairConfig {
            client_id,
            client_secret,
            api_root,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            data_type: self.data_type.unwrap_or(DataType::JsonApi),
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}
