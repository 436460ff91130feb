//! HTTP-specific error types for the Flair API client.
//!
//! # Error Handling
//!
//! The client uses specific error types for different failure scenarios:
//!
//! - [`ApiError`]: The server answered with a status code of 400 or above
//! - [`EmptyBodyError`]: A 200/201 response whose `data` member was empty
//! - [`InvalidHttpRequestError`]: A request failed validation before sending
//! - [`HttpError`]: Unified error type encompassing all HTTP-related errors
//!
//! Network failures and malformed JSON are not translated; they surface as
//! [`HttpError::Network`] and [`HttpError::Json`].
//!
//! # Example
//!
//! ```rust,ignore
//! use flair_api::clients::HttpError;
//!
//! match client.request(request).await {
//!     Ok(response) => println!("Success: {:?}", response.body),
//!     Err(HttpError::Api(e)) => println!("API error {}: {}", e.status, e.body),
//!     Err(HttpError::EmptyBody(_)) => println!("Nothing there"),
//!     Err(other) => println!("Transport error: {other}"),
//! }
//! ```

use thiserror::Error;

/// Error returned when the server answers with a status code >= 400.
///
/// Carries the raw text body and, when the body was valid JSON, its parsed
/// form (JSON:API servers usually send an `errors` array).
///
/// # Example
///
/// ```rust
/// use flair_api::clients::ApiError;
///
/// let error = ApiError::new(404, r#"{"errors":[{"title":"Not Found"}]}"#.to_string());
/// assert_eq!(error.status, 404);
/// assert!(error.json.is_some());
/// assert_eq!(error.error_titles(), vec!["Not Found"]);
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
#[error("API request failed with status {status}: {body}")]
pub struct ApiError {
    /// The HTTP status code of the response.
    pub status: u16,
    /// The raw response body.
    pub body: String,
    /// The response body parsed as JSON, if it was parseable.
    pub json: Option<serde_json::Value>,
}

impl ApiError {
    /// Creates an error from a status code and raw body, parsing the body
    /// as JSON when possible.
    #[must_use]
    pub fn new(status: u16, body: String) -> Self {
        let json = serde_json::from_str(&body).ok();
        Self { status, body, json }
    }

    /// Returns the `title` (or `detail`) of each entry in a JSON:API
    /// `errors` array.
    #[must_use]
    pub fn error_titles(&self) -> Vec<&str> {
        self.json
            .as_ref()
            .and_then(|json| json.get("errors"))
            .and_then(serde_json::Value::as_array)
            .map(|errors| {
                errors
                    .iter()
                    .filter_map(|e| {
                        e.get("title")
                            .or_else(|| e.get("detail"))
                            .and_then(serde_json::Value::as_str)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns `true` for 401 responses, which indicate a rejected or
    /// expired bearer token.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

/// Error returned when a 200/201 response carries an empty `data` member.
///
/// The caller asked for a resource and the server acknowledged the request
/// but had nothing to return.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Response with status {status} contained no data")]
pub struct EmptyBodyError {
    /// The HTTP status code of the response.
    pub status: u16,
}

/// Error returned when an HTTP request fails validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A request body was provided without specifying the body type.
    #[error("Cannot set a body without also setting body_type.")]
    MissingBodyType,

    /// A POST or PATCH request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// The request body cannot be encoded with the given body type.
    #[error("A {body_type} body must be a flat JSON object of strings.")]
    UnencodableBody {
        /// The body type the request asked for.
        body_type: &'static str,
    },
}

/// Unified error type for all HTTP-related errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The server answered with a status code >= 400.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The server answered 200/201 with an empty `data` member.
    #[error(transparent)]
    EmptyBody(#[from] EmptyBodyError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// A link could not be resolved into a URL.
    #[error("Invalid URL '{url}'")]
    InvalidUrl {
        /// The link that failed to resolve.
        url: String,
    },

    /// Network, connection, or timeout error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A success response body was not valid JSON.
    #[error("Invalid JSON in response body: {0}")]
    Json(#[from] serde_json::Error),
}

impl HttpError {
    /// Returns the HTTP status code when the error came from a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(e) => Some(e.status),
            Self::EmptyBody(e) => Some(e.status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            Self::InvalidRequest(_) | Self::InvalidUrl { .. } | Self::Json(_) => None,
        }
    }
}

// Verify error types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpError>();
};
