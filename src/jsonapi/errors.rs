//! Error types for JSON:API resource operations.
//!
//! [`ResourceError`] adds resource-model failures on top of the transport's
//! [`HttpError`]:
//!
//! - [`ResourceError::UnknownResourceType`]: the API root does not list the type
//! - [`ResourceError::UnknownRelationship`]: a resource has no such relationship
//! - [`ResourceError::MissingLink`]: a relationship lacks the link an operation needs
//! - [`ResourceError::ToOneRelationship`]: several resources were added to a to-one relationship
//! - [`ResourceError::UnexpectedDocument`]: a resource came back where a collection was expected, or vice versa
//! - [`ResourceError::MalformedDocument`]: the body was JSON but not a JSON:API document
//!
//! # Example
//!
//! ```rust,ignore
//! use flair_api::ResourceError;
//!
//! match client.find("structures", "1").await {
//!     Ok(structure) => println!("{:?}", structure.attribute("name")),
//!     Err(e) if e.status() == Some(404) => println!("gone"),
//!     Err(ResourceError::Http(e)) => println!("transport: {e}"),
//!     Err(e) => println!("{e}"),
//! }
//! ```

use crate::clients::{ApiError, HttpError};
use thiserror::Error;

/// Error type for JSON:API resource operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// An HTTP-level error occurred (including [`ApiError`] and
    /// [`EmptyBodyError`](crate::clients::EmptyBodyError)).
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The resource type is not listed in the API root document.
    #[error("Resource type '{resource_type}' is not listed in the API root")]
    UnknownResourceType {
        /// The type that was requested.
        resource_type: String,
    },

    /// The resource has no relationship with the given name.
    #[error("{resource_type} {id} has no relationship named '{name}'")]
    UnknownRelationship {
        /// Type of the resource.
        resource_type: String,
        /// Id of the resource.
        id: String,
        /// The relationship name that was requested.
        name: String,
    },

    /// The relationship does not carry the link needed for the operation.
    #[error("Relationship '{relationship}' has no {link} link")]
    MissingLink {
        /// The relationship name.
        relationship: String,
        /// Which link was missing (`"self"` or `"related"`).
        link: &'static str,
    },

    /// Several resources were added to a to-one relationship.
    #[error("Relationship '{relationship}' is to-one but {count} resources were added")]
    ToOneRelationship {
        /// The relationship name.
        relationship: String,
        /// How many resources the call tried to link.
        count: usize,
    },

    /// The server returned a different document shape than the operation
    /// expects.
    #[error("Expected a {expected} document but the server returned a {found} document")]
    UnexpectedDocument {
        /// The shape the operation expected.
        expected: &'static str,
        /// The shape the server returned.
        found: &'static str,
    },

    /// The body was valid JSON but not a valid JSON:API document.
    #[error("Malformed JSON:API document: {0}")]
    MalformedDocument(#[source] serde_json::Error),
}

impl ResourceError {
    /// Returns the [`ApiError`] if the server rejected the request.
    #[must_use]
    pub const fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Http(HttpError::Api(e)) => Some(e),
            _ => None,
        }
    }

    /// Returns the HTTP status code, if the error came from a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => e.status(),
            _ => None,
        }
    }

    /// Returns `true` if a success response carried no `data`.
    #[must_use]
    pub const fn is_empty_body(&self) -> bool {
        matches!(self, Self::Http(HttpError::EmptyBody(_)))
    }
}

impl From<ApiError> for ResourceError {
    fn from(error: ApiError) -> Self {
        Self::Http(HttpError::Api(error))
    }
}

// Verify ResourceError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceError>();
};
