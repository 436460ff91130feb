//! Interpreted API responses.

use crate::jsonapi::collection::Collection;
use crate::jsonapi::errors::ResourceError;
use crate::jsonapi::resource::Resource;

/// What a successful request returned.
///
/// Error statuses and empty `data` members never reach this type; they are
/// reported as [`ApiError`](crate::ApiError) and
/// [`EmptyBodyError`](crate::EmptyBodyError).
#[derive(Clone, Debug)]
pub enum ApiResponse {
    /// A single resource (`data` was an object).
    Resource(Resource),
    /// A page of resources (`data` was a list, possibly empty).
    Collection(Collection),
    /// No body (204 No Content and friends).
    Empty,
}

impl ApiResponse {
    /// Short description used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Resource(_) => "resource",
            Self::Collection(_) => "collection",
            Self::Empty => "empty",
        }
    }

    /// Returns `true` for [`ApiResponse::Empty`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Unwraps a single resource.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedDocument`] for any other shape.
    pub fn into_resource(self) -> Result<Resource, ResourceError> {
        match self {
            Self::Resource(resource) => Ok(resource),
            other => Err(other.unexpected("resource")),
        }
    }

    /// Unwraps a collection.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedDocument`] for any other shape.
    pub fn into_collection(self) -> Result<Collection, ResourceError> {
        match self {
            Self::Collection(collection) => Ok(collection),
            other => Err(other.unexpected("collection")),
        }
    }

    fn unexpected(&self, expected: &'static str) -> ResourceError {
        tracing::warn!(
            expected,
            found = self.kind(),
            "Flair API returned an unexpected document shape"
        );
        ResourceError::UnexpectedDocument {
            expected,
            found: self.kind(),
        }
    }
}
