//! HTTP request types for the Flair API client.
//!
//! This module provides the [`HttpRequest`] type and its builder.

use std::collections::HashMap;
use std::fmt;

use crate::clients::errors::InvalidHttpRequestError;

/// HTTP methods used by the JSON:API endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// Fetch a resource, collection, or relationship.
    Get,
    /// Create a resource or add relationship members.
    Post,
    /// Partially update a resource or replace a relationship.
    Patch,
    /// Delete a resource or remove relationship members.
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Post => write!(f, "post"),
            Self::Patch => write!(f, "patch"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Content type for HTTP request bodies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataType {
    /// JSON:API media type (`application/vnd.api+json`).
    JsonApi,
    /// Plain JSON (`application/json`), accepted by older API deployments.
    Json,
    /// URL-encoded form fields, used by the token endpoint.
    Form,
}

impl DataType {
    /// Returns the MIME type string for this data type.
    #[must_use]
    pub const fn as_content_type(&self) -> &'static str {
        match self {
            Self::JsonApi => "application/vnd.api+json",
            Self::Json => "application/json",
            Self::Form => "application/x-www-form-urlencoded",
        }
    }
}

/// An HTTP request to be sent to the API.
///
/// `path` is either an absolute URL (links returned by the server) or a path
/// resolved against the configured API root.
///
/// # Example
///
/// ```rust
/// use flair_api::clients::{HttpRequest, HttpMethod, DataType};
/// use serde_json::json;
///
/// let get_request = HttpRequest::builder(HttpMethod::Get, "/api/structures")
///     .build()
///     .unwrap();
///
/// let patch_request = HttpRequest::builder(HttpMethod::Patch, "/api/structures/1")
///     .body(json!({"data": {"type": "structures", "id": "1", "attributes": {"name": "Cabin"}}}))
///     .body_type(DataType::JsonApi)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// The URL or root-relative path for this request.
    pub path: String,
    /// The request body, if any.
    pub body: Option<serde_json::Value>,
    /// The content type of the body.
    pub body_type: Option<DataType>,
    /// Query parameters to append to the URL.
    pub query: Option<HashMap<String, String>>,
    /// Additional headers to include in the request.
    pub extra_headers: Option<HashMap<String, String>>,
    /// Bearer token to send in the `Authorization` header.
    pub bearer_token: Option<String>,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, path)
    }

    /// Validates the request, ensuring it meets all requirements.
    ///
    /// DELETE may carry a body (relationship removal does), but does not
    /// require one.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if:
    /// - `body` is `Some` but `body_type` is `None`
    /// - `http_method` is `Post` or `Patch` but `body` is `None`
    /// - `body_type` is `Form` but the body is not an object of strings
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        if self.body.is_some() && self.body_type.is_none() {
            return Err(InvalidHttpRequestError::MissingBodyType);
        }

        if matches!(self.http_method, HttpMethod::Post | HttpMethod::Patch) && self.body.is_none()
        {
            return Err(InvalidHttpRequestError::MissingBody {
                method: self.http_method.to_string(),
            });
        }

        if self.body_type == Some(DataType::Form) {
            let flat = self
                .body
                .as_ref()
                .and_then(serde_json::Value::as_object)
                .is_some_and(|fields| fields.values().all(serde_json::Value::is_string));
            if !flat {
                return Err(InvalidHttpRequestError::UnencodableBody { body_type: "form" });
            }
        }

        Ok(())
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    path: String,
    body: Option<serde_json::Value>,
    body_type: Option<DataType>,
    query: Option<HashMap<String, String>>,
    extra_headers: Option<HashMap<String, String>>,
    bearer_token: Option<String>,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            http_method: method,
            path: path.into(),
            body: None,
            body_type: None,
            query: None,
            extra_headers: None,
            bearer_token: None,
        }
    }

    /// Sets the request body.
    ///
    /// When setting a body, you must also set the body type via [`body_type`](Self::body_type).
    #[must_use]
    pub fn body(mut self, body: impl Into<serde_json::Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the content type of the request body.
    #[must_use]
    pub const fn body_type(mut self, body_type: DataType) -> Self {
        self.body_type = Some(body_type);
        self
    }

    /// Sets all query parameters at once.
    #[must_use]
    pub fn query(mut self, query: HashMap<String, String>) -> Self {
        self.query = Some(query);
        self
    }

    /// Adds a single query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Adds a single extra header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Sets the bearer token for the `Authorization` header.
    #[must_use]
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Builds the [`HttpRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the request fails validation.
    pub fn build(self) -> Result<HttpRequest, InvalidHttpRequestError> {
        let request = HttpRequest {
            http_method: self.http_method,
            path: self.path,
            body: self.body,
            body_type: self.body_type,
            query: self.query,
            extra_headers: self.extra_headers,
            bearer_token: self.bearer_token,
        };
        request.verify()?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "get");
        assert_eq!(HttpMethod::Post.to_string(), "post");
        assert_eq!(HttpMethod::Patch.to_string(), "patch");
        assert_eq!(HttpMethod::Delete.to_string(), "delete");
    }

    #[test]
    fn test_data_type_content_type() {
        assert_eq!(DataType::JsonApi.as_content_type(), "application/vnd.api+json");
        assert_eq!(DataType::Json.as_content_type(), "application/json");
        assert_eq!(
            DataType::Form.as_content_type(),
            "application/x-www-form-urlencoded"
        );
    }

    #[test]
    fn test_builder_creates_valid_get_request() {
        let request = HttpRequest::builder(HttpMethod::Get, "/api/structures")
            .bearer_token("token")
            .build()
            .unwrap();

        assert_eq!(request.http_method, HttpMethod::Get);
        assert_eq!(request.path, "/api/structures");
        assert!(request.body.is_none());
        assert_eq!(request.bearer_token.as_deref(), Some("token"));
    }

    #[test]
    fn test_verify_requires_body_for_post_and_patch() {
        let result = HttpRequest::builder(HttpMethod::Post, "/api/structures").build();
        assert!(matches!(
            result,
            Err(InvalidHttpRequestError::MissingBody { method }) if method == "post"
        ));

        let result = HttpRequest::builder(HttpMethod::Patch, "/api/structures/1").build();
        assert!(matches!(
            result,
            Err(InvalidHttpRequestError::MissingBody { method }) if method == "patch"
        ));
    }

    #[test]
    fn test_delete_allows_optional_body() {
        assert!(HttpRequest::builder(HttpMethod::Delete, "/api/structures/1")
            .build()
            .is_ok());

        assert!(
            HttpRequest::builder(HttpMethod::Delete, "/api/structures/1/relationships/rooms")
                .body(json!({"data": [{"id": "1", "type": "rooms"}]}))
                .body_type(DataType::JsonApi)
                .build()
                .is_ok()
        );
    }

    #[test]
    fn test_verify_requires_body_type_when_body_present() {
        let result = HttpRequest::builder(HttpMethod::Get, "/api/")
            .body(json!({"key": "value"}))
            .build();

        assert!(matches!(result, Err(InvalidHttpRequestError::MissingBodyType)));
    }

    #[test]
    fn test_form_body_must_be_flat_strings() {
        assert!(HttpRequest::builder(HttpMethod::Post, "/oauth/token")
            .body(json!({"grant_type": "client_credentials"}))
            .body_type(DataType::Form)
            .build()
            .is_ok());

        let result = HttpRequest::builder(HttpMethod::Post, "/oauth/token")
            .body(json!({"nested": {"a": 1}}))
            .body_type(DataType::Form)
            .build();
        assert!(matches!(
            result,
            Err(InvalidHttpRequestError::UnencodableBody { .. })
        ));
    }

    #[test]
    fn test_builder_with_query_params_and_headers() {
        let request = HttpRequest::builder(HttpMethod::Get, "/api/rooms")
            .query_param("page[size]", "50")
            .header("X-Request-Source", "tests")
            .build()
            .unwrap();

        let query = request.query.unwrap();
        assert_eq!(query.get("page[size]"), Some(&"50".to_string()));
        let headers = request.extra_headers.unwrap();
        assert_eq!(headers.get("X-Request-Source"), Some(&"tests".to_string()));
    }
}
