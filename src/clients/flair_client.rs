//! Flair API client.
//!
//! This module provides [`FlairClient`], the entry point of the crate. It
//! owns the transport, acquires the bearer token, discovers the API root,
//! and turns responses into [`Resource`]s and [`Collection`]s.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::OnceCell;

use crate::auth::{exchange_client_credentials, AccessToken};
use crate::clients::errors::{EmptyBodyError, HttpError};
use crate::clients::http_client::HttpClient;
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::FlairConfig;
use crate::jsonapi::document::{resource_document, Document, PrimaryData, RelationshipTarget};
use crate::jsonapi::{ApiResponse, Collection, Resource, ResourceError, ResourceRegistry};

/// Path of the API root document.
pub const API_ROOT_PATH: &str = "/api/";

/// The API root document: resource type to collection URL.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApiRoot {
    links: HashMap<String, String>,
}

impl ApiRoot {
    /// Parses the `links` member of an API root response.
    ///
    /// Each entry may be `{ "self": url }` or a bare URL string. Entries of
    /// any other shape are skipped.
    #[must_use]
    pub fn from_value(body: &Value) -> Self {
        let links = body
            .get("links")
            .and_then(Value::as_object)
            .map(|links| {
                links
                    .iter()
                    .filter_map(|(resource_type, link)| {
                        let href = match link {
                            Value::String(href) => Some(href.as_str()),
                            Value::Object(link) => link.get("self").and_then(Value::as_str),
                            _ => None,
                        }?;
                        Some((resource_type.clone(), href.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self { links }
    }

    /// Returns the collection URL for a resource type.
    #[must_use]
    pub fn collection_url(&self, resource_type: &str) -> Option<&str> {
        self.links.get(resource_type).map(String::as_str)
    }

    /// Returns every resource type the API root lists, sorted.
    #[must_use]
    pub fn resource_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.links.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}

struct Inner {
    config: FlairConfig,
    http: HttpClient,
    registry: ResourceRegistry,
    token: OnceCell<AccessToken>,
    api_root: OnceCell<ApiRoot>,
}

/// Client for the Flair JSON:API service.
///
/// The client is cheap to clone; clones share the token and the API root.
/// Both are fetched on first use and kept for the client's lifetime. The
/// token is never refreshed: once [`AccessToken::expired`] reports `true`
/// (a warning is logged on every use after that point) or a request fails
/// with 401, build a new client.
///
/// # Thread Safety
///
/// `FlairClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use flair_api::{FlairClient, FlairConfig};
///
/// let client = FlairClient::connect(FlairConfig::from_env()?).await?;
///
/// let structures = client.list("structures", None).await?;
/// for structure in structures.iter() {
///     println!("{:?}", structure.attribute("name"));
/// }
/// ```
#[derive(Clone)]
pub struct FlairClient {
    inner: Arc<Inner>,
}

// Verify FlairClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<FlairClient>();
};

impl FlairClient {
    /// Creates a client with the built-in Flair schemas.
    ///
    /// No request is made until the first operation.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the HTTP client cannot be created.
    pub fn new(config: FlairConfig) -> Result<Self, HttpError> {
        Self::with_registry(config, ResourceRegistry::with_flair_schemas())
    }

    /// Creates a client with a custom resource registry.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the HTTP client cannot be created.
    pub fn with_registry(
        config: FlairConfig,
        registry: ResourceRegistry,
    ) -> Result<Self, HttpError> {
        let http = HttpClient::new(&config)?;
        Ok(Self {
            inner: Arc::new(Inner {
                config,
                http,
                registry,
                token: OnceCell::new(),
                api_root: OnceCell::new(),
            }),
        })
    }

    /// Creates a client and immediately fetches the token and the API root.
    ///
    /// # Errors
    ///
    /// Returns the first error from the token exchange or root discovery,
    /// e.g. an [`ApiError`](crate::ApiError) with status 401 for rejected
    /// credentials.
    pub async fn connect(config: FlairConfig) -> Result<Self, ResourceError> {
        let client = Self::new(config)?;
        client.token().await?;
        client.api_root().await?;
        Ok(client)
    }

    /// Returns the configuration this client was built with.
    #[must_use]
    pub fn config(&self) -> &FlairConfig {
        &self.inner.config
    }

    /// Returns the resource registry.
    #[must_use]
    pub fn registry(&self) -> &ResourceRegistry {
        &self.inner.registry
    }

    /// Returns the bearer token, exchanging credentials on first use.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Api`] if the token endpoint rejects the
    /// credentials, or [`HttpError::Json`] if its response has no token.
    pub async fn token(&self) -> Result<&AccessToken, HttpError> {
        let token = self
            .inner
            .token
            .get_or_try_init(|| exchange_client_credentials(&self.inner.http, &self.inner.config))
            .await?;

        if token.expired() {
            tracing::warn!(
                expires = ?token.expires(),
                "Using an expired Flair access token; build a new client to re-authenticate"
            );
        }
        Ok(token)
    }

    /// Returns the API root, fetching it on first use.
    ///
    /// # Errors
    ///
    /// Returns any transport error from `GET /api/`.
    pub async fn api_root(&self) -> Result<&ApiRoot, HttpError> {
        self.inner
            .api_root
            .get_or_try_init(|| async {
                let request = HttpRequest::builder(HttpMethod::Get, API_ROOT_PATH).build()?;
                let response = self.inner.http.request(request).await?;
                let root = ApiRoot::from_value(&response.body);
                if root.links.is_empty() {
                    tracing::warn!("Flair API root listed no resource types");
                } else {
                    tracing::info!(
                        resource_types = root.links.len(),
                        "Discovered Flair API root"
                    );
                }
                Ok::<_, HttpError>(root)
            })
            .await
    }

    /// Builds the URL of a collection, or of one resource when `id` is given.
    ///
    /// The id is percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnknownResourceType`] if the API root does
    /// not list `resource_type`.
    pub async fn resource_url(
        &self,
        resource_type: &str,
        id: Option<&str>,
    ) -> Result<String, ResourceError> {
        let collection = self
            .api_root()
            .await?
            .collection_url(resource_type)
            .ok_or_else(|| ResourceError::UnknownResourceType {
                resource_type: resource_type.to_string(),
            })?;

        Ok(match id {
            Some(id) => format!(
                "{}/{}",
                collection.trim_end_matches('/'),
                urlencoding::encode(id)
            ),
            None => collection.to_string(),
        })
    }

    /// Fetches a collection, or a single resource when `id` is given.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] for an unknown type, a transport failure,
    /// an error status ([`ApiError`](crate::ApiError)), or a success with no
    /// data ([`EmptyBodyError`]).
    pub async fn get(
        &self,
        resource_type: &str,
        id: Option<&str>,
        params: Option<HashMap<String, String>>,
    ) -> Result<ApiResponse, ResourceError> {
        let url = self.prepare(resource_type, id).await?;
        let response = self.send(HttpMethod::Get, &url, None, params).await?;
        self.handle_response(response, Some(resource_type))
    }

    /// Fetches one resource by id.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get), plus
    /// [`ResourceError::UnexpectedDocument`] if the server does not return a
    /// single resource.
    pub async fn find(&self, resource_type: &str, id: &str) -> Result<Resource, ResourceError> {
        self.get(resource_type, Some(id), None)
            .await?
            .into_resource()
    }

    /// Fetches the first page of a collection.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get), plus
    /// [`ResourceError::UnexpectedDocument`] if the server does not return a
    /// collection.
    pub async fn list(
        &self,
        resource_type: &str,
        params: Option<HashMap<String, String>>,
    ) -> Result<Collection, ResourceError> {
        self.get(resource_type, None, params)
            .await?
            .into_collection()
    }

    /// Creates a resource.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    pub async fn create(
        &self,
        resource_type: &str,
        attributes: Map<String, Value>,
        relationships: HashMap<String, RelationshipTarget>,
        params: Option<HashMap<String, String>>,
    ) -> Result<ApiResponse, ResourceError> {
        let url = self.prepare(resource_type, None).await?;
        let body = resource_document(resource_type, None, attributes, relationships);
        let response = self
            .send(HttpMethod::Post, &url, Some(body), params)
            .await?;
        self.handle_response(response, Some(resource_type))
    }

    /// Updates a resource with a PATCH.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    pub async fn update(
        &self,
        resource_type: &str,
        id: &str,
        attributes: Map<String, Value>,
        relationships: HashMap<String, RelationshipTarget>,
    ) -> Result<ApiResponse, ResourceError> {
        let url = self.prepare(resource_type, Some(id)).await?;
        let body = resource_document(resource_type, Some(id), attributes, relationships);
        let response = self
            .send(HttpMethod::Patch, &url, Some(body), None)
            .await?;
        self.handle_response(response, Some(resource_type))
    }

    /// Deletes a resource.
    ///
    /// Any success status counts: a body without `data`, such as a
    /// meta-only document, gives [`ApiResponse::Empty`].
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get), except that a missing `data` is not an
    /// error.
    pub async fn delete(&self, resource_type: &str, id: &str) -> Result<ApiResponse, ResourceError> {
        let url = self.prepare(resource_type, Some(id)).await?;
        let response = self.send(HttpMethod::Delete, &url, None, None).await?;
        self.handle_delete_response(response, Some(resource_type))
    }

    /// GETs a server-provided link (relationship or pagination).
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get), without the type lookup.
    pub async fn get_url(
        &self,
        url: &str,
        params: Option<HashMap<String, String>>,
    ) -> Result<ApiResponse, ResourceError> {
        let response = self.send(HttpMethod::Get, url, None, params).await?;
        self.handle_response(response, None)
    }

    /// POSTs a JSON:API body to a server-provided link.
    ///
    /// # Errors
    ///
    /// Same as [`get_url`](Self::get_url).
    pub async fn post_url(&self, url: &str, body: Value) -> Result<ApiResponse, ResourceError> {
        let response = self.send(HttpMethod::Post, url, Some(body), None).await?;
        self.handle_response(response, None)
    }

    /// PATCHes a JSON:API body to a server-provided link.
    ///
    /// # Errors
    ///
    /// Same as [`get_url`](Self::get_url).
    pub async fn patch_url(&self, url: &str, body: Value) -> Result<ApiResponse, ResourceError> {
        let response = self.send(HttpMethod::Patch, url, Some(body), None).await?;
        self.handle_response(response, None)
    }

    /// DELETEs a server-provided link, optionally with a body.
    ///
    /// # Errors
    ///
    /// Same as [`delete`](Self::delete), without the type lookup.
    pub async fn delete_url(
        &self,
        url: &str,
        body: Option<Value>,
    ) -> Result<ApiResponse, ResourceError> {
        let response = self.send(HttpMethod::Delete, url, body, None).await?;
        self.handle_delete_response(response, None)
    }

    /// Authenticates, then resolves the target URL.
    async fn prepare(&self, resource_type: &str, id: Option<&str>) -> Result<String, ResourceError> {
        self.token().await?;
        self.resource_url(resource_type, id).await
    }

    /// Sends one authenticated request and returns the raw response.
    pub(crate) async fn send(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<Value>,
        params: Option<HashMap<String, String>>,
    ) -> Result<HttpResponse, HttpError> {
        let token = self.token().await?;

        let mut builder = HttpRequest::builder(method, url).bearer_token(token.secret());
        if let Some(body) = body {
            builder = builder
                .body(body)
                .body_type(self.inner.config.data_type());
        }
        if let Some(params) = params {
            builder = builder.query(params);
        }

        self.inner.http.request(builder.build()?).await
    }

    /// A DELETE without `data` in its body succeeded with nothing to return.
    fn handle_delete_response(
        &self,
        response: HttpResponse,
        resource_type: Option<&str>,
    ) -> Result<ApiResponse, ResourceError> {
        let has_data = response.body.get("data").is_some_and(|data| {
            !(data.is_null() || data.as_object().is_some_and(Map::is_empty))
        });
        if !has_data {
            return Ok(ApiResponse::Empty);
        }
        self.handle_response(response, resource_type)
    }

    /// Interprets a success response.
    ///
    /// | Body | Result |
    /// |------|--------|
    /// | empty | [`ApiResponse::Empty`] |
    /// | `data` is a list | [`ApiResponse::Collection`] |
    /// | `data` is an object | [`ApiResponse::Resource`] |
    /// | `data` is absent, `null`, or `{}` | [`EmptyBodyError`] |
    fn handle_response(
        &self,
        response: HttpResponse,
        resource_type: Option<&str>,
    ) -> Result<ApiResponse, ResourceError> {
        if response.is_empty() {
            return Ok(ApiResponse::Empty);
        }

        let code = response.code;
        let document =
            Document::from_value(response.body).map_err(ResourceError::MalformedDocument)?;

        match document.data {
            PrimaryData::One(object) => Ok(ApiResponse::Resource(
                self.inner.registry.build(self, object),
            )),
            PrimaryData::Many(objects) => {
                let resources = objects
                    .into_iter()
                    .map(|object| self.inner.registry.build(self, object))
                    .collect();
                Ok(ApiResponse::Collection(Collection::new(
                    self.clone(),
                    resource_type.map(str::to_string),
                    resources,
                    document.meta,
                    document.links,
                )))
            }
            PrimaryData::Empty => Err(HttpError::from(EmptyBodyError { status: code }).into()),
        }
    }
}

impl fmt::Debug for FlairClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlairClient")
            .field("api_root", &self.inner.config.api_root())
            .field("client_id", &self.inner.config.client_id())
            .field("authenticated", &self.inner.token.initialized())
            .field("registry", &self.inner.registry)
            .finish_non_exhaustive()
    }
}
