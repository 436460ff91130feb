//! HTTP client types for Flair API communication.
//!
//! This module provides the transport layer and the [`FlairClient`] built
//! on top of it.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`FlairClient`]: Token handling, API root discovery, and resource CRUD
//! - [`HttpClient`]: The async HTTP client underneath it
//! - [`HttpRequest`]: A request to be sent to the API
//! - [`HttpResponse`]: A decoded response from the API
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PATCH, DELETE)
//! - [`DataType`]: Content types for request bodies
//!
//! # Example
//!
//! ```rust,ignore
//! use flair_api::clients::{HttpClient, HttpMethod, HttpRequest};
//! use flair_api::FlairConfig;
//!
//! let config = FlairConfig::from_env()?;
//! let client = HttpClient::new(&config)?;
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "/api/")
//!     .build()
//!     .unwrap();
//!
//! let response = client.request(request).await?;
//! println!("{}", response.body["links"]);
//! ```
//!
//! # Error Behavior
//!
//! There are no automatic retries. Every status >= 400 becomes an
//! [`ApiError`] carrying the status and body; the configured timeout applies
//! to every request.

mod errors;
mod flair_client;
mod http_client;
mod http_request;
mod http_response;

pub use errors::{ApiError, EmptyBodyError, HttpError, InvalidHttpRequestError};
pub use flair_client::{ApiRoot, FlairClient, API_ROOT_PATH};
pub use http_client::{HttpClient, JSON_API_MEDIA_TYPE, SDK_VERSION};
pub use http_request::{DataType, HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::HttpResponse;
