//! # Flair API Rust Client
//!
//! A Rust client for the Flair smart-vent JSON:API service, providing
//! type-safe configuration, OAuth 2.0 client-credentials authentication, and
//! a resource model with lazy relationships and pagination.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`FlairConfig`] and [`FlairConfigBuilder`]
//! - Validated newtypes for credentials and the API root URL
//! - Client-credentials token exchange, performed once per client
//! - API root discovery mapping resource types to collection URLs
//! - [`Resource`]s with identity-based equality and in-place updates
//! - [`Relationship`]s fetched on demand, with add/update/delete of linkage
//! - [`Collection`]s that load further pages lazily
//! - A [`ResourceRegistry`] mapping resource types to constructors, seeded
//!   with the built-in [`schemas`]
//!
//! ## Quick Start
//!
//! ```rust
//! use flair_api::{ApiRootUrl, ClientId, ClientSecret, FlairConfig};
//!
//! let config = FlairConfig::builder()
//!     .client_id(ClientId::new("your-client-id").unwrap())
//!     .client_secret(ClientSecret::new("your-client-secret").unwrap())
//!     .api_root(ApiRootUrl::new("https://api.flair.co").unwrap())
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Working With Resources
//!
//! ```rust,ignore
//! use flair_api::{FlairClient, FlairConfig, RelationshipTarget};
//! use serde_json::{json, Map};
//! use std::collections::HashMap;
//!
//! let client = FlairClient::connect(FlairConfig::from_env()?).await?;
//!
//! // Collections
//! let mut structures = client.list("structures", None).await?;
//! let structure = &structures[0];
//!
//! // Relationships
//! let rooms = structure.get_rel("rooms", None).await?.into_collection()?;
//!
//! // Create
//! let mut attributes = Map::new();
//! attributes.insert("name".to_string(), json!("Den"));
//! let mut relationships = HashMap::new();
//! relationships.insert("structure".to_string(), RelationshipTarget::from(structure));
//! let room = client
//!     .create("rooms", attributes, relationships, None)
//!     .await?
//!     .into_resource()?;
//!
//! // Pagination
//! let mut cursor = structures.all();
//! while let Some(structure) = cursor.next().await? {
//!     println!("{}", structure.id());
//! }
//! ```
//!
//! ## Logging
//!
//! The crate logs through [`tracing`]: each request at `debug`, token
//! acquisition and API root discovery at `info`, and use of an expired token
//! at `warn`. No subscriber is installed.
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Thread-safe**: All types are `Send + Sync`
//! - **Async-first**: Designed for use with Tokio async runtime
//! - **No hidden retries**: Every operation is one request and one response

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod jsonapi;
pub mod schemas;

// Re-export public types at crate root for convenience
pub use auth::AccessToken;
pub use config::{ApiRootUrl, ClientId, ClientSecret, FlairConfig, FlairConfigBuilder};
pub use error::ConfigError;

// Re-export client types
pub use clients::{
    ApiError, ApiRoot, DataType, EmptyBodyError, FlairClient, HttpClient, HttpError, HttpMethod,
    HttpRequest, HttpRequestBuilder, HttpResponse, InvalidHttpRequestError,
};

// Re-export resource model types
pub use jsonapi::{
    AllResources, ApiResponse, Collection, Linkage, Relationship, RelationshipSchema,
    RelationshipTarget, Resource, ResourceError, ResourceIdentifier, ResourceRegistry,
    ResourceSchema,
};
