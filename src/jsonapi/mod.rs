//! The JSON:API resource model.
//!
//! - [`document`]: serde wire types for the JSON:API envelope
//! - [`Resource`]: one resource with identity, attributes, and relationships
//! - [`Relationship`]: a named link to related resources, fetched on demand
//! - [`Collection`]: a paginated list of resources
//! - [`ResourceRegistry`]: maps resource types to their constructors
//! - [`ApiResponse`]: what a successful request returned
//! - [`ResourceError`]: errors from resource operations

pub mod collection;
pub mod document;
mod errors;
pub mod registry;
pub mod relationship;
pub mod resource;
mod response;

pub use collection::{AllResources, Collection};
pub use document::{Linkage, RelationshipTarget, ResourceIdentifier, ResourceObject};
pub use errors::ResourceError;
pub use registry::{RelationshipSchema, ResourceConstructor, ResourceRegistry, ResourceSchema};
pub use relationship::Relationship;
pub use resource::Resource;
pub use response::ApiResponse;
