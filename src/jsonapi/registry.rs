//! Resource-type registry.
//!
//! The registry maps a JSON:API type string to the constructor that turns a
//! wire [`ResourceObject`] into a [`Resource`]. Types without an entry are
//! built with [`Resource::from_object`], the generic variant.
//!
//! The usual entries come from [`ResourceSchema`] declarations: a schema
//! names the relationships a type has and whether each is to-one or to-many,
//! so a relationship the server sent without `data` still gets the right
//! linkage shape.
//!
//! ```rust
//! use flair_api::{ResourceRegistry, schemas};
//!
//! let registry = ResourceRegistry::with_flair_schemas();
//! assert!(registry.contains("structures"));
//! assert!(!registry.contains("garages"));
//! assert!(schemas::STRUCTURES.relationship("rooms").unwrap().many);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::clients::FlairClient;
use crate::jsonapi::document::ResourceObject;
use crate::jsonapi::resource::Resource;

/// A function that builds a [`Resource`] from its wire form.
pub type ResourceConstructor = Arc<dyn Fn(FlairClient, ResourceObject) -> Resource + Send + Sync>;

/// Declaration of one relationship of a resource type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RelationshipSchema {
    /// Relationship name as it appears on the wire.
    pub name: &'static str,
    /// Type of the related resource(s).
    pub target: &'static str,
    /// `true` for to-many relationships.
    pub many: bool,
}

impl RelationshipSchema {
    /// Declares a to-one relationship.
    #[must_use]
    pub const fn one(name: &'static str, target: &'static str) -> Self {
        Self {
            name,
            target,
            many: false,
        }
    }

    /// Declares a to-many relationship.
    #[must_use]
    pub const fn many(name: &'static str, target: &'static str) -> Self {
        Self {
            name,
            target,
            many: true,
        }
    }
}

/// Declaration of a resource type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceSchema {
    /// The JSON:API type string.
    pub resource_type: &'static str,
    /// Declared relationships.
    pub relationships: &'static [RelationshipSchema],
}

impl ResourceSchema {
    /// Looks up a relationship declaration by name.
    #[must_use]
    pub fn relationship(&self, name: &str) -> Option<&RelationshipSchema> {
        self.relationships.iter().find(|r| r.name == name)
    }
}

/// Mapping from resource type to constructor.
#[derive(Clone, Default)]
pub struct ResourceRegistry {
    constructors: HashMap<String, ResourceConstructor>,
}

impl ResourceRegistry {
    /// Creates an empty registry; every type uses the generic constructor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with every built-in Flair schema registered.
    #[must_use]
    pub fn with_flair_schemas() -> Self {
        let mut registry = Self::new();
        for schema in crate::schemas::ALL {
            registry.register_schema(schema);
        }
        registry
    }

    /// Registers a custom constructor for `resource_type`, replacing any
    /// existing entry.
    pub fn register<F>(&mut self, resource_type: impl Into<String>, constructor: F)
    where
        F: Fn(FlairClient, ResourceObject) -> Resource + Send + Sync + 'static,
    {
        self.constructors
            .insert(resource_type.into(), Arc::new(constructor));
    }

    /// Registers a schema-aware constructor for the schema's type.
    pub fn register_schema(&mut self, schema: &'static ResourceSchema) {
        self.register(schema.resource_type, move |client, object| {
            Resource::with_schema(client, object, schema)
        });
    }

    /// Returns `true` if `resource_type` has a registered constructor.
    #[must_use]
    pub fn contains(&self, resource_type: &str) -> bool {
        self.constructors.contains_key(resource_type)
    }

    /// Builds a resource with the registered constructor, falling back to
    /// the generic one.
    #[must_use]
    pub fn build(&self, client: &FlairClient, object: ResourceObject) -> Resource {
        match self.constructors.get(&object.resource_type) {
            Some(constructor) => constructor(client.clone(), object),
            None => Resource::from_object(client.clone(), object),
        }
    }
}

impl fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        types.sort_unstable();
        f.debug_struct("ResourceRegistry")
            .field("types", &types)
            .finish()
    }
}
