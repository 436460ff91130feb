//! The in-memory resource model.
//!
//! A [`Resource`] is one JSON:API resource object bound to the client that
//! fetched it. Its identity is the `(type, id)` pair: two resources with the
//! same type and id compare equal and hash alike regardless of their
//! attributes.
//!
//! Mutating operations ([`Resource::update`], [`Resource::get_self`])
//! replace attributes and relationships wholesale with what the server
//! returned. There is no partial merge of server state.
//!
//! # Example
//!
//! ```rust,ignore
//! use flair_api::{FlairClient, FlairConfig};
//! use serde_json::{json, Map};
//! use std::collections::HashMap;
//!
//! let client = FlairClient::new(FlairConfig::from_env()?)?;
//! let mut structure = client.find("structures", "1").await?;
//!
//! let mut attributes = Map::new();
//! attributes.insert("name".to_string(), json!("Better Name"));
//! structure.update(attributes, HashMap::new()).await?;
//!
//! let rooms = structure.get_rel("rooms", None).await?.into_collection()?;
//! println!("{} rooms", rooms.len());
//! ```

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use serde_json::{Map, Value};

use crate::clients::FlairClient;
use crate::jsonapi::document::{
    Linkage, RelationshipLinks, RelationshipTarget, ResourceIdentifier, ResourceObject,
};
use crate::jsonapi::errors::ResourceError;
use crate::jsonapi::registry::ResourceSchema;
use crate::jsonapi::relationship::Relationship;
use crate::jsonapi::response::ApiResponse;

/// A JSON:API resource bound to a client.
#[derive(Clone, Debug)]
pub struct Resource {
    client: FlairClient,
    id: String,
    resource_type: String,
    attributes: Map<String, Value>,
    relationships: HashMap<String, Relationship>,
    deleted: bool,
    schema: Option<&'static ResourceSchema>,
}

impl Resource {
    /// Builds a resource from its wire form with no schema.
    ///
    /// Relationships sent without `data` get an empty to-one linkage.
    #[must_use]
    pub fn from_object(client: FlairClient, object: ResourceObject) -> Self {
        Self::build(client, object, None)
    }

    /// Builds a resource from its wire form, tagged with `schema`.
    ///
    /// Every relationship the schema declares is present on the result, and
    /// relationships sent without `data` get the declared cardinality.
    #[must_use]
    pub fn with_schema(
        client: FlairClient,
        object: ResourceObject,
        schema: &'static ResourceSchema,
    ) -> Self {
        Self::build(client, object, Some(schema))
    }

    fn build(
        client: FlairClient,
        object: ResourceObject,
        schema: Option<&'static ResourceSchema>,
    ) -> Self {
        let default_linkage = |name: &str| match schema.and_then(|s| s.relationship(name)) {
            Some(declared) if declared.many => Linkage::Many(Vec::new()),
            _ => Linkage::One(None),
        };

        let mut relationships: HashMap<String, Relationship> = object
            .relationships
            .into_iter()
            .map(|(name, wire)| {
                let data = wire.data.unwrap_or_else(|| default_linkage(&name));
                let relationship = Relationship::new(client.clone(), name.clone(), wire.links, data);
                (name, relationship)
            })
            .collect();

        if let Some(schema) = schema {
            for declared in schema.relationships {
                relationships
                    .entry(declared.name.to_string())
                    .or_insert_with(|| {
                        Relationship::new(
                            client.clone(),
                            declared.name,
                            RelationshipLinks::default(),
                            default_linkage(declared.name),
                        )
                    });
            }
        }

        Self {
            client,
            id: object.id,
            resource_type: object.resource_type,
            attributes: object.attributes,
            relationships,
            deleted: false,
            schema,
        }
    }

    /// Returns the resource id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the resource type.
    #[must_use]
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Returns all attributes.
    #[must_use]
    pub const fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Returns one attribute value.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Returns all relationships, keyed by name.
    #[must_use]
    pub const fn relationships(&self) -> &HashMap<String, Relationship> {
        &self.relationships
    }

    /// Returns one relationship.
    #[must_use]
    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships.get(name)
    }

    /// Returns one relationship mutably, for linkage changes.
    pub fn relationship_mut(&mut self, name: &str) -> Option<&mut Relationship> {
        self.relationships.get_mut(name)
    }

    /// Returns `true` once [`delete`](Self::delete) has succeeded.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Returns the schema this resource was built with, if any.
    #[must_use]
    pub const fn schema(&self) -> Option<&'static ResourceSchema> {
        self.schema
    }

    /// Returns the client this resource is bound to.
    #[must_use]
    pub const fn client(&self) -> &FlairClient {
        &self.client
    }

    /// Returns the `{id, type}` reference to this resource.
    #[must_use]
    pub fn to_identifier(&self) -> ResourceIdentifier {
        ResourceIdentifier::new(&self.resource_type, &self.id)
    }

    /// Refetches this resource and replaces its state with the server's.
    ///
    /// # Errors
    ///
    /// Returns any error from the request, or
    /// [`ResourceError::UnexpectedDocument`] if the server did not return a
    /// single resource.
    pub async fn get_self(&mut self) -> Result<&mut Self, ResourceError> {
        let fresh = self.client.find(&self.resource_type, &self.id).await?;
        self.replace_state(fresh);
        Ok(self)
    }

    /// Fetches the resources behind a relationship's `related` link.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnknownRelationship`] if the resource has no
    /// relationship called `name`, plus any error from
    /// [`Relationship::get`].
    pub async fn get_rel(
        &self,
        name: &str,
        params: Option<HashMap<String, String>>,
    ) -> Result<ApiResponse, ResourceError> {
        self.relationship(name)
            .ok_or_else(|| self.unknown_relationship(name))?
            .get(params)
            .await
    }

    /// Sends a PATCH with the given attributes and relationships.
    ///
    /// When the server echoes the resource, local state is replaced with the
    /// echo. A 204 response means the server applied exactly what was sent,
    /// so the changes are applied locally instead.
    ///
    /// # Errors
    ///
    /// Returns any error from the request. Local state is unchanged on
    /// error.
    pub async fn update(
        &mut self,
        attributes: Map<String, Value>,
        relationships: HashMap<String, RelationshipTarget>,
    ) -> Result<&mut Self, ResourceError> {
        let response = self
            .client
            .update(
                &self.resource_type,
                &self.id,
                attributes.clone(),
                relationships.clone(),
            )
            .await?;

        match response {
            ApiResponse::Resource(fresh) => self.replace_state(fresh),
            ApiResponse::Empty => self.apply_locally(attributes, relationships),
            other => {
                return Err(ResourceError::UnexpectedDocument {
                    expected: "resource",
                    found: other.kind(),
                })
            }
        }
        Ok(self)
    }

    /// Deletes the resource on the server and marks it deleted.
    ///
    /// A 404 or 410 means the resource is already gone; it is marked deleted
    /// and the call succeeds.
    ///
    /// # Errors
    ///
    /// Returns any other error from the request.
    pub async fn delete(&mut self) -> Result<(), ResourceError> {
        match self.client.delete(&self.resource_type, &self.id).await {
            Ok(_) => {}
            Err(e) if matches!(e.status(), Some(404 | 410)) => {
                tracing::debug!(
                    resource_type = %self.resource_type,
                    id = %self.id,
                    "Resource was already gone on delete"
                );
            }
            Err(e) => return Err(e),
        }
        self.deleted = true;
        Ok(())
    }

    /// Links resources on several relationships, one request each.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnknownRelationship`] or
    /// [`ResourceError::ToOneRelationship`] before sending anything, then the
    /// first error from [`Relationship::add`].
    pub async fn add_rel(
        &mut self,
        relationships: HashMap<String, RelationshipTarget>,
    ) -> Result<&mut Self, ResourceError> {
        self.check_relationships(&relationships)?;
        for (name, target) in &relationships {
            if let RelationshipTarget::Many(ids) = target {
                let to_one = self.relationships.get(name).is_some_and(|r| !r.is_to_many());
                if to_one && ids.len() > 1 {
                    return Err(ResourceError::ToOneRelationship {
                        relationship: name.clone(),
                        count: ids.len(),
                    });
                }
            }
        }
        for (name, target) in relationships {
            if let Some(relationship) = self.relationships.get_mut(&name) {
                relationship.add(target).await?;
            }
        }
        Ok(self)
    }

    /// Replaces linkage on several relationships, one request each.
    ///
    /// # Errors
    ///
    /// Same as [`add_rel`](Self::add_rel), with [`Relationship::update`].
    pub async fn update_rel(
        &mut self,
        relationships: HashMap<String, RelationshipTarget>,
    ) -> Result<&mut Self, ResourceError> {
        self.check_relationships(&relationships)?;
        for (name, target) in relationships {
            if let Some(relationship) = self.relationships.get_mut(&name) {
                relationship.update(target).await?;
            }
        }
        Ok(self)
    }

    /// Unlinks resources on several relationships, one request each.
    ///
    /// # Errors
    ///
    /// Same as [`add_rel`](Self::add_rel), with [`Relationship::delete`].
    pub async fn delete_rel(
        &mut self,
        relationships: HashMap<String, RelationshipTarget>,
    ) -> Result<&mut Self, ResourceError> {
        self.check_relationships(&relationships)?;
        for (name, target) in relationships {
            if let Some(relationship) = self.relationships.get_mut(&name) {
                relationship.delete(target).await?;
            }
        }
        Ok(self)
    }

    fn replace_state(&mut self, fresh: Self) {
        self.attributes = fresh.attributes;
        self.relationships = fresh.relationships;
    }

    fn apply_locally(
        &mut self,
        attributes: Map<String, Value>,
        relationships: HashMap<String, RelationshipTarget>,
    ) {
        self.attributes.extend(attributes);
        for (name, target) in relationships {
            let linkage = target.into_linkage();
            match self.relationships.get_mut(&name) {
                Some(relationship) => relationship.set_data(linkage),
                None => {
                    let relationship = Relationship::new(
                        self.client.clone(),
                        name.clone(),
                        RelationshipLinks::default(),
                        linkage,
                    );
                    self.relationships.insert(name, relationship);
                }
            }
        }
    }

    fn check_relationships(
        &self,
        relationships: &HashMap<String, RelationshipTarget>,
    ) -> Result<(), ResourceError> {
        match relationships
            .keys()
            .find(|name| !self.relationships.contains_key(*name))
        {
            Some(name) => Err(self.unknown_relationship(name)),
            None => Ok(()),
        }
    }

    fn unknown_relationship(&self, name: &str) -> ResourceError {
        ResourceError::UnknownRelationship {
            resource_type: self.resource_type.clone(),
            id: self.id.clone(),
            name: name.to_string(),
        }
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.resource_type == other.resource_type && self.id == other.id
    }
}

impl Eq for Resource {}

impl Hash for Resource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.resource_type.hash(state);
        self.id.hash(state);
    }
}

impl From<&Resource> for ResourceIdentifier {
    fn from(resource: &Resource) -> Self {
        resource.to_identifier()
    }
}

impl From<&Resource> for RelationshipTarget {
    fn from(resource: &Resource) -> Self {
        Self::One(resource.to_identifier())
    }
}

impl From<Vec<&Resource>> for RelationshipTarget {
    fn from(resources: Vec<&Resource>) -> Self {
        Self::Many(resources.into_iter().map(Resource::to_identifier).collect())
    }
}

impl From<&[Resource]> for RelationshipTarget {
    fn from(resources: &[Resource]) -> Self {
        Self::Many(resources.iter().map(Resource::to_identifier).collect())
    }
}
