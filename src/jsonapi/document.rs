//! JSON:API wire types.
//!
//! These types mirror the envelope the server speaks: a top-level
//! [`Document`] whose primary data is a single [`ResourceObject`], a list of
//! them, or nothing; relationships carrying [`RelationshipLinks`] and
//! [`Linkage`]; and the `{id, type}` [`ResourceIdentifier`].
//!
//! The write side of the protocol is [`RelationshipTarget`], which callers
//! use to name the resources a relationship should point at.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value};

/// A parsed JSON:API top-level document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    /// The primary data.
    pub data: PrimaryData,
    /// Top-level `meta` member.
    pub meta: Map<String, Value>,
    /// Top-level `links` member.
    pub links: Map<String, Value>,
}

impl Document {
    /// Parses a response body into a document.
    ///
    /// A `data` member that is absent, `null`, or an empty object is
    /// [`PrimaryData::Empty`].
    ///
    /// # Errors
    ///
    /// Returns the deserialization error if a resource object is malformed.
    pub fn from_value(body: Value) -> Result<Self, serde_json::Error> {
        let Value::Object(mut body) = body else {
            return Ok(Self::default());
        };

        let data = match body.remove("data") {
            None | Some(Value::Null) => PrimaryData::Empty,
            Some(Value::Object(object)) if object.is_empty() => PrimaryData::Empty,
            Some(Value::Array(items)) => PrimaryData::Many(
                items
                    .into_iter()
                    .map(serde_json::from_value)
                    .collect::<Result<_, _>>()?,
            ),
            Some(other) => PrimaryData::One(serde_json::from_value(other)?),
        };

        Ok(Self {
            data,
            meta: take_object(&mut body, "meta"),
            links: take_object(&mut body, "links"),
        })
    }
}

fn take_object(body: &mut Map<String, Value>, key: &str) -> Map<String, Value> {
    match body.remove(key) {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// The `data` member of a document.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum PrimaryData {
    /// No data: absent, `null`, or `{}`.
    #[default]
    Empty,
    /// A single resource object.
    One(ResourceObject),
    /// A list of resource objects, possibly empty.
    Many(Vec<ResourceObject>),
}

impl PrimaryData {
    /// Short description used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::One(_) => "resource",
            Self::Many(_) => "collection",
        }
    }
}

/// A resource object as it appears on the wire.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ResourceObject {
    /// The resource id.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// The resource type.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Attribute values.
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: Map<String, Value>,
    /// Relationships, keyed by name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub relationships: HashMap<String, RelationshipObject>,
}

/// A relationship as it appears on the wire.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RelationshipObject {
    /// The relationship's `self` and `related` links.
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: RelationshipLinks,
    /// Resource linkage; `None` when the server did not include `data`.
    #[serde(default, deserialize_with = "present_linkage")]
    pub data: Option<Linkage>,
}

/// Links of a relationship object.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct RelationshipLinks {
    /// URL of the relationship itself (used to mutate linkage).
    #[serde(rename = "self", default, deserialize_with = "link_href")]
    pub self_href: Option<String>,
    /// URL of the related resource(s).
    #[serde(default, deserialize_with = "link_href")]
    pub related: Option<String>,
}

/// A `{id, type}` reference to a resource.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    /// The referenced id.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// The referenced type.
    #[serde(rename = "type")]
    pub resource_type: String,
}

impl ResourceIdentifier {
    /// Creates an identifier.
    #[must_use]
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            resource_type: resource_type.into(),
        }
    }
}

/// Resource linkage held by a relationship.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Linkage {
    /// To-one linkage; `None` is an explicit `null`.
    One(Option<ResourceIdentifier>),
    /// To-many linkage, in server order.
    Many(Vec<ResourceIdentifier>),
}

impl Default for Linkage {
    fn default() -> Self {
        Self::One(None)
    }
}

impl Linkage {
    /// Returns `true` for to-many linkage.
    #[must_use]
    pub const fn is_many(&self) -> bool {
        matches!(self, Self::Many(_))
    }

    /// Returns the linked identifiers in order.
    #[must_use]
    pub fn identifiers(&self) -> Vec<&ResourceIdentifier> {
        match self {
            Self::One(one) => one.iter().collect(),
            Self::Many(many) => many.iter().collect(),
        }
    }

    /// Appends identifiers, skipping ones already linked.
    ///
    /// To-one linkage stays to-one: the last addition replaces the current
    /// value.
    pub fn append(&mut self, additions: Vec<ResourceIdentifier>) {
        match self {
            Self::One(one) => {
                if let Some(id) = additions.into_iter().last() {
                    *one = Some(id);
                }
            }
            Self::Many(many) => {
                for id in additions {
                    if !many.contains(&id) {
                        many.push(id);
                    }
                }
            }
        }
    }

    /// Removes every identifier in `removals`.
    pub fn remove(&mut self, removals: &[ResourceIdentifier]) {
        match self {
            Self::One(one) => {
                if one.as_ref().is_some_and(|id| removals.contains(id)) {
                    *one = None;
                }
            }
            Self::Many(many) => many.retain(|id| !removals.contains(id)),
        }
    }

    /// Serializes the linkage as a JSON:API `data` value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::One(None) => Value::Null,
            Self::One(Some(id)) => json!(id),
            Self::Many(many) => json!(many),
        }
    }

    fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        match value {
            Value::Null => Ok(Self::One(None)),
            Value::Array(_) => Ok(Self::Many(serde_json::from_value(value)?)),
            other => Ok(Self::One(Some(serde_json::from_value(other)?))),
        }
    }
}

/// The resources a relationship write should point at.
///
/// Build one from a [`Resource`](crate::Resource), a list of resources, or
/// raw identifiers:
///
/// ```rust
/// use flair_api::{RelationshipTarget, ResourceIdentifier};
///
/// let one: RelationshipTarget = ResourceIdentifier::new("rooms", "1").into();
/// assert_eq!(one.to_value(), serde_json::json!({"id": "1", "type": "rooms"}));
///
/// let many: RelationshipTarget = vec![ResourceIdentifier::new("rooms", "1")].into();
/// assert_eq!(many.to_value(), serde_json::json!([{"id": "1", "type": "rooms"}]));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelationshipTarget {
    /// A single resource (to-one).
    One(ResourceIdentifier),
    /// An ordered list of resources (to-many).
    Many(Vec<ResourceIdentifier>),
}

impl RelationshipTarget {
    /// Serializes the target as a JSON:API `data` value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::One(id) => json!(id),
            Self::Many(ids) => json!(ids),
        }
    }

    /// Returns the identifiers as a list, regardless of shape.
    #[must_use]
    pub fn into_identifiers(self) -> Vec<ResourceIdentifier> {
        match self {
            Self::One(id) => vec![id],
            Self::Many(ids) => ids,
        }
    }

    /// Converts the target into the linkage it establishes.
    #[must_use]
    pub fn into_linkage(self) -> Linkage {
        match self {
            Self::One(id) => Linkage::One(Some(id)),
            Self::Many(ids) => Linkage::Many(ids),
        }
    }
}

impl From<ResourceIdentifier> for RelationshipTarget {
    fn from(id: ResourceIdentifier) -> Self {
        Self::One(id)
    }
}

impl From<Vec<ResourceIdentifier>> for RelationshipTarget {
    fn from(ids: Vec<ResourceIdentifier>) -> Self {
        Self::Many(ids)
    }
}

/// Builds the `relationships` member of a write document.
#[must_use]
pub fn relationships_to_value(relationships: HashMap<String, RelationshipTarget>) -> Value {
    let members: Map<String, Value> = relationships
        .into_iter()
        .map(|(name, target)| (name, json!({ "data": target.to_value() })))
        .collect();
    Value::Object(members)
}

/// Builds a write document: `{data: {type, id?, attributes, relationships}}`.
#[must_use]
pub fn resource_document(
    resource_type: &str,
    id: Option<&str>,
    attributes: Map<String, Value>,
    relationships: HashMap<String, RelationshipTarget>,
) -> Value {
    let mut data = Map::new();
    if let Some(id) = id {
        data.insert("id".to_string(), json!(id));
    }
    data.insert("type".to_string(), json!(resource_type));
    data.insert("attributes".to_string(), Value::Object(attributes));
    data.insert(
        "relationships".to_string(),
        relationships_to_value(relationships),
    );
    json!({ "data": data })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn present_linkage<'de, D>(deserializer: D) -> Result<Option<Linkage>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Linkage::from_value(value)
        .map(Some)
        .map_err(serde::de::Error::custom)
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number id, found {other}"
        ))),
    }
}

fn link_href<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Object(link) => link
            .get("href")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    })
}
