//! Named relationships between resources.

use std::collections::HashMap;

use serde_json::{json, Value};

use crate::clients::{FlairClient, HttpMethod};
use crate::jsonapi::document::{
    Linkage, RelationshipLinks, RelationshipTarget, ResourceIdentifier,
};
use crate::jsonapi::errors::ResourceError;
use crate::jsonapi::response::ApiResponse;

/// One named relationship of a [`Resource`](crate::Resource).
///
/// A relationship carries two links and its linkage. The `related` link
/// fetches the related resources; the `self` link is where linkage changes
/// are sent. Related resources are fetched on every [`get`](Self::get) and
/// never cached.
///
/// The mutating operations send one request each and then update the local
/// linkage to match what was sent:
///
/// | Operation | Request | Local linkage |
/// |-----------|---------|---------------|
/// | [`add`](Self::add) | `POST {data: [..]}` | appended (replaced for to-one) |
/// | [`update`](Self::update) | `PATCH {data: ..}` | replaced |
/// | [`delete`](Self::delete) | `DELETE {data: [..]}` | matching ids removed |
#[derive(Clone, Debug)]
pub struct Relationship {
    client: FlairClient,
    name: String,
    self_href: Option<String>,
    related_href: Option<String>,
    data: Linkage,
}

impl Relationship {
    pub(crate) fn new(
        client: FlairClient,
        name: impl Into<String>,
        links: RelationshipLinks,
        data: Linkage,
    ) -> Self {
        Self {
            client,
            name: name.into(),
            self_href: links.self_href,
            related_href: links.related,
            data,
        }
    }

    /// Returns the relationship name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the relationship's `self` link, if the server sent one.
    #[must_use]
    pub fn self_href(&self) -> Option<&str> {
        self.self_href.as_deref()
    }

    /// Returns the `related` link, if the server sent one.
    #[must_use]
    pub fn related_href(&self) -> Option<&str> {
        self.related_href.as_deref()
    }

    /// Returns the current linkage.
    #[must_use]
    pub const fn data(&self) -> &Linkage {
        &self.data
    }

    /// Returns `true` for to-many relationships.
    #[must_use]
    pub const fn is_to_many(&self) -> bool {
        self.data.is_many()
    }

    /// Returns the ids of the linked resources, in order.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.data
            .identifiers()
            .into_iter()
            .map(|id| id.id.as_str())
            .collect()
    }

    /// Fetches the related resource(s) from the `related` link.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingLink`] if the relationship has no
    /// `related` link, or any error from the request.
    pub async fn get(
        &self,
        params: Option<HashMap<String, String>>,
    ) -> Result<ApiResponse, ResourceError> {
        let href = self.link(self.related_href.as_deref(), "related")?;
        self.client.get_url(href, params).await
    }

    /// Links additional resources.
    ///
    /// On a to-one relationship the added resource replaces the current one.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::ToOneRelationship`] without sending anything
    /// if several resources are added to a to-one relationship. Returns
    /// [`ResourceError::MissingLink`] if the relationship has no `self` link,
    /// or any error from the request. Local linkage is left untouched on
    /// error.
    pub async fn add(&mut self, target: impl Into<RelationshipTarget>) -> Result<(), ResourceError> {
        let ids = target.into().into_identifiers();
        if !self.data.is_many() && ids.len() > 1 {
            return Err(ResourceError::ToOneRelationship {
                relationship: self.name.clone(),
                count: ids.len(),
            });
        }
        self.send(HttpMethod::Post, json!({ "data": ids })).await?;
        self.data.append(ids);
        Ok(())
    }

    /// Replaces the linkage.
    ///
    /// A single resource replaces a to-one linkage; a list replaces a
    /// to-many linkage.
    ///
    /// # Errors
    ///
    /// Same as [`add`](Self::add).
    pub async fn update(
        &mut self,
        target: impl Into<RelationshipTarget>,
    ) -> Result<(), ResourceError> {
        let target = target.into();
        self.send(HttpMethod::Patch, json!({ "data": target.to_value() }))
            .await?;
        self.data = target.into_linkage();
        Ok(())
    }

    /// Unlinks everything: `null` for to-one, `[]` for to-many.
    ///
    /// # Errors
    ///
    /// Same as [`add`](Self::add).
    pub async fn clear(&mut self) -> Result<(), ResourceError> {
        let cleared = if self.data.is_many() {
            Linkage::Many(Vec::new())
        } else {
            Linkage::One(None)
        };
        self.send(HttpMethod::Patch, json!({ "data": cleared.to_value() }))
            .await?;
        self.data = cleared;
        Ok(())
    }

    /// Unlinks the given resources.
    ///
    /// # Errors
    ///
    /// Same as [`add`](Self::add).
    pub async fn delete(
        &mut self,
        target: impl Into<RelationshipTarget>,
    ) -> Result<(), ResourceError> {
        let ids: Vec<ResourceIdentifier> = target.into().into_identifiers();
        self.send(HttpMethod::Delete, json!({ "data": ids })).await?;
        self.data.remove(&ids);
        Ok(())
    }

    pub(crate) fn set_data(&mut self, data: Linkage) {
        self.data = data;
    }

    async fn send(&self, method: HttpMethod, body: Value) -> Result<(), ResourceError> {
        let href = self.link(self.self_href.as_deref(), "self")?;
        self.client.send(method, href, Some(body), None).await?;
        Ok(())
    }

    fn link<'a>(&self, href: Option<&'a str>, link: &'static str) -> Result<&'a str, ResourceError> {
        href.filter(|h| !h.is_empty())
            .ok_or_else(|| ResourceError::MissingLink {
                relationship: self.name.clone(),
                link,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiRootUrl, ClientId, ClientSecret, FlairConfig};

    fn client() -> FlairClient {
        let config = FlairConfig::builder()
            .client_id(ClientId::new("id").unwrap())
            .client_secret(ClientSecret::new("secret").unwrap())
            .api_root(ApiRootUrl::new("http://example.com").unwrap())
            .build()
            .unwrap();
        FlairClient::new(config).unwrap()
    }

    fn rooms(data: Linkage) -> Relationship {
        Relationship::new(client(), "rooms", RelationshipLinks::default(), data)
    }

    #[test]
    fn test_ids_and_cardinality() {
        let rel = rooms(Linkage::Many(vec![
            ResourceIdentifier::new("rooms", "1"),
            ResourceIdentifier::new("rooms", "2"),
        ]));
        assert_eq!(rel.ids(), vec!["1", "2"]);
        assert!(rel.is_to_many());

        let rel = rooms(Linkage::One(None));
        assert!(rel.ids().is_empty());
        assert!(!rel.is_to_many());
    }

    #[tokio::test]
    async fn test_get_without_related_link_fails() {
        let rel = rooms(Linkage::default());
        let err = rel.get(None).await.unwrap_err();
        assert!(matches!(
            err,
            ResourceError::MissingLink { link: "related", .. }
        ));
    }

    #[tokio::test]
    async fn test_add_without_self_link_leaves_linkage() {
        let mut rel = rooms(Linkage::Many(Vec::new()));
        let err = rel
            .add(ResourceIdentifier::new("rooms", "1"))
            .await
            .unwrap_err();

        assert!(matches!(err, ResourceError::MissingLink { link: "self", .. }));
        assert!(rel.ids().is_empty());
    }

    #[tokio::test]
    async fn test_add_several_to_one_is_rejected() {
        let current = ResourceIdentifier::new("structures", "1");
        let mut rel = Relationship::new(
            client(),
            "structure",
            RelationshipLinks::default(),
            Linkage::One(Some(current.clone())),
        );
        let err = rel
            .add(vec![
                ResourceIdentifier::new("structures", "2"),
                ResourceIdentifier::new("structures", "3"),
            ])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ResourceError::ToOneRelationship { count: 2, ref relationship } if relationship == "structure"
        ));
        assert_eq!(rel.data(), &Linkage::One(Some(current)));
    }
}
