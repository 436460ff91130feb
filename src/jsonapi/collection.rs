//! Paginated collections of resources.
//!
//! A [`Collection`] holds the resources fetched so far plus the `meta` and
//! `links` of the most recent page. It dereferences to `[Resource]`, so the
//! buffered resources can be indexed and iterated directly:
//!
//! ```rust,ignore
//! let mut rooms = client.list("rooms", None).await?;
//! println!("first page: {}", rooms.len());
//!
//! // Walk every page lazily.
//! let mut cursor = rooms.all();
//! while let Some(room) = cursor.next().await? {
//!     println!("{}", room.id());
//! }
//!
//! // Or buffer at least 50 and take them.
//! let first_fifty = rooms.up_to(50).await?;
//! ```
//!
//! The next page's URL is read from `links.next`, falling back to
//! `meta.next`. Pagination ends when neither is a non-empty string.

use std::ops::Deref;

use serde_json::{Map, Value};

use crate::clients::FlairClient;
use crate::jsonapi::errors::ResourceError;
use crate::jsonapi::resource::Resource;
use crate::jsonapi::response::ApiResponse;

/// A page-by-page growing list of resources.
///
/// Resources keep server order across pages and are never removed.
#[derive(Clone, Debug)]
pub struct Collection {
    client: FlairClient,
    resource_type: Option<String>,
    resources: Vec<Resource>,
    meta: Map<String, Value>,
    links: Map<String, Value>,
}

impl Collection {
    pub(crate) fn new(
        client: FlairClient,
        resource_type: Option<String>,
        resources: Vec<Resource>,
        meta: Map<String, Value>,
        links: Map<String, Value>,
    ) -> Self {
        let resource_type =
            resource_type.or_else(|| resources.first().map(|r| r.resource_type().to_string()));
        Self {
            client,
            resource_type,
            resources,
            meta,
            links,
        }
    }

    /// Returns the resource type this collection was requested for.
    ///
    /// For collections fetched from a raw URL this is the type of the first
    /// resource, or `None` if the first page was empty.
    #[must_use]
    pub fn resource_type(&self) -> Option<&str> {
        self.resource_type.as_deref()
    }

    /// Returns the `meta` member of the latest page.
    #[must_use]
    pub const fn meta(&self) -> &Map<String, Value> {
        &self.meta
    }

    /// Returns the `links` member of the latest page.
    #[must_use]
    pub const fn links(&self) -> &Map<String, Value> {
        &self.links
    }

    /// Returns the URL of the next page, if there is one.
    #[must_use]
    pub fn next_link(&self) -> Option<&str> {
        [self.links.get("next"), self.meta.get("next")]
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
            .find(|href| !href.is_empty())
    }

    /// Returns `true` if another page is available.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.next_link().is_some()
    }

    /// Fetches the next page and appends its resources.
    ///
    /// `meta` and `links` are replaced with the new page's. Returns `false`
    /// without a request when there is no next link.
    ///
    /// # Errors
    ///
    /// Returns any error from the request, or
    /// [`ResourceError::UnexpectedDocument`] if the next link returned a
    /// single resource.
    pub async fn load_next_page(&mut self) -> Result<bool, ResourceError> {
        let Some(next) = self.next_link().map(str::to_string) else {
            return Ok(false);
        };

        match self.client.get_url(&next, None).await? {
            ApiResponse::Collection(page) => {
                tracing::debug!(
                    url = %next,
                    count = page.resources.len(),
                    "Loaded next Flair API page"
                );
                self.resources.extend(page.resources);
                self.meta = page.meta;
                self.links = page.links;
                Ok(true)
            }
            ApiResponse::Empty => {
                self.meta.clear();
                self.links.clear();
                Ok(false)
            }
            ApiResponse::Resource(_) => Err(ResourceError::UnexpectedDocument {
                expected: "collection",
                found: "resource",
            }),
        }
    }

    /// Returns a cursor over every resource on every page.
    ///
    /// The cursor starts at the first buffered resource each time this is
    /// called and fetches further pages only when it reaches the end of the
    /// buffer.
    pub fn all(&mut self) -> AllResources<'_> {
        AllResources {
            collection: self,
            index: 0,
        }
    }

    /// Fetches pages until at least `limit` resources are buffered or no
    /// pages remain, then returns the first `limit` (or all, if fewer).
    ///
    /// # Errors
    ///
    /// Returns the first error from [`load_next_page`](Self::load_next_page).
    pub async fn up_to(&mut self, limit: usize) -> Result<&[Resource], ResourceError> {
        while self.resources.len() < limit && self.load_next_page().await? {}
        let end = limit.min(self.resources.len());
        Ok(&self.resources[..end])
    }

    /// Returns the buffered resources.
    #[must_use]
    pub fn as_slice(&self) -> &[Resource] {
        &self.resources
    }

    /// Consumes the collection, returning the buffered resources.
    #[must_use]
    pub fn into_resources(self) -> Vec<Resource> {
        self.resources
    }
}

impl Deref for Collection {
    type Target = [Resource];

    fn deref(&self) -> &Self::Target {
        &self.resources
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Resource;
    type IntoIter = std::slice::Iter<'a, Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.iter()
    }
}

/// Cursor returned by [`Collection::all`].
///
/// Each call to [`next`](Self::next) yields the next resource, loading the
/// following page first when the buffer is exhausted.
#[derive(Debug)]
pub struct AllResources<'a> {
    collection: &'a mut Collection,
    index: usize,
}

impl AllResources<'_> {
    /// Returns the next resource, or `None` once the last page is exhausted.
    ///
    /// # Errors
    ///
    /// Returns the error of a failed page load. The cursor can be polled
    /// again afterwards to retry that page.
    pub async fn next(&mut self) -> Result<Option<&Resource>, ResourceError> {
        while self.index >= self.collection.resources.len() {
            if !self.collection.load_next_page().await? {
                return Ok(None);
            }
        }
        let index = self.index;
        self.index += 1;
        Ok(self.collection.resources.get(index))
    }

    /// Drains the cursor, cloning every remaining resource.
    ///
    /// # Errors
    ///
    /// Returns the first page-load error.
    pub async fn collect(mut self) -> Result<Vec<Resource>, ResourceError> {
        let mut resources = Vec::new();
        while let Some(resource) = self.next().await? {
            resources.push(resource.clone());
        }
        Ok(resources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiRootUrl, ClientId, ClientSecret, FlairConfig};
    use serde_json::json;

    fn client() -> FlairClient {
        let config = FlairConfig::builder()
            .client_id(ClientId::new("id").unwrap())
            .client_secret(ClientSecret::new("secret").unwrap())
            .api_root(ApiRootUrl::new("http://example.com").unwrap())
            .build()
            .unwrap();
        FlairClient::new(config).unwrap()
    }

    fn room(client: &FlairClient, id: &str) -> Resource {
        Resource::from_object(
            client.clone(),
            serde_json::from_value(json!({"id": id, "type": "rooms"})).unwrap(),
        )
    }

    fn links(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_next_link_prefers_links_then_meta() {
        let client = client();
        let collection = Collection::new(
            client.clone(),
            None,
            Vec::new(),
            links(json!({"next": "/api/rooms?page=3"})),
            links(json!({"next": "/api/rooms?page=2"})),
        );
        assert_eq!(collection.next_link(), Some("/api/rooms?page=2"));

        let collection = Collection::new(
            client.clone(),
            None,
            Vec::new(),
            links(json!({"next": "/api/rooms?page=3"})),
            links(json!({"next": null})),
        );
        assert_eq!(collection.next_link(), Some("/api/rooms?page=3"));

        let collection = Collection::new(client, None, Vec::new(), Map::new(), Map::new());
        assert!(!collection.has_next_page());
    }

    #[test]
    fn test_type_inferred_from_first_resource() {
        let client = client();
        let collection = Collection::new(
            client.clone(),
            None,
            vec![room(&client, "1")],
            Map::new(),
            Map::new(),
        );
        assert_eq!(collection.resource_type(), Some("rooms"));
        assert_eq!(collection.len(), 1);
        assert_eq!(collection[0].id(), "1");
    }

    #[tokio::test]
    async fn test_up_to_and_all_without_next_link() {
        let client = client();
        let mut collection = Collection::new(
            client.clone(),
            Some("rooms".to_string()),
            vec![room(&client, "1"), room(&client, "2"), room(&client, "3")],
            Map::new(),
            Map::new(),
        );

        assert_eq!(collection.up_to(2).await.unwrap().len(), 2);
        assert_eq!(collection.up_to(10).await.unwrap().len(), 3);
        assert!(!collection.load_next_page().await.unwrap());

        let ids: Vec<String> = collection
            .all()
            .collect()
            .await
            .unwrap()
            .iter()
            .map(|r| r.id().to_string())
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }
}
