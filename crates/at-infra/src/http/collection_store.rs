//! Collection API client.

use anyhow::Context;
use async_trait::async_trait;
use at_core::ports::CollectionStorePort;
use at_core::{
    Collection, CollectionId, CollectionItem, DeleteConfirmation, FetchError, ItemId,
    NewCollectionItem, Operation,
};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use tracing::debug;

use super::{decode, send};

#[derive(Serialize)]
struct NameBody<'a> {
    name: &'a str,
}

/// [`CollectionStorePort`] over the REST API under `{base_url}/api/collections`.
///
/// Session cookies set by the server are kept and replayed. A configured
/// token is sent as `Authorization: Bearer`.
pub struct HttpCollectionStore {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl HttpCollectionStore {
    pub fn new(base_url: &str, auth_token: Option<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .context("Failed to build HTTP client for the collection API")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: auth_token.filter(|token| !token.is_empty()),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/api/collections{}", self.base_url, path);
        let builder = self.client.request(method, url);
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

#[async_trait]
impl CollectionStorePort for HttpCollectionStore {
    async fn list(&self) -> Result<Vec<Collection>, FetchError> {
        let op = Operation::ListCollections;
        let response = send(op, self.request(Method::GET, "")).await?;
        let collections: Vec<Collection> = decode(op, response).await?;
        debug!(count = collections.len(), "collections fetched");
        Ok(collections)
    }

    async fn create(&self, name: &str) -> Result<Collection, FetchError> {
        let op = Operation::CreateCollection;
        let request = self.request(Method::POST, "").json(&NameBody { name });
        decode(op, send(op, request).await?).await
    }

    async fn rename(&self, id: CollectionId, name: &str) -> Result<Collection, FetchError> {
        let op = Operation::RenameCollection;
        let request = self
            .request(Method::PUT, &format!("/{}", id))
            .json(&NameBody { name });
        decode(op, send(op, request).await?).await
    }

    async fn remove(&self, id: CollectionId) -> Result<DeleteConfirmation, FetchError> {
        let op = Operation::DeleteCollection;
        let request = self.request(Method::DELETE, &format!("/{}", id));
        decode(op, send(op, request).await?).await
    }

    async fn add_item(
        &self,
        id: CollectionId,
        item: &NewCollectionItem,
    ) -> Result<CollectionItem, FetchError> {
        let op = Operation::AddItem;
        let request = self
            .request(Method::POST, &format!("/{}/items", id))
            .json(item);
        let created: CollectionItem = decode(op, send(op, request).await?).await?;
        debug!(collection_id = %id, item_id = %created.id, "item created");
        Ok(created)
    }

    async fn remove_item(
        &self,
        id: CollectionId,
        item_id: ItemId,
    ) -> Result<DeleteConfirmation, FetchError> {
        let op = Operation::RemoveItem;
        let request = self.request(Method::DELETE, &format!("/{}/items/{}", id, item_id));
        decode(op, send(op, request).await?).await
    }
}
