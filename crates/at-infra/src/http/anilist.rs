//! AniList GraphQL catalog client.

use anyhow::Context;
use async_trait::async_trait;
use at_core::ports::CatalogPort;
use at_core::{AnilistId, CatalogResult, FetchError, MediaDetails, Operation};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{decode, send};

pub const DEFAULT_ENDPOINT: &str = "https://graphql.anilist.co";

const SEARCH_QUERY: &str = r#"
query ($search: String, $perPage: Int) {
  Page(perPage: $perPage) {
    media(search: $search, type: ANIME) {
      id
      title { romaji english }
      coverImage { extraLarge large medium }
    }
  }
}
"#;

const DETAILS_QUERY: &str = r#"
query ($id: Int) {
  Media(id: $id, type: ANIME) {
    id
    title { romaji english }
    description
    season
    seasonYear
    genres
    episodes
    coverImage { extraLarge large medium }
    nextAiringEpisode { airingAt }
  }
}
"#;

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct PageData {
    #[serde(rename = "Page")]
    page: MediaPage,
}

#[derive(Deserialize)]
struct MediaPage {
    #[serde(default)]
    media: Vec<CatalogResult>,
}

#[derive(Deserialize)]
struct MediaData {
    #[serde(rename = "Media")]
    media: Option<MediaDetails>,
}

pub struct AnilistCatalog {
    client: reqwest::Client,
    endpoint: String,
    page_size: u32,
}

impl AnilistCatalog {
    pub fn new(endpoint: &str, page_size: u32) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to build HTTP client for the catalog")?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            page_size,
        })
    }

    async fn query<T: DeserializeOwned>(
        &self,
        operation: Operation,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, FetchError> {
        let request = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "query": query, "variables": variables }));
        let response: GraphQlResponse<T> = decode(operation, send(operation, request).await?).await?;

        if !response.errors.is_empty() {
            let messages: Vec<&str> = response.errors.iter().map(|e| e.message.as_str()).collect();
            return Err(FetchError::transport(operation, messages.join("; ")));
        }
        response
            .data
            .ok_or_else(|| FetchError::transport(operation, "response carried no data"))
    }
}

#[async_trait]
impl CatalogPort for AnilistCatalog {
    async fn search(&self, query: &str) -> Result<Vec<CatalogResult>, FetchError> {
        let variables = json!({ "search": query, "perPage": self.page_size });
        let data: PageData = self
            .query(Operation::CatalogSearch, SEARCH_QUERY, variables)
            .await?;
        debug!(query, hits = data.page.media.len(), "catalog search answered");
        Ok(data.page.media)
    }

    async fn details(&self, id: AnilistId) -> Result<MediaDetails, FetchError> {
        let op = Operation::CatalogDetails;
        let data: MediaData = self.query(op, DETAILS_QUERY, json!({ "id": id })).await?;
        data.media
            .ok_or_else(|| FetchError::status(op, 404, format!("no anime with id {}", id)))
    }
}
