//! HTTP adapters for the collection API and the AniList catalog.

mod anilist;
mod collection_store;

pub use anilist::{AnilistCatalog, DEFAULT_ENDPOINT as DEFAULT_CATALOG_ENDPOINT};
pub use collection_store::HttpCollectionStore;

use at_core::{FetchError, Operation};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

/// Sends `request` and turns any non-2xx status into a [`FetchError`].
pub(crate) async fn send(operation: Operation, request: RequestBuilder) -> Result<Response, FetchError> {
    let response = request
        .send()
        .await
        .map_err(|e| transport_error(operation, e))?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(FetchError::status(
        operation,
        status.as_u16(),
        error_message(status, &body),
    ))
}

pub(crate) async fn decode<T: DeserializeOwned>(
    operation: Operation,
    response: Response,
) -> Result<T, FetchError> {
    response.json::<T>().await.map_err(|e| {
        FetchError::transport(operation, format!("unexpected response body: {}", e))
    })
}

fn transport_error(operation: Operation, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::transport(operation, "request timed out")
    } else {
        FetchError::transport(operation, error.to_string())
    }
}

/// Best human-readable reason in an error body: `message`, `error`, the first
/// GraphQL error, the raw text, and finally the status reason.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        let found = value
            .get("message")
            .or_else(|| value.get("error"))
            .or_else(|| value.pointer("/errors/0/message"))
            .and_then(|v| v.as_str());
        if let Some(message) = found {
            return message.to_string();
        }
    }

    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}
