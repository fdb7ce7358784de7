//! Error taxonomy shared by the store boundary and the controllers above it.

use std::fmt::{Display, Formatter};

use thiserror::Error;

/// Remote operation a [`FetchError`] is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListCollections,
    CreateCollection,
    RenameCollection,
    DeleteCollection,
    AddItem,
    RemoveItem,
    CatalogSearch,
    CatalogDetails,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListCollections => "list collections",
            Self::CreateCollection => "create collection",
            Self::RenameCollection => "rename collection",
            Self::DeleteCollection => "delete collection",
            Self::AddItem => "add item",
            Self::RemoveItem => "remove item",
            Self::CatalogSearch => "catalog search",
            Self::CatalogDetails => "catalog details",
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed network round trip.
///
/// `status` is `None` when the request never produced an HTTP response
/// (connection refused, DNS, body decoding after a transport error).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} failed{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
pub struct FetchError {
    pub operation: Operation,
    pub status: Option<u16>,
    pub message: String,
}

impl FetchError {
    pub fn status(operation: Operation, status: u16, message: impl Into<String>) -> Self {
        Self {
            operation,
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn transport(operation: Operation, message: impl Into<String>) -> Self {
        Self {
            operation,
            status: None,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

/// Input rejected before any request was issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("collection name must not be empty")]
    EmptyName,

    #[error("collection {0} does not exist")]
    UnknownCollection(crate::ids::CollectionId),

    #[error("{title} is already in this collection")]
    AlreadyInCollection { title: String },
}

/// Failure of a controller-level action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    #[error("network error: {0}")]
    Network(#[from] FetchError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CollectionError {
    /// Network failures go away by repeating the action; validation
    /// failures need different input.
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}
