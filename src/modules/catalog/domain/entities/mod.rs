pub mod author;
pub mod book;
pub mod genre;
pub mod tag;

pub use author::{Author, AuthorSeed};
pub use book::{Book, OwnedBook};
pub use genre::{Genre, Niche};
pub use tag::Tag;

use crate::shared::errors::AppResult;
use serde::Serialize;

/// Named collections in the document store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Genres,
    Tags,
    /// Declared alongside the others but never written: books live inside author documents
    Books,
    Authors,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Genres,
        Collection::Tags,
        Collection::Books,
        Collection::Authors,
    ];

    /// Collection (table) name in the store
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Genres => "genres",
            Collection::Tags => "tags",
            Collection::Books => "books",
            Collection::Authors => "authors",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A serialized document ready for the store, keyed by its natural id.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub key: i64,
    pub body: serde_json::Value,
}

/// Entities that are persisted as whole documents under a natural key.
pub trait CatalogDocument: Serialize {
    const COLLECTION: Collection;

    fn natural_key(&self) -> i64;

    fn to_stored(&self) -> AppResult<StoredDocument> {
        Ok(StoredDocument {
            key: self.natural_key(),
            body: serde_json::to_value(self)?,
        })
    }
}
