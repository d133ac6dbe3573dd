// Wire models for the catalog API.
// Required fields are not defaulted: a record missing one fails to parse
// and is reported as malformed instead of being written with holes.

use serde::Deserialize;

/// Page envelope shared by every collection endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageEnvelope {
    pub objects: Vec<serde_json::Value>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageMeta {
    /// Cursor for the following page: absolute URL or path relative to the API origin
    #[serde(default)]
    pub next: Option<String>,
}

impl PageEnvelope {
    pub fn next_cursor(&self) -> Option<&str> {
        self.meta
            .as_ref()
            .and_then(|meta| meta.next.as_deref())
            .filter(|cursor| !cursor.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawGenre {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub niche: Option<RawNiche>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawNiche {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawTag {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// Nested genre/tag object on a book; only the id is kept
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRef {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawAuthor {
    pub id: i64,
    pub cover_name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawBook {
    pub id: i64,
    pub name: String,
    pub annotation: String,
    pub available: bool,
    pub genres: Vec<RawRef>,
    pub tags: Vec<RawRef>,
    pub author: RawAuthor,
}
