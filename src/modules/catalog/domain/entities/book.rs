use serde::{Deserialize, Serialize};

use super::author::AuthorSeed;
use super::{Genre, Tag};
use crate::shared::domain::value_objects::EntityRef;

/// A book as embedded inside its author's document.
///
/// The owning author is not stored here; see [`OwnedBook`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Book {
    pub id: i64,
    pub name: String,
    pub annotation: String,
    pub available: bool,
    pub genres: Vec<EntityRef<Genre>>,
    pub tags: Vec<EntityRef<Tag>>,
}

impl Book {
    /// Keeps first-seen order and drops repeated references.
    pub fn with_refs(
        mut self,
        genres: impl IntoIterator<Item = i64>,
        tags: impl IntoIterator<Item = i64>,
    ) -> Self {
        self.genres = dedup_refs(genres);
        self.tags = dedup_refs(tags);
        self
    }
}

fn dedup_refs<T>(ids: impl IntoIterator<Item = i64>) -> Vec<EntityRef<T>> {
    let mut seen = std::collections::HashSet::new();
    ids.into_iter()
        .filter(|id| seen.insert(*id))
        .map(EntityRef::new)
        .collect()
}

/// A transformed book together with the author identity read from the same raw record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedBook {
    pub author: AuthorSeed,
    pub book: Book,
}
