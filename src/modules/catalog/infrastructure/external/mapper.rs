use super::dto::{RawBook, RawGenre, RawTag};
use crate::modules::catalog::domain::{AuthorSeed, Book, Genre, Niche, OwnedBook, Tag};
use crate::shared::errors::{AppError, AppResult};
use serde::de::DeserializeOwned;

/// Maps raw page records of one resource into domain entities.
///
/// Mapping itself is infallible; validation happens when a JSON object is
/// parsed into the resource's raw record type.
pub trait RecordMapper {
    type Raw: DeserializeOwned;
    type Entity;

    /// Resource name used in `MalformedRecord` errors
    const RESOURCE: &'static str;

    fn map_record(&self, raw: Self::Raw) -> Self::Entity;

    fn map_value(&self, value: serde_json::Value) -> AppResult<Self::Entity> {
        let raw = serde_json::from_value::<Self::Raw>(value)
            .map_err(|e| AppError::malformed(Self::RESOURCE, e))?;
        Ok(self.map_record(raw))
    }

    /// Map a whole page; the first malformed record fails the page
    fn map_page(&self, values: Vec<serde_json::Value>) -> AppResult<Vec<Self::Entity>> {
        values
            .into_iter()
            .map(|value| self.map_value(value))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GenreMapper;

impl RecordMapper for GenreMapper {
    type Raw = RawGenre;
    type Entity = Genre;

    const RESOURCE: &'static str = "genre";

    fn map_record(&self, raw: RawGenre) -> Genre {
        Genre {
            id: raw.id,
            name: raw.name,
            slug: raw.slug,
            niche: raw.niche.map(|niche| Niche {
                id: niche.id,
                name: niche.name,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TagMapper;

impl RecordMapper for TagMapper {
    type Raw = RawTag;
    type Entity = Tag;

    const RESOURCE: &'static str = "tag";

    fn map_record(&self, raw: RawTag) -> Tag {
        Tag {
            id: raw.id,
            name: raw.name,
            slug: raw.slug,
        }
    }
}

/// Books keep the owning author next to them so the page can be reconciled.
#[derive(Debug, Clone, Copy, Default)]
pub struct BookMapper;

impl RecordMapper for BookMapper {
    type Raw = RawBook;
    type Entity = OwnedBook;

    const RESOURCE: &'static str = "book";

    fn map_record(&self, raw: RawBook) -> OwnedBook {
        let book = Book {
            id: raw.id,
            name: raw.name,
            annotation: raw.annotation,
            available: raw.available,
            genres: Vec::new(),
            tags: Vec::new(),
        }
        .with_refs(
            raw.genres.iter().map(|genre| genre.id),
            raw.tags.iter().map(|tag| tag.id),
        );

        OwnedBook {
            author: AuthorSeed {
                id: raw.author.id,
                name: raw.author.cover_name,
                slug: raw.author.slug,
            },
            book,
        }
    }
}
