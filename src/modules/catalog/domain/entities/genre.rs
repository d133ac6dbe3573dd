use serde::{Deserialize, Serialize};

use super::{CatalogDocument, Collection};

/// Narrower grouping a genre may belong to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Niche {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: i64,
    pub name: String,
    pub slug: String,
    /// Written as an explicit `null` when the genre has no niche
    pub niche: Option<Niche>,
}

impl CatalogDocument for Genre {
    const COLLECTION: Collection = Collection::Genres;

    fn natural_key(&self) -> i64 {
        self.id
    }
}
