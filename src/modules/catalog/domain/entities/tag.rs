use serde::{Deserialize, Serialize};

use super::{CatalogDocument, Collection};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

impl CatalogDocument for Tag {
    const COLLECTION: Collection = Collection::Tags;

    fn natural_key(&self) -> i64 {
        self.id
    }
}
