pub mod entities;
pub mod services;

pub use entities::{
    Author, AuthorSeed, Book, CatalogDocument, Collection, Genre, Niche, OwnedBook,
    StoredDocument, Tag,
};
pub use services::{reconcile_authors, AuthorAggregates};
