use serde::Serialize;

use super::{Book, CatalogDocument, Collection};

/// Author identity as embedded in a raw book record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorSeed {
    pub id: i64,
    /// The author's display ("cover") name
    pub name: String,
    pub slug: String,
}

/// Author aggregate: the author document plus the books contributed by one page.
///
/// `book_count` always equals `books.len()`. It is not a running total: a later
/// page for the same author replaces the stored document wholesale.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub slug: String,
    book_count: usize,
    books: Vec<Book>,
}

impl Author {
    pub fn from_seed(seed: AuthorSeed) -> Self {
        Self {
            id: seed.id,
            name: seed.name,
            slug: seed.slug,
            book_count: 0,
            books: Vec::new(),
        }
    }

    pub fn add_book(&mut self, book: Book) {
        self.books.push(book);
        self.book_count = self.books.len();
    }

    pub fn book_count(&self) -> usize {
        self.book_count
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }
}

impl CatalogDocument for Author {
    const COLLECTION: Collection = Collection::Authors;

    fn natural_key(&self) -> i64 {
        self.id
    }
}
