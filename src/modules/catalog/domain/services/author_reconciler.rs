//! Groups one page of books into author aggregates.

use crate::modules::catalog::domain::entities::{Author, OwnedBook};
use std::collections::HashMap;

/// Author aggregates built from a single page, in order of first appearance.
#[derive(Debug, Clone, Default)]
pub struct AuthorAggregates {
    authors: Vec<Author>,
    index: HashMap<i64, usize>,
}

impl AuthorAggregates {
    pub fn len(&self) -> usize {
        self.authors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }

    pub fn get(&self, author_id: i64) -> Option<&Author> {
        self.index.get(&author_id).map(|&slot| &self.authors[slot])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Author> {
        self.authors.iter()
    }

    /// Number of books across all aggregates
    pub fn total_books(&self) -> usize {
        self.authors.iter().map(Author::book_count).sum()
    }

    pub fn into_authors(self) -> Vec<Author> {
        self.authors
    }
}

/// Build the author aggregates for one page of books.
///
/// The first book seen for an author seeds its name and slug; every book is
/// appended to its author's list in encounter order. Nothing is carried over
/// between pages, so each call starts from an empty mapping.
pub fn reconcile_authors(books: impl IntoIterator<Item = OwnedBook>) -> AuthorAggregates {
    let mut aggregates = AuthorAggregates::default();

    for OwnedBook { author, book } in books {
        let slot = match aggregates.index.get(&author.id) {
            Some(&slot) => slot,
            None => {
                let slot = aggregates.authors.len();
                aggregates.index.insert(author.id, slot);
                aggregates.authors.push(Author::from_seed(author));
                slot
            }
        };
        aggregates.authors[slot].add_book(book);
    }

    aggregates
}
