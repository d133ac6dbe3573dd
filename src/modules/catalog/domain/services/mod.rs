pub mod author_reconciler;

pub use author_reconciler::{reconcile_authors, AuthorAggregates};
