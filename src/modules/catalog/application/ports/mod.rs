pub mod document_store;
pub mod page_fetcher;

pub use document_store::{DocumentStore, InsertManyResult, StoreConnector};
pub use page_fetcher::PageFetcher;

#[cfg(test)]
pub use document_store::MockStoreConnector;
#[cfg(test)]
pub use page_fetcher::MockPageFetcher;
