pub mod external;
pub mod http_client;
pub mod persistence;

pub use external::{
    BookMapper, CatalogApiClient, CatalogResource, GenreMapper, PageStop, Paginator, RawPage,
    RecordMapper, TagMapper,
};
pub use http_client::BackoffPolicy;
pub use persistence::{
    InMemoryConnector, InMemoryDocumentStore, PostgresConnector, PostgresDocumentStore,
};
