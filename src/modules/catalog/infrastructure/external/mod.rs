pub mod client;
pub mod dto;
pub mod mapper;
pub mod paginator;
pub mod resource;

pub use client::CatalogApiClient;
pub use mapper::{BookMapper, GenreMapper, RecordMapper, TagMapper};
pub use paginator::{PageStop, Paginator, RawPage};
pub use resource::CatalogResource;
