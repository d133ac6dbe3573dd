use serde::Serialize;

/// Resource collections exposed by the catalog API, crawled in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogResource {
    Genres,
    Tags,
    Books,
}

impl CatalogResource {
    pub const ALL: [CatalogResource; 3] = [
        CatalogResource::Genres,
        CatalogResource::Tags,
        CatalogResource::Books,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CatalogResource::Genres => "genre",
            CatalogResource::Tags => "tag",
            CatalogResource::Books => "book",
        }
    }

    /// Collection path relative to the API origin
    pub fn path(&self) -> &'static str {
        match self {
            CatalogResource::Genres => "/api/v1/genre/",
            CatalogResource::Tags => "/api/v1/tag/",
            CatalogResource::Books => "/api/v1/book/",
        }
    }

    /// First page URL; later pages follow the server's cursor
    pub fn start_url(&self, api_origin: &str, page_size: u32) -> String {
        format!(
            "{}{}?limit={}",
            api_origin.trim_end_matches('/'),
            self.path(),
            page_size
        )
    }

    /// The book listing has been seen returning an empty page without clearing
    /// its cursor, so an empty page ends that crawl.
    pub fn stops_on_empty_page(&self) -> bool {
        matches!(self, CatalogResource::Books)
    }
}

impl std::fmt::Display for CatalogResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
