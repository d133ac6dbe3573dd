/// JSON builders shaped like catalog API responses
use catalog_sync_lib::modules::catalog::infrastructure::CatalogResource;
use serde_json::{json, Value};

pub const ORIGIN: &str = "https://books.test";
pub const PAGE_SIZE: u32 = 2;

pub fn start_url(resource: CatalogResource) -> String {
    resource.start_url(ORIGIN, PAGE_SIZE)
}

/// Relative cursor as the API hands it out
pub fn cursor(resource: CatalogResource, offset: usize) -> String {
    format!("{}?limit={}&offset={}", resource.path(), PAGE_SIZE, offset)
}

/// The URL a relative cursor resolves to
pub fn cursor_url(resource: CatalogResource, offset: usize) -> String {
    format!("{}{}", ORIGIN, cursor(resource, offset))
}

pub fn page(objects: Vec<Value>, next: Option<&str>) -> Value {
    json!({
        "meta": {"limit": PAGE_SIZE, "next": next},
        "objects": objects
    })
}

pub fn last_page(objects: Vec<Value>) -> Value {
    page(objects, None)
}

pub fn genre(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "slug": name.to_lowercase(),
        "niche": {"id": 100 + id, "name": "Fiction"}
    })
}

pub fn tag(id: i64, name: &str) -> Value {
    json!({"id": id, "name": name, "slug": name.to_lowercase()})
}

pub fn book(id: i64, author_id: i64, author_name: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Book {}", id),
        "annotation": format!("Annotation for book {}", id),
        "available": true,
        "genres": [{"id": 1, "name": "Fantasy"}],
        "tags": [{"id": 5, "name": "Dragons"}, {"id": 5, "name": "Dragons"}],
        "author": {
            "id": author_id,
            "cover_name": author_name,
            "slug": author_name.to_lowercase().replace(' ', "-")
        }
    })
}
