/// Row shapes for the raw SQL run against the document tables
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Jsonb};
use serde_json::Value as JsonValue;

/// Key returned by `INSERT ... RETURNING id`
#[derive(QueryableByName, Debug)]
pub struct InsertedKey {
    #[diesel(sql_type = BigInt)]
    pub id: i64,
}

#[derive(QueryableByName, Debug)]
pub struct DocumentRow {
    #[diesel(sql_type = Jsonb)]
    pub document: JsonValue,
}

/// Helper struct for COUNT queries
#[derive(QueryableByName, Debug)]
pub struct CountResult {
    #[diesel(sql_type = BigInt)]
    pub count: i64,
}
