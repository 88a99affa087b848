use axum::Json;

use crate::schema::{SchemaDefinition, PERSON_SCHEMA};

/// Fields the editor can filter on, with their allowed operators
pub async fn schema() -> Json<&'static SchemaDefinition> {
    Json(&*PERSON_SCHEMA)
}
