use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tracing::info;

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::logging::logging_middleware;
use crate::resource::{person, predicate, schema, AppState};
use crate::store::{sample_people, StoreFactory};

/// Open the configured store, seed it if asked, and start an unfiltered session
pub async fn build_state(config: &AppConfig) -> AppResult<AppState> {
    let store = StoreFactory::create(&config.store).await?;

    let records = if config.session.seed_samples && store.count().await? == 0 {
        let records = store.insert_many(sample_people()).await?;
        info!(count = records.len(), "store seeded with sample people");
        records
    } else {
        store.all_records().await?
    };

    Ok(AppState::new(store, records, &config.session.entity_name))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/schema", get(schema::schema))
        .route(
            "/api/persons",
            get(person::list_persons).post(person::create_person),
        )
        .route("/api/persons/samples", post(person::add_samples))
        .route(
            "/api/predicate",
            get(predicate::get_predicate)
                .put(predicate::put_predicate)
                .delete(predicate::clear_predicate),
        )
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}
