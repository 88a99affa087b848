use axum::{extract::State, http::StatusCode, Json};
use serde_json::Value;
use tracing::info;

use super::{AppState, PersonList};
use crate::extractors::ApiJson;
use crate::models::NewPerson;
use crate::store::sample_people;

type ApiError = (StatusCode, Json<Value>);

/// Records currently displayed by the session
pub async fn list_persons(State(state): State<AppState>) -> Json<PersonList> {
    let view = state.view.lock().await;
    Json(PersonList::from_session(&view.session))
}

/// Add one person from the add-person form
pub async fn create_person(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<NewPerson>,
) -> Result<(StatusCode, Json<PersonList>), ApiError> {
    let mut view = state.view.lock().await;

    let records = state.store.insert(form).await.map_err(|e| e.to_response())?;
    info!(total = records.len(), "person added");
    view.session.dataset_changed(records);

    Ok((StatusCode::CREATED, Json(PersonList::from_session(&view.session))))
}

pub async fn add_samples(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<PersonList>), ApiError> {
    let mut view = state.view.lock().await;

    let records = state
        .store
        .insert_many(sample_people())
        .await
        .map_err(|e| e.to_response())?;
    info!(total = records.len(), "sample people added");
    view.session.dataset_changed(records);

    Ok((StatusCode::CREATED, Json(PersonList::from_session(&view.session))))
}
