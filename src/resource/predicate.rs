use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{AppState, FilterView};
use crate::editor::{Row, RowIssue, RowsOutcome};
use crate::extractors::ApiJson;
use crate::session::SessionState;

#[derive(Debug, Deserialize)]
pub struct RowsRequest {
    #[serde(default)]
    pub rows: Vec<Row>,
}

/// Editor rows plus everything the session derives from them
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredicateView {
    pub rows: Vec<Row>,
    pub complete: bool,
    pub issues: Vec<RowIssue>,
    pub state: SessionState,
    pub canonical: String,
    pub target: String,
    pub target_block: String,
    pub displayed_count: usize,
    pub total_count: usize,
}

impl PredicateView {
    fn new(view: &FilterView) -> Self {
        let outcome = view.editor.build();
        Self {
            rows: view.editor.rows().to_vec(),
            // No rows is a finished state: no filter
            complete: !matches!(outcome, RowsOutcome::Incomplete { .. }),
            issues: outcome.issues().to_vec(),
            state: view.session.state(),
            canonical: view.session.canonical().to_string(),
            target: view.session.target().to_string(),
            target_block: view.session.target_block(),
            displayed_count: view.session.displayed().len(),
            total_count: view.session.records().len(),
        }
    }
}

pub async fn get_predicate(State(state): State<AppState>) -> Json<PredicateView> {
    let view = state.view.lock().await;
    Json(PredicateView::new(&view))
}

/// Replace the editor rows and apply the resulting tree.
///
/// Rows still being edited are not an error: the session drops back to
/// Unfiltered and the per-row issues are returned.
pub async fn put_predicate(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RowsRequest>,
) -> Json<PredicateView> {
    let mut view = state.view.lock().await;
    view.editor.set_rows(request.rows);

    let tree = match view.editor.build() {
        RowsOutcome::Empty => None,
        RowsOutcome::Complete(tree) => Some(tree),
        // A partial tree may be well formed while its rows are not
        RowsOutcome::Incomplete { issues, .. } => {
            debug!(issues = issues.len(), "editor rows incomplete");
            None
        }
    };
    view.session.set_predicate(tree);

    Json(PredicateView::new(&view))
}

/// Remove the filter and empty the editor
pub async fn clear_predicate(State(state): State<AppState>) -> Json<PredicateView> {
    let mut view = state.view.lock().await;
    view.session.clear();
    view.editor.clear();
    Json(PredicateView::new(&view))
}
