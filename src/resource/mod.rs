//! JSON display surface over one filter session

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::editor::RowEditor;
use crate::models::Person;
use crate::session::{FilterSession, SessionState};
use crate::store::RecordStore;

pub mod person;
pub mod predicate;
pub mod schema;

/// Editor rows and the session they drive
pub struct FilterView {
    pub editor: RowEditor,
    pub session: FilterSession,
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub view: Arc<Mutex<FilterView>>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, records: Vec<Person>, entity_name: &str) -> Self {
        Self {
            store,
            view: Arc::new(Mutex::new(FilterView {
                editor: RowEditor::new(),
                session: FilterSession::with_entity_name(records, entity_name),
            })),
        }
    }
}

/// Body of the person listing endpoints
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonList {
    pub displayed: Vec<Person>,
    pub total_count: usize,
    pub is_filtered: bool,
}

impl PersonList {
    pub fn from_session(session: &FilterSession) -> Self {
        Self {
            displayed: session.displayed().to_vec(),
            total_count: session.records().len(),
            is_filtered: session.state() == SessionState::Filtered,
        }
    }
}
