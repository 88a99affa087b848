use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

use crate::error::AppResult;
use crate::models::{Person, Record};
use crate::predicate::{filter, to_canonical_format, to_target_block, to_target_expression, Predicate};

pub const DEFAULT_ENTITY_NAME: &str = "Person";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// No predicate; every record is displayed
    Unfiltered,
    /// A complete predicate is applied
    Filtered,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Unfiltered => write!(f, "unfiltered"),
            SessionState::Filtered => write!(f, "filtered"),
        }
    }
}

/// Owns the current predicate and the filtered view of one editing session.
///
/// The displayed records and both serialized strings are always derived from
/// the predicate and the latest dataset; nothing is cached across a dataset
/// change.
#[derive(Debug, Clone)]
pub struct FilterSession<R = Person> {
    records: Vec<R>,
    predicate: Option<Predicate>,
    displayed: Vec<R>,
    canonical: String,
    target: String,
    entity_name: String,
}

impl<R: Record + Clone> FilterSession<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self::with_entity_name(records, DEFAULT_ENTITY_NAME)
    }

    /// Entity name used in the `#Predicate<...>` block
    pub fn with_entity_name(records: Vec<R>, entity_name: &str) -> Self {
        Self {
            displayed: records.clone(),
            records,
            predicate: None,
            canonical: String::new(),
            target: String::new(),
            entity_name: entity_name.to_string(),
        }
    }

    pub fn state(&self) -> SessionState {
        if self.predicate.is_some() {
            SessionState::Filtered
        } else {
            SessionState::Unfiltered
        }
    }

    pub fn predicate(&self) -> Option<&Predicate> {
        self.predicate.as_ref()
    }

    pub fn displayed(&self) -> &[R] {
        &self.displayed
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    /// The target expression wrapped in its `#Predicate<Entity>` block
    pub fn target_block(&self) -> String {
        to_target_block(self.predicate.as_ref(), &self.entity_name).unwrap_or_default()
    }

    /// Apply a new predicate, superseding the previous one.
    ///
    /// An absent or incomplete tree leaves the session Unfiltered.
    pub fn set_predicate(&mut self, tree: Option<Predicate>) -> SessionState {
        let Some(tree) = tree else {
            debug!("no predicate given");
            self.clear();
            return SessionState::Unfiltered;
        };

        if !tree.is_complete() {
            info!("incomplete predicate, showing all records");
            self.clear();
            return SessionState::Unfiltered;
        }

        match self.apply(&tree) {
            Ok(()) => {
                self.predicate = Some(tree);
                info!(
                    predicate = %self.canonical,
                    displayed = self.displayed.len(),
                    total = self.records.len(),
                    "filter applied"
                );
                SessionState::Filtered
            }
            Err(e) => {
                warn!("predicate rejected: {}", e);
                self.clear();
                SessionState::Unfiltered
            }
        }
    }

    /// Drop the predicate and show every record again
    pub fn clear(&mut self) {
        if self.predicate.is_some() {
            info!("filter cleared");
        }
        self.predicate = None;
        self.canonical.clear();
        self.target.clear();
        self.displayed = self.records.clone();
    }

    /// Replace the dataset and re-run the current filter over it
    pub fn dataset_changed(&mut self, records: Vec<R>) {
        debug!(count = records.len(), "dataset changed");
        self.records = records;

        let Some(tree) = self.predicate.take() else {
            self.displayed = self.records.clone();
            return;
        };

        match filter(Some(&tree), &self.records) {
            Ok(displayed) => {
                self.displayed = displayed;
                self.predicate = Some(tree);
            }
            Err(e) => {
                warn!("could not re-apply filter: {}", e);
                self.clear();
            }
        }
    }

    fn apply(&mut self, tree: &Predicate) -> AppResult<()> {
        let displayed = filter(Some(tree), &self.records)?;
        let canonical = to_canonical_format(Some(tree))?;
        let target = to_target_expression(Some(tree))?;

        self.displayed = displayed;
        self.canonical = canonical;
        self.target = target;
        Ok(())
    }
}
