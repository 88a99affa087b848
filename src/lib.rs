pub mod config;
pub mod editor;
pub mod error;
pub mod extractors;
pub mod logging;
pub mod models;
pub mod predicate;
pub mod resource;
pub mod schema;
pub mod session;
pub mod startup;
pub mod store;

// Re-export commonly used types for easier access
pub use editor::{Row, RowEditor, RowsOutcome};
pub use models::{NewPerson, Person, Record};
pub use predicate::{LogicalType, Predicate};
pub use session::{FilterSession, SessionState};
