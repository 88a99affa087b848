pub mod definitions;
pub mod literal;
pub mod normalization;
pub mod validation;

// Re-export commonly used items from definitions
pub use definitions::*;
pub use literal::{format_date, is_representable_date, Literal, MAX_DATE_YEAR, MIN_DATE_YEAR};
pub use normalization::fold_text;
pub use validation::validate_new_person;
