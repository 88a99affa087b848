use crate::error::{AppError, AppResult};
use crate::models::NewPerson;

pub const MIN_AGE: i64 = 18;
pub const MAX_AGE: i64 = 99;

/// Validates the add-person form: both names are required and the age must
/// stay within the range the form offers.
pub fn validate_new_person(person: &NewPerson) -> AppResult<()> {
    if person.first_name.trim().is_empty() {
        return Err(AppError::BadRequest("firstName is required".to_string()));
    }

    if person.last_name.trim().is_empty() {
        return Err(AppError::BadRequest("lastName is required".to_string()));
    }

    if !(MIN_AGE..=MAX_AGE).contains(&person.age) {
        return Err(AppError::BadRequest(format!(
            "age must be between {} and {}, got {}",
            MIN_AGE, MAX_AGE, person.age
        )));
    }

    Ok(())
}
