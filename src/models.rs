use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::AppResult;
use crate::schema::{validate_new_person, Literal};

/// Anything a predicate can be evaluated against: a flat mapping from field
/// names to typed values. Records are read-only to the predicate engine.
pub trait Record {
    /// Value of the named field, `None` when the record does not carry it
    fn field_value(&self, field: &str) -> Option<Literal>;
}

/// The person entity that the editor filters
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: DateTime<Utc>,
    pub age: i64,
    pub department: String,
    pub country: String,
    pub is_bool: bool,
}

impl Record for Person {
    fn field_value(&self, field: &str) -> Option<Literal> {
        match field {
            "firstName" => Some(Literal::Text(self.first_name.clone())),
            "lastName" => Some(Literal::Text(self.last_name.clone())),
            "age" => Some(Literal::Integer(self.age)),
            "department" => Some(Literal::Text(self.department.clone())),
            "country" => Some(Literal::Text(self.country.clone())),
            "isBool" => Some(Literal::Boolean(self.is_bool)),
            "dateOfBirth" => Some(Literal::Date(self.date_of_birth)),
            _ => None,
        }
    }
}

/// Sparse records, handy for ad-hoc data sets
impl Record for HashMap<String, Literal> {
    fn field_value(&self, field: &str) -> Option<Literal> {
        self.get(field).cloned()
    }
}

fn default_age() -> i64 {
    25
}

fn default_department() -> String {
    "IT".to_string()
}

fn default_country() -> String {
    "France".to_string()
}

fn default_true() -> bool {
    true
}

/// Add-person form payload
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewPerson {
    pub first_name: String,
    pub last_name: String,
    #[serde(default = "default_age")]
    pub age: i64,
    #[serde(default = "default_department")]
    pub department: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_true")]
    pub is_bool: bool,
    /// Derived from `age` when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<DateTime<Utc>>,
}

impl NewPerson {
    pub fn new(first_name: &str, last_name: &str, age: i64) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            age,
            department: default_department(),
            country: default_country(),
            is_bool: true,
            date_of_birth: None,
        }
    }

    pub fn with_department(mut self, department: &str) -> Self {
        self.department = department.to_string();
        self
    }

    pub fn with_country(mut self, country: &str) -> Self {
        self.country = country.to_string();
        self
    }

    pub fn with_flag(mut self, is_bool: bool) -> Self {
        self.is_bool = is_bool;
        self
    }

    pub fn born_on(mut self, date_of_birth: DateTime<Utc>) -> Self {
        self.date_of_birth = Some(date_of_birth);
        self
    }

    /// Validate the form and assign a fresh id
    pub fn into_person(self) -> AppResult<Person> {
        validate_new_person(&self)?;

        let date_of_birth = self
            .date_of_birth
            .unwrap_or_else(|| Utc::now() - Duration::days(365 * self.age));

        Ok(Person {
            id: Uuid::new_v4(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            date_of_birth,
            age: self.age,
            department: self.department,
            country: self.country,
            is_bool: self.is_bool,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_person_field_values() {
        let person = NewPerson::new("Jean", "Dupont", 30)
            .with_flag(false)
            .into_person()
            .unwrap();

        assert_eq!(
            person.field_value("firstName"),
            Some(Literal::Text("Jean".to_string()))
        );
        assert_eq!(person.field_value("age"), Some(Literal::Integer(30)));
        assert_eq!(person.field_value("isBool"), Some(Literal::Boolean(false)));
        assert_eq!(person.field_value("salary"), None);
    }

    #[test]
    fn test_new_person_defaults_from_json() {
        let form: NewPerson =
            serde_json::from_value(json!({"firstName": "Anne", "lastName": "Petit"})).unwrap();
        assert_eq!(form.age, 25);
        assert_eq!(form.department, "IT");
        assert_eq!(form.country, "France");
        assert!(form.is_bool);
        assert!(form.date_of_birth.is_none());
    }

    #[test]
    fn test_date_of_birth_derived_from_age() {
        let person = NewPerson::new("Anne", "Petit", 40).into_person().unwrap();
        let years = (Utc::now() - person.date_of_birth).num_days() / 365;
        assert_eq!(years, 40);
    }

    #[test]
    fn test_explicit_date_of_birth_is_kept() {
        let dob = Utc.with_ymd_and_hms(1980, 6, 1, 0, 0, 0).unwrap();
        let person = NewPerson::new("Anne", "Petit", 44)
            .born_on(dob)
            .into_person()
            .unwrap();
        assert_eq!(person.date_of_birth, dob);
    }

    #[test]
    fn test_person_json_is_camel_case() {
        let person = NewPerson::new("Jean", "Dupont", 30).into_person().unwrap();
        let value = serde_json::to_value(&person).unwrap();
        assert_eq!(value["firstName"], "Jean");
        assert_eq!(value["isBool"], true);
        assert!(value.get("dateOfBirth").is_some());
    }

    #[test]
    fn test_sparse_record() {
        let mut record = HashMap::new();
        record.insert("age".to_string(), Literal::Integer(30));
        assert_eq!(record.field_value("age"), Some(Literal::Integer(30)));
        assert_eq!(record.field_value("country"), None);
    }
}
