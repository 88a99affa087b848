//! Person Field Schema
//!
//! The fixed set of fields a predicate can reference, their kinds, and the
//! operators each kind accepts. Everything the editor and the evaluator know
//! about fields comes from here.

use crate::error::{AppError, AppResult};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of value stored in a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    Text,
    Integer,
    Boolean,
    Date,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Text => write!(f, "text"),
            FieldKind::Integer => write!(f, "integer"),
            FieldKind::Boolean => write!(f, "boolean"),
            FieldKind::Date => write!(f, "date"),
        }
    }
}

/// Comparison operators offered by the row editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    Equals,
    NotEquals,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
    Contains,
    BeginsWith,
    EndsWith,
}

impl Operator {
    pub const ALL: [Operator; 9] = [
        Operator::Equals,
        Operator::NotEquals,
        Operator::LessThan,
        Operator::LessOrEqual,
        Operator::GreaterThan,
        Operator::GreaterOrEqual,
        Operator::Contains,
        Operator::BeginsWith,
        Operator::EndsWith,
    ];

    /// Operators that only make sense on strings
    pub fn is_text_only(&self) -> bool {
        matches!(
            self,
            Operator::Contains | Operator::BeginsWith | Operator::EndsWith
        )
    }

    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            Operator::LessThan
                | Operator::LessOrEqual
                | Operator::GreaterThan
                | Operator::GreaterOrEqual
        )
    }

    /// Symbol used by the canonical predicate format
    pub fn canonical_symbol(&self) -> &'static str {
        match self {
            Operator::Equals => "==",
            Operator::NotEquals => "!=",
            Operator::LessThan => "<",
            Operator::LessOrEqual => "<=",
            Operator::GreaterThan => ">",
            Operator::GreaterOrEqual => ">=",
            Operator::Contains => "CONTAINS",
            Operator::BeginsWith => "BEGINSWITH",
            Operator::EndsWith => "ENDSWITH",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "notEquals",
            Operator::LessThan => "lessThan",
            Operator::LessOrEqual => "lessOrEqual",
            Operator::GreaterThan => "greaterThan",
            Operator::GreaterOrEqual => "greaterOrEqual",
            Operator::Contains => "contains",
            Operator::BeginsWith => "beginsWith",
            Operator::EndsWith => "endsWith",
        };
        write!(f, "{}", name)
    }
}

/// Ordered set of operators legal for a field kind
pub fn operators_for(kind: FieldKind) -> &'static [Operator] {
    const TEXT: &[Operator] = &[
        Operator::Equals,
        Operator::NotEquals,
        Operator::Contains,
        Operator::BeginsWith,
        Operator::EndsWith,
    ];
    const ORDERED: &[Operator] = &[
        Operator::Equals,
        Operator::NotEquals,
        Operator::LessThan,
        Operator::LessOrEqual,
        Operator::GreaterThan,
        Operator::GreaterOrEqual,
    ];
    const BOOLEAN: &[Operator] = &[Operator::Equals, Operator::NotEquals];

    match kind {
        FieldKind::Text => TEXT,
        FieldKind::Integer | FieldKind::Date => ORDERED,
        FieldKind::Boolean => BOOLEAN,
    }
}

/// Complete field definition
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: FieldKind,
    pub allowed_operators: Vec<Operator>,
    pub description: &'static str,
    /// Case sensitivity a new comparison row on this field starts with
    pub case_sensitive_default: bool,
}

impl FieldDescriptor {
    fn new(
        name: &'static str,
        kind: FieldKind,
        description: &'static str,
        case_sensitive_default: bool,
    ) -> Self {
        Self {
            name,
            kind,
            allowed_operators: operators_for(kind).to_vec(),
            description,
            case_sensitive_default,
        }
    }

    pub fn allows(&self, operator: Operator) -> bool {
        self.allowed_operators.contains(&operator)
    }
}

/// Schema definition
#[derive(Debug, Clone, Serialize)]
pub struct SchemaDefinition {
    pub name: &'static str,
    pub fields: Vec<FieldDescriptor>,
}

lazy_static! {
    /// Person schema definition
    pub static ref PERSON_SCHEMA: SchemaDefinition = SchemaDefinition {
        name: "Person",
        fields: vec![
            FieldDescriptor::new("firstName", FieldKind::Text, "Given name", false),
            FieldDescriptor::new("lastName", FieldKind::Text, "Family name", true),
            FieldDescriptor::new("age", FieldKind::Integer, "Age in years", true),
            FieldDescriptor::new("department", FieldKind::Text, "Department", true),
            FieldDescriptor::new("country", FieldKind::Text, "Country of residence", true),
            FieldDescriptor::new("isBool", FieldKind::Boolean, "Boolean status flag", true),
            FieldDescriptor::new("dateOfBirth", FieldKind::Date, "Date of birth", true),
        ],
    };
}

/// Look up a field of the person schema by name
pub fn describe(field_name: &str) -> AppResult<&'static FieldDescriptor> {
    PERSON_SCHEMA
        .fields
        .iter()
        .find(|field| field.name == field_name)
        .ok_or_else(|| AppError::UnknownField(format!("'{}' is not a Person field", field_name)))
}
