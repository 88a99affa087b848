use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::predicate::LogicalType;
use crate::schema::Operator;

/// One visual row of the predicate editor.
///
/// Nesting is expressed by `depth`: the rows directly below a group row that
/// are one level deeper are its children. Every part of a row may still be
/// unset while the user is editing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    #[serde(default)]
    pub depth: usize,
    #[serde(flatten)]
    pub kind: RowKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RowKind {
    /// Grouping row: "all / any / none of the following"
    Group {
        #[serde(default)]
        logical_type: Option<LogicalType>,
    },
    Comparison {
        #[serde(default)]
        field: Option<String>,
        #[serde(default)]
        operator: Option<Operator>,
        /// Raw editor value, converted according to the field kind
        #[serde(default)]
        value: Option<Value>,
        /// Falls back to the field's default when unset
        #[serde(default)]
        case_sensitive: Option<bool>,
    },
}

impl Row {
    pub fn group(depth: usize, logical_type: LogicalType) -> Self {
        Self {
            depth,
            kind: RowKind::Group {
                logical_type: Some(logical_type),
            },
        }
    }

    pub fn comparison(depth: usize, field: &str, operator: Operator, value: Value) -> Self {
        Self {
            depth,
            kind: RowKind::Comparison {
                field: Some(field.to_string()),
                operator: Some(operator),
                value: Some(value),
                case_sensitive: None,
            },
        }
    }

    /// A comparison row with only its field picked, as a fresh editor row
    pub fn pending(depth: usize, field: &str) -> Self {
        Self {
            depth,
            kind: RowKind::Comparison {
                field: Some(field.to_string()),
                operator: None,
                value: None,
                case_sensitive: None,
            },
        }
    }

    pub fn case_sensitive(mut self, flag: bool) -> Self {
        if let RowKind::Comparison {
            ref mut case_sensitive,
            ..
        } = self.kind
        {
            *case_sensitive = Some(flag);
        }
        self
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, RowKind::Group { .. })
    }
}
