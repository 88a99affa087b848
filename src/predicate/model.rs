use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AppError, AppResult};
use crate::schema::{
    describe, format_date, is_representable_date, FieldDescriptor, FieldKind, Literal, Operator,
    MAX_DATE_YEAR, MIN_DATE_YEAR,
};

/// How a compound node combines its children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalType {
    And,
    Or,
    Not,
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalType::And => write!(f, "and"),
            LogicalType::Or => write!(f, "or"),
            LogicalType::Not => write!(f, "not"),
        }
    }
}

/// Leaf of a predicate tree.
///
/// A comparison coming out of the row editor may still be a placeholder with
/// any of its parts missing; `make_comparison` only ever produces complete
/// ones.
#[derive(Debug, Clone, Default)]
pub struct Comparison {
    pub field: Option<&'static FieldDescriptor>,
    pub operator: Option<Operator>,
    pub value: Option<Literal>,
    /// Only meaningful for text fields
    pub case_sensitive: bool,
}

/// The parts of a comparison once it is known to be complete
#[derive(Debug, Clone, Copy)]
pub struct ComparisonParts<'a> {
    pub field: &'static FieldDescriptor,
    pub operator: Operator,
    pub value: &'a Literal,
    pub case_sensitive: bool,
}

impl ComparisonParts<'_> {
    /// Case folding applies to text fields compared without case sensitivity
    pub fn folds_case(&self) -> bool {
        self.field.kind == FieldKind::Text && !self.case_sensitive
    }
}

impl Comparison {
    /// Borrow the complete parts, or explain what is missing
    pub fn parts(&self) -> AppResult<ComparisonParts<'_>> {
        let field = self.field.ok_or_else(|| {
            AppError::IncompletePredicate("comparison has no field".to_string())
        })?;
        let operator = self.operator.ok_or_else(|| {
            AppError::IncompletePredicate(format!("comparison on '{}' has no operator", field.name))
        })?;
        let value = self.value.as_ref().ok_or_else(|| {
            AppError::IncompletePredicate(format!("comparison on '{}' has no value", field.name))
        })?;

        check_operator(field, operator)?;
        check_value(field, value)?;

        Ok(ComparisonParts {
            field,
            operator,
            value,
            case_sensitive: self.case_sensitive || field.kind != FieldKind::Text,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.parts().is_ok()
    }

    /// Whether the case flag changes what the comparison means
    pub fn is_case_relevant(&self) -> bool {
        self.field.map_or(true, |field| field.kind == FieldKind::Text)
    }
}

// The case flag only counts on text fields
impl PartialEq for Comparison {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field
            && self.operator == other.operator
            && self.value == other.value
            && (!self.is_case_relevant() || self.case_sensitive == other.case_sensitive)
    }
}

/// Interior node combining child predicates
#[derive(Debug, Clone, PartialEq)]
pub struct Compound {
    pub logical_type: LogicalType,
    pub children: Vec<Predicate>,
}

/// A node of a predicate tree. "No filter" is expressed as `Option<Predicate>::None`.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Comparison(Comparison),
    Compound(Compound),
}

fn check_operator(field: &FieldDescriptor, operator: Operator) -> AppResult<()> {
    if field.allows(operator) {
        Ok(())
    } else {
        Err(AppError::IllegalOperator(format!(
            "{} is not allowed on {} field '{}'",
            operator, field.kind, field.name
        )))
    }
}

fn check_value(field: &FieldDescriptor, value: &Literal) -> AppResult<()> {
    if value.kind() != field.kind {
        return Err(AppError::TypeMismatch(format!(
            "field '{}' expects a {} value, got {}",
            field.name,
            field.kind,
            value.kind()
        )));
    }

    if let Literal::Date(date) = value {
        if !is_representable_date(date) {
            return Err(AppError::TypeMismatch(format!(
                "field '{}' needs a date between years {} and {}, got {}",
                field.name,
                MIN_DATE_YEAR,
                MAX_DATE_YEAR,
                format_date(date)
            )));
        }
    }

    Ok(())
}

pub(crate) fn check_arity(logical_type: LogicalType, child_count: usize) -> AppResult<()> {
    if logical_type == LogicalType::Not && child_count != 1 {
        return Err(AppError::Arity(format!(
            "not takes exactly one child, got {}",
            child_count
        )));
    }
    Ok(())
}

/// Build a complete comparison, rejecting kind mismatches and illegal operators
pub fn make_comparison(
    field: &'static FieldDescriptor,
    operator: Operator,
    value: Literal,
    case_sensitive: bool,
) -> AppResult<Comparison> {
    check_value(field, &value)?;
    check_operator(field, operator)?;

    Ok(Comparison {
        field: Some(field),
        operator: Some(operator),
        value: Some(value),
        // Non-text comparisons are always exact
        case_sensitive: case_sensitive || field.kind != FieldKind::Text,
    })
}

/// Build a compound node; `not` must get exactly one child
pub fn make_compound(logical_type: LogicalType, children: Vec<Predicate>) -> AppResult<Compound> {
    check_arity(logical_type, children.len())?;
    Ok(Compound {
        logical_type,
        children,
    })
}

impl Predicate {
    /// Resolve `field_name` against the person schema and build a comparison
    pub fn comparison(
        field_name: &str,
        operator: Operator,
        value: Literal,
        case_sensitive: bool,
    ) -> AppResult<Predicate> {
        let field = describe(field_name)?;
        make_comparison(field, operator, value, case_sensitive).map(Predicate::Comparison)
    }

    pub fn and(children: Vec<Predicate>) -> Predicate {
        Predicate::Compound(Compound {
            logical_type: LogicalType::And,
            children,
        })
    }

    pub fn or(children: Vec<Predicate>) -> Predicate {
        Predicate::Compound(Compound {
            logical_type: LogicalType::Or,
            children,
        })
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(child: Predicate) -> Predicate {
        Predicate::Compound(Compound {
            logical_type: LogicalType::Not,
            children: vec![child],
        })
    }

    /// Every comparison fully specified and every group populated
    /// (and/or need at least one child, not exactly one).
    pub fn is_complete(&self) -> bool {
        match self {
            Predicate::Comparison(c) => c.is_complete(),
            Predicate::Compound(c) => {
                let arity_ok = match c.logical_type {
                    LogicalType::Not => c.children.len() == 1,
                    LogicalType::And | LogicalType::Or => !c.children.is_empty(),
                };
                arity_ok && c.children.iter().all(Predicate::is_complete)
            }
        }
    }

    /// Check that the tree can be evaluated.
    ///
    /// Looser than `is_complete`: empty and/or groups are accepted and take
    /// their vacuous value. Placeholder comparisons and a `not` without
    /// exactly one child are rejected.
    pub fn ensure_evaluable(&self) -> AppResult<()> {
        match self {
            Predicate::Comparison(c) => c.parts().map(|_| ()),
            Predicate::Compound(c) => {
                check_arity(c.logical_type, c.children.len())
                    .map_err(|e| AppError::IncompletePredicate(e.to_string()))?;
                c.children.iter().try_for_each(Predicate::ensure_evaluable)
            }
        }
    }

    /// Number of nodes in the tree
    pub fn size(&self) -> usize {
        match self {
            Predicate::Comparison(_) => 1,
            Predicate::Compound(c) => 1 + c.children.iter().map(Predicate::size).sum::<usize>(),
        }
    }
}

impl From<Comparison> for Predicate {
    fn from(comparison: Comparison) -> Self {
        Predicate::Comparison(comparison)
    }
}

impl From<Compound> for Predicate {
    fn from(compound: Compound) -> Self {
        Predicate::Compound(compound)
    }
}
