use super::model::{ComparisonParts, LogicalType, Predicate};
use super::{quote, PredicateRenderer};
use crate::error::AppResult;
use crate::schema::{format_date, Literal};

/// Human-readable predicate format: `age > 28 AND firstName BEGINSWITH[cd] "J"`.
///
/// Operators use their canonical symbols, text and dates are quoted, and a
/// case-insensitive text comparison carries the `[cd]` modifier.
pub struct CanonicalFormat;

impl PredicateRenderer for CanonicalFormat {
    fn comparison(&self, parts: &ComparisonParts<'_>) -> String {
        let modifier = if parts.folds_case() { "[cd]" } else { "" };
        format!(
            "{} {}{} {}",
            parts.field.name,
            parts.operator.canonical_symbol(),
            modifier,
            canonical_value(parts.value)
        )
    }

    fn join_keyword(&self, logical_type: LogicalType) -> &'static str {
        match logical_type {
            LogicalType::Or => " OR ",
            _ => " AND ",
        }
    }

    fn negate(&self, inner: &str) -> String {
        format!("NOT ({})", inner)
    }
}

fn canonical_value(value: &Literal) -> String {
    match value {
        Literal::Text(s) => quote(s),
        Literal::Integer(i) => i.to_string(),
        Literal::Boolean(true) => "TRUE".to_string(),
        Literal::Boolean(false) => "FALSE".to_string(),
        Literal::Date(d) => quote(&format_date(d)),
    }
}

/// Render the canonical format; empty string when there is no predicate
pub fn to_canonical_format(node: Option<&Predicate>) -> AppResult<String> {
    CanonicalFormat.render(node)
}
