use std::cmp::Ordering;

use super::model::{Comparison, ComparisonParts, LogicalType, Predicate};
use crate::error::AppResult;
use crate::models::Record;
use crate::schema::{fold_text, Literal, Operator};

/// Evaluate a predicate tree against one record
pub fn evaluate<R: Record + ?Sized>(node: &Predicate, record: &R) -> AppResult<bool> {
    node.ensure_evaluable()?;
    Ok(evaluate_node(node, record))
}

/// Keep the records matching `node`, in input order.
///
/// `None` is the "no filter" case and returns every record.
pub fn filter<R: Record + Clone>(node: Option<&Predicate>, records: &[R]) -> AppResult<Vec<R>> {
    let Some(node) = node else {
        return Ok(records.to_vec());
    };

    node.ensure_evaluable()?;

    Ok(records
        .iter()
        .filter(|record| evaluate_node(node, *record))
        .cloned()
        .collect())
}

// Callers have already run ensure_evaluable on the tree.
fn evaluate_node<R: Record + ?Sized>(node: &Predicate, record: &R) -> bool {
    match node {
        Predicate::Comparison(c) => evaluate_comparison(c, record),
        Predicate::Compound(c) => match c.logical_type {
            LogicalType::And => c.children.iter().all(|child| evaluate_node(child, record)),
            LogicalType::Or => c.children.iter().any(|child| evaluate_node(child, record)),
            LogicalType::Not => c
                .children
                .first()
                .map(|child| !evaluate_node(child, record))
                .unwrap_or(false),
        },
    }
}

fn evaluate_comparison<R: Record + ?Sized>(comparison: &Comparison, record: &R) -> bool {
    let Ok(parts) = comparison.parts() else {
        return false;
    };

    // Missing attribute doesn't match
    let Some(actual) = record.field_value(parts.field.name) else {
        return false;
    };

    match (&actual, parts.value) {
        (Literal::Text(actual), Literal::Text(expected)) => text_match(&parts, actual, expected),
        (Literal::Integer(actual), Literal::Integer(expected)) => {
            ordered_match(parts.operator, actual.cmp(expected))
        }
        (Literal::Date(actual), Literal::Date(expected)) => {
            ordered_match(parts.operator, actual.cmp(expected))
        }
        (Literal::Boolean(actual), Literal::Boolean(expected)) => match parts.operator {
            Operator::Equals => actual == expected,
            Operator::NotEquals => actual != expected,
            _ => false,
        },
        _ => false,
    }
}

fn text_match(parts: &ComparisonParts<'_>, actual: &str, expected: &str) -> bool {
    if parts.folds_case() {
        compare_text(parts.operator, &fold_text(actual), &fold_text(expected))
    } else {
        compare_text(parts.operator, actual, expected)
    }
}

fn compare_text(operator: Operator, actual: &str, expected: &str) -> bool {
    match operator {
        Operator::Equals => actual == expected,
        Operator::NotEquals => actual != expected,
        Operator::Contains => actual.contains(expected),
        Operator::BeginsWith => actual.starts_with(expected),
        Operator::EndsWith => actual.ends_with(expected),
        _ => false,
    }
}

fn ordered_match(operator: Operator, ordering: Ordering) -> bool {
    match operator {
        Operator::Equals => ordering == Ordering::Equal,
        Operator::NotEquals => ordering != Ordering::Equal,
        Operator::LessThan => ordering == Ordering::Less,
        Operator::LessOrEqual => ordering != Ordering::Greater,
        Operator::GreaterThan => ordering == Ordering::Greater,
        Operator::GreaterOrEqual => ordering != Ordering::Less,
        _ => false,
    }
}
