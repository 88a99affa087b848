//! Predicate engine: tree model, evaluation and rendering
//!
//! Rendering always walks the structured tree. Each output notation is a
//! `PredicateRenderer` that only decides how a single comparison, a logical
//! keyword and a negation are spelled; grouping and precedence are handled
//! once in the trait's provided methods.

pub mod canonical;
pub mod evaluator;
pub mod model;
pub mod target;

pub use canonical::{to_canonical_format, CanonicalFormat};
pub use evaluator::{evaluate, filter};
pub use model::{
    make_comparison, make_compound, Comparison, ComparisonParts, Compound, LogicalType,
    Predicate,
};
pub use target::{to_target_block, to_target_expression, TargetExpression};

use crate::error::{AppError, AppResult};

/// Trait for rendering a predicate tree into a textual notation
pub trait PredicateRenderer {
    /// Render one complete comparison
    fn comparison(&self, parts: &ComparisonParts<'_>) -> String;

    /// Separator placed between the children of an and/or group, with spaces
    fn join_keyword(&self, logical_type: LogicalType) -> &'static str;

    fn negate(&self, inner: &str) -> String;

    /// Render a whole tree. An absent tree renders as the empty string and
    /// a tree that is not complete is refused.
    fn render(&self, node: Option<&Predicate>) -> AppResult<String> {
        let Some(node) = node else {
            return Ok(String::new());
        };
        node.ensure_evaluable()?;
        self.render_node(node)
    }

    fn render_node(&self, node: &Predicate) -> AppResult<String> {
        match node {
            Predicate::Comparison(c) => Ok(self.comparison(&c.parts()?)),
            Predicate::Compound(c) => match c.logical_type {
                LogicalType::Not => {
                    let inner = c.children.iter().map(|child| self.render_node(child));
                    let inner = inner.collect::<AppResult<Vec<_>>>()?.join(" ");
                    Ok(self.negate(&inner))
                }
                LogicalType::And | LogicalType::Or => {
                    if c.children.is_empty() {
                        return Err(AppError::IncompletePredicate(format!(
                            "{} group has no children",
                            c.logical_type
                        )));
                    }

                    let parts = c
                        .children
                        .iter()
                        .map(|child| {
                            let rendered = self.render_node(child)?;
                            Ok(if needs_grouping(c.logical_type, child) {
                                format!("({})", rendered)
                            } else {
                                rendered
                            })
                        })
                        .collect::<AppResult<Vec<_>>>()?;

                    Ok(parts.join(self.join_keyword(c.logical_type)))
                }
            },
        }
    }
}

/// A child group needs parentheses when it is an and/or of the other kind.
/// `not` carries its own parentheses.
fn needs_grouping(parent: LogicalType, child: &Predicate) -> bool {
    match child {
        Predicate::Compound(c) => c.logical_type != LogicalType::Not && c.logical_type != parent,
        Predicate::Comparison(_) => false,
    }
}

/// Quote a string literal, escaping backslashes and double quotes
pub(crate) fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for ch in text.chars() {
        if ch == '"' || ch == '\\' {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("France"), "\"France\"");
        assert_eq!(quote("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(quote("a\\b"), "\"a\\\\b\"");
    }
}
