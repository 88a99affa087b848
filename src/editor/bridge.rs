use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::row::{Row, RowKind};
use crate::error::{AppError, AppResult};
use crate::predicate::model::check_arity;
use crate::predicate::{make_comparison, Comparison, Compound, LogicalType, Predicate};
use crate::schema::{describe, FieldKind, Literal, Operator};

/// Why a single row keeps the tree from being complete
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowIssue {
    /// Index of the row in editor order
    pub row: usize,
    pub kind: &'static str,
    pub message: String,
}

impl RowIssue {
    fn new(row: usize, error: &AppError) -> Self {
        Self {
            row,
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// Result of translating editor rows into a predicate tree
#[derive(Debug, Clone, PartialEq)]
pub enum RowsOutcome {
    /// No rows: no filter
    Empty,
    Complete(Predicate),
    /// Still being edited. `partial` mirrors the rows with placeholder
    /// comparisons where a row could not be translated.
    Incomplete {
        partial: Predicate,
        issues: Vec<RowIssue>,
    },
}

impl RowsOutcome {
    /// The tree, only when it is ready to be applied
    pub fn predicate(&self) -> Option<&Predicate> {
        match self {
            RowsOutcome::Complete(p) => Some(p),
            _ => None,
        }
    }

    pub fn into_predicate(self) -> Option<Predicate> {
        match self {
            RowsOutcome::Complete(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, RowsOutcome::Complete(_))
    }

    pub fn issues(&self) -> &[RowIssue] {
        match self {
            RowsOutcome::Incomplete { issues, .. } => issues,
            _ => &[],
        }
    }
}

/// Translate editor rows into a predicate tree.
///
/// Errors are collected per row: a bad row becomes a placeholder in the
/// partial tree and the other rows are still translated. Several top-level
/// rows are combined with an implicit `and`.
pub fn rows_to_tree(rows: &[Row]) -> RowsOutcome {
    if rows.is_empty() {
        return RowsOutcome::Empty;
    }

    let mut builder = TreeBuilder {
        rows,
        pos: 0,
        issues: Vec::new(),
    };

    let mut roots = Vec::new();
    while builder.pos < rows.len() {
        let depth = rows[builder.pos].depth;
        if depth != 0 {
            builder.report(
                builder.pos,
                AppError::InvalidRows(format!(
                    "row {} is indented without a group above it",
                    builder.pos
                )),
            );
        }
        roots.push(builder.build_node(depth));
    }

    let root = if roots.len() == 1 {
        roots.remove(0)
    } else {
        Predicate::and(roots)
    };

    if builder.issues.is_empty() {
        debug!(nodes = root.size(), "rows translated into a complete predicate");
        RowsOutcome::Complete(root)
    } else {
        debug!(issues = builder.issues.len(), "rows still incomplete");
        RowsOutcome::Incomplete {
            partial: root,
            issues: builder.issues,
        }
    }
}

struct TreeBuilder<'a> {
    rows: &'a [Row],
    pos: usize,
    issues: Vec<RowIssue>,
}

impl<'a> TreeBuilder<'a> {
    fn report(&mut self, row: usize, error: AppError) {
        if !matches!(error, AppError::IncompletePredicate(_)) {
            warn!(row, "rejected editor row: {}", error);
        }
        self.issues.push(RowIssue::new(row, &error));
    }

    /// Consume the row at `pos` and, for groups, every deeper row below it
    fn build_node(&mut self, depth: usize) -> Predicate {
        let rows = self.rows;
        let index = self.pos;
        self.pos += 1;

        match &rows[index].kind {
            RowKind::Comparison {
                field,
                operator,
                value,
                case_sensitive,
            } => self
                .build_comparison(
                    index,
                    field.as_deref(),
                    *operator,
                    value.as_ref(),
                    *case_sensitive,
                )
                .into(),
            RowKind::Group { logical_type } => {
                let mut children = Vec::new();
                while self.pos < rows.len() && rows[self.pos].depth > depth {
                    let child_depth = rows[self.pos].depth;
                    if child_depth > depth + 1 {
                        self.report(
                            self.pos,
                            AppError::InvalidRows(format!(
                                "row {} is indented more than one level below its group",
                                self.pos
                            )),
                        );
                    }
                    children.push(self.build_node(child_depth));
                }

                self.build_group(index, *logical_type, children).into()
            }
        }
    }

    fn build_group(
        &mut self,
        index: usize,
        logical_type: Option<LogicalType>,
        children: Vec<Predicate>,
    ) -> Compound {
        let logical_type = logical_type.unwrap_or_else(|| {
            self.report(
                index,
                AppError::IncompletePredicate(format!("group row {} has no logical type", index)),
            );
            LogicalType::And
        });

        if children.is_empty() && logical_type != LogicalType::Not {
            self.report(
                index,
                AppError::IncompletePredicate(format!("{} group row {} has no rows", logical_type, index)),
            );
        }

        // A malformed not keeps its rows in the partial tree
        if let Err(e) = check_arity(logical_type, children.len()) {
            self.report(index, e);
        }

        Compound {
            logical_type,
            children,
        }
    }

    fn build_comparison(
        &mut self,
        index: usize,
        field: Option<&str>,
        operator: Option<Operator>,
        value: Option<&Value>,
        case_sensitive: Option<bool>,
    ) -> Comparison {
        let mut placeholder = Comparison::default();

        let Some(name) = field else {
            self.report(
                index,
                AppError::IncompletePredicate(format!("row {} has no field", index)),
            );
            return placeholder;
        };

        let descriptor = match describe(name) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                self.report(index, e);
                return placeholder;
            }
        };
        placeholder.field = Some(descriptor);
        placeholder.case_sensitive = case_sensitive.unwrap_or(descriptor.case_sensitive_default);

        let Some(operator) = operator else {
            self.report(
                index,
                AppError::IncompletePredicate(format!("row {} on '{}' has no operator", index, name)),
            );
            return placeholder;
        };
        placeholder.operator = Some(operator);

        let Some(raw) = value else {
            self.report(
                index,
                AppError::IncompletePredicate(format!("row {} on '{}' has no value", index, name)),
            );
            return placeholder;
        };

        let built = Literal::from_json(descriptor.kind, raw).and_then(|literal| {
            make_comparison(descriptor, operator, literal, placeholder.case_sensitive)
        });

        match built {
            Ok(comparison) => comparison,
            Err(e) => {
                self.report(index, e);
                placeholder
            }
        }
    }
}

/// Flatten a predicate tree into editor rows; the inverse of `rows_to_tree`
/// for complete trees.
pub fn tree_to_rows(tree: &Predicate) -> Vec<Row> {
    let mut rows = Vec::with_capacity(tree.size());
    push_rows(tree, 0, &mut rows);
    rows
}

fn push_rows(node: &Predicate, depth: usize, rows: &mut Vec<Row>) {
    match node {
        Predicate::Comparison(c) => rows.push(Row {
            depth,
            kind: RowKind::Comparison {
                field: c.field.map(|f| f.name.to_string()),
                operator: c.operator,
                value: c.value.as_ref().map(Literal::to_json),
                case_sensitive: match c.field {
                    Some(field) if field.kind != FieldKind::Text => None,
                    _ => Some(c.case_sensitive),
                },
            },
        }),
        Predicate::Compound(c) => {
            rows.push(Row::group(depth, c.logical_type));
            for child in &c.children {
                push_rows(child, depth + 1, rows);
            }
        }
    }
}

/// Live editing state of the row editor
#[derive(Debug, Clone, Default)]
pub struct RowEditor {
    rows: Vec<Row>,
}

impl RowEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// An editor showing one fresh comparison row on the first schema field
    pub fn with_default_row() -> Self {
        Self {
            rows: vec![Row::pending(0, "firstName")],
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row, returning its index
    pub fn add_row(&mut self, row: Row) -> usize {
        self.rows.push(row);
        self.rows.len() - 1
    }

    pub fn insert_row(&mut self, index: usize, row: Row) -> AppResult<()> {
        if index > self.rows.len() {
            return Err(self.out_of_range(index));
        }
        self.rows.insert(index, row);
        Ok(())
    }

    pub fn update_row(&mut self, index: usize, row: Row) -> AppResult<()> {
        let slot = self
            .rows
            .get_mut(index)
            .ok_or_else(|| AppError::BadRequest(format!("no row at index {}", index)))?;
        *slot = row;
        Ok(())
    }

    /// Remove a row together with the rows nested under it
    pub fn remove_row(&mut self, index: usize) -> AppResult<Vec<Row>> {
        let depth = self
            .rows
            .get(index)
            .map(|row| row.depth)
            .ok_or_else(|| self.out_of_range(index))?;

        let end = self.rows[index + 1..]
            .iter()
            .position(|row| row.depth <= depth)
            .map(|offset| index + 1 + offset)
            .unwrap_or(self.rows.len());

        Ok(self.rows.drain(index..end).collect())
    }

    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn build(&self) -> RowsOutcome {
        rows_to_tree(&self.rows)
    }

    /// Re-populate the editor from a tree set elsewhere
    pub fn load(&mut self, tree: Option<&Predicate>) {
        self.rows = tree.map(tree_to_rows).unwrap_or_default();
    }

    fn out_of_range(&self, index: usize) -> AppError {
        AppError::BadRequest(format!(
            "row index {} out of range ({} rows)",
            index,
            self.rows.len()
        ))
    }
}
