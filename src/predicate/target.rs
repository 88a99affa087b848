use super::model::{ComparisonParts, LogicalType, Predicate};
use super::{quote, PredicateRenderer};
use crate::error::AppResult;
use crate::schema::{fold_text, format_date, Literal, Operator};

pub const DEFAULT_BINDING: &str = "record";

const FOLDING: &str = ".folding(options: [.caseInsensitive, .diacriticInsensitive], locale: nil)";

/// Host-language boolean expression over a bound record:
/// `record.age > 28 && record.firstName.hasPrefix("J")`.
///
/// Case-insensitive text comparisons fold case and diacritics on both sides.
pub struct TargetExpression {
    binding: String,
}

impl TargetExpression {
    pub fn new(binding: &str) -> Self {
        Self {
            binding: binding.to_string(),
        }
    }

    /// Wrap a rendered expression in a `#Predicate<Entity>` block
    pub fn block(&self, entity: &str, expression: &str) -> String {
        format!(
            "#Predicate<{}> {{ {} in\n    {}\n}}",
            entity, self.binding, expression
        )
    }
}

impl Default for TargetExpression {
    fn default() -> Self {
        Self::new(DEFAULT_BINDING)
    }
}

impl PredicateRenderer for TargetExpression {
    fn comparison(&self, parts: &ComparisonParts<'_>) -> String {
        let folds_case = parts.folds_case();
        let mut subject = format!("{}.{}", self.binding, parts.field.name);
        if folds_case {
            subject.push_str(FOLDING);
        }
        let value = target_value(parts.value, folds_case);

        match parts.operator {
            Operator::Contains => format!("{}.contains({})", subject, value),
            Operator::BeginsWith => format!("{}.hasPrefix({})", subject, value),
            Operator::EndsWith => format!("{}.hasSuffix({})", subject, value),
            op => format!("{} {} {}", subject, op.canonical_symbol(), value),
        }
    }

    fn join_keyword(&self, logical_type: LogicalType) -> &'static str {
        match logical_type {
            LogicalType::Or => " || ",
            _ => " && ",
        }
    }

    fn negate(&self, inner: &str) -> String {
        format!("!({})", inner)
    }
}

fn target_value(value: &Literal, fold: bool) -> String {
    match value {
        Literal::Text(s) if fold => quote(&fold_text(s)),
        Literal::Text(s) => quote(s),
        Literal::Integer(i) => i.to_string(),
        Literal::Boolean(b) => b.to_string(),
        Literal::Date(d) => format!("Date({})", quote(&format_date(d))),
    }
}

/// Render the target expression; empty string when there is no predicate
pub fn to_target_expression(node: Option<&Predicate>) -> AppResult<String> {
    TargetExpression::default().render(node)
}

/// Render the target expression wrapped in its `#Predicate<Entity>` block
pub fn to_target_block(node: Option<&Predicate>, entity: &str) -> AppResult<String> {
    let renderer = TargetExpression::default();
    let expression = renderer.render(node)?;
    if expression.is_empty() {
        return Ok(expression);
    }
    Ok(renderer.block(entity, &expression))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::predicate::model::Comparison;
    use crate::schema::describe;
    use chrono::{TimeZone, Utc};

    fn age(op: Operator, n: i64) -> Predicate {
        Predicate::comparison("age", op, Literal::Integer(n), true).unwrap()
    }

    fn text(field: &str, op: Operator, value: &str, case_sensitive: bool) -> Predicate {
        Predicate::comparison(field, op, Literal::Text(value.to_string()), case_sensitive).unwrap()
    }

    fn render(node: &Predicate) -> String {
        to_target_expression(Some(node)).unwrap()
    }

    #[test]
    fn test_logical_operators() {
        let tree = Predicate::and(vec![
            Predicate::or(vec![
                age(Operator::LessThan, 20),
                age(Operator::GreaterThan, 40),
            ]),
            Predicate::not(text("country", Operator::Equals, "France", true)),
        ]);
        assert_eq!(
            render(&tree),
            "(record.age < 20 || record.age > 40) && !(record.country == \"France\")"
        );
    }

    #[test]
    fn test_string_functions() {
        assert_eq!(
            render(&text("country", Operator::Contains, "an", true)),
            "record.country.contains(\"an\")"
        );
        assert_eq!(
            render(&text("lastName", Operator::BeginsWith, "Du", true)),
            "record.lastName.hasPrefix(\"Du\")"
        );
        assert_eq!(
            render(&text("lastName", Operator::EndsWith, "ont", true)),
            "record.lastName.hasSuffix(\"ont\")"
        );
    }

    #[test]
    fn test_case_insensitive_folds_both_sides() {
        assert_eq!(
            render(&text("firstName", Operator::BeginsWith, "J", false)),
            format!("record.firstName{}.hasPrefix(\"j\")", FOLDING)
        );
        assert_eq!(
            render(&text("firstName", Operator::Equals, "Jean", false)),
            format!("record.firstName{} == \"jean\"", FOLDING)
        );
    }

    #[test]
    fn test_case_insensitive_drops_diacritics() {
        assert_eq!(
            render(&text("firstName", Operator::Contains, "HÉLE", false)),
            "record.firstName.folding(options: [.caseInsensitive, .diacriticInsensitive], locale: nil).contains(\"hele\")"
        );

        // Case-sensitive comparisons keep the literal as written
        assert_eq!(
            render(&text("lastName", Operator::Equals, "Lefèvre", true)),
            "record.lastName == \"Lefèvre\""
        );
    }

    #[test]
    fn test_field_names_inside_values_are_untouched() {
        // "Management" contains "age"; values are never rewritten
        let tree = text("department", Operator::Equals, "Management", true);
        assert_eq!(render(&tree), "record.department == \"Management\"");

        let tree = text("lastName", Operator::Contains, "firstName", true);
        assert_eq!(render(&tree), "record.lastName.contains(\"firstName\")");
    }

    #[test]
    fn test_boolean_and_date_values() {
        let flag = Predicate::comparison("isBool", Operator::NotEquals, Literal::Boolean(false), true)
            .unwrap();
        assert_eq!(render(&flag), "record.isBool != false");

        let cutoff = Utc.with_ymd_and_hms(2000, 12, 31, 0, 0, 0).unwrap();
        let born = Predicate::comparison(
            "dateOfBirth",
            Operator::GreaterOrEqual,
            Literal::Date(cutoff),
            true,
        )
        .unwrap();
        assert_eq!(
            render(&born),
            "record.dateOfBirth >= Date(\"2000-12-31T00:00:00Z\")"
        );
    }

    #[test]
    fn test_empty_groups_are_incomplete() {
        let nested = Predicate::or(vec![age(Operator::GreaterThan, 28), Predicate::and(vec![])]);
        for tree in [Predicate::and(vec![]), Predicate::or(vec![]), nested] {
            assert!(matches!(
                to_target_expression(Some(&tree)),
                Err(AppError::IncompletePredicate(_))
            ));
        }
    }

    #[test]
    fn test_block() {
        let tree = age(Operator::GreaterThan, 28);
        assert_eq!(
            to_target_block(Some(&tree), "Person").unwrap(),
            "#Predicate<Person> { record in\n    record.age > 28\n}"
        );
        assert_eq!(to_target_block(None, "Person").unwrap(), "");
    }

    #[test]
    fn test_custom_binding() {
        let renderer = TargetExpression::new("person");
        let tree = age(Operator::Equals, 30);
        assert_eq!(renderer.render(Some(&tree)).unwrap(), "person.age == 30");
    }

    #[test]
    fn test_absent_and_incomplete() {
        assert_eq!(to_target_expression(None).unwrap(), "");

        let pending = Predicate::Comparison(Comparison {
            field: Some(describe("country").unwrap()),
            operator: Some(Operator::Contains),
            value: None,
            case_sensitive: true,
        });
        assert!(matches!(
            to_target_expression(Some(&Predicate::not(pending))),
            Err(AppError::IncompletePredicate(_))
        ));
    }
}
