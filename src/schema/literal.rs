use chrono::{DateTime, Datelike, NaiveDate, SecondsFormat, Utc};
use serde_json::Value;

use super::definitions::FieldKind;
use crate::error::{AppError, AppResult};

/// A typed value stored in a record or compared against in a predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Text(String),
    Integer(i64),
    Boolean(bool),
    Date(DateTime<Utc>),
}

impl Literal {
    pub fn kind(&self) -> FieldKind {
        match self {
            Literal::Text(_) => FieldKind::Text,
            Literal::Integer(_) => FieldKind::Integer,
            Literal::Boolean(_) => FieldKind::Boolean,
            Literal::Date(_) => FieldKind::Date,
        }
    }

    /// Convert a raw editor value into a literal of the requested kind.
    ///
    /// Editors send text boxes as strings, so integers and booleans are also
    /// accepted in their string spelling. Dates accept RFC 3339 timestamps and
    /// plain `YYYY-MM-DD` days (midnight UTC).
    pub fn from_json(kind: FieldKind, raw: &Value) -> AppResult<Self> {
        let mismatch = || {
            AppError::TypeMismatch(format!("expected {} value, got {}", kind, raw))
        };

        match (kind, raw) {
            (FieldKind::Text, Value::String(s)) => Ok(Literal::Text(s.clone())),
            (FieldKind::Integer, Value::Number(n)) => {
                n.as_i64().map(Literal::Integer).ok_or_else(mismatch)
            }
            (FieldKind::Integer, Value::String(s)) => s
                .trim()
                .parse::<i64>()
                .map(Literal::Integer)
                .map_err(|_| mismatch()),
            (FieldKind::Boolean, Value::Bool(b)) => Ok(Literal::Boolean(*b)),
            (FieldKind::Boolean, Value::String(s)) => match s.trim() {
                "true" => Ok(Literal::Boolean(true)),
                "false" => Ok(Literal::Boolean(false)),
                _ => Err(mismatch()),
            },
            (FieldKind::Date, Value::String(s)) => parse_date(s).ok_or_else(mismatch),
            _ => Err(mismatch()),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Literal::Text(s) => Value::String(s.clone()),
            Literal::Integer(i) => Value::from(*i),
            Literal::Boolean(b) => Value::Bool(*b),
            Literal::Date(d) => Value::String(format_date(d)),
        }
    }
}

/// RFC 3339 only has room for four-digit years
pub const MIN_DATE_YEAR: i32 = 0;
pub const MAX_DATE_YEAR: i32 = 9999;

/// True when `format_date` output parses back to the same date
pub fn is_representable_date(date: &DateTime<Utc>) -> bool {
    (MIN_DATE_YEAR..=MAX_DATE_YEAR).contains(&date.year())
}

/// RFC 3339 in UTC with only as many fractional digits as needed
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn parse_date(text: &str) -> Option<Literal> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(Literal::Date(dt.with_timezone(&Utc)));
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|naive| Literal::Date(naive.and_utc()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_text_requires_string() {
        assert_eq!(
            Literal::from_json(FieldKind::Text, &json!("France")).unwrap(),
            Literal::Text("France".to_string())
        );
        let err = Literal::from_json(FieldKind::Text, &json!(42)).unwrap_err();
        assert!(matches!(err, AppError::TypeMismatch(_)));
    }

    #[test]
    fn test_integer_from_number_or_string() {
        assert_eq!(
            Literal::from_json(FieldKind::Integer, &json!(30)).unwrap(),
            Literal::Integer(30)
        );
        assert_eq!(
            Literal::from_json(FieldKind::Integer, &json!(" 28 ")).unwrap(),
            Literal::Integer(28)
        );
        assert!(Literal::from_json(FieldKind::Integer, &json!("abc")).is_err());
        assert!(Literal::from_json(FieldKind::Integer, &json!(2.5)).is_err());
        assert!(Literal::from_json(FieldKind::Integer, &json!(true)).is_err());
    }

    #[test]
    fn test_boolean_values() {
        assert_eq!(
            Literal::from_json(FieldKind::Boolean, &json!(false)).unwrap(),
            Literal::Boolean(false)
        );
        assert_eq!(
            Literal::from_json(FieldKind::Boolean, &json!("true")).unwrap(),
            Literal::Boolean(true)
        );
        assert!(Literal::from_json(FieldKind::Boolean, &json!("yes")).is_err());
    }

    #[test]
    fn test_representable_date_range() {
        let last = Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59).unwrap();
        assert!(is_representable_date(&last));
        assert_eq!(
            Literal::from_json(FieldKind::Date, &json!(format_date(&last))).unwrap(),
            Literal::Date(last)
        );

        let far = Utc.with_ymd_and_hms(12000, 1, 1, 0, 0, 0).unwrap();
        assert!(!is_representable_date(&far));
    }

    #[test]
    fn test_date_formats() {
        let expected = Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            Literal::from_json(FieldKind::Date, &json!("1990-01-01")).unwrap(),
            Literal::Date(expected)
        );
        assert_eq!(
            Literal::from_json(FieldKind::Date, &json!("1990-01-01T01:00:00+01:00")).unwrap(),
            Literal::Date(expected)
        );
        assert!(Literal::from_json(FieldKind::Date, &json!("01/01/1990")).is_err());
    }

    #[test]
    fn test_date_json_is_utc_rfc3339() {
        let date = Utc.with_ymd_and_hms(1995, 3, 14, 12, 30, 0).unwrap();
        assert_eq!(Literal::Date(date).to_json(), json!("1995-03-14T12:30:00Z"));
    }

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(Literal::Text(String::new()).kind(), FieldKind::Text);
        assert_eq!(Literal::Integer(0).kind(), FieldKind::Integer);
        assert_eq!(Literal::Boolean(true).kind(), FieldKind::Boolean);
        assert_eq!(Literal::Date(Utc::now()).kind(), FieldKind::Date);
    }
}
