//! Declarative field validation for inbound commands.
//!
//! Request bodies arrive as untyped JSON fields; a [`Validator`] checks each
//! field's presence and type, then its rules, records every failed rule, and
//! only yields a value once all fields passed. Issues render as
//! `<message> at "<field>"`, joined by `; `.

use serde::Serialize;
use serde_json::Value;

pub const REQUIRED: &str = "Required";
pub const INVALID_EMAIL: &str = "Invalid email";
pub const NOT_BLANK: &str = "String must not be blank";
pub const NOT_POSITIVE: &str = "Number must be greater than 0";

const MAX_EMAIL_LEN: usize = 254;

/// A single failed rule on a named field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: &'static str,
    pub message: String,
}

impl core::fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} at \"{}\"", self.message, self.field)
    }
}

/// Non-empty list of field issues, in the order the fields were checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldIssue>);

impl ValidationErrors {
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        Self(vec![FieldIssue {
            field,
            message: message.into(),
        }])
    }

    pub fn issues(&self) -> &[FieldIssue] {
        &self.0
    }
}

impl core::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (idx, issue) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }
            core::fmt::Display::fmt(issue, f)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Accumulates issues across the fields of one request.
///
/// Each rule returns `Some(value)` when it passes and records an issue
/// otherwise, so rules chain with `Option::and_then`.
#[derive(Debug, Default)]
pub struct Validator {
    issues: Vec<FieldIssue>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, field: &'static str, message: impl Into<String>) {
        self.issues.push(FieldIssue {
            field,
            message: message.into(),
        });
    }

    pub fn required<T>(&mut self, field: &'static str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.issue(field, REQUIRED);
        }
        value
    }

    /// Present and a JSON string.
    pub fn string(&mut self, field: &'static str, raw: Option<Value>) -> Option<String> {
        match self.required(field, raw)? {
            Value::String(s) => Some(s),
            other => {
                self.issue(field, expected("string", &other));
                None
            }
        }
    }

    /// Absent, or a JSON string. The outer `None` means the field was invalid.
    pub fn optional_string(
        &mut self,
        field: &'static str,
        raw: Option<Value>,
    ) -> Option<Option<String>> {
        match raw {
            None => Some(None),
            Some(raw) => self.string(field, Some(raw)).map(Some),
        }
    }

    /// Present and a JSON number.
    pub fn number(&mut self, field: &'static str, raw: Option<Value>) -> Option<f64> {
        match self.required(field, raw)? {
            Value::Number(n) => match n.as_f64() {
                Some(v) => Some(v),
                None => {
                    self.issue(field, expected("number", &Value::Number(n)));
                    None
                }
            },
            other => {
                self.issue(field, expected("number", &other));
                None
            }
        }
    }

    pub fn email(&mut self, field: &'static str, value: String) -> Option<String> {
        if is_valid_email(value.trim()) {
            Some(value)
        } else {
            self.issue(field, INVALID_EMAIL);
            None
        }
    }

    pub fn min_chars(&mut self, field: &'static str, value: String, min: usize) -> Option<String> {
        if value.chars().count() >= min {
            Some(value)
        } else {
            self.issue(
                field,
                format!("String must contain at least {min} character(s)"),
            );
            None
        }
    }

    pub fn not_blank(&mut self, field: &'static str, value: String) -> Option<String> {
        if value.trim().is_empty() {
            self.issue(field, NOT_BLANK);
            None
        } else {
            Some(value)
        }
    }

    pub fn positive(&mut self, field: &'static str, value: f64) -> Option<f64> {
        if value.is_finite() && value > 0.0 {
            Some(value)
        } else {
            self.issue(field, NOT_POSITIVE);
            None
        }
    }

    /// Yield the validated value, or every recorded issue.
    pub fn finish<T>(self, value: Option<T>) -> Result<T, ValidationErrors> {
        match value {
            Some(v) if self.issues.is_empty() => Ok(v),
            _ if self.issues.is_empty() => Err(ValidationErrors::single("body", "Invalid input")),
            _ => Err(ValidationErrors(self.issues)),
        }
    }
}

fn expected(kind: &str, received: &Value) -> String {
    format!("Expected {kind}, received {}", json_type(received))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// ASCII email check.
///
/// - local part: letters, digits and `_ ' + - .`; no leading `.`, no `..`,
///   and it ends in a letter, digit, `_`, `+` or `-`
/// - domain: dot-separated labels of letters, digits and `-`, each starting
///   with a letter or digit
/// - top-level label: two or more letters
pub fn is_valid_email(value: &str) -> bool {
    if value.is_empty() || value.len() > MAX_EMAIL_LEN || value.contains("..") {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    let local_ok = !local.starts_with('.')
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '\'' | '+' | '-' | '.'))
        && local
            .chars()
            .last()
            .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-'));
    if !local_ok {
        return false;
    }

    let Some((hosts, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    let tld_ok = tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic());

    tld_ok
        && hosts.split('.').all(|label| {
            label.chars().next().is_some_and(|c| c.is_ascii_alphanumeric())
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn accepts_ordinary_addresses() {
        assert!(is_valid_email("test@example.com"));
        assert!(is_valid_email("first.last+tag@mail.example.co.uk"));
        assert!(is_valid_email("o'brien_1@sub-domain.example.org"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in [
            "",
            "plain",
            "@example.com",
            "user@",
            "user@localhost",
            "user@@example.com",
            "us er@example.com",
            ".user@example.com",
            "user@example..com",
            "user@-example.com",
            "a@b.c",
            "a@b.c1",
            "a@b.123",
            "a<b>@x.com",
            "user.@example.com",
            "us\u{e9}r@example.com",
        ] {
            assert!(!is_valid_email(bad), "{bad} should be rejected");
        }
    }

    #[test]
    fn empty_email_reports_invalid_email() {
        let mut v = Validator::new();
        let email = v
            .string("email", Some(json!("")))
            .and_then(|e| v.email("email", e));
        let err = v.finish(email).unwrap_err();
        assert_eq!(err.to_string(), "Invalid email at \"email\"");
    }

    #[test]
    fn collects_every_issue_in_field_order() {
        let mut v = Validator::new();
        let name = v.string("name", None);
        let password = v
            .string("password", Some(json!("abc")))
            .and_then(|p| v.min_chars("password", p, 6));
        let price = v.number("price", Some(json!(0))).and_then(|p| v.positive("price", p));

        let err = v.finish(name.zip(password).zip(price)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Required at \"name\"; String must contain at least 6 character(s) at \"password\"; \
             Number must be greater than 0 at \"price\""
        );
        assert_eq!(err.issues().len(), 3);
    }

    #[test]
    fn rejects_non_finite_prices() {
        let mut v = Validator::new();
        assert!(v.positive("price", f64::NAN).is_none());
        assert!(v.positive("price", f64::INFINITY).is_none());
        assert!(v.positive("price", -1.0).is_none());
        assert_eq!(v.finish(Some(())).unwrap_err().issues().len(), 3);
    }

    #[test]
    fn passing_fields_yield_the_value() {
        let mut v = Validator::new();
        let name = v
            .string("name", Some(json!("Widget")))
            .and_then(|n| v.not_blank("name", n));
        assert_eq!(v.finish(name).unwrap(), "Widget");
    }

    #[test]
    fn wrong_json_types_are_reported_per_field() {
        let mut v = Validator::new();
        let email = v.string("email", Some(json!(5)));
        let price = v.number("price", Some(json!("12")));
        let name = v.string("name", Some(Value::Null));
        let description = v.optional_string("description", Some(json!(["a"])));

        assert!(email.is_none() && price.is_none() && name.is_none() && description.is_none());
        assert_eq!(
            v.finish(Some(())).unwrap_err().to_string(),
            "Expected string, received number at \"email\"; \
             Expected number, received string at \"price\"; \
             Expected string, received null at \"name\"; \
             Expected string, received array at \"description\""
        );
    }

    #[test]
    fn absent_optional_string_is_valid() {
        let mut v = Validator::new();
        assert_eq!(v.optional_string("description", None), Some(None));
        assert_eq!(
            v.optional_string("description", Some(json!("Blue"))),
            Some(Some("Blue".to_string()))
        );
        assert!(v.finish(Some(())).is_ok());
    }

    #[test]
    fn blank_strings_are_rejected_by_not_blank() {
        let mut v = Validator::new();
        assert!(v.not_blank("name", "   ".to_string()).is_none());
        assert_eq!(
            v.finish(Some(())).unwrap_err().to_string(),
            "String must not be blank at \"name\""
        );
    }
}
