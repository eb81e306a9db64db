use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use email_address::EmailAddress;

type Predicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// A named, pure predicate over a field's candidate text.
///
/// Only [`Rule::Required`] rejects empty input. Every other rule treats an empty value as "not
/// provided" and passes it, so they compose with or without `Required`.
#[derive(Clone)]
pub enum Rule {
    /// Non-empty after trimming.
    Required,
    /// A syntactically valid email address.
    Email,
    /// A whole number, optionally within inclusive bounds.
    Integer { min: Option<i64>, max: Option<i64> },
    /// One of a fixed list of options (exact match after trimming).
    OneOf(Vec<String>),
    /// A calendar date in the given `chrono` format, e.g. `%Y-%m-%d`.
    Date { format: String },
    /// A user predicate. `{label}` in `message` is replaced with the field label.
    Custom {
        name: String,
        message: String,
        check: Predicate,
    },
}

impl Rule {
    pub fn integer() -> Self {
        Rule::Integer {
            min: None,
            max: None,
        }
    }

    pub fn integer_between(min: i64, max: i64) -> Self {
        Rule::Integer {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn one_of<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rule::OneOf(options.into_iter().map(Into::into).collect())
    }

    pub fn iso_date() -> Self {
        Rule::Date {
            format: "%Y-%m-%d".to_string(),
        }
    }

    pub fn custom<F>(name: impl Into<String>, message: impl Into<String>, check: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Rule::Custom {
            name: name.into(),
            message: message.into(),
            check: Arc::new(check),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Rule::Required => "required",
            Rule::Email => "email",
            Rule::Integer { .. } => "integer",
            Rule::OneOf(_) => "one_of",
            Rule::Date { .. } => "date",
            Rule::Custom { name, .. } => name,
        }
    }

    pub fn check(&self, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return !matches!(self, Rule::Required);
        }
        match self {
            Rule::Required => true,
            Rule::Email => EmailAddress::from_str(value).is_ok(),
            Rule::Integer { min, max } => match value.parse::<i64>() {
                Ok(n) => min.is_none_or(|lo| n >= lo) && max.is_none_or(|hi| n <= hi),
                Err(_) => false,
            },
            Rule::OneOf(options) => options.iter().any(|o| o == value),
            Rule::Date { format } => NaiveDate::parse_from_str(value, format).is_ok(),
            Rule::Custom { check, .. } => check(value),
        }
    }

    /// The message stored for a cell that fails this rule.
    pub fn message(&self, label: &str) -> String {
        match self {
            Rule::Required => format!("{label} is required"),
            Rule::Email => format!("{label} must be a valid email"),
            Rule::Integer {
                min: Some(lo),
                max: Some(hi),
            } => format!("{label} must be between {lo} and {hi}"),
            Rule::Integer {
                min: Some(lo),
                max: None,
            } => format!("{label} must be at least {lo}"),
            Rule::Integer {
                min: None,
                max: Some(hi),
            } => format!("{label} must be at most {hi}"),
            Rule::Integer { .. } => format!("{label} must be a whole number"),
            Rule::OneOf(options) => format!("{label} must be one of: {}", options.join(", ")),
            Rule::Date { format } => format!("{label} must be a date ({format})"),
            Rule::Custom { message, .. } => message.replace("{label}", label),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Integer { min, max } => f
                .debug_struct("Integer")
                .field("min", min)
                .field("max", max)
                .finish(),
            Rule::OneOf(options) => f.debug_tuple("OneOf").field(options).finish(),
            Rule::Date { format } => f.debug_struct("Date").field("format", format).finish(),
            other => f.write_str(other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_trims_whitespace() {
        assert!(!Rule::Required.check(""));
        assert!(!Rule::Required.check("   \t"));
        assert!(Rule::Required.check(" Jane "));
    }

    #[test]
    fn optional_rules_pass_empty_input() {
        for rule in [
            Rule::Email,
            Rule::integer(),
            Rule::one_of(["Active"]),
            Rule::iso_date(),
        ] {
            assert!(rule.check(""), "{} rejected empty input", rule.name());
        }
    }

    #[test]
    fn email_shape() {
        assert!(Rule::Email.check("jane.smith@example.com"));
        assert!(!Rule::Email.check("jane.smith"));
        assert_eq!(Rule::Email.message("Email"), "Email must be a valid email");
    }

    #[test]
    fn integer_bounds() {
        let rule = Rule::integer_between(0, 150);
        assert!(rule.check("45"));
        assert!(!rule.check("151"));
        assert!(!rule.check("4.5"));
        assert_eq!(rule.message("Age"), "Age must be between 0 and 150");
    }

    #[test]
    fn enum_membership_and_dates() {
        assert!(Rule::one_of(["Active", "Pending"]).check("Pending"));
        assert!(!Rule::one_of(["Active", "Pending"]).check("pending"));
        assert!(Rule::iso_date().check("2021-03-15"));
        assert!(!Rule::iso_date().check("2021-02-30"));
    }

    #[test]
    fn custom_rule_substitutes_label() {
        let rule = Rule::custom("no_digits", "{label} cannot contain digits", |v| {
            !v.chars().any(|c| c.is_ascii_digit())
        });
        assert!(!rule.check("J4ne"));
        assert_eq!(rule.message("First Name"), "First Name cannot contain digits");
        assert_eq!(format!("{rule:?}"), "no_digits");
    }
}
