//! Declarative field validators.

use regex::Regex;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Validator {
    /// Value must be present and not blank.
    PresenceOf { message: String },
    /// Value must equal `value` exactly (e.g. a CSRF token).
    Identical {
        #[serde(skip_serializing)]
        value: String,
        message: String,
    },
    /// Length in characters within `min..=max`.
    #[serde(rename_all = "camelCase")]
    StringLength {
        min: Option<usize>,
        max: Option<usize>,
        message_minimum: String,
        message_maximum: String,
    },
    Regex { pattern: String, message: String },
}

impl Validator {
    pub fn presence_of(message: impl Into<String>) -> Self {
        Validator::PresenceOf { message: message.into() }
    }

    pub fn identical(value: impl Into<String>, message: impl Into<String>) -> Self {
        Validator::Identical {
            value: value.into(),
            message: message.into(),
        }
    }

    pub fn string_length(field: &str, min: Option<usize>, max: Option<usize>) -> Self {
        Validator::StringLength {
            min,
            max,
            message_minimum: format!("{} must be at least {} characters", field, min.unwrap_or(0)),
            message_maximum: format!("{} must be at most {} characters", field, max.unwrap_or(0)),
        }
    }

    pub fn regex(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Validator::Regex {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Message when `value` fails this validator. A missing value validates as empty.
    pub fn check(&self, field: &str, value: Option<&str>) -> Option<String> {
        let v = value.unwrap_or("");
        match self {
            Validator::PresenceOf { message } => v.trim().is_empty().then(|| message.clone()),
            Validator::Identical { value, message } => (v != value).then(|| message.clone()),
            Validator::StringLength {
                min,
                max,
                message_minimum,
                message_maximum,
            } => {
                let len = v.chars().count();
                if min.is_some_and(|min| len < min) {
                    Some(message_minimum.clone())
                } else if max.is_some_and(|max| len > max) {
                    Some(message_maximum.clone())
                } else {
                    None
                }
            }
            Validator::Regex { pattern, message } => match Regex::new(pattern) {
                Ok(re) => (!re.is_match(v)).then(|| message.clone()),
                Err(_) => Some(format!("invalid pattern for {}", field)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presence_rejects_missing_and_blank() {
        let v = Validator::presence_of("The title is required.");
        assert_eq!(v.check("title", None).as_deref(), Some("The title is required."));
        assert_eq!(v.check("title", Some("   ")).as_deref(), Some("The title is required."));
        assert_eq!(v.check("title", Some("Hello")), None);
    }

    #[test]
    fn identical_compares_exactly() {
        let v = Validator::identical("tok123", "CSRF validation failed");
        assert_eq!(v.check("csrf", Some("tok123")), None);
        assert!(v.check("csrf", Some("tok124")).is_some());
        assert!(v.check("csrf", None).is_some());
    }

    #[test]
    fn string_length_counts_characters() {
        let v = Validator::string_length("title", Some(2), Some(4));
        assert_eq!(v.check("title", Some("é")).as_deref(), Some("title must be at least 2 characters"));
        assert_eq!(v.check("title", Some("éééé")), None);
        assert_eq!(v.check("title", Some("abcde")).as_deref(), Some("title must be at most 4 characters"));
    }

    #[test]
    fn regex_matches_and_reports_bad_patterns() {
        let v = Validator::regex("^[YN]$", "Locked must be Y or N.");
        assert_eq!(v.check("locked", Some("Y")), None);
        assert!(v.check("locked", Some("maybe")).is_some());
        let broken = Validator::regex("(", "never");
        assert_eq!(broken.check("locked", Some("Y")).as_deref(), Some("invalid pattern for locked"));
    }

    #[test]
    fn identical_value_is_not_serialized() {
        let body = serde_json::to_value(Validator::identical("secret", "CSRF validation failed")).unwrap();
        assert_eq!(body["type"], "identical");
        assert!(body.get("value").is_none());
    }
}
