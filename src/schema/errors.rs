//! Schema error types
//!
//! Validation error codes (first violation wins, nothing is aggregated):
//! - JSONSHAPE_NOT_A_DICT
//! - JSONSHAPE_NOT_A_LIST
//! - JSONSHAPE_TYPE_MISMATCH
//! - JSONSHAPE_REGEX_MISMATCH
//! - JSONSHAPE_MISSING_REQUIRED_KEY
//! - JSONSHAPE_AT_LEAST_ONE_GROUP_EMPTY
//! - JSONSHAPE_ONE_OF_GROUP_EMPTY
//! - JSONSHAPE_ONE_OF_GROUP_AMBIGUOUS
//!
//! Construction problems are reported separately as [`SchemaError`].

use serde_json::Value;
use std::fmt;
use thiserror::Error;

use super::path::{quote_key, render_keys, JsonPath};
use super::types::{Kind, Pattern};

/// Longest value preview embedded in a message.
const PREVIEW_LIMIT: usize = 64;

/// Validation error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorCode {
    /// Dict schema applied to a non-object
    NotADict,
    /// List schema applied to a non-array
    NotAList,
    /// Value has the wrong runtime kind
    TypeMismatch,
    /// Non-string, or string not fully matching the pattern
    RegexMismatch,
    /// Required key absent
    MissingRequiredKey,
    /// No key of an at-least-one group present
    AtLeastOneGroupEmpty,
    /// No key of a one-of group present
    OneOfGroupEmpty,
    /// Several keys of a one-of group present
    OneOfGroupAmbiguous,
}

impl ValidationErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            ValidationErrorCode::NotADict => "JSONSHAPE_NOT_A_DICT",
            ValidationErrorCode::NotAList => "JSONSHAPE_NOT_A_LIST",
            ValidationErrorCode::TypeMismatch => "JSONSHAPE_TYPE_MISMATCH",
            ValidationErrorCode::RegexMismatch => "JSONSHAPE_REGEX_MISMATCH",
            ValidationErrorCode::MissingRequiredKey => "JSONSHAPE_MISSING_REQUIRED_KEY",
            ValidationErrorCode::AtLeastOneGroupEmpty => "JSONSHAPE_AT_LEAST_ONE_GROUP_EMPTY",
            ValidationErrorCode::OneOfGroupEmpty => "JSONSHAPE_ONE_OF_GROUP_EMPTY",
            ValidationErrorCode::OneOfGroupAmbiguous => "JSONSHAPE_ONE_OF_GROUP_AMBIGUOUS",
        }
    }
}

impl fmt::Display for ValidationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A value failed to match its schema.
///
/// `message()` is the full rendered text, always prefixed by the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    code: ValidationErrorCode,
    path: JsonPath,
    detail: String,
    message: String,
}

impl ValidationError {
    fn new(code: ValidationErrorCode, path: JsonPath, detail: String) -> Self {
        let message = format!("{} {}", path, detail);
        Self {
            code,
            path,
            detail,
            message,
        }
    }

    /// Value is not an object
    pub fn not_a_dict(path: JsonPath, actual: &Value) -> Self {
        Self::new(
            ValidationErrorCode::NotADict,
            path,
            kind_clause(actual, "object"),
        )
    }

    /// Value is not an array
    pub fn not_a_list(path: JsonPath, actual: &Value) -> Self {
        Self::new(
            ValidationErrorCode::NotAList,
            path,
            kind_clause(actual, "list"),
        )
    }

    /// Value has the wrong kind
    pub fn type_mismatch(path: JsonPath, expected: Kind, actual: &Value) -> Self {
        Self::new(
            ValidationErrorCode::TypeMismatch,
            path,
            kind_clause(actual, expected.type_name()),
        )
    }

    /// Value is not a string fully matching `pattern`
    pub fn regex_mismatch(path: JsonPath, pattern: &Pattern, actual: &Value) -> Self {
        let detail = if actual.is_string() {
            format!(
                "= {}, does not match required pattern {}",
                preview(actual),
                quote_key(pattern.as_str())
            )
        } else {
            format!(
                "= {}, which is of type {}. A string matching pattern {} is required",
                preview(actual),
                json_type_name(actual),
                quote_key(pattern.as_str())
            )
        };
        Self::new(ValidationErrorCode::RegexMismatch, path, detail)
    }

    /// Required key absent
    pub fn missing_required_key(path: JsonPath, key: &str) -> Self {
        Self::new(
            ValidationErrorCode::MissingRequiredKey,
            path,
            format!("requires key {}", quote_key(key)),
        )
    }

    /// None of an at-least-one group present
    pub fn at_least_one_group_empty<S: AsRef<str>>(path: JsonPath, group: &[S]) -> Self {
        Self::new(
            ValidationErrorCode::AtLeastOneGroupEmpty,
            path,
            format!(
                "requires *at least* one of these keys, but found none: {}",
                render_keys(group)
            ),
        )
    }

    /// None of a one-of group present
    pub fn one_of_group_empty<S: AsRef<str>>(path: JsonPath, group: &[S]) -> Self {
        Self::new(
            ValidationErrorCode::OneOfGroupEmpty,
            path,
            format!(
                "requires one of these keys: {}, but found none",
                render_keys(group)
            ),
        )
    }

    /// Several of a one-of group present
    pub fn one_of_group_ambiguous<S: AsRef<str>, P: AsRef<str>>(
        path: JsonPath,
        group: &[S],
        present: &[P],
    ) -> Self {
        Self::new(
            ValidationErrorCode::OneOfGroupAmbiguous,
            path,
            format!(
                "requires one of these keys: {}, but found several: {}",
                render_keys(group),
                render_keys(present)
            ),
        )
    }

    /// Returns the error code
    pub fn code(&self) -> ValidationErrorCode {
        self.code
    }

    /// Returns where the violation was found
    pub fn path(&self) -> &JsonPath {
        &self.path
    }

    /// Returns the message without the path prefix
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Returns the full path-qualified message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Result of matching a value against a schema
pub type ValidationResult = Result<(), ValidationError>;

/// Schema construction errors
#[derive(Debug, Clone, Error)]
pub enum SchemaError {
    #[error("key '{0}' is declared more than once in the same mapping")]
    DuplicateKey(String),

    #[error("key '{0}' is declared with conflicting schemas")]
    ConflictingKey(String),

    #[error("only dict-shaped fragments can be merged, found {0}")]
    NotMergeable(&'static str),

    #[error("{0} group must name at least one key")]
    EmptyGroup(&'static str),

    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("schema '{0}' is already registered")]
    AlreadyRegistered(String),
}

/// Result type for schema construction
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Returns the JSON type name for error messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "integer"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// `= <value>, which is of type <actual>. A value of type <expected> is required`
fn kind_clause(actual: &Value, expected: &str) -> String {
    format!(
        "= {}, which is of type {}. A value of type {} is required",
        preview(actual),
        json_type_name(actual),
        expected
    )
}

/// Compact rendering of a value, cut at [`PREVIEW_LIMIT`] characters.
/// Strings are cut before quoting so the closing quote survives.
fn preview(value: &Value) -> String {
    match value {
        Value::String(s) if s.chars().count() > PREVIEW_LIMIT => {
            let cut: String = s.chars().take(PREVIEW_LIMIT).collect();
            format!("{}...", quote_key(&cut))
        }
        Value::String(s) => quote_key(s),
        other => {
            let rendered = other.to_string();
            if rendered.chars().count() <= PREVIEW_LIMIT {
                rendered
            } else {
                let cut: String = rendered.chars().take(PREVIEW_LIMIT).collect();
                format!("{}...", cut)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::path::PathStep;
    use serde_json::json;

    fn root() -> JsonPath {
        JsonPath::root("client_json")
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(ValidationErrorCode::NotADict.code(), "JSONSHAPE_NOT_A_DICT");
        assert_eq!(ValidationErrorCode::NotAList.code(), "JSONSHAPE_NOT_A_LIST");
        assert_eq!(
            ValidationErrorCode::OneOfGroupAmbiguous.code(),
            "JSONSHAPE_ONE_OF_GROUP_AMBIGUOUS"
        );
    }

    #[test]
    fn test_at_least_one_message() {
        let err = ValidationError::at_least_one_group_empty(root(), &["more_keys"]);
        assert_eq!(
            err.to_string(),
            "client_json requires *at least* one of these keys, but found none: ['more_keys']"
        );
        assert_eq!(err.code(), ValidationErrorCode::AtLeastOneGroupEmpty);
    }

    #[test]
    fn test_one_of_messages() {
        let path = root().join(PathStep::Key("h".into()));
        let err =
            ValidationError::one_of_group_ambiguous(path.clone(), &["a", "b"], &["a", "b"]);
        assert_eq!(
            err.message(),
            "client_json['h'] requires one of these keys: ['a', 'b'], but found several: ['a', 'b']"
        );

        let err = ValidationError::one_of_group_empty(path, &["a", "b"]);
        assert_eq!(
            err.message(),
            "client_json['h'] requires one of these keys: ['a', 'b'], but found none"
        );
    }

    #[test]
    fn test_type_mismatch_message() {
        let path = root().join(PathStep::Key("a".into()));
        let err = ValidationError::type_mismatch(path, Kind::Integer, &json!("wrong"));
        assert_eq!(
            err.detail(),
            "= 'wrong', which is of type string. A value of type integer is required"
        );
        assert_eq!(err.path().to_string(), "client_json['a']");
        assert_eq!(err.message(), format!("client_json['a'] {}", err.detail()));
    }

    #[test]
    fn test_regex_mismatch_messages() {
        let pattern = Pattern::new("fo*").unwrap();
        let err = ValidationError::regex_mismatch(root(), &pattern, &json!("bar"));
        assert_eq!(
            err.message(),
            "client_json = 'bar', does not match required pattern 'fo*'"
        );

        let err = ValidationError::regex_mismatch(root(), &pattern, &json!(5));
        assert!(err.message().contains("which is of type integer"));
    }

    #[test]
    fn test_long_values_are_truncated() {
        let long = "x".repeat(500);
        let err = ValidationError::type_mismatch(root(), Kind::Integer, &json!(long));
        assert!(err.message().len() < 200);
        assert!(err.message().contains("..."));

        let accented = "é".repeat(100);
        let err = ValidationError::type_mismatch(root(), Kind::Integer, &json!(accented));
        let expected = format!("= '{}'..., which is of type string", "é".repeat(PREVIEW_LIMIT));
        assert!(err.detail().starts_with(&expected));
    }

    #[test]
    fn test_json_type_names() {
        assert_eq!(json_type_name(&json!(null)), "null");
        assert_eq!(json_type_name(&json!(true)), "boolean");
        assert_eq!(json_type_name(&json!(3)), "integer");
        assert_eq!(json_type_name(&json!(3.5)), "float");
        assert_eq!(json_type_name(&json!([])), "list");
        assert_eq!(json_type_name(&json!({})), "object");
    }
}
