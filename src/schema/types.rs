//! Schema node model
//!
//! A schema is a tree of [`SchemaNode`]s built once and never mutated
//! afterwards. Nodes are `Send + Sync` and may be shared freely between
//! concurrent validations.
//!
//! Supported shapes:
//! - any: every value, including null
//! - type: string, boolean, integer, float, list, object
//! - pattern: strings fully matching a compiled regex
//! - list-of: arrays whose elements all match one element schema
//! - dict: objects with declared fields and cross-key constraints

use regex::Regex;
use serde_json::Value;
use std::fmt;

use super::errors::{SchemaError, SchemaResult};

/// Runtime kinds a [`SchemaNode::Type`] can demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// UTF-8 string
    String,
    /// true / false
    Boolean,
    /// Any JSON number
    Integer,
    /// Any JSON number
    Float,
    /// Array of anything
    List,
    /// Object of anything
    Object,
}

impl Kind {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Boolean => "boolean",
            Kind::Integer => "integer",
            Kind::Float => "float",
            Kind::List => "list",
            Kind::Object => "object",
        }
    }

    /// Whether `value` has a compatible runtime kind.
    ///
    /// JSON has a single numeric type, so `Integer` and `Float` both accept
    /// every number: `1.0` is an integer and `1` is a float.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Kind::String => value.is_string(),
            Kind::Boolean => value.is_boolean(),
            Kind::Integer | Kind::Float => value.is_number(),
            Kind::List => value.is_array(),
            Kind::Object => value.is_object(),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A regular expression that must match an entire string.
///
/// Compiled once at construction; the source text is kept for diagnostics.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compiles `source`, anchored at both ends.
    pub fn new(source: &str) -> SchemaResult<Self> {
        let regex = Regex::new(&format!("^(?:{})$", source)).map_err(|e| {
            SchemaError::InvalidPattern {
                pattern: source.to_string(),
                source: e,
            }
        })?;

        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// Returns the pattern as written by the schema author.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// True if the whole of `s` matches.
    pub fn is_full_match(&self, s: &str) -> bool {
        self.regex.is_match(s)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Pattern {}

/// One allowed shape for a JSON value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaNode {
    /// Matches every value
    Any,
    /// Matches values of a runtime kind
    Type(Kind),
    /// Matches strings fully matching a pattern
    Pattern(Pattern),
    /// Matches arrays whose every element matches the inner node
    ListOf(Box<SchemaNode>),
    /// Matches objects satisfying a dict schema
    Dict(DictSchema),
    /// Dict field that may be absent or null
    Optional(Box<SchemaNode>),
}

impl SchemaNode {
    /// Short shape name used in diagnostics.
    pub fn shape_name(&self) -> &'static str {
        match self {
            SchemaNode::Any => "any",
            SchemaNode::Type(_) => "type",
            SchemaNode::Pattern(_) => "pattern",
            SchemaNode::ListOf(_) => "list",
            SchemaNode::Dict(_) => "dict",
            SchemaNode::Optional(_) => "optional",
        }
    }

    /// True for [`SchemaNode::Optional`].
    pub fn is_optional(&self) -> bool {
        matches!(self, SchemaNode::Optional(_))
    }
}

impl From<DictSchema> for SchemaNode {
    fn from(dict: DictSchema) -> Self {
        SchemaNode::Dict(dict)
    }
}

impl From<Kind> for SchemaNode {
    fn from(kind: Kind) -> Self {
        SchemaNode::Type(kind)
    }
}

/// Dict schema: declared fields plus the cross-key constraints.
///
/// Every key named by `required`, `at_least_one` or `one_of` is also a key
/// of `fields`. Keys are kept in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DictSchema {
    fields: Vec<(String, SchemaNode)>,
    required: Vec<String>,
    at_least_one: Vec<Vec<String>>,
    one_of: Vec<Vec<String>>,
}

impl DictSchema {
    /// Creates a dict schema with no fields and no constraints.
    ///
    /// It accepts any object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declared fields, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &SchemaNode)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Schema declared for `key`.
    pub fn field(&self, key: &str) -> Option<&SchemaNode> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Keys that must be present.
    pub fn required_keys(&self) -> &[String] {
        &self.required
    }

    /// Groups of which at least one key must be present.
    pub fn at_least_one_groups(&self) -> &[Vec<String>] {
        &self.at_least_one
    }

    /// Groups of which exactly one key must be present.
    pub fn one_of_groups(&self) -> &[Vec<String>] {
        &self.one_of
    }

    /// Declares `key`. Redeclaring a key with an identical schema is a
    /// no-op; with a different schema it is a conflict.
    pub(crate) fn insert_field(&mut self, key: String, node: SchemaNode) -> SchemaResult<()> {
        match self.fields.iter().find(|(k, _)| *k == key) {
            Some((_, existing)) if *existing == node => Ok(()),
            Some(_) => Err(SchemaError::ConflictingKey(key)),
            None => {
                self.fields.push((key, node));
                Ok(())
            }
        }
    }

    pub(crate) fn require(&mut self, key: String) {
        if !self.required.contains(&key) {
            self.required.push(key);
        }
    }

    pub(crate) fn add_at_least_one_group(&mut self, group: Vec<String>) {
        if !self.at_least_one.contains(&group) {
            self.at_least_one.push(group);
        }
    }

    pub(crate) fn add_one_of_group(&mut self, group: Vec<String>) {
        if !self.one_of.contains(&group) {
            self.one_of.push(group);
        }
    }

    /// Folds `other` into `self`: fields, required keys and groups are
    /// unioned.
    pub(crate) fn absorb(&mut self, other: DictSchema) -> SchemaResult<()> {
        for (key, node) in other.fields {
            self.insert_field(key, node)?;
        }
        for key in other.required {
            self.require(key);
        }
        for group in other.at_least_one {
            self.add_at_least_one_group(group);
        }
        for group in other.one_of {
            self.add_one_of_group(group);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_kinds_interchangeable() {
        assert!(Kind::Integer.accepts(&json!(1)));
        assert!(Kind::Integer.accepts(&json!(1.5)));
        assert!(Kind::Float.accepts(&json!(2)));
        assert!(Kind::Float.accepts(&json!(-0.25)));
        assert!(!Kind::Integer.accepts(&json!("1")));
    }

    #[test]
    fn test_null_matches_no_kind() {
        for kind in [
            Kind::String,
            Kind::Boolean,
            Kind::Integer,
            Kind::Float,
            Kind::List,
            Kind::Object,
        ] {
            assert!(!kind.accepts(&Value::Null), "{} accepted null", kind);
        }
    }

    #[test]
    fn test_pattern_is_anchored() {
        let p = Pattern::new("fo*").unwrap();
        assert!(p.is_full_match("foooo"));
        assert!(p.is_full_match("f"));
        assert!(!p.is_full_match("xfoo"));
        assert!(!p.is_full_match("foox"));
        assert_eq!(p.as_str(), "fo*");
    }

    #[test]
    fn test_pattern_alternation_is_anchored_as_a_whole() {
        let p = Pattern::new("a|ab").unwrap();
        assert!(p.is_full_match("ab"));
        assert!(!p.is_full_match("abc"));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let err = Pattern::new("(unclosed").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidPattern { .. }));
    }

    #[test]
    fn test_insert_field_conflict() {
        let mut dict = DictSchema::new();
        dict.insert_field("a".into(), SchemaNode::Type(Kind::String)).unwrap();
        dict.insert_field("a".into(), SchemaNode::Type(Kind::String)).unwrap();
        assert_eq!(dict.fields().count(), 1);

        let err = dict
            .insert_field("a".into(), SchemaNode::Type(Kind::Boolean))
            .unwrap_err();
        assert!(matches!(err, SchemaError::ConflictingKey(ref k) if k == "a"));
    }

    #[test]
    fn test_absorb_unions_constraints() {
        let mut left = DictSchema::new();
        left.insert_field("a".into(), SchemaNode::Any).unwrap();
        left.require("a".into());

        let mut right = DictSchema::new();
        right.insert_field("b".into(), SchemaNode::Any).unwrap();
        right.insert_field("c".into(), SchemaNode::Any).unwrap();
        right.add_one_of_group(vec!["b".into(), "c".into()]);

        left.absorb(right).unwrap();

        assert_eq!(left.required_keys(), ["a".to_string()]);
        assert_eq!(left.one_of_groups().len(), 1);
        assert!(left.field("c").is_some());
        assert!(left.at_least_one_groups().is_empty());
    }
}
