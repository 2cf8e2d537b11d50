//! Schema construction
//!
//! Schemas are written as [`Literal`] shapes and coerced into
//! [`SchemaNode`]s once, up front. Regexes are compiled here and never
//! during validation.
//!
//! ```ignore
//! use jsonshape::schema::{atleast_one, list_of, map, required, Kind};
//!
//! let schema = required([("must_be_here", Kind::String.into())])?
//!     .and(map([("a", Kind::Integer.into()), ("d", list_of(Kind::Integer))]))?
//!     .and(atleast_one([("more_keys", Kind::String.into())])?)?;
//! ```

use std::sync::OnceLock;

use super::errors::{SchemaError, SchemaResult};
use super::types::{DictSchema, Kind, Pattern, SchemaNode};

/// Timestamps such as `1997-07-16T19:20:30`, `1997-07-16T19:20:30.45`
/// or `1997-07-16T19:20:30.45+01:00`.
pub const JSON_TIMESTAMP_PATTERN: &str =
    r"\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d*)?(\s?\+\d{2}:\d{2})?";

/// Matches every value.
pub const ANYTYPE: Literal = Literal::Any;

/// An uncompiled schema shape.
#[derive(Debug, Clone)]
pub enum Literal {
    /// Wildcard
    Any,
    /// Runtime kind marker
    Type(Kind),
    /// Precompiled pattern
    Pattern(Pattern),
    /// `[T]`: list whose elements all match `T`
    List(Box<Literal>),
    /// Mapping; every key not wrapped in `optional` is required
    Map(Vec<(String, Literal)>),
    /// Dict field that may be absent or null
    Optional(Box<Literal>),
    /// Output of `required`, `atleast_one`, `one_of` or `merge`
    Fragment(DictSchema),
    /// Already coerced node
    Node(SchemaNode),
}

impl Literal {
    /// Short shape name used in diagnostics.
    pub fn shape_name(&self) -> &'static str {
        match self {
            Literal::Any => "any",
            Literal::Type(_) => "type",
            Literal::Pattern(_) => "pattern",
            Literal::List(_) => "list",
            Literal::Map(_) => "mapping",
            Literal::Optional(_) => "optional",
            Literal::Fragment(_) => "fragment",
            Literal::Node(node) => node.shape_name(),
        }
    }
}

impl From<Kind> for Literal {
    fn from(kind: Kind) -> Self {
        Literal::Type(kind)
    }
}

impl From<Pattern> for Literal {
    fn from(pattern: Pattern) -> Self {
        Literal::Pattern(pattern)
    }
}

impl From<DictSchema> for Literal {
    fn from(dict: DictSchema) -> Self {
        Literal::Fragment(dict)
    }
}

impl From<SchemaNode> for Literal {
    fn from(node: SchemaNode) -> Self {
        Literal::Node(node)
    }
}

/// Compiles `source` into a pattern literal matching whole strings.
pub fn pattern(source: &str) -> SchemaResult<Literal> {
    Ok(Literal::Pattern(Pattern::new(source)?))
}

/// Pattern literal for [`JSON_TIMESTAMP_PATTERN`].
pub fn json_timestamp() -> Literal {
    static TIMESTAMP: OnceLock<Pattern> = OnceLock::new();
    let compiled = TIMESTAMP.get_or_init(|| {
        Pattern::new(JSON_TIMESTAMP_PATTERN).expect("timestamp pattern is a valid regex")
    });
    Literal::Pattern(compiled.clone())
}

/// `[element]`
pub fn list_of(element: impl Into<Literal>) -> Literal {
    Literal::List(Box::new(element.into()))
}

/// A mapping literal. Keys keep their order.
pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Literal)>) -> Literal {
    Literal::Map(
        entries
            .into_iter()
            .map(|(key, value)| (key.into(), value))
            .collect(),
    )
}

/// Marks a dict field as optional: it may be absent or null.
pub fn optional(literal: impl Into<Literal>) -> Literal {
    Literal::Optional(Box::new(literal.into()))
}

/// Coerces a literal into a schema node.
pub fn coerce(literal: Literal) -> SchemaResult<SchemaNode> {
    match literal {
        Literal::Any => Ok(SchemaNode::Any),
        Literal::Type(kind) => Ok(SchemaNode::Type(kind)),
        Literal::Pattern(pattern) => Ok(SchemaNode::Pattern(pattern)),
        Literal::List(element) => Ok(SchemaNode::ListOf(Box::new(coerce(*element)?))),
        Literal::Map(entries) => Ok(SchemaNode::Dict(required(entries)?)),
        Literal::Optional(inner) => match coerce(*inner)? {
            node @ SchemaNode::Optional(_) => Ok(node),
            node => Ok(SchemaNode::Optional(Box::new(node))),
        },
        Literal::Fragment(dict) => Ok(SchemaNode::Dict(dict)),
        Literal::Node(node) => Ok(node),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Constraint {
    Required,
    AtLeastOne,
    OneOf,
}

/// Every key must be present, except those wrapped in [`optional`].
pub fn required<K: Into<String>>(
    entries: impl IntoIterator<Item = (K, Literal)>,
) -> SchemaResult<DictSchema> {
    fragment(entries, Constraint::Required)
}

/// At least one of the keys must be present.
pub fn atleast_one<K: Into<String>>(
    entries: impl IntoIterator<Item = (K, Literal)>,
) -> SchemaResult<DictSchema> {
    fragment(entries, Constraint::AtLeastOne)
}

/// Exactly one of the keys must be present.
pub fn one_of<K: Into<String>>(
    entries: impl IntoIterator<Item = (K, Literal)>,
) -> SchemaResult<DictSchema> {
    fragment(entries, Constraint::OneOf)
}

fn fragment<K: Into<String>>(
    entries: impl IntoIterator<Item = (K, Literal)>,
    constraint: Constraint,
) -> SchemaResult<DictSchema> {
    let mut dict = DictSchema::new();
    let mut group = Vec::new();

    for (key, literal) in entries {
        let key = key.into();
        if dict.field(&key).is_some() {
            return Err(SchemaError::DuplicateKey(key));
        }

        let node = coerce(literal)?;
        let is_optional = node.is_optional();
        dict.insert_field(key.clone(), node)?;

        match constraint {
            Constraint::Required if !is_optional => dict.require(key),
            Constraint::Required => {}
            Constraint::AtLeastOne | Constraint::OneOf => group.push(key),
        }
    }

    match constraint {
        Constraint::Required => {}
        Constraint::AtLeastOne if group.is_empty() => {
            return Err(SchemaError::EmptyGroup("at-least-one"))
        }
        Constraint::AtLeastOne => dict.add_at_least_one_group(group),
        Constraint::OneOf if group.is_empty() => return Err(SchemaError::EmptyGroup("one-of")),
        Constraint::OneOf => dict.add_one_of_group(group),
    }

    Ok(dict)
}

/// Unions two dict fragments.
///
/// The result does not depend on argument order except for the order in
/// which keys and groups are checked. A key declared on both sides must
/// carry the same schema.
pub fn merge(left: DictSchema, right: DictSchema) -> SchemaResult<DictSchema> {
    let mut merged = left;
    merged.absorb(right)?;
    Ok(merged)
}

impl DictSchema {
    /// Merges a fragment or a bare mapping (treated as [`required`]).
    pub fn and(self, other: impl Into<Literal>) -> SchemaResult<DictSchema> {
        let other = match other.into() {
            Literal::Map(entries) => required(entries)?,
            Literal::Fragment(dict) | Literal::Node(SchemaNode::Dict(dict)) => dict,
            other => return Err(SchemaError::NotMergeable(other.shape_name())),
        };
        merge(self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_leaf_literals() {
        assert_eq!(coerce(ANYTYPE).unwrap(), SchemaNode::Any);
        assert_eq!(
            coerce(Kind::String.into()).unwrap(),
            SchemaNode::Type(Kind::String)
        );
        assert!(matches!(
            coerce(pattern("^fo*$").unwrap()).unwrap(),
            SchemaNode::Pattern(_)
        ));
    }

    #[test]
    fn test_coerce_nested_list_and_map() {
        let node = coerce(list_of(map([("id", Literal::from(Kind::Integer))]))).unwrap();
        let SchemaNode::ListOf(element) = node else {
            panic!("expected list node");
        };
        let SchemaNode::Dict(dict) = *element else {
            panic!("expected dict element");
        };
        assert_eq!(dict.required_keys(), ["id".to_string()]);
    }

    #[test]
    fn test_bare_map_keys_are_required_unless_optional() {
        let node = coerce(map([
            ("a", Literal::from(Kind::Integer)),
            ("b", optional(Kind::String)),
        ]))
        .unwrap();
        let SchemaNode::Dict(dict) = node else {
            panic!("expected dict node");
        };
        assert_eq!(dict.required_keys(), ["a".to_string()]);
        assert!(dict.field("b").unwrap().is_optional());
    }

    #[test]
    fn test_nested_optional_collapses() {
        let node = coerce(optional(optional(Kind::String))).unwrap();
        assert_eq!(
            node,
            SchemaNode::Optional(Box::new(SchemaNode::Type(Kind::String)))
        );
    }

    #[test]
    fn test_duplicate_key_in_one_mapping() {
        let err = required([
            ("a", Literal::from(Kind::Integer)),
            ("a", Literal::from(Kind::Integer)),
        ])
        .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateKey(ref k) if k == "a"));
    }

    #[test]
    fn test_group_fragments() {
        let dict = one_of([("a", Literal::from(Kind::Integer)), ("b", Kind::List.into())]).unwrap();
        assert!(dict.required_keys().is_empty());
        assert_eq!(dict.one_of_groups(), [vec!["a".to_string(), "b".to_string()]]);

        let dict = atleast_one([("x", Literal::from(Kind::String))]).unwrap();
        assert_eq!(dict.at_least_one_groups(), [vec!["x".to_string()]]);
    }

    #[test]
    fn test_empty_groups_rejected() {
        let empty: Vec<(String, Literal)> = Vec::new();
        assert!(matches!(
            atleast_one(empty.clone()),
            Err(SchemaError::EmptyGroup("at-least-one"))
        ));
        assert!(matches!(one_of(empty.clone()), Err(SchemaError::EmptyGroup("one-of"))));
        assert!(required(empty).unwrap().fields().next().is_none());
    }

    #[test]
    fn test_and_accepts_bare_mapping() {
        let dict = required([("a", Literal::from(Kind::Integer))])
            .unwrap()
            .and(map([("b", Literal::from(Kind::String))]))
            .unwrap();
        assert_eq!(dict.required_keys(), ["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_and_rejects_non_dict_literals() {
        let base = required([("a", Literal::from(Kind::Integer))]).unwrap();
        let err = base.clone().and(list_of(Kind::Integer)).unwrap_err();
        assert!(matches!(err, SchemaError::NotMergeable("list")));

        let err = base.and(Kind::String).unwrap_err();
        assert!(matches!(err, SchemaError::NotMergeable("type")));
    }

    #[test]
    fn test_merge_same_key_same_schema() {
        let left = required([("a", Literal::from(Kind::Integer))]).unwrap();
        let right = atleast_one([("a", Literal::from(Kind::Integer))]).unwrap();
        let merged = merge(left, right).unwrap();
        assert_eq!(merged.fields().count(), 1);
        assert_eq!(merged.at_least_one_groups().len(), 1);
    }

    #[test]
    fn test_merge_conflicting_schemas() {
        let left = required([("a", Literal::from(Kind::Integer))]).unwrap();
        let right = required([("a", Literal::from(Kind::String))]).unwrap();
        let err = merge(left, right).unwrap_err();
        assert!(matches!(err, SchemaError::ConflictingKey(ref k) if k == "a"));
    }

    #[test]
    fn test_merge_is_commutative_on_sets() {
        let a = required([("a", Literal::from(Kind::Integer))]).unwrap();
        let b = one_of([("x", Literal::from(Kind::String)), ("y", Kind::String.into())]).unwrap();

        let ab = merge(a.clone(), b.clone()).unwrap();
        let ba = merge(b, a).unwrap();

        let mut ab_keys: Vec<_> = ab.fields().map(|(k, _)| k.to_string()).collect();
        let mut ba_keys: Vec<_> = ba.fields().map(|(k, _)| k.to_string()).collect();
        ab_keys.sort();
        ba_keys.sort();
        assert_eq!(ab_keys, ba_keys);
        assert_eq!(ab.required_keys(), ba.required_keys());
        assert_eq!(ab.one_of_groups(), ba.one_of_groups());
    }

    #[test]
    fn test_json_timestamp_is_cached_pattern() {
        let Literal::Pattern(p) = json_timestamp() else {
            panic!("expected pattern literal");
        };
        assert!(p.is_full_match("1997-07-16T19:20:30"));
        assert!(p.is_full_match("1997-07-16T19:20:30.45"));
        assert!(p.is_full_match("1997-07-16T19:20:30+01:00"));
        assert!(p.is_full_match("1997-07-16T19:20:30.45 +01:00"));
        assert!(!p.is_full_match("1997-07-16"));
    }
}
