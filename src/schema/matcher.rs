//! Matcher engine
//!
//! Walks a value against a schema and stops at the first violation.
//! Dict checks run in a fixed order, which decides the reported error
//! when several constraints fail at once:
//! 1. value is an object
//! 2. required keys, in declaration order
//! 3. at-least-one groups, in declaration order
//! 4. one-of groups, in declaration order
//! 5. declared fields present in the value, in declaration order
//!
//! Keys the schema does not declare are ignored. The value is never
//! modified.

use serde_json::{Map, Value};

use super::errors::{ValidationError, ValidationResult};
use super::path::{JsonPath, PathStep};
use super::types::{DictSchema, SchemaNode};

/// Validates `value` against `schema`. `root_name` names the value in
/// error paths.
pub fn validate(schema: &SchemaNode, value: &Value, root_name: &str) -> ValidationResult {
    match_node(schema, value, &Trail::Root(root_name))
}

impl SchemaNode {
    /// See [`validate`].
    pub fn validate(&self, value: &Value, root_name: &str) -> ValidationResult {
        validate(self, value, root_name)
    }
}

impl DictSchema {
    /// Validates `value` against this dict schema.
    pub fn validate(&self, value: &Value, root_name: &str) -> ValidationResult {
        match_dict(self, value, &Trail::Root(root_name))
    }
}

/// Borrowed path used while recursing; only turned into a [`JsonPath`]
/// when an error is raised.
enum Trail<'a> {
    Root(&'a str),
    Key(&'a Trail<'a>, &'a str),
    Index(&'a Trail<'a>, usize),
}

impl Trail<'_> {
    fn to_path(&self) -> JsonPath {
        match self {
            Trail::Root(name) => JsonPath::root(*name),
            Trail::Key(parent, key) => {
                let mut path = parent.to_path();
                path.push(PathStep::Key((*key).to_string()));
                path
            }
            Trail::Index(parent, i) => {
                let mut path = parent.to_path();
                path.push(PathStep::Index(*i));
                path
            }
        }
    }
}

fn match_node(node: &SchemaNode, value: &Value, trail: &Trail<'_>) -> ValidationResult {
    match node {
        SchemaNode::Any => Ok(()),
        SchemaNode::Type(kind) => {
            if kind.accepts(value) {
                Ok(())
            } else {
                Err(ValidationError::type_mismatch(trail.to_path(), *kind, value))
            }
        }
        SchemaNode::Pattern(pattern) => match value.as_str() {
            Some(s) if pattern.is_full_match(s) => Ok(()),
            _ => Err(ValidationError::regex_mismatch(
                trail.to_path(),
                pattern,
                value,
            )),
        },
        SchemaNode::ListOf(element) => {
            let items = value
                .as_array()
                .ok_or_else(|| ValidationError::not_a_list(trail.to_path(), value))?;

            for (i, item) in items.iter().enumerate() {
                match_node(element, item, &Trail::Index(trail, i))?;
            }
            Ok(())
        }
        SchemaNode::Dict(dict) => match_dict(dict, value, trail),
        SchemaNode::Optional(inner) => {
            if value.is_null() {
                Ok(())
            } else {
                match_node(inner, value, trail)
            }
        }
    }
}

fn match_dict(dict: &DictSchema, value: &Value, trail: &Trail<'_>) -> ValidationResult {
    let obj = value
        .as_object()
        .ok_or_else(|| ValidationError::not_a_dict(trail.to_path(), value))?;

    for key in dict.required_keys() {
        if !obj.contains_key(key) {
            return Err(ValidationError::missing_required_key(trail.to_path(), key));
        }
    }

    for group in dict.at_least_one_groups() {
        if present_keys(obj, group).is_empty() {
            return Err(ValidationError::at_least_one_group_empty(
                trail.to_path(),
                group,
            ));
        }
    }

    for group in dict.one_of_groups() {
        let present = present_keys(obj, group);
        match present.len() {
            0 => return Err(ValidationError::one_of_group_empty(trail.to_path(), group)),
            1 => {}
            _ => {
                return Err(ValidationError::one_of_group_ambiguous(
                    trail.to_path(),
                    group,
                    &present,
                ))
            }
        }
    }

    for (key, field) in dict.fields() {
        if let Some(child) = obj.get(key) {
            match_node(field, child, &Trail::Key(trail, key))?;
        }
    }

    Ok(())
}

/// Keys of `group` present in `obj`, in group order.
fn present_keys<'g>(obj: &Map<String, Value>, group: &'g [String]) -> Vec<&'g str> {
    group
        .iter()
        .filter(|key| obj.contains_key(key.as_str()))
        .map(|key| key.as_str())
        .collect()
}
