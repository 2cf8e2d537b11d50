//! jsonshape - declarative shape validation for decoded JSON values
//!
//! A schema is written as data (required keys, at-least-one and one-of key
//! groups, element types, regex-constrained strings, nested structures) and
//! applied to a `serde_json::Value`. The first violation is returned as a
//! [`ValidationError`] whose message starts with the path to the offending
//! value, e.g. `client_json['h'] requires one of these keys: ['a', 'b'],
//! but found several: ['a', 'b']`.

pub mod config;
pub mod observability;
pub mod schema;

pub use config::{ConfigError, FailureMode, ValidatorConfig};
pub use schema::{
    atleast_one, coerce, json_timestamp, list_of, map, merge, one_of, optional, pattern,
    required, validate, validate_or_warn, DictSchema, Kind, Literal, SchemaError, SchemaNode,
    SchemaRegistry, ValidationError, ValidationErrorCode, Validator, ANYTYPE,
};
