//! Schema subsystem for jsonshape
//!
//! Schemas describe the shape a decoded JSON value must have. They are
//! built once, then applied to any number of values.
//!
//! # Design Principles
//!
//! - Schemas are immutable after construction
//! - Regexes compile at construction, never during validation
//! - Validation is pure: the value is never modified
//! - Fail fast: the first violation is the one reported
//! - Unknown keys are ignored
//! - Deterministic check order

mod builder;
mod errors;
mod matcher;
mod path;
mod registry;
mod types;
mod validator;

pub use builder::{
    atleast_one, coerce, json_timestamp, list_of, map, merge, one_of, optional, pattern,
    required, Literal, ANYTYPE, JSON_TIMESTAMP_PATTERN,
};
pub use errors::{
    SchemaError, SchemaResult, ValidationError, ValidationErrorCode, ValidationResult,
};
pub use matcher::validate;
pub use path::{JsonPath, PathStep};
pub use registry::{RegistryError, SchemaRegistry};
pub use types::{DictSchema, Kind, Pattern, SchemaNode};
pub use validator::{validate_or_warn, Validator};
