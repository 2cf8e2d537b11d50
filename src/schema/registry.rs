//! Named schema registry
//!
//! Schemas are compiled once and registered under a name. A registered
//! schema is immutable: registering the same name twice is rejected.
//! The registry is `Send + Sync` and can be shared behind an `Arc`.

use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

use super::errors::{SchemaError, SchemaResult, ValidationError};
use super::matcher::validate;
use super::types::SchemaNode;
use crate::observability::{log_event, Event, Severity};

/// Registry lookup and validation errors
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    #[error("schema '{0}' not found")]
    UnknownSchema(String),

    #[error("document rejected by schema '{schema}': {error}")]
    Invalid {
        schema: String,
        #[source]
        error: ValidationError,
    },
}

impl RegistryError {
    /// The validation failure, if this is one
    pub fn validation_error(&self) -> Option<&ValidationError> {
        match self {
            RegistryError::Invalid { error, .. } => Some(error),
            RegistryError::UnknownSchema(_) => None,
        }
    }
}

/// In-memory registry of compiled schemas indexed by name.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, SchemaNode>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `schema` under `name`.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        schema: impl Into<SchemaNode>,
    ) -> SchemaResult<()> {
        let name = name.into();

        if self.schemas.contains_key(&name) {
            log_event(
                Severity::Warn,
                Event::SchemaRegistrationRejected,
                &[("schema", name.as_str())],
            );
            return Err(SchemaError::AlreadyRegistered(name));
        }

        let schema = schema.into();
        log_event(
            Severity::Trace,
            Event::SchemaRegistered,
            &[("schema", name.as_str()), ("shape", schema.shape_name())],
        );
        self.schemas.insert(name, schema);
        Ok(())
    }

    /// Gets a schema by name.
    pub fn get(&self, name: &str) -> Option<&SchemaNode> {
        self.schemas.get(name)
    }

    /// Checks if a schema exists.
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Returns the number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Validates `value` against the schema registered as `name`.
    pub fn validate(
        &self,
        name: &str,
        value: &Value,
        root_name: &str,
    ) -> Result<(), RegistryError> {
        let schema = self
            .get(name)
            .ok_or_else(|| RegistryError::UnknownSchema(name.to_string()))?;

        validate(schema, value, root_name).map_err(|error| RegistryError::Invalid {
            schema: name.to_string(),
            error,
        })
    }
}
