//! Config-driven validation
//!
//! [`Validator`] applies a [`ValidatorConfig`]: the configured root name
//! labels error paths, and the failure mode decides whether a failed
//! validation is returned or only logged. [`validate_or_warn`] is the
//! warn-only path on its own.

use serde_json::Value;
use std::io::{self, Write};

use super::errors::{ValidationError, ValidationResult};
use super::matcher::validate;
use super::registry::{RegistryError, SchemaRegistry};
use super::types::SchemaNode;
use crate::config::{FailureMode, ValidatorConfig};
use crate::observability::{log_event_to, Event, Logger, Severity};

/// Validates and logs a failure at WARN instead of returning it as an
/// error. The failure is still handed back so the caller can report it.
pub fn validate_or_warn(
    schema: &SchemaNode,
    value: &Value,
    root_name: &str,
) -> Option<ValidationError> {
    if Logger::is_enabled(Severity::Warn) {
        validate_or_warn_to(schema, value, root_name, &mut io::stderr())
    } else {
        validate(schema, value, root_name).err()
    }
}

fn validate_or_warn_to<W: Write>(
    schema: &SchemaNode,
    value: &Value,
    root_name: &str,
    writer: &mut W,
) -> Option<ValidationError> {
    let err = validate(schema, value, root_name).err()?;
    let path = err.path().to_string();
    log_event_to(
        Severity::Warn,
        Event::ValidationWarning,
        &[
            ("code", err.code().code()),
            ("message", err.message()),
            ("path", path.as_str()),
        ],
        writer,
    );
    Some(err)
}

/// Applies schemas according to a [`ValidatorConfig`].
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidatorConfig,
}

impl Validator {
    /// Creates a validator with the given configuration.
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validates `value` against `schema`.
    ///
    /// In [`FailureMode::Warn`] a failure is logged and `Ok(())` returned.
    pub fn check(&self, schema: &SchemaNode, value: &Value) -> ValidationResult {
        match self.config.failure_mode {
            FailureMode::Reject => validate(schema, value, &self.config.root_name),
            FailureMode::Warn => {
                validate_or_warn(schema, value, &self.config.root_name);
                Ok(())
            }
        }
    }

    /// Like [`check`](Self::check), with the schema looked up by name.
    ///
    /// An unknown schema name is an error in both failure modes.
    pub fn check_named(
        &self,
        registry: &SchemaRegistry,
        name: &str,
        value: &Value,
    ) -> Result<(), RegistryError> {
        let schema = registry
            .get(name)
            .ok_or_else(|| RegistryError::UnknownSchema(name.to_string()))?;

        self.check(schema, value).map_err(|error| RegistryError::Invalid {
            schema: name.to_string(),
            error,
        })
    }
}
