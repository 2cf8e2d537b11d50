//! Observable events
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Validator configuration loaded from disk
    ConfigLoaded,
    /// Schema added to a registry
    SchemaRegistered,
    /// Registration refused, name already taken
    SchemaRegistrationRejected,
    /// Validation failed and the caller chose to continue
    ValidationWarning,
}

impl Event {
    /// Returns the event name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemaRegistered => "SCHEMA_REGISTERED",
            Event::SchemaRegistrationRejected => "SCHEMA_REGISTRATION_REJECTED",
            Event::ValidationWarning => "VALIDATION_WARNING",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
