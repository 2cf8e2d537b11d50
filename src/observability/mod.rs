//! Observability for jsonshape
//!
//! Structured JSON-line logging of a small, closed set of events:
//! configuration loads, registry changes and validation failures.
//! Logging is read-only and never changes a validation outcome.

mod events;
mod logger;

use std::io::Write;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log an event at `severity` with fields
pub fn log_event(severity: Severity, event: Event, fields: &[(&str, &str)]) {
    Logger::log(severity, event.as_str(), fields);
}

/// Log an event to `writer` regardless of the stderr threshold
pub(crate) fn log_event_to<W: Write>(
    severity: Severity,
    event: Event,
    fields: &[(&str, &str)],
    writer: &mut W,
) {
    Logger::log_to_writer(severity, event.as_str(), fields, writer);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        // This just verifies no panic
        log_event(Severity::Info, Event::ConfigLoaded, &[("root_name", "client_json")]);
        log_event(Severity::Trace, Event::SchemaRegistered, &[]);
    }

    #[test]
    fn test_log_event_to_writer() {
        let mut buffer = Vec::new();
        log_event_to(
            Severity::Trace,
            Event::SchemaRegistered,
            &[("schema", "users")],
            &mut buffer,
        );

        let parsed: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed["event"], "SCHEMA_REGISTERED");
        assert_eq!(parsed["severity"], "TRACE");
        assert_eq!(parsed["schema"], "users");
    }
}
