//! Observability for stage validation
//!
//! Structured JSON logging of catalog and validation lifecycle events.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on validation outcomes
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use stageschema::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::CatalogLoaded, &[("stages", "10")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Severity an event is logged at unless the caller overrides it.
pub fn default_severity(event: Event) -> Severity {
    if event.is_fatal() {
        return Severity::Fatal;
    }
    match event {
        Event::ValidationRejected | Event::UnknownStageType => Severity::Warn,
        Event::ValidationStart => Severity::Trace,
        _ => Severity::Info,
    }
}

/// Log a lifecycle event
pub fn log_event(event: Event) {
    Logger::log(default_severity(event), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(default_severity(event), event.as_str(), fields);
}
