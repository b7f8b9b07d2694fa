//! Observable events
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Tool configuration loaded
    ConfigLoaded,

    // Catalog
    /// Catalog construction begins
    CatalogLoadStart,
    /// Catalog built and ready for lookups
    CatalogLoaded,
    /// Catalog definition malformed or unreadable (FATAL)
    CatalogRejected,

    // Validation
    /// Candidate received for validation
    ValidationStart,
    /// Candidate produced no violations
    ValidationAccepted,
    /// Candidate produced violations
    ValidationRejected,
    /// Requested category or stage type does not exist
    UnknownStageType,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::CatalogLoadStart => "CATALOG_LOAD_BEGIN",
            Event::CatalogLoaded => "CATALOG_LOADED",
            Event::CatalogRejected => "CATALOG_REJECTED",

            Event::ValidationStart => "VALIDATION_BEGIN",
            Event::ValidationAccepted => "VALIDATION_ACCEPTED",
            Event::ValidationRejected => "VALIDATION_REJECTED",
            Event::UnknownStageType => "UNKNOWN_STAGE_TYPE",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::CatalogRejected)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
