//! Catalog error types
//!
//! Error codes:
//! - STAGE_UNKNOWN_CATEGORY (REJECT)
//! - STAGE_UNKNOWN_TYPE (REJECT)
//! - STAGE_CATALOG_MALFORMED (FATAL)
//! - STAGE_CATALOG_IO (FATAL)
//!
//! Per-field validation failures are not errors; see `Violation`.

use std::fmt;
use std::io;

use thiserror::Error;

/// Severity levels for catalog errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Caller selection rejected, process continues
    Reject,
    /// Catalog unusable, process must not serve validations
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Errors from building or querying the schema catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Unknown stage category '{0}' (expected source, operator or sink)")]
    UnknownCategory(String),

    #[error("Unknown stage type '{type_key}' in category '{category}'")]
    NotFound { category: String, type_key: String },

    #[error("Malformed catalog at '{path}': {reason}")]
    Malformed { path: String, reason: String },

    #[error("Failed to read catalog '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl CatalogError {
    pub fn not_found(category: impl Into<String>, type_key: impl Into<String>) -> Self {
        CatalogError::NotFound {
            category: category.into(),
            type_key: type_key.into(),
        }
    }

    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        CatalogError::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            CatalogError::UnknownCategory(_) => "STAGE_UNKNOWN_CATEGORY",
            CatalogError::NotFound { .. } => "STAGE_UNKNOWN_TYPE",
            CatalogError::Malformed { .. } => "STAGE_CATALOG_MALFORMED",
            CatalogError::Io { .. } => "STAGE_CATALOG_IO",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            CatalogError::UnknownCategory(_) | CatalogError::NotFound { .. } => Severity::Reject,
            CatalogError::Malformed { .. } | CatalogError::Io { .. } => Severity::Fatal,
        }
    }

    /// True for unknown category or stage type selections.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CatalogError::UnknownCategory(_) | CatalogError::NotFound { .. }
        )
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

/// Result type for catalog operations
pub type SchemaResult<T> = Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(CatalogError::UnknownCategory("x".into()).code(), "STAGE_UNKNOWN_CATEGORY");
        assert_eq!(CatalogError::not_found("sink", "s3").code(), "STAGE_UNKNOWN_TYPE");
        assert_eq!(CatalogError::malformed("a", "b").code(), "STAGE_CATALOG_MALFORMED");
    }

    #[test]
    fn test_severity_levels() {
        assert_eq!(CatalogError::not_found("sink", "s3").severity(), Severity::Reject);
        assert!(CatalogError::malformed("source.http", "bad").is_fatal());
        assert!(!CatalogError::UnknownCategory("stage".into()).is_fatal());
    }

    #[test]
    fn test_not_found_display() {
        let err = CatalogError::not_found("sink", "s3");
        let display = format!("{}", err);
        assert!(display.contains("s3"));
        assert!(display.contains("sink"));
        assert!(err.is_not_found());
    }
}
