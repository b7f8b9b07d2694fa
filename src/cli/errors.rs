//! CLI-specific error types

use std::fmt;
use std::io;

use crate::schema::CatalogError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (files, stdin/stdout)
    IoError,
    /// Catalog could not be built or queried
    CatalogError,
    /// Candidate configuration has violations
    ValidationRejected,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "STAGE_CLI_CONFIG_ERROR",
            Self::IoError => "STAGE_CLI_IO_ERROR",
            Self::CatalogError => "STAGE_CLI_CATALOG_ERROR",
            Self::ValidationRejected => "STAGE_CLI_VALIDATION_REJECTED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Candidate rejected with the given number of violations
    pub fn validation_rejected(violations: usize) -> Self {
        Self::new(
            CliErrorCode::ValidationRejected,
            format!("Configuration rejected with {} violation(s)", violations),
        )
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<CatalogError> for CliError {
    fn from(e: CatalogError) -> Self {
        Self::new(CliErrorCode::CatalogError, format!("{} ({})", e, e.code()))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_conversion() {
        let err: CliError = CatalogError::not_found("sink", "s3").into();
        assert_eq!(err.code(), &CliErrorCode::CatalogError);
        assert!(err.message().contains("STAGE_UNKNOWN_TYPE"));
    }

    #[test]
    fn test_display_includes_code() {
        let err = CliError::validation_rejected(2);
        let display = format!("{}", err);
        assert!(display.starts_with("STAGE_CLI_VALIDATION_REJECTED"));
        assert!(display.contains("2 violation"));
    }
}
