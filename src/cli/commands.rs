//! CLI command implementations
//!
//! Every command follows the same sequence:
//! 1. Load configuration (optional file, defaults otherwise)
//! 2. Build the catalog once (built-in or from `catalog_path`)
//! 3. Run the command against the immutable catalog

use std::path::Path;

use serde_json::{json, Value};

use crate::observability::{log_event, log_event_with_fields, Event, Logger};
use crate::schema::{Catalog, CatalogError, StageCategory, ValidationReport, Validator};

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{read_document, write_response};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Validate {
            category,
            stage_type,
            input,
            config,
        } => validate(&category, &stage_type, input.as_deref(), config.as_deref()),
        Command::Describe {
            category,
            stage_type,
            config,
        } => describe(&category, &stage_type, config.as_deref()),
        Command::List { category, config } => list(category.as_deref(), config.as_deref()),
        Command::CheckCatalog { catalog } => check_catalog(&catalog),
    }
}

/// Validate a candidate and write the report.
///
/// The report is written even when violations exist; the command then fails
/// with STAGE_CLI_VALIDATION_REJECTED so the exit status reflects the outcome.
pub fn validate(
    category: &str,
    stage_type: &str,
    input: Option<&Path>,
    config_path: Option<&Path>,
) -> CliResult<()> {
    let config = load_config(config_path)?;
    let catalog = open_catalog(&config)?;
    let candidate = read_document(input)?;

    let report = validate_candidate(&catalog, &config, category, stage_type, &candidate)?;
    let violations = report.violations.len();
    write_response(serde_json::to_value(&report)?)?;

    if violations > 0 {
        return Err(CliError::validation_rejected(violations));
    }
    Ok(())
}

/// Validate one candidate against the catalog, logging the outcome.
pub fn validate_candidate(
    catalog: &Catalog,
    config: &Config,
    category: &str,
    stage_type: &str,
    candidate: &Value,
) -> CliResult<ValidationReport> {
    let stage = format!("{}/{}", category, stage_type);
    log_event_with_fields(Event::ValidationStart, &[("stage", stage.as_str())]);

    let validator = Validator::with_limits(catalog, config.limits());
    let report = validator
        .validate_stage(category, stage_type, candidate)
        .map_err(|e| {
            if e.is_not_found() {
                log_event_with_fields(Event::UnknownStageType, &[("stage", stage.as_str())]);
            }
            CliError::from(e)
        })?;

    if report.is_ok() {
        let defaulted = report.defaulted.len().to_string();
        log_event_with_fields(
            Event::ValidationAccepted,
            &[("stage", stage.as_str()), ("defaulted", defaulted.as_str())],
        );
    } else {
        let violations = report.violations.len().to_string();
        log_event_with_fields(
            Event::ValidationRejected,
            &[("stage", stage.as_str()), ("violations", violations.as_str())],
        );
    }

    Ok(report)
}

/// Print a stage schema in catalog definition format
pub fn describe(category: &str, stage_type: &str, config_path: Option<&Path>) -> CliResult<()> {
    let config = load_config(config_path)?;
    let catalog = open_catalog(&config)?;
    let category: StageCategory = category.parse()?;
    write_response(catalog.describe(category, stage_type)?)
}

/// Print stage types per category
pub fn list(category: Option<&str>, config_path: Option<&Path>) -> CliResult<()> {
    let config = load_config(config_path)?;
    let catalog = open_catalog(&config)?;
    write_response(list_stage_types(&catalog, category)?)
}

/// Stage types keyed by category, optionally restricted to one category.
pub fn list_stage_types(catalog: &Catalog, category: Option<&str>) -> CliResult<Value> {
    let categories = match category {
        Some(name) => vec![name.parse::<StageCategory>()?],
        None => StageCategory::ALL.to_vec(),
    };

    let mut listing = serde_json::Map::new();
    for category in categories {
        listing.insert(category.to_string(), json!(catalog.type_keys(category)));
    }
    Ok(Value::Object(listing))
}

/// Build a catalog from a definition file and report its contents
pub fn check_catalog(path: &Path) -> CliResult<()> {
    let catalog = load_catalog(Some(path))?;
    write_response(json!({
        "catalog": path.display().to_string(),
        "stages": catalog.entry_count(),
    }))
}

fn load_config(path: Option<&Path>) -> CliResult<Config> {
    let config = Config::load_or_default(path)?;
    Logger::set_min_severity(config.severity()?);

    let max_depth = config.max_depth.to_string();
    let max_array_len = config.max_array_len.to_string();
    log_event_with_fields(
        Event::ConfigLoaded,
        &[("max_depth", max_depth.as_str()), ("max_array_len", max_array_len.as_str())],
    );
    Ok(config)
}

/// Build the catalog named by the configuration.
pub fn open_catalog(config: &Config) -> CliResult<Catalog> {
    load_catalog(config.catalog_path().as_deref())
}

fn load_catalog(path: Option<&Path>) -> CliResult<Catalog> {
    log_event(Event::CatalogLoadStart);

    let result = match path {
        Some(path) => Catalog::load(path),
        None => Catalog::builtin(),
    };
    let catalog = result.map_err(|e: CatalogError| {
        let reason = e.to_string();
        log_event_with_fields(
            Event::CatalogRejected,
            &[("code", e.code()), ("reason", reason.as_str())],
        );
        CliError::from(e)
    })?;

    let stages = catalog.entry_count().to_string();
    log_event_with_fields(Event::CatalogLoaded, &[("stages", stages.as_str())]);
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::super::errors::CliErrorCode;
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_validate_candidate_accepts() {
        let catalog = Catalog::builtin().unwrap();
        let report = validate_candidate(
            &catalog,
            &Config::default(),
            "operator",
            "file",
            &json!({ "path": "/var/log/events" }),
        )
        .unwrap();

        assert!(report.is_ok());
        assert_eq!(report.normalized["line-delimiter"], "<tab>");
    }

    #[test]
    fn test_validate_candidate_unknown_stage() {
        let catalog = Catalog::builtin().unwrap();
        let err = validate_candidate(&catalog, &Config::default(), "sink", "s3", &json!({}))
            .unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::CatalogError);
        assert!(err.message().contains("STAGE_UNKNOWN_TYPE"));
    }

    #[test]
    fn test_validate_candidate_respects_limits() {
        let catalog = Catalog::builtin().unwrap();
        let config = Config {
            max_array_len: 1,
            ..Config::default()
        };
        let report = validate_candidate(
            &catalog,
            &config,
            "operator",
            "cassandra",
            &json!({ "contact-points": ["a", "b"] }),
        )
        .unwrap();
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].path.to_string(), "contact-points");
    }

    #[test]
    fn test_list_stage_types() {
        let catalog = Catalog::builtin().unwrap();
        let listing = list_stage_types(&catalog, Some("source")).unwrap();
        assert_eq!(listing, json!({ "source": ["http", "kafka"] }));

        let listing = list_stage_types(&catalog, None).unwrap();
        assert_eq!(listing.as_object().unwrap().len(), 3);

        assert!(list_stage_types(&catalog, Some("stage")).is_err());
    }

    #[test]
    fn test_open_catalog_from_config() {
        let temp_dir = TempDir::new().unwrap();
        let catalog_path = temp_dir.path().join("stages.json");
        fs::write(
            &catalog_path,
            json!({
                "sink": {
                    "stdout": { "type": "object", "properties": { "prefix": { "type": "string" } } }
                }
            })
            .to_string(),
        )
        .unwrap();

        let config = Config {
            catalog_path: Some(catalog_path.to_string_lossy().into_owned()),
            ..Config::default()
        };
        let catalog = open_catalog(&config).unwrap();
        assert_eq!(catalog.entry_count(), 1);
        assert!(catalog.contains(StageCategory::Sink, "stdout"));
    }

    #[test]
    fn test_check_catalog_rejects_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let catalog_path = temp_dir.path().join("stages.json");
        fs::write(
            &catalog_path,
            json!({ "source": { "kafka": { "type": "object", "properties": { "topics": { "type": "array" } } } } })
                .to_string(),
        )
        .unwrap();

        let err = check_catalog(&catalog_path).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::CatalogError);
        assert!(err.message().contains("source.kafka.topics"));
    }
}
