//! CLI command implementations
//!
//! Each command loads the configuration, builds the schema registry once,
//! and exits. Nothing is cached between invocations.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::pattern::Repertoire;
use crate::schema::{record_from_openapi, SchemaLoader};
use crate::validation::{Direction, ValidationResult, Validator};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_document, write_error, write_response};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory of record declarations (required)
    pub schema_dir: String,

    /// Character table for the extended-script pattern (optional, built-in table otherwise)
    #[serde(default)]
    pub repertoire: Option<String>,

    /// Log level (optional, default "warn"); RUST_LOG takes precedence
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.schema_dir.trim().is_empty() {
            return Err(CliError::config_error("schema_dir must not be empty"));
        }

        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(CliError::config_error(format!(
                "Invalid log_level: '{}'. Must be one of {}.",
                self.log_level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }

    /// Get schema directory as Path
    pub fn schema_path(&self) -> &Path {
        Path::new(&self.schema_dir)
    }

    /// Loads every declaration in the schema directory
    pub fn load_schemas(&self) -> CliResult<SchemaLoader> {
        let mut loader = SchemaLoader::new(self.schema_path());
        loader.load_all()?;
        Ok(loader)
    }

    /// Builds the validator, loading the configured character table
    pub fn validator(&self) -> CliResult<Validator> {
        let repertoire = match &self.repertoire {
            Some(path) => Repertoire::load(Path::new(path))?,
            None => Repertoire::jis_x0213(),
        };
        info!(
            repertoire = repertoire.name(),
            version = repertoire.version(),
            "character table ready"
        );
        Ok(Validator::with_repertoire(Arc::new(repertoire)))
    }
}

/// Run a CLI command
pub fn run_command(command: Command, config: &Config) -> CliResult<()> {
    match command {
        Command::Validate {
            record,
            response,
            input,
            ..
        } => {
            let direction = if response {
                Direction::Response
            } else {
                Direction::Request
            };
            validate(config, &record, direction, input.as_deref())
        }
        Command::CheckSchemas { .. } => check_schemas(config),
        Command::ImportOpenapi {
            spec, component, ..
        } => import_openapi(config, &spec, &component),
    }
}

/// Validate a document read from `input` (or stdin) and report the result.
///
/// An invalid document is reported on stdout and returned as an error so
/// the process exits non-zero.
pub fn validate(config: &Config, record: &str, direction: Direction, input: Option<&Path>) -> CliResult<()> {
    let document = read_document(input)?;
    let result = validate_document(config, record, direction, &document)?;
    let data = serde_json::to_value(&result)?;

    match result.ensure_valid(direction) {
        Ok(()) => write_response(data),
        Err(failure) => {
            let err = CliError::from(failure);
            write_error(err.code_str(), err.message(), Some(data))?;
            Err(err)
        }
    }
}

/// Validate an in-memory document against a registered record
pub fn validate_document(
    config: &Config,
    record: &str,
    direction: Direction,
    document: &Value,
) -> CliResult<ValidationResult> {
    let loader = config.load_schemas()?;
    let schema = loader.require(record)?;
    let validator = config.validator()?;
    Ok(validator.run(direction, &schema, document, None)?)
}

/// Load every declaration and list the registered records
pub fn check_schemas(config: &Config) -> CliResult<()> {
    let loader = config.load_schemas()?;
    let validator = config.validator()?;
    let repertoire = validator.matcher().repertoire();

    let records: Vec<&str> = loader.record_names().collect();
    write_response(json!({
        "count": loader.schema_count(),
        "records": records,
        "repertoire": {
            "name": repertoire.name(),
            "version": repertoire.version(),
            "ranges": repertoire.range_count()
        }
    }))
}

/// Convert an OpenAPI component into a declaration file in the schema directory
pub fn import_openapi(config: &Config, spec: &Path, component: &str) -> CliResult<()> {
    let content = fs::read_to_string(spec)
        .map_err(|e| CliError::io_error(format!("Failed to read '{}': {}", spec.display(), e)))?;
    let document: Value = serde_json::from_str(&content)?;

    let record = record_from_openapi(&document, component)?;
    let loader = SchemaLoader::new(config.schema_path());
    let path = loader.save_record(&record)?;

    info!(record = %record.record, path = %path.display(), "declaration written");
    write_response(json!({
        "record": record.record,
        "fields": record.fields.len(),
        "path": path.display().to_string()
    }))
}
