//! Schema loader for record declarations on disk
//!
//! - Declarations stored at `<schema_dir>/<record>.json`, one record per file
//! - All files are loaded once at startup, in file name order
//! - A malformed or misconfigured declaration fails the whole load
//! - Registered schemas are immutable and shared via `Arc`

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::declaration::RecordDef;
use super::errors::{SchemaError, SchemaResult};
use super::types::Schema;

/// Registry of named record schemas backed by a declaration directory.
pub struct SchemaLoader {
    /// Directory containing declaration files
    schema_dir: PathBuf,
    /// Bound schemas indexed by record name
    schemas: BTreeMap<String, Arc<Schema>>,
}

impl SchemaLoader {
    /// Creates an empty loader for the given declaration directory.
    pub fn new(schema_dir: &Path) -> Self {
        Self {
            schema_dir: schema_dir.to_path_buf(),
            schemas: BTreeMap::new(),
        }
    }

    /// Returns the declaration directory.
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Loads every `*.json` declaration in the directory.
    ///
    /// A missing directory is an empty registry, not an error.
    pub fn load_all(&mut self) -> SchemaResult<()> {
        if !self.schema_dir.exists() {
            warn!(dir = %self.schema_dir.display(), "schema directory does not exist");
            return Ok(());
        }

        let entries = fs::read_dir(&self.schema_dir).map_err(|e| {
            SchemaError::malformed(
                self.schema_dir.display().to_string(),
                format!("Failed to read schema directory: {}", e),
            )
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed(
                    self.schema_dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;
            let path = entry.path();
            if path.extension().map_or(true, |ext| ext != "json") {
                debug!(path = %path.display(), "skipping non-JSON file");
                continue;
            }
            paths.push(path);
        }
        paths.sort();

        for path in &paths {
            self.load_file(path)?;
        }

        info!(
            dir = %self.schema_dir.display(),
            records = self.schemas.len(),
            "schemas loaded"
        );
        Ok(())
    }

    /// Loads and registers a single declaration file.
    pub fn load_file(&mut self, path: &Path) -> SchemaResult<Arc<Schema>> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed(path.display().to_string(), format!("Failed to read file: {}", e))
        })?;

        let record: RecordDef = serde_json::from_str(&content).map_err(|e| {
            SchemaError::malformed(path.display().to_string(), format!("Invalid JSON: {}", e))
        })?;

        self.register_record(&record)
    }

    /// Binds and registers a record declaration.
    pub fn register_record(&mut self, record: &RecordDef) -> SchemaResult<Arc<Schema>> {
        let schema = record.bind()?;
        self.register(record.record.clone(), schema)
    }

    /// Registers an already-built schema under `name`.
    ///
    /// Records are immutable; registering a name twice fails.
    pub fn register(&mut self, name: impl Into<String>, schema: Schema) -> SchemaResult<Arc<Schema>> {
        let name = name.into();
        if self.schemas.contains_key(&name) {
            return Err(SchemaError::DuplicateRecord(name));
        }
        let schema = Arc::new(schema);
        debug!(record = %name, fields = schema.len(), "record registered");
        self.schemas.insert(name, Arc::clone(&schema));
        Ok(schema)
    }

    /// Gets a schema by record name.
    pub fn get(&self, name: &str) -> Option<Arc<Schema>> {
        self.schemas.get(name).cloned()
    }

    /// Gets a schema by record name, failing if it is not registered.
    pub fn require(&self, name: &str) -> SchemaResult<Arc<Schema>> {
        self.get(name)
            .ok_or_else(|| SchemaError::UnknownRecord(name.to_string()))
    }

    /// Checks if a record is registered.
    pub fn exists(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Returns registered record names in sorted order.
    pub fn record_names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// Returns the number of registered records.
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    /// Writes a record declaration into the schema directory.
    ///
    /// The declaration is bound first so nothing invalid reaches disk.
    /// Existing files are never overwritten.
    pub fn save_record(&self, record: &RecordDef) -> SchemaResult<PathBuf> {
        record.bind()?;

        let path = self.schema_dir.join(format!("{}.json", record.record));
        if path.exists() {
            return Err(SchemaError::DuplicateRecord(record.record.clone()));
        }

        if !self.schema_dir.exists() {
            fs::create_dir_all(&self.schema_dir).map_err(|e| {
                SchemaError::malformed(
                    self.schema_dir.display().to_string(),
                    format!("Failed to create schema directory: {}", e),
                )
            })?;
        }

        let content = serde_json::to_string_pretty(record).map_err(|e| {
            SchemaError::malformed(path.display().to_string(), format!("Failed to serialize record: {}", e))
        })?;

        fs::write(&path, content).map_err(|e| {
            SchemaError::malformed(path.display().to_string(), format!("Failed to write file: {}", e))
        })?;

        Ok(path)
    }
}
