//! CLI module for unitcheck
//!
//! Provides command-line interface for:
//! - validate: check one JSON document against a record
//! - check-schemas: load and list every declaration
//! - import-openapi: derive a declaration from an OpenAPI component

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check_schemas, import_openapi, run_command, validate, validate_document, Config};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_document, write_error, write_response};

use tracing_subscriber::EnvFilter;

/// Parse arguments, load configuration, install logging and dispatch.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let config = Config::load(cli.command.config_path())?;
    init_logging(&config.log_level);
    run_command(cli.command, &config)
}

/// Installs the stderr log subscriber. `RUST_LOG` overrides `level`.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // A subscriber may already be installed by an embedding process.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
