//! CLI argument definitions using clap
//!
//! Commands:
//! - unitcheck validate --config <path> --record <name> [--response] [--input <file>]
//! - unitcheck check-schemas --config <path>
//! - unitcheck import-openapi --config <path> --spec <file> --component <name>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// unitcheck - declarative field validation for DTOs
#[derive(Parser, Debug)]
#[command(name = "unitcheck")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate one JSON document against a registered record
    Validate {
        /// Path to configuration file
        #[arg(long, default_value = "./unitcheck.json")]
        config: PathBuf,

        /// Record name to validate against
        #[arg(long)]
        record: String,

        /// Treat the document as a response (contract breach on failure)
        #[arg(long)]
        response: bool,

        /// Read the document from a file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Load every schema declaration and list the records
    CheckSchemas {
        /// Path to configuration file
        #[arg(long, default_value = "./unitcheck.json")]
        config: PathBuf,
    },

    /// Convert an OpenAPI component into a schema declaration
    ImportOpenapi {
        /// Path to configuration file
        #[arg(long, default_value = "./unitcheck.json")]
        config: PathBuf,

        /// OpenAPI document (JSON)
        #[arg(long)]
        spec: PathBuf,

        /// Component name under components.schemas
        #[arg(long)]
        component: String,
    },
}

impl Command {
    /// Configuration file of the command
    pub fn config_path(&self) -> &PathBuf {
        match self {
            Command::Validate { config, .. }
            | Command::CheckSchemas { config }
            | Command::ImportOpenapi { config, .. } => config,
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_validate() {
        let cli = Cli::try_parse_from([
            "unitcheck",
            "validate",
            "--record",
            "V1InDto",
            "--response",
            "--input",
            "doc.json",
        ])
        .unwrap();
        match cli.command {
            Command::Validate {
                config,
                record,
                response,
                input,
            } => {
                assert_eq!(config, PathBuf::from("./unitcheck.json"));
                assert_eq!(record, "V1InDto");
                assert!(response);
                assert_eq!(input, Some(PathBuf::from("doc.json")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_validate_requires_record() {
        assert!(Cli::try_parse_from(["unitcheck", "validate"]).is_err());
    }
}
