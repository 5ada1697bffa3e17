//! Error types for the Cellflow command line

use std::path::PathBuf;
use thiserror::Error;

use cellflow_core::CellflowError;

/// Errors that can occur in the Cellflow command line
#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Edit at line {line} rejected: {source}")]
    Rejected {
        line: usize,
        #[source]
        source: CellflowError,
    },
}

pub type Result<T> = std::result::Result<T, CliError>;
