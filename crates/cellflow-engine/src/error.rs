//! Error types for the Cellflow engine.

use thiserror::Error;

use crate::engine::CellRef;

/// Errors returned by the reference resolver and the dependency graph.
///
/// Problems inside a formula are not errors at this level: they are
/// rendered as cell values (see [`crate::engine::FormulaError`]).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid cell reference: {0}")]
    InvalidReference(String),

    #[error("Circular dependency detected: {cell} cannot depend on {dependency}")]
    CircularDependency { cell: CellRef, dependency: CellRef },

    #[error("Range too large: {cells} cells (max {max})")]
    RangeTooLarge { cells: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, EngineError>;
