//! Error types for Cellflow core.

use thiserror::Error;

use cellflow_engine::EngineError;

/// Errors that can occur while editing a document
#[derive(Error, Debug)]
pub enum CellflowError {
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl CellflowError {
    /// True when an edit was refused because it would close a loop.
    pub fn is_circular_dependency(&self) -> bool {
        matches!(
            self,
            CellflowError::Engine(EngineError::CircularDependency { .. })
        )
    }
}

pub type Result<T> = std::result::Result<T, CellflowError>;
