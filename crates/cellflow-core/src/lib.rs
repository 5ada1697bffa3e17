//! cellflow-core - UI-agnostic document model.

pub mod document;
pub mod error;

pub use document::{CellData, Document, EditOutcome};
pub use error::{CellflowError, Result};

pub use cellflow_engine::engine::CellRef;
