//! cellflow_engine - Spreadsheet engine: references, dependency graph, formulas.

pub(crate) mod builtins;
pub mod engine;
pub mod error;

pub use error::{EngineError, Result};
