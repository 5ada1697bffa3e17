//! Spreadsheet engine API.
//!
//! This module provides the core computation engine for the spreadsheet:
//!
//! - [`CellRef`], [`coordinates_of`], [`id_of`] - Cell address codec (A1 notation ↔ col/row)
//! - [`parse_reference`], [`expand_range`] - `$`-marked references and ranges
//! - [`DependencyGraph`] - Dependency tracking, cycle detection, recalculation order
//! - [`Formula`] - Formula tokenizer with typed arguments
//! - [`evaluate_formula`] - Evaluate a formula against a cell lookup
//! - [`shift_formula_references`], [`offset_formula_references`] - Reference adjustment
//! - [`validate_cell`] - Typed input validation

mod cell_ref;
mod config;
mod cycle;
mod deps;
mod eval;
mod format;
mod parse;
mod preprocess;
mod range;
mod validate;

pub use cell_ref::{CellRef, CellReference, coordinates_of, id_of, parse_reference};
pub use config::{EngineConfig, MAX_RANGE_CELLS};
pub use deps::{DependencyGraph, extract_dependencies};
pub use eval::{Call, FormulaError, evaluate_formula, evaluate_formula_with};
pub use format::{format_number, parse_number};
pub use parse::{Arg, ArgKind, FORMULA_MARKER, Formula, REF_ERROR, is_formula};
pub use preprocess::{ShiftOperation, offset_formula_references, shift_formula_references};
pub use range::{CellRange, expand_range, expand_range_with, parse_range_reference};
pub use validate::{CellKind, validate_cell};
