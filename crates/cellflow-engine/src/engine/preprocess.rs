//! Reference rewriting for formulas.
//!
//! Used when rows/columns are inserted or deleted (structural shifts) and
//! when a formula is filled or copied into another cell (offsets). Only
//! arguments in reference position are rewritten; literal text arguments
//! and non-formula input come back untouched.

use super::cell_ref::CellReference;
use super::parse::{Arg, ArgKind, Formula, REF_ERROR};
use super::CellRef;
use crate::builtins::{RefArgs, builtin};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShiftOperation {
    InsertRow(usize),
    DeleteRow(usize),
    InsertColumn(usize),
    DeleteColumn(usize),
}

impl ShiftOperation {
    /// Where a cell ends up after the operation; None if it was deleted.
    ///
    /// Rules:
    /// - Insert row at R: row >= R becomes row + 1
    /// - Delete row at R: row > R becomes row - 1; row == R is gone
    /// - Same logic for columns
    /// - A cell pushed past the last row/column falls off the grid
    pub fn apply(&self, cell: &CellRef) -> Option<CellRef> {
        match *self {
            ShiftOperation::InsertRow(at_row) => {
                if cell.row >= at_row {
                    Some(CellRef::new(cell.col, CellRef::step(cell.row, 1)?))
                } else {
                    Some(cell.clone())
                }
            }
            ShiftOperation::DeleteRow(at_row) => {
                if cell.row == at_row {
                    None
                } else if cell.row > at_row {
                    Some(CellRef::new(cell.col, cell.row - 1))
                } else {
                    Some(cell.clone())
                }
            }
            ShiftOperation::InsertColumn(at_col) => {
                if cell.col >= at_col {
                    Some(CellRef::new(CellRef::step(cell.col, 1)?, cell.row))
                } else {
                    Some(cell.clone())
                }
            }
            ShiftOperation::DeleteColumn(at_col) => {
                if cell.col == at_col {
                    None
                } else if cell.col > at_col {
                    Some(CellRef::new(cell.col - 1, cell.row))
                } else {
                    Some(cell.clone())
                }
            }
        }
    }
}

/// Shift cell references in a formula when rows/cols are inserted/deleted.
/// References to a deleted row/column become `#REF!`. `$` markers are kept;
/// structural moves apply to absolute references as well.
pub fn shift_formula_references(formula: &str, op: ShiftOperation) -> String {
    rewrite_references(formula, |reference| {
        op.apply(&reference.cell)
            .map(|cell| reference.with_cell(cell))
    })
}

/// Move the relative parts of every reference by a fixed offset, as when a
/// formula is filled or copied. References pushed off the grid become `#REF!`.
pub fn offset_formula_references(formula: &str, delta_col: isize, delta_row: isize) -> String {
    if delta_col == 0 && delta_row == 0 {
        return formula.to_string();
    }
    rewrite_references(formula, |reference| reference.offset(delta_col, delta_row))
}

fn rewrite_references<F>(formula: &str, mut map: F) -> String
where
    F: FnMut(&CellReference) -> Option<CellReference>,
{
    let Some(mut parsed) = Formula::parse(formula) else {
        return formula.to_string();
    };

    let ref_args = match builtin(&parsed.name).map(|b| b.ref_args) {
        Some(RefArgs::First) => parsed.args.len().min(1),
        _ => parsed.args.len(),
    };

    let mut changed = false;
    for arg in parsed.args.iter_mut().take(ref_args) {
        let kind = match &arg.kind {
            ArgKind::Ref(reference) => match map(reference) {
                Some(moved) => ArgKind::Ref(moved),
                None => ArgKind::RefError,
            },
            ArgKind::Range(start, end) => match (map(start), map(end)) {
                (Some(start), Some(end)) => ArgKind::Range(start, end),
                _ => ArgKind::RefError,
            },
            ArgKind::RefError | ArgKind::Text => continue,
        };
        if kind != arg.kind {
            let raw = match &kind {
                ArgKind::Ref(reference) => reference.to_string(),
                ArgKind::Range(start, end) => format!("{}:{}", start, end),
                ArgKind::RefError | ArgKind::Text => REF_ERROR.to_string(),
            };
            *arg = Arg { raw, kind };
            changed = true;
        }
    }

    if changed {
        parsed.to_string()
    } else {
        formula.to_string()
    }
}
