use super::{CellData, Document};
use crate::error::Result;
use cellflow_engine::engine::{
    CellKind, CellRef, ShiftOperation, offset_formula_references, shift_formula_references,
    validate_cell,
};

/// What an accepted edit changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditOutcome {
    /// The edited cell's new value.
    pub value: String,
    /// Dependent cells that were recomputed, in recomputation order.
    pub recomputed: Vec<CellRef>,
}

impl Document {
    /// Set cell contents from input string.
    ///
    /// The dependency graph is updated first; if the new input would make
    /// the cell depend on itself the edit is refused and nothing changes.
    /// Otherwise the cell is evaluated and stored, then every cell that
    /// transitively depends on it is recomputed in dependency order.
    /// Empty input clears the cell.
    pub fn set_cell_from_input(&mut self, cell_ref: CellRef, input: &str) -> Result<EditOutcome> {
        self.graph
            .update_dependencies(&cell_ref, input, &self.config)?;

        let value = self.evaluate(input);
        if input.is_empty() {
            self.cells.remove(&cell_ref);
        } else {
            self.cells.insert(
                cell_ref.clone(),
                CellData {
                    raw: input.to_string(),
                    value: value.clone(),
                },
            );
        }
        self.modified = true;

        let order = self.graph.recalc_order(&cell_ref);
        let recomputed = self.recompute(order);
        log::debug!(
            "{} set to {:?}; recomputed {} dependent(s)",
            cell_ref,
            value,
            recomputed.len()
        );

        Ok(EditOutcome { value, recomputed })
    }

    /// Clear the specified cell; dependents see an empty value.
    pub fn clear_cell(&mut self, cell_ref: &CellRef) -> Vec<CellRef> {
        if !self.cells.contains_key(cell_ref) {
            return Vec::new();
        }
        // Clearing never adds edges, so it cannot be refused.
        match self.set_cell_from_input(cell_ref.clone(), "") {
            Ok(outcome) => outcome.recomputed,
            Err(err) => {
                log::warn!("clearing {} failed: {}", cell_ref, err);
                Vec::new()
            }
        }
    }

    /// Copy `source` into `target`, moving the relative references of a
    /// formula by the distance between the two cells.
    pub fn fill(&mut self, source: &CellRef, target: CellRef) -> Result<EditOutcome> {
        let delta_col = target.col as isize - source.col as isize;
        let delta_row = target.row as isize - source.row as isize;
        let raw = offset_formula_references(self.raw(source), delta_col, delta_row);
        self.set_cell_from_input(target, &raw)
    }

    /// Check a cell's current value against the expected kind.
    pub fn validate(&self, cell_ref: &CellRef, kind: CellKind) -> bool {
        validate_cell(self.value(cell_ref), kind)
    }

    /// Move every cell and rewrite every formula for a row/column change,
    /// then rebuild the graph and recompute all formulas.
    fn apply_shift(&mut self, op: ShiftOperation) {
        let old_cells = std::mem::take(&mut self.cells);
        for (cell_ref, data) in old_cells {
            let Some(new_ref) = op.apply(&cell_ref) else {
                continue;
            };
            let raw = if data.is_formula() {
                shift_formula_references(&data.raw, op)
            } else {
                data.raw
            };
            self.cells.insert(
                new_ref,
                CellData {
                    raw,
                    value: data.value,
                },
            );
        }

        self.rebuild_dependencies();
        self.recalculate_all();
        self.modified = true;
    }

    /// Insert a row above the specified row
    pub fn insert_row(&mut self, at_row: usize) {
        self.apply_shift(ShiftOperation::InsertRow(at_row));
    }

    /// Delete the specified row
    pub fn delete_row(&mut self, at_row: usize) {
        self.apply_shift(ShiftOperation::DeleteRow(at_row));
    }

    /// Insert a column left of the specified column
    pub fn insert_column(&mut self, at_col: usize) {
        self.apply_shift(ShiftOperation::InsertColumn(at_col));
    }

    /// Delete the specified column
    pub fn delete_column(&mut self, at_col: usize) {
        self.apply_shift(ShiftOperation::DeleteColumn(at_col));
    }
}
