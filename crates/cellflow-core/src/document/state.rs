use cellflow_engine::engine::{CellRef, DependencyGraph, EngineConfig, is_formula};
use std::collections::HashMap;

/// Contents of one cell: what the user typed and what it evaluated to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellData {
    /// Raw input; formulas keep their leading `=`.
    pub raw: String,
    /// Computed value shown in the grid.
    pub value: String,
}

impl CellData {
    pub fn is_formula(&self) -> bool {
        is_formula(&self.raw)
    }
}

/// UI-agnostic document state for the spreadsheet.
///
/// Owns the cell store and the dependency graph describing it; every edit
/// goes through [`Document::set_cell_from_input`] so the two stay in step.
#[derive(Debug, Default)]
pub struct Document {
    pub(crate) cells: HashMap<CellRef, CellData>,
    pub(crate) graph: DependencyGraph,
    pub(crate) config: EngineConfig,
    /// Whether the grid has been modified
    pub modified: bool,
}

impl Document {
    /// Create a new, empty document with default engine limits.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Document {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn cell(&self, cell_ref: &CellRef) -> Option<&CellData> {
        self.cells.get(cell_ref)
    }

    /// Raw input of a cell, empty if unset.
    pub fn raw(&self, cell_ref: &CellRef) -> &str {
        self.cells.get(cell_ref).map_or("", |c| c.raw.as_str())
    }

    /// Computed value of a cell, empty if unset.
    pub fn value(&self, cell_ref: &CellRef) -> &str {
        self.cells.get(cell_ref).map_or("", |c| c.value.as_str())
    }

    /// All non-empty cells in row-major order.
    pub fn cells(&self) -> Vec<(&CellRef, &CellData)> {
        let mut cells: Vec<_> = self.cells.iter().collect();
        cells.sort_by(|a, b| a.0.cmp(b.0));
        cells
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Rebuild the dependency graph from the stored formulas.
    /// Call this after cells are moved wholesale (row/column operations).
    pub(crate) fn rebuild_dependencies(&mut self) {
        self.graph.clear();
        let mut formula_cells: Vec<&CellRef> = self
            .cells
            .iter()
            .filter(|(_, data)| data.is_formula())
            .map(|(cell_ref, _)| cell_ref)
            .collect();
        formula_cells.sort();

        for cell_ref in formula_cells {
            let raw = &self.cells[cell_ref].raw;
            if let Err(err) = self.graph.update_dependencies(cell_ref, raw, &self.config) {
                log::warn!("dropping dependencies of {}: {}", cell_ref, err);
            }
        }
    }
}
