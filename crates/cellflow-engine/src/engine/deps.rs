//! Dependency graph for formula cells.
//!
//! Tracks, for every formula cell, the cells it reads from (`forward`) and,
//! for every referenced cell, the formula cells reading it (`reverse`).
//!
//! # Invariants
//!
//! 1. `forward` and `reverse` are exact transposes of each other.
//! 2. Empty edge sets are removed, not stored.
//! 3. The graph is acyclic: [`DependencyGraph::update_dependencies`] refuses
//!    edits that would close a loop and leaves the graph untouched when it does.
//!
//! Dependencies are extracted from the parsed formula, so a range argument
//! contributes every cell inside it and literal text arguments contribute
//! nothing.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use super::config::EngineConfig;
use super::parse::{Formula, is_formula};
use super::CellRef;
use crate::builtins::{RefArgs, builtin};
use crate::error::{EngineError, Result};

/// Extract the cells a formula reads, in first-reference order, without
/// duplicates. Non-formula text and formulas that do not parse read nothing.
pub fn extract_dependencies(formula: &str, config: &EngineConfig) -> Result<Vec<CellRef>> {
    if !is_formula(formula) {
        return Ok(Vec::new());
    }
    let Some(parsed) = Formula::parse(formula) else {
        return Ok(Vec::new());
    };
    let Some(builtin) = builtin(&parsed.name) else {
        return Ok(Vec::new());
    };

    let ref_args = match builtin.ref_args {
        RefArgs::All => &parsed.args[..],
        RefArgs::First => &parsed.args[..parsed.args.len().min(1)],
    };

    let mut seen = HashSet::new();
    let mut deps = Vec::new();
    for arg in ref_args {
        let Some(range) = arg.range() else {
            continue;
        };
        for cell in range.expand(config.max_range_cells)? {
            if seen.insert(cell.clone()) {
                deps.push(cell);
            }
        }
    }
    Ok(deps)
}

/// Bidirectional dependency graph owned by the caller.
#[derive(Default, Debug, Clone)]
pub struct DependencyGraph {
    /// cell -> cells it depends on
    pub(super) forward: HashMap<CellRef, BTreeSet<CellRef>>,
    /// cell -> cells that depend on it
    pub(super) reverse: HashMap<CellRef, BTreeSet<CellRef>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cells this cell reads from, row-major.
    pub fn dependencies_of(&self, cell: &CellRef) -> impl Iterator<Item = &CellRef> + '_ {
        self.forward.get(cell).into_iter().flatten()
    }

    /// Cells that read from this cell, row-major.
    pub fn dependents_of(&self, cell: &CellRef) -> impl Iterator<Item = &CellRef> + '_ {
        self.reverse.get(cell).into_iter().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.forward.values().map(BTreeSet::len).sum()
    }

    pub fn clear(&mut self) {
        self.forward.clear();
        self.reverse.clear();
    }

    /// Replace the edges where `cell` is the dependent with the references
    /// found in `formula`.
    ///
    /// Every candidate edge is checked before anything is changed: on
    /// [`EngineError::CircularDependency`] or [`EngineError::RangeTooLarge`]
    /// the graph keeps the cell's previous edges. Returns the number of
    /// edges recorded.
    pub fn update_dependencies(
        &mut self,
        cell: &CellRef,
        formula: &str,
        config: &EngineConfig,
    ) -> Result<usize> {
        let candidates = extract_dependencies(formula, config)?;

        if let Some(dependency) = candidates
            .iter()
            .find(|dep| self.detect_circular_dependency(cell, dep))
        {
            log::warn!("rejecting {} = {}: depends on itself via {}", cell, formula, dependency);
            return Err(EngineError::CircularDependency {
                cell: cell.clone(),
                dependency: dependency.clone(),
            });
        }

        self.remove_forward_edges(cell);
        for dep in &candidates {
            self.add_edge(cell, dep);
        }
        log::debug!("{} now depends on {} cell(s)", cell, candidates.len());
        Ok(candidates.len())
    }

    /// Detach a cell completely: edges to what it reads and edges from the
    /// cells reading it. Calling it again is a no-op.
    pub fn remove_dependencies(&mut self, cell: &CellRef) {
        self.remove_forward_edges(cell);

        if let Some(dependents) = self.reverse.remove(cell) {
            for dependent in dependents {
                if let Some(deps) = self.forward.get_mut(&dependent) {
                    deps.remove(cell);
                    if deps.is_empty() {
                        self.forward.remove(&dependent);
                    }
                }
            }
        }
    }

    /// Every cell that transitively depends on `changed`, excluding
    /// `changed` itself, in breadth-first discovery order.
    pub fn affected_cells(&self, changed: &CellRef) -> Vec<CellRef> {
        let mut affected = Vec::new();
        let mut seen = HashSet::new();
        seen.insert(changed.clone());
        let mut queue = VecDeque::from([changed.clone()]);

        while let Some(current) = queue.pop_front() {
            for dependent in self.dependents_of(&current) {
                if seen.insert(dependent.clone()) {
                    affected.push(dependent.clone());
                    queue.push_back(dependent.clone());
                }
            }
        }

        affected
    }

    fn add_edge(&mut self, dependent: &CellRef, dependency: &CellRef) {
        self.forward
            .entry(dependent.clone())
            .or_default()
            .insert(dependency.clone());
        self.reverse
            .entry(dependency.clone())
            .or_default()
            .insert(dependent.clone());
    }

    fn remove_forward_edges(&mut self, cell: &CellRef) {
        let Some(deps) = self.forward.remove(cell) else {
            return;
        };
        for dep in deps {
            if let Some(dependents) = self.reverse.get_mut(&dep) {
                dependents.remove(cell);
                if dependents.is_empty() {
                    self.reverse.remove(&dep);
                }
            }
        }
    }

    /// Check all invariants. Panics if any are violated.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        for (cell, deps) in &self.forward {
            assert!(!deps.is_empty(), "empty forward set stored for {}", cell);
            for dep in deps {
                assert!(
                    self.reverse.get(dep).is_some_and(|s| s.contains(cell)),
                    "missing reverse edge {} -> {}",
                    dep,
                    cell
                );
            }
        }
        for (cell, dependents) in &self.reverse {
            assert!(!dependents.is_empty(), "empty reverse set stored for {}", cell);
            for dependent in dependents {
                assert!(
                    self.forward.get(dependent).is_some_and(|s| s.contains(cell)),
                    "missing forward edge {} -> {}",
                    dependent,
                    cell
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(id: &str) -> CellRef {
        id.parse().unwrap()
    }

    fn ids<'a>(cells: impl IntoIterator<Item = &'a CellRef>) -> Vec<String> {
        cells.into_iter().map(|c| c.to_string()).collect()
    }

    fn update(graph: &mut DependencyGraph, id: &str, formula: &str) -> Result<usize> {
        graph.update_dependencies(&cell(id), formula, &EngineConfig::default())
    }

    #[test]
    fn test_extract_dependencies_expands_ranges() {
        let deps = extract_dependencies("=SUM(A1:A3, C1)", &EngineConfig::default()).unwrap();
        assert_eq!(ids(&deps), vec!["A1", "A2", "A3", "C1"]);
    }

    #[test]
    fn test_extract_dependencies_deduplicates() {
        let deps = extract_dependencies("=SUM(A1, A1:A2, A1)", &EngineConfig::default()).unwrap();
        assert_eq!(ids(&deps), vec!["A1", "A2"]);
    }

    #[test]
    fn test_extract_dependencies_skips_literal_arguments() {
        let deps =
            extract_dependencies("=FIND_AND_REPLACE(B1, A1, C1)", &EngineConfig::default())
                .unwrap();
        assert_eq!(ids(&deps), vec!["B1"]);
    }

    #[test]
    fn test_extract_dependencies_non_formulas() {
        let config = EngineConfig::default();
        assert!(extract_dependencies("A1", &config).unwrap().is_empty());
        assert!(extract_dependencies("=A1+B1", &config).unwrap().is_empty());
        assert!(extract_dependencies("=NOPE(A1)", &config).unwrap().is_empty());
    }

    #[test]
    fn test_extract_dependencies_over_limit_range() {
        let config = EngineConfig { max_range_cells: 10 };
        assert_eq!(
            extract_dependencies("=SUM(A1:A11)", &config),
            Err(EngineError::RangeTooLarge { cells: 11, max: 10 })
        );
    }

    #[test]
    fn test_update_records_both_directions() {
        let mut graph = DependencyGraph::new();
        assert_eq!(update(&mut graph, "C1", "=SUM(A1:B1)").unwrap(), 2);
        assert_eq!(ids(graph.dependencies_of(&cell("C1"))), vec!["A1", "B1"]);
        assert_eq!(ids(graph.dependents_of(&cell("A1"))), vec!["C1"]);
        assert_eq!(ids(graph.dependents_of(&cell("B1"))), vec!["C1"]);
        graph.assert_consistent();
    }

    #[test]
    fn test_update_replaces_old_edges_and_prunes() {
        let mut graph = DependencyGraph::new();
        update(&mut graph, "C1", "=SUM(A1)").unwrap();
        update(&mut graph, "C1", "=SUM(B1)").unwrap();
        assert_eq!(graph.dependents_of(&cell("A1")).count(), 0);
        assert!(!graph.reverse.contains_key(&cell("A1")));
        graph.assert_consistent();

        update(&mut graph, "C1", "plain text").unwrap();
        assert!(graph.is_empty());
        assert!(graph.reverse.is_empty());
    }

    #[test]
    fn test_update_keeps_dependents_of_edited_cell() {
        let mut graph = DependencyGraph::new();
        update(&mut graph, "B1", "=SUM(A1)").unwrap();
        update(&mut graph, "A1", "=SUM(Z9)").unwrap();
        assert_eq!(ids(graph.dependents_of(&cell("A1"))), vec!["B1"]);
        graph.assert_consistent();
    }

    #[test]
    fn test_cycle_is_rejected_without_changes() {
        let mut graph = DependencyGraph::new();
        update(&mut graph, "A1", "=SUM(B1)").unwrap();
        update(&mut graph, "B1", "=SUM(C1)").unwrap();
        let before = graph.clone();

        let err = update(&mut graph, "B1", "=SUM(A1)").unwrap_err();
        assert_eq!(
            err,
            EngineError::CircularDependency {
                cell: cell("B1"),
                dependency: cell("A1"),
            }
        );
        assert_eq!(graph.forward, before.forward);
        assert_eq!(graph.reverse, before.reverse);
        graph.assert_consistent();
    }

    #[test]
    fn test_self_reference_is_rejected() {
        let mut graph = DependencyGraph::new();
        assert!(matches!(
            update(&mut graph, "A1", "=SUM(A1)"),
            Err(EngineError::CircularDependency { .. })
        ));
        assert!(matches!(
            update(&mut graph, "B2", "=SUM(A1:C3)"),
            Err(EngineError::CircularDependency { .. })
        ));
        assert!(graph.is_empty());
    }

    #[test]
    fn test_remove_dependencies_detaches_and_is_idempotent() {
        let mut graph = DependencyGraph::new();
        update(&mut graph, "B1", "=SUM(A1)").unwrap();
        update(&mut graph, "C1", "=SUM(B1)").unwrap();

        graph.remove_dependencies(&cell("B1"));
        assert!(graph.is_empty());
        assert!(graph.reverse.is_empty());
        graph.assert_consistent();

        let snapshot = graph.clone();
        graph.remove_dependencies(&cell("B1"));
        assert_eq!(graph.forward, snapshot.forward);
        assert_eq!(graph.reverse, snapshot.reverse);
    }

    #[test]
    fn test_affected_cells_breadth_first() {
        let mut graph = DependencyGraph::new();
        update(&mut graph, "B1", "=SUM(A1)").unwrap();
        update(&mut graph, "C1", "=SUM(B1)").unwrap();
        update(&mut graph, "B2", "=SUM(A1)").unwrap();
        update(&mut graph, "D1", "=SUM(C1)").unwrap();

        assert_eq!(ids(&graph.affected_cells(&cell("A1"))), vec!["B1", "B2", "C1", "D1"]);
        assert_eq!(ids(&graph.affected_cells(&cell("C1"))), vec!["D1"]);
        assert!(graph.affected_cells(&cell("D1")).is_empty());
    }

    #[test]
    fn test_edge_count() {
        let mut graph = DependencyGraph::new();
        update(&mut graph, "C1", "=SUM(A1:B2)").unwrap();
        assert_eq!(graph.edge_count(), 4);
        graph.clear();
        assert_eq!(graph.edge_count(), 0);
    }
}
