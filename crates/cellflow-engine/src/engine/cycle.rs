//! Circular dependency detection and recomputation order.
//!
//! When a formula is entered, we must verify it doesn't create a cycle
//! (e.g., A1 references B1, B1 references C1, C1 references A1).
//! Detection walks the existing "depends on" edges with a depth-first
//! search before any edge is committed.
//!
//! Recomputation after an edit follows a topological order of the affected
//! cells (Kahn's algorithm), so a cell fed through branches of different
//! lengths is recomputed once, after all of its inputs.

use std::collections::{BTreeSet, HashMap, HashSet};

use super::CellRef;
use super::deps::DependencyGraph;

impl DependencyGraph {
    /// Would adding the edge `start -> candidate` close a loop?
    ///
    /// True when `candidate` is `start` or already (transitively) depends on
    /// `start`.
    pub fn detect_circular_dependency(&self, start: &CellRef, candidate: &CellRef) -> bool {
        let mut visited = HashSet::new();
        let mut stack = vec![candidate];

        while let Some(current) = stack.pop() {
            if current == start {
                return true;
            }
            if visited.insert(current) {
                stack.extend(self.dependencies_of(current));
            }
        }

        false
    }

    /// Cells to recompute after `changed` was edited, inputs before the
    /// cells that read them.
    pub fn recalc_order(&self, changed: &CellRef) -> Vec<CellRef> {
        self.topo_order(self.affected_cells(changed))
    }

    /// Topologically order `cells` over the edges between them.
    ///
    /// Ties are broken row-major so the order is deterministic.
    pub fn topo_order<I>(&self, cells: I) -> Vec<CellRef>
    where
        I: IntoIterator<Item = CellRef>,
    {
        let members: BTreeSet<CellRef> = cells.into_iter().collect();

        let mut in_degree: HashMap<&CellRef, usize> = members
            .iter()
            .map(|cell| {
                let inputs = self
                    .dependencies_of(cell)
                    .filter(|dep| members.contains(*dep))
                    .count();
                (cell, inputs)
            })
            .collect();

        let mut ready: BTreeSet<&CellRef> = in_degree
            .iter()
            .filter(|(_, inputs)| **inputs == 0)
            .map(|(cell, _)| *cell)
            .collect();

        let mut order = Vec::with_capacity(members.len());
        while let Some(cell) = ready.pop_first() {
            order.push(cell.clone());
            for dependent in self.dependents_of(cell) {
                if let Some(inputs) = in_degree.get_mut(dependent) {
                    *inputs -= 1;
                    if *inputs == 0 {
                        ready.insert(dependent);
                    }
                }
            }
        }

        if order.len() < members.len() {
            // Only reachable if the graph was built around update_dependencies.
            log::warn!(
                "dependency cycle among {} cell(s); recomputing them last",
                members.len() - order.len()
            );
            let placed: HashSet<CellRef> = order.iter().cloned().collect();
            let leftovers: Vec<CellRef> = members
                .iter()
                .filter(|cell| !placed.contains(*cell))
                .cloned()
                .collect();
            order.extend(leftovers);
        }

        order
    }
}
