use super::{CellData, Document};
use cellflow_engine::engine::{CellRef, evaluate_formula_with};

impl Document {
    /// Evaluate raw input against the current cell values.
    pub fn evaluate(&self, raw: &str) -> String {
        evaluate_formula_with(raw, &self.config, |cell_ref| {
            self.value(cell_ref).to_string()
        })
    }

    /// Re-evaluate the given cells in order, committing each value before
    /// the next cell reads it. Cells without a formula are skipped.
    /// Returns the cells that were recomputed.
    pub(crate) fn recompute<I>(&mut self, order: I) -> Vec<CellRef>
    where
        I: IntoIterator<Item = CellRef>,
    {
        let mut recomputed = Vec::new();
        for cell_ref in order {
            let Some(raw) = self
                .cells
                .get(&cell_ref)
                .filter(|data| data.is_formula())
                .map(|data| data.raw.clone())
            else {
                continue;
            };

            let value = self.evaluate(&raw);
            log::trace!("{} = {}", cell_ref, value);
            self.cells.insert(cell_ref.clone(), CellData { raw, value });
            recomputed.push(cell_ref);
        }
        recomputed
    }

    /// Recompute every formula in dependency order.
    pub fn recalculate_all(&mut self) -> Vec<CellRef> {
        let formula_cells: Vec<CellRef> = self
            .cells
            .iter()
            .filter(|(_, data)| data.is_formula())
            .map(|(cell_ref, _)| cell_ref.clone())
            .collect();
        let order = self.graph.topo_order(formula_cells);
        log::debug!("recalculating {} formula cell(s)", order.len());
        self.recompute(order)
    }
}

#[cfg(test)]
mod tests {
    use super::Document;
    use cellflow_engine::engine::CellRef;

    #[test]
    fn test_evaluate_reads_current_values() {
        let mut doc = Document::new();
        doc.set_cell_from_input(CellRef::new(0, 0), "3").unwrap(); // A1
        doc.set_cell_from_input(CellRef::new(0, 1), "4").unwrap(); // A2
        assert_eq!(doc.evaluate("=SUM(A1:A2)"), "7");
        assert_eq!(doc.evaluate("plain"), "plain");
    }

    #[test]
    fn test_recalculate_all_is_stable() {
        let mut doc = Document::new();
        doc.set_cell_from_input(CellRef::new(0, 0), "1").unwrap(); // A1
        doc.set_cell_from_input(CellRef::new(1, 0), "=SUM(A1)").unwrap(); // B1
        doc.set_cell_from_input(CellRef::new(2, 0), "=SUM(A1, B1)").unwrap(); // C1

        let order = doc.recalculate_all();
        assert_eq!(order, vec![CellRef::new(1, 0), CellRef::new(2, 0)]);
        assert_eq!(doc.value(&CellRef::new(2, 0)), "2");
    }
}
