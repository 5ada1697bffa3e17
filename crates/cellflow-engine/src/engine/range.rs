//! Rectangular cell ranges (`A1:B5`).

use serde::{Deserialize, Serialize};

use super::cell_ref::{CellRef, parse_reference};
use super::config::MAX_RANGE_CELLS;
use crate::error::{EngineError, Result};

/// An inclusive rectangle of cells with normalized corners.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct CellRange {
    pub top_left: CellRef,
    pub bottom_right: CellRef,
}

impl CellRange {
    /// Build the rectangle spanned by two corners given in any orientation.
    pub fn new(a: &CellRef, b: &CellRef) -> CellRange {
        CellRange {
            top_left: CellRef::new(a.col.min(b.col), a.row.min(b.row)),
            bottom_right: CellRef::new(a.col.max(b.col), a.row.max(b.row)),
        }
    }

    pub fn rows(&self) -> usize {
        self.bottom_right.row - self.top_left.row + 1
    }

    pub fn cols(&self) -> usize {
        self.bottom_right.col - self.top_left.col + 1
    }

    /// Number of cells, or None if it does not fit in a usize.
    pub fn cell_count(&self) -> Option<usize> {
        self.rows().checked_mul(self.cols())
    }

    /// Cells in row-major order, top-left first.
    pub fn cells(&self) -> impl Iterator<Item = CellRef> + '_ {
        (self.top_left.row..=self.bottom_right.row).flat_map(move |row| {
            (self.top_left.col..=self.bottom_right.col).map(move |col| CellRef::new(col, row))
        })
    }

    /// Expand to a vector, refusing ranges larger than `max_cells`.
    /// A count that overflows `usize` is always too large.
    pub fn expand(&self, max_cells: usize) -> Result<Vec<CellRef>> {
        let count = self.cell_count();
        if !count.is_some_and(|cells| cells <= max_cells) {
            return Err(EngineError::RangeTooLarge {
                cells: count.unwrap_or(usize::MAX),
                max: max_cells,
            });
        }
        Ok(self.cells().collect())
    }
}

/// Expand two corner tokens into every cell of the rectangle, row-major.
///
/// Corner tokens may carry `$` markers; they do not affect expansion.
/// Ranges over [`MAX_RANGE_CELLS`] are refused.
pub fn expand_range(start: &str, end: &str) -> Result<Vec<CellRef>> {
    expand_range_with(start, end, MAX_RANGE_CELLS)
}

/// [`expand_range`] with an explicit cell limit.
pub fn expand_range_with(start: &str, end: &str, max_cells: usize) -> Result<Vec<CellRef>> {
    let start = parse_reference(start)?;
    let end = parse_reference(end)?;
    CellRange::new(&start.cell, &end.cell).expand(max_cells)
}

/// Parse `A1:B5` or a single address into its cells.
pub fn parse_range_reference(text: &str) -> Result<Vec<CellRef>> {
    match text.split_once(':') {
        Some((start, end)) => expand_range(start.trim(), end.trim()),
        None => Ok(vec![parse_reference(text.trim())?.cell]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(cells: &[CellRef]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_expand_range_row_major() {
        let cells = expand_range("A1", "B2").unwrap();
        assert_eq!(ids(&cells), vec!["A1", "B1", "A2", "B2"]);
    }

    #[test]
    fn test_expand_range_any_corner_order() {
        assert_eq!(
            ids(&expand_range("B2", "A1").unwrap()),
            vec!["A1", "B1", "A2", "B2"]
        );
        assert_eq!(
            ids(&expand_range("A2", "B1").unwrap()),
            vec!["A1", "B1", "A2", "B2"]
        );
    }

    #[test]
    fn test_expand_range_ignores_absolute_markers() {
        assert_eq!(
            ids(&expand_range("$A$1", "A$3").unwrap()),
            vec!["A1", "A2", "A3"]
        );
    }

    #[test]
    fn test_parse_range_reference_single_cell() {
        assert_eq!(ids(&parse_range_reference("C7").unwrap()), vec!["C7"]);
        assert!(parse_range_reference("C7:").is_err());
        assert!(parse_range_reference("nope").is_err());
    }

    #[test]
    fn test_range_cap() {
        let range = CellRange::new(&CellRef::new(0, 0), &CellRef::new(0, 9));
        assert_eq!(range.cell_count(), Some(10));
        assert_eq!(
            range.expand(5),
            Err(EngineError::RangeTooLarge { cells: 10, max: 5 })
        );
        assert_eq!(range.expand(10).unwrap().len(), 10);
    }

    #[test]
    fn test_expand_range_is_capped() {
        assert!(matches!(
            expand_range("A1", "ZZZZ2000000000"),
            Err(EngineError::RangeTooLarge { max: MAX_RANGE_CELLS, .. })
        ));
        assert_eq!(
            expand_range_with("A1", "A3", 2),
            Err(EngineError::RangeTooLarge { cells: 3, max: 2 })
        );
        assert_eq!(expand_range_with("A1", "A3", 3).unwrap().len(), 3);
    }

    #[test]
    fn test_overflowing_count_is_too_large_even_without_a_cap() {
        let whole_grid = CellRange::new(
            &CellRef::new(0, 0),
            &CellRef::new(CellRef::MAX_INDEX, CellRef::MAX_INDEX),
        );
        assert_eq!(whole_grid.cell_count(), None);
        assert_eq!(
            whole_grid.expand(usize::MAX),
            Err(EngineError::RangeTooLarge {
                cells: usize::MAX,
                max: usize::MAX,
            })
        );
    }
}
