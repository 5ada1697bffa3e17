//! Cell reference parsing and formatting.
//!
//! Provides bidirectional conversion between spreadsheet-style cell references
//! (e.g., "A1", "B2", "AA100") and zero-indexed column/row coordinates, plus
//! the `$`-marked form used when formulas are filled or rows/columns move.
//!
//! # Examples
//!
//! ```
//! use cellflow_engine::engine::{coordinates_of, id_of};
//!
//! assert_eq!(coordinates_of("B3").unwrap(), (1, 2));
//! assert_eq!(id_of(26, 0), "AA1");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::error::{EngineError, Result};

/// A reference to a cell by column and row indices (0-indexed).
///
/// Field order matters: the derived `Ord` is row-major (row, then column).
#[derive(Clone, Debug, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    /// Largest row or column index an id can spell.
    pub const MAX_INDEX: usize = usize::MAX - 1;

    pub fn new(col: usize, row: usize) -> CellRef {
        CellRef { row, col }
    }

    /// Move one step along an axis, or None past [`CellRef::MAX_INDEX`].
    pub fn step(index: usize, delta: isize) -> Option<usize> {
        index
            .checked_add_signed(delta)
            .filter(|moved| *moved <= CellRef::MAX_INDEX)
    }

    /// Parse a cell reference from spreadsheet notation (e.g., "A1", "B2", "AA10").
    fn parse_a1(name: &str) -> Option<CellRef> {
        let caps = a1_re().captures(name)?;
        let col = letters_to_col(&caps["letters"])?;
        let row = parse_row(&caps["numbers"])?;
        Some(CellRef::new(col, row))
    }

    /// Convert column index to spreadsheet-style letters (0 -> A, 25 -> Z, 26 -> AA).
    pub fn col_to_letters(col: usize) -> String {
        let mut result = String::new();
        let mut n = col as u128 + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }
}

impl std::str::FromStr for CellRef {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_a1(s).ok_or_else(|| EngineError::InvalidReference(s.to_string()))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CellRef::col_to_letters(self.col), self.row as u128 + 1)
    }
}

/// Resolve a textual cell id into 0-based `(col, row)` coordinates.
pub fn coordinates_of(id: &str) -> Result<(usize, usize)> {
    let cell: CellRef = id.parse()?;
    Ok((cell.col, cell.row))
}

/// Format 0-based coordinates as a textual cell id.
pub fn id_of(col: usize, row: usize) -> String {
    CellRef::new(col, row).to_string()
}

/// A parsed reference token such as `B2`, `$B2`, `B$2` or `$B$2`.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct CellReference {
    pub cell: CellRef,
    pub col_absolute: bool,
    pub row_absolute: bool,
}

impl CellReference {
    pub fn relative(cell: CellRef) -> CellReference {
        CellReference {
            cell,
            col_absolute: false,
            row_absolute: false,
        }
    }

    /// Move the relative parts of this reference (fill/copy semantics).
    /// Returns None when the result would fall off the grid.
    pub fn offset(&self, delta_col: isize, delta_row: isize) -> Option<CellReference> {
        let col = if self.col_absolute {
            self.cell.col
        } else {
            CellRef::step(self.cell.col, delta_col)?
        };
        let row = if self.row_absolute {
            self.cell.row
        } else {
            CellRef::step(self.cell.row, delta_row)?
        };
        Some(self.with_cell(CellRef::new(col, row)))
    }

    /// Same markers, different target cell.
    pub fn with_cell(&self, cell: CellRef) -> CellReference {
        CellReference {
            cell,
            col_absolute: self.col_absolute,
            row_absolute: self.row_absolute,
        }
    }
}

impl fmt::Display for CellReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let col_marker = if self.col_absolute { "$" } else { "" };
        let row_marker = if self.row_absolute { "$" } else { "" };
        write!(
            f,
            "{}{}{}{}",
            col_marker,
            CellRef::col_to_letters(self.cell.col),
            row_marker,
            self.cell.row as u128 + 1
        )
    }
}

/// Parse a reference token with optional `$` markers.
pub fn parse_reference(token: &str) -> Result<CellReference> {
    let invalid = || EngineError::InvalidReference(token.to_string());
    let caps = reference_re().captures(token).ok_or_else(invalid)?;
    let col = letters_to_col(&caps["letters"]).ok_or_else(invalid)?;
    let row = parse_row(&caps["numbers"]).ok_or_else(invalid)?;

    Ok(CellReference {
        cell: CellRef::new(col, row),
        col_absolute: caps.name("col_abs").is_some(),
        row_absolute: caps.name("row_abs").is_some(),
    })
}

fn letters_to_col(letters: &str) -> Option<usize> {
    let mut col_acc = 0usize;
    for c in letters.bytes() {
        let digit = (c - b'A') as usize + 1;
        col_acc = col_acc.checked_mul(26)?.checked_add(digit)?;
    }
    col_acc.checked_sub(1)
}

/// Rows are 1-based and written without leading zeros, so every id has
/// exactly one spelling.
fn parse_row(numbers: &str) -> Option<usize> {
    if numbers.starts_with('0') {
        return None;
    }
    numbers.parse::<usize>().ok()?.checked_sub(1)
}

fn a1_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?<letters>[A-Z]+)(?<numbers>[0-9]+)$")
            .expect("cell reference regex must compile")
    })
}

fn reference_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?<col_abs>\$)?(?<letters>[A-Z]+)(?<row_abs>\$)?(?<numbers>[0-9]+)$")
            .expect("absolute reference regex must compile")
    })
}
