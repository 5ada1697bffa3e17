//! Edit lines (`CELL=RAW`) and grid output.

use crate::error::{CliError, Result};
use cellflow_core::{CellRef, Document};
use std::io::{BufRead, Write};

/// One requested edit, tagged with where it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edit {
    pub line: usize,
    pub cell: CellRef,
    pub raw: String,
}

/// Parse `CELL=RAW`. Everything after the first `=` is the raw input, so
/// `A3==SUM(A1:A2)` stores the formula `=SUM(A1:A2)`.
pub fn parse_edit(line: usize, text: &str) -> Result<Edit> {
    let Some((id, raw)) = text.split_once('=') else {
        return Err(CliError::Parse {
            line,
            message: format!("expected CELL=VALUE, got {:?}", text),
        });
    };
    let cell = id.trim().parse::<CellRef>().map_err(|err| CliError::Parse {
        line,
        message: err.to_string(),
    })?;
    Ok(Edit {
        line,
        cell,
        raw: raw.to_string(),
    })
}

/// Read edit lines, skipping blanks and `#` comments.
/// Line numbers are 1-based positions in the input.
pub fn read_edit_lines<R: BufRead>(reader: R) -> Result<Vec<(usize, String)>> {
    let mut lines = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        lines.push((idx + 1, line.trim_end_matches('\r').to_string()));
    }
    Ok(lines)
}

/// Apply every line in order. A bad line is reported and skipped; the rest
/// still apply.
pub fn apply_lines(doc: &mut Document, lines: &[(usize, String)]) -> Vec<CliError> {
    let mut errors = Vec::new();
    for (line, text) in lines {
        let edit = match parse_edit(*line, text) {
            Ok(edit) => edit,
            Err(err) => {
                errors.push(err);
                continue;
            }
        };
        if let Err(source) = doc.set_cell_from_input(edit.cell, &edit.raw) {
            errors.push(CliError::Rejected {
                line: edit.line,
                source,
            });
        }
    }
    errors
}

/// Write every non-empty cell as `ID<TAB>VALUE`, row-major.
pub fn write_grid<W: Write>(doc: &Document, out: &mut W) -> Result<()> {
    for (cell_ref, data) in doc.cells() {
        writeln!(out, "{}\t{}", cell_ref, data.value)?;
    }
    Ok(())
}
