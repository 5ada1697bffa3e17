//! Formula evaluation.
//!
//! Evaluates a parsed `=NAME(args)` formula against a read-only cell lookup.
//! Every failure is folded into a [`FormulaError`] and rendered as the cell's
//! value, so evaluation never fails from the caller's point of view.

use thiserror::Error;

use super::config::EngineConfig;
use super::format::parse_number;
use super::parse::{Arg, ArgKind, Formula, is_formula};
use super::CellRef;

/// Error values a formula can produce. They are data, not failures: the
/// rendered text becomes the cell's value.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormulaError {
    #[error("#ERROR!")]
    Error,

    #[error("#DIV/0!")]
    DivZero,

    #[error("#REF!")]
    Ref,
}

/// Arguments of one function call plus the context needed to read them.
pub struct Call<'a> {
    pub args: &'a [Arg],
    lookup: &'a dyn Fn(&CellRef) -> String,
    config: &'a EngineConfig,
}

impl<'a> Call<'a> {
    pub fn new(
        args: &'a [Arg],
        lookup: &'a dyn Fn(&CellRef) -> String,
        config: &'a EngineConfig,
    ) -> Call<'a> {
        Call {
            args,
            lookup,
            config,
        }
    }

    /// Cells named by one argument, ranges expanded row-major.
    pub fn arg_refs(&self, arg: &Arg) -> Result<Vec<CellRef>, FormulaError> {
        match &arg.kind {
            ArgKind::Ref(_) | ArgKind::Range(..) => {
                let range = arg.range().ok_or(FormulaError::Error)?;
                range
                    .expand(self.config.max_range_cells)
                    .map_err(|_| FormulaError::Error)
            }
            ArgKind::RefError => Err(FormulaError::Ref),
            ArgKind::Text => Err(FormulaError::Error),
        }
    }

    /// Cells named by all arguments, flattened in argument order.
    pub fn refs(&self) -> Result<Vec<CellRef>, FormulaError> {
        let mut refs = Vec::new();
        for arg in self.args {
            refs.extend(self.arg_refs(arg)?);
        }
        Ok(refs)
    }

    pub fn value(&self, cell: &CellRef) -> String {
        (self.lookup)(cell)
    }

    pub fn values(&self) -> Result<Vec<String>, FormulaError> {
        Ok(self.refs()?.iter().map(|cell| self.value(cell)).collect())
    }

    /// Numeric values among the referenced cells; text is skipped.
    pub fn numbers(&self) -> Result<Vec<f64>, FormulaError> {
        Ok(self
            .refs()?
            .iter()
            .filter_map(|cell| parse_number(&self.value(cell)))
            .collect())
    }

    /// The value of the only referenced cell.
    pub fn single_value(&self) -> Result<String, FormulaError> {
        match self.refs()?.as_slice() {
            [cell] => Ok(self.value(cell)),
            _ => Err(FormulaError::Error),
        }
    }
}

/// Evaluate cell input with default limits.
///
/// Non-formula input is returned unchanged.
pub fn evaluate_formula<F>(formula: &str, lookup: F) -> String
where
    F: Fn(&CellRef) -> String,
{
    evaluate_formula_with(formula, &EngineConfig::default(), lookup)
}

/// Evaluate cell input with explicit limits.
pub fn evaluate_formula_with<F>(formula: &str, config: &EngineConfig, lookup: F) -> String
where
    F: Fn(&CellRef) -> String,
{
    if !is_formula(formula) {
        return formula.to_string();
    }

    match evaluate_call(formula, config, &lookup) {
        Ok(value) => value,
        Err(err) => {
            log::trace!("{} evaluated to {}", formula, err);
            err.to_string()
        }
    }
}

fn evaluate_call(
    text: &str,
    config: &EngineConfig,
    lookup: &dyn Fn(&CellRef) -> String,
) -> Result<String, FormulaError> {
    let formula = Formula::parse(text).ok_or(FormulaError::Error)?;
    let builtin = crate::builtins::builtin(&formula.name).ok_or(FormulaError::Error)?;
    (builtin.eval)(&Call::new(&formula.args, lookup, config))
}
