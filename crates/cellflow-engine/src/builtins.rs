//! Built-in spreadsheet functions and their metadata.
//!
//! Conventions:
//! - Spreadsheet-facing names are ALL CAPS and matched exactly.
//! - Numeric functions skip values that are not numbers.
//! - If you add a built-in, give it a `BUILTINS` entry; dependency
//!   extraction reads `ref_args` from the same table.

use regex::Regex;
use std::collections::HashSet;

use crate::engine::{Call, FormulaError, format_number};

/// Which arguments of a call name cells (and so become dependencies).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefArgs {
    All,
    First,
}

pub struct Builtin {
    pub name: &'static str,
    pub ref_args: RefArgs,
    pub eval: fn(&Call<'_>) -> Result<String, FormulaError>,
}

pub const BUILTINS: &[Builtin] = &[
    Builtin {
        name: "SUM",
        ref_args: RefArgs::All,
        eval: sum,
    },
    Builtin {
        name: "AVERAGE",
        ref_args: RefArgs::All,
        eval: average,
    },
    Builtin {
        name: "MAX",
        ref_args: RefArgs::All,
        eval: max,
    },
    Builtin {
        name: "MIN",
        ref_args: RefArgs::All,
        eval: min,
    },
    Builtin {
        name: "COUNT",
        ref_args: RefArgs::All,
        eval: count,
    },
    Builtin {
        name: "TRIM",
        ref_args: RefArgs::All,
        eval: trim,
    },
    Builtin {
        name: "UPPER",
        ref_args: RefArgs::All,
        eval: upper,
    },
    Builtin {
        name: "LOWER",
        ref_args: RefArgs::All,
        eval: lower,
    },
    Builtin {
        name: "REMOVE_DUPLICATES",
        ref_args: RefArgs::All,
        eval: remove_duplicates,
    },
    Builtin {
        name: "FIND_AND_REPLACE",
        ref_args: RefArgs::First,
        eval: find_and_replace,
    },
];

pub fn builtin(name: &str) -> Option<&'static Builtin> {
    BUILTINS.iter().find(|b| b.name == name)
}

/// Render a numeric result; overflow to infinity is an error value.
fn number(n: f64) -> Result<String, FormulaError> {
    if n.is_finite() {
        Ok(format_number(n))
    } else {
        Err(FormulaError::Error)
    }
}

fn sum(call: &Call<'_>) -> Result<String, FormulaError> {
    number(call.numbers()?.iter().sum())
}

fn average(call: &Call<'_>) -> Result<String, FormulaError> {
    let numbers = call.numbers()?;
    if numbers.is_empty() {
        return Err(FormulaError::DivZero);
    }
    number(numbers.iter().sum::<f64>() / numbers.len() as f64)
}

fn max(call: &Call<'_>) -> Result<String, FormulaError> {
    call.numbers()?
        .into_iter()
        .reduce(f64::max)
        .ok_or(FormulaError::Error)
        .and_then(number)
}

fn min(call: &Call<'_>) -> Result<String, FormulaError> {
    call.numbers()?
        .into_iter()
        .reduce(f64::min)
        .ok_or(FormulaError::Error)
        .and_then(number)
}

fn count(call: &Call<'_>) -> Result<String, FormulaError> {
    Ok(call.numbers()?.len().to_string())
}

fn trim(call: &Call<'_>) -> Result<String, FormulaError> {
    Ok(call.single_value()?.trim().to_string())
}

fn upper(call: &Call<'_>) -> Result<String, FormulaError> {
    Ok(call.single_value()?.to_uppercase())
}

fn lower(call: &Call<'_>) -> Result<String, FormulaError> {
    Ok(call.single_value()?.to_lowercase())
}

fn remove_duplicates(call: &Call<'_>) -> Result<String, FormulaError> {
    let values = call.values()?;
    if values.is_empty() {
        return Err(FormulaError::Error);
    }
    let mut seen = HashSet::new();
    let unique: Vec<&str> = values
        .iter()
        .map(String::as_str)
        .filter(|value| seen.insert(*value))
        .collect();
    Ok(unique.join(","))
}

fn find_and_replace(call: &Call<'_>) -> Result<String, FormulaError> {
    let [target, pattern, replacement] = call.args else {
        return Err(FormulaError::Error);
    };
    let text = match call.arg_refs(target)?.as_slice() {
        [cell] => call.value(cell),
        _ => return Err(FormulaError::Error),
    };
    let re = Regex::new(&pattern.raw).map_err(|_| FormulaError::Error)?;
    Ok(re
        .replace_all(&text, replacement.raw.as_str())
        .into_owned())
}
