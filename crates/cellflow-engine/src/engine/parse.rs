//! Formula tokenizer.
//!
//! Turns `=NAME(arg, arg, ...)` into a [`Formula`] whose arguments are
//! classified once, up front, as references, ranges or literal text. Both
//! dependency extraction and evaluation work from this structure, so neither
//! has to pattern-match raw formula text.

use std::fmt;

use super::cell_ref::{CellReference, parse_reference};
use super::range::CellRange;

/// Leading marker that turns cell input into a formula.
pub const FORMULA_MARKER: char = '=';

/// Placeholder left in a formula when a referenced row or column is deleted.
pub const REF_ERROR: &str = "#REF!";

/// True when the text should be treated as a formula.
pub fn is_formula(text: &str) -> bool {
    text.starts_with(FORMULA_MARKER)
}

/// The classified shape of one argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArgKind {
    /// A single cell, e.g. `A1` or `$B$2`.
    Ref(CellReference),
    /// Two corners joined by `:`, e.g. `A1:B3`.
    Range(CellReference, CellReference),
    /// A reference that no longer points anywhere.
    RefError,
    /// Anything else.
    Text,
}

/// One trimmed argument together with its classification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Arg {
    pub raw: String,
    pub kind: ArgKind,
}

impl Arg {
    pub fn parse(raw: &str) -> Arg {
        let raw = raw.trim();
        let kind = if raw == REF_ERROR {
            ArgKind::RefError
        } else if let Some((start, end)) = raw.split_once(':') {
            match (parse_reference(start.trim()), parse_reference(end.trim())) {
                (Ok(start), Ok(end)) => ArgKind::Range(start, end),
                _ => ArgKind::Text,
            }
        } else {
            match parse_reference(raw) {
                Ok(reference) => ArgKind::Ref(reference),
                Err(_) => ArgKind::Text,
            }
        };
        Arg {
            raw: raw.to_string(),
            kind,
        }
    }

    /// The rectangle covered by a reference or range argument.
    pub fn range(&self) -> Option<CellRange> {
        match &self.kind {
            ArgKind::Ref(reference) => Some(CellRange::new(&reference.cell, &reference.cell)),
            ArgKind::Range(start, end) => Some(CellRange::new(&start.cell, &end.cell)),
            ArgKind::RefError | ArgKind::Text => None,
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ArgKind::Ref(reference) => write!(f, "{}", reference),
            ArgKind::Range(start, end) => write!(f, "{}:{}", start, end),
            ArgKind::RefError => f.write_str(REF_ERROR),
            ArgKind::Text => f.write_str(&self.raw),
        }
    }
}

/// A parsed `=NAME(args)` formula.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Formula {
    pub name: String,
    pub args: Vec<Arg>,
}

impl Formula {
    /// Parse formula text (including the leading `=`).
    /// Returns None for anything that is not a single function call.
    pub fn parse(text: &str) -> Option<Formula> {
        let body = text.strip_prefix(FORMULA_MARKER)?;
        let open = body.find('(')?;
        let name = &body[..open];
        if !is_function_name(name) {
            return None;
        }
        let inner = body[open + 1..].strip_suffix(')')?;

        let args = if inner.trim().is_empty() {
            Vec::new()
        } else {
            inner.split(',').map(Arg::parse).collect()
        };

        Some(Formula {
            name: name.to_string(),
            args,
        })
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}(", FORMULA_MARKER, self.name)?;
        for (idx, arg) in self.args.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", arg)?;
        }
        f.write_str(")")
    }
}

fn is_function_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::CellRef;

    #[test]
    fn test_parse_simple_call() {
        let formula = Formula::parse("=SUM(A1, B2:C3)").unwrap();
        assert_eq!(formula.name, "SUM");
        assert_eq!(formula.args.len(), 2);
        assert!(matches!(&formula.args[0].kind, ArgKind::Ref(r) if r.cell == CellRef::new(0, 0)));
        assert!(matches!(&formula.args[1].kind, ArgKind::Range(s, e)
            if s.cell == CellRef::new(1, 1) && e.cell == CellRef::new(2, 2)));
    }

    #[test]
    fn test_parse_empty_argument_list() {
        let formula = Formula::parse("=AVERAGE()").unwrap();
        assert!(formula.args.is_empty());
        let formula = Formula::parse("=COUNT(   )").unwrap();
        assert!(formula.args.is_empty());
    }

    #[test]
    fn test_parse_underscored_names() {
        let formula = Formula::parse("=REMOVE_DUPLICATES(A1:A4)").unwrap();
        assert_eq!(formula.name, "REMOVE_DUPLICATES");
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        for text in [
            "SUM(A1)",
            "=sum(A1)",
            "=SUM A1",
            "=SUM(A1",
            "=SUM(A1) + 1",
            "=(A1)",
            "=A1+B1",
            "=_X(A1)",
        ] {
            assert!(Formula::parse(text).is_none(), "{text} should not parse");
        }
    }

    #[test]
    fn test_arguments_are_classified() {
        let formula = Formula::parse("=FIND_AND_REPLACE(A1, [0-9]+, #)").unwrap();
        assert!(matches!(formula.args[0].kind, ArgKind::Ref(_)));
        assert_eq!(formula.args[1].kind, ArgKind::Text);
        assert_eq!(formula.args[1].raw, "[0-9]+");
        assert_eq!(formula.args[2].raw, "#");

        assert_eq!(Arg::parse(" #REF! ").kind, ArgKind::RefError);
        assert_eq!(Arg::parse("A1:oops").kind, ArgKind::Text);
    }

    #[test]
    fn test_display_round_trips_canonical_text() {
        let formula = Formula::parse("=SUM($A1,B$2:C3,hello)").unwrap();
        assert_eq!(formula.to_string(), "=SUM($A1, B$2:C3, hello)");
    }

    #[test]
    fn test_arg_range() {
        let range = Arg::parse("B3:A1").range().unwrap();
        assert_eq!(range.top_left, CellRef::new(0, 0));
        assert_eq!(range.bottom_right, CellRef::new(1, 2));
        assert!(Arg::parse("text").range().is_none());
    }
}
