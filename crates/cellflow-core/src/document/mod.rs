//! Document state and logic (UI-agnostic).

mod eval;
mod ops;
mod state;

pub use ops::EditOutcome;
pub use state::{CellData, Document};
