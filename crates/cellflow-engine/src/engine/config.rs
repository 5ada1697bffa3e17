//! Engine limits shared by dependency extraction and evaluation.

use serde::{Deserialize, Serialize};

/// Upper bound on cells a single range may expand to.
pub const MAX_RANGE_CELLS: usize = 1_000_000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Largest range a formula may reference; bigger ranges are rejected
    /// when dependencies are recorded and evaluate to `#ERROR!`.
    pub max_range_cells: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_range_cells: MAX_RANGE_CELLS,
        }
    }
}
