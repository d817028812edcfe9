use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of a worker's replay sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Shared-mode read of one field
    Read { idx: usize },
    /// Exclusive-mode write of one field
    Write { idx: usize, value: i64 },
    /// Consistent read of every field
    Snapshot,
}

/// Renders the operation-file form of the operation (`read 0`,
/// `write 1 7`, `string`).
impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Read { idx } => write!(f, "read {}", idx),
            Operation::Write { idx, value } => write!(f, "write {} {}", idx, value),
            Operation::Snapshot => write!(f, "string"),
        }
    }
}
