use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// Every field's value as observed at one instant.
///
/// Produced by [`FieldStore::snapshot`](crate::store::FieldStore::snapshot);
/// it is a plain owned copy with no tie back to the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(Vec<i64>);

impl Snapshot {
    pub(crate) fn new(values: Vec<i64>) -> Self {
        Self(values)
    }

    pub fn into_vec(self) -> Vec<i64> {
        self.0
    }

    /// Renders the snapshot, cutting it at `max_chars` and appending `...`
    /// when it does not fit.
    pub fn preview(&self, max_chars: usize) -> String {
        let rendered = self.to_string();
        match rendered.char_indices().nth(max_chars) {
            Some((cut, _)) => format!("{}...", &rendered[..cut]),
            None => rendered,
        }
    }
}

impl Deref for Snapshot {
    type Target = [i64];

    fn deref(&self) -> &[i64] {
        &self.0
    }
}

impl From<Snapshot> for Vec<i64> {
    fn from(snapshot: Snapshot) -> Self {
        snapshot.0
    }
}

impl PartialEq<[i64]> for Snapshot {
    fn eq(&self, other: &[i64]) -> bool {
        self.0 == other
    }
}

impl<const N: usize> PartialEq<[i64; N]> for Snapshot {
    fn eq(&self, other: &[i64; N]) -> bool {
        self.0 == other
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "]")
    }
}
