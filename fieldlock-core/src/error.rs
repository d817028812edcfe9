use thiserror::Error;

/// Errors surfaced by the store and the replay harness.
///
/// Out-of-range indices are not errors for [`FieldStore::read`] and
/// [`FieldStore::write`]; only the strict accessors report them.
///
/// [`FieldStore::read`]: crate::store::FieldStore::read
/// [`FieldStore::write`]: crate::store::FieldStore::write
#[derive(Debug, Error)]
pub enum Error {
    /// A field lock was poisoned by a holder that panicked.
    #[error("lock on field {index} is poisoned")]
    LockPoisoned { index: usize },

    #[error("field index {index} out of range for store of {len} fields")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid workload: {0}")]
    InvalidWorkload(String),

    #[error("worker {worker} panicked")]
    WorkerPanicked { worker: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
