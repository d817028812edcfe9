//! The field store: `m` independently locked integer fields plus a
//! whole-store consistent snapshot.
//!
//! ## Locking protocol
//!
//! ```text
//! read(i)      shared(i)     -> load  -> release
//! write(i, v)  exclusive(i)  -> store -> release
//! update(i, f) exclusive(i)  -> f     -> release
//! snapshot()   shared(0), shared(1), ..., shared(m-1) -> load all -> release all
//! ```
//!
//! `snapshot` is the only operation that ever holds more than one lock, and
//! it always acquires in ascending index order. A single-field operation
//! waits on at most one lock and holds nothing while waiting, and two
//! snapshots contend in the same order, so no wait cycle can form. Any new
//! multi-field operation must acquire in the same ascending order.

use crate::error::{Error, Result};
use crate::field::{self, Field};
use crate::types::Snapshot;

/// Value returned by [`FieldStore::read`] for an out-of-range index.
pub const OUT_OF_RANGE_VALUE: i64 = 0;

/// A fixed-length array of reader-writer locked integer fields.
///
/// Share it by reference (`&FieldStore`, or an `Arc` when threads are not
/// scoped); every method takes `&self`.
#[derive(Debug)]
pub struct FieldStore {
    fields: Box<[Field]>,
}

impl FieldStore {
    /// Create a store of `len` fields, all zero.
    pub fn new(len: usize) -> Self {
        Self::with_value(len, 0)
    }

    /// Create a store of `len` fields, all set to `initial`.
    pub fn with_value(len: usize, initial: i64) -> Self {
        let fields = (0..len).map(|index| Field::new(index, initial)).collect();
        Self { fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Read field `idx` in shared mode.
    ///
    /// An out-of-range index returns [`OUT_OF_RANGE_VALUE`] without touching
    /// any lock.
    pub fn read(&self, idx: usize) -> Result<i64> {
        match self.fields.get(idx) {
            Some(field) => field.load(),
            None => Ok(OUT_OF_RANGE_VALUE),
        }
    }

    /// Write field `idx` in exclusive mode. An out-of-range index is a no-op.
    pub fn write(&self, idx: usize, value: i64) -> Result<()> {
        match self.fields.get(idx) {
            Some(field) => field.store(value),
            None => Ok(()),
        }
    }

    /// Atomically replace field `idx` with `f(current)` and return the new
    /// value. Returns `None` for an out-of-range index.
    ///
    /// `f` runs while the field is held exclusively; a panic inside it
    /// poisons that field.
    pub fn update<F>(&self, idx: usize, f: F) -> Result<Option<i64>>
    where
        F: FnOnce(i64) -> i64,
    {
        match self.fields.get(idx) {
            Some(field) => field.modify(f).map(Some),
            None => Ok(None),
        }
    }

    /// Like [`read`](Self::read), but an out-of-range index is an error.
    pub fn try_read(&self, idx: usize) -> Result<i64> {
        self.field(idx)?.load()
    }

    /// Like [`write`](Self::write), but an out-of-range index is an error.
    pub fn try_write(&self, idx: usize, value: i64) -> Result<()> {
        self.field(idx)?.store(value)
    }

    /// Read every field as of a single instant.
    ///
    /// Writers on any field are excluded from the moment the snapshot holds
    /// that field until the whole read completes, so a high snapshot rate
    /// under heavy write load will throttle writers.
    pub fn snapshot(&self) -> Result<Snapshot> {
        field::read_all(&self.fields).map(Snapshot::new)
    }

    fn field(&self, idx: usize) -> Result<&Field> {
        self.fields.get(idx).ok_or(Error::IndexOutOfRange {
            index: idx,
            len: self.fields.len(),
        })
    }

    #[cfg(test)]
    pub(crate) fn raw_field(&self, idx: usize) -> &Field {
        &self.fields[idx]
    }
}
