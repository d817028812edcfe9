//! A single lock-guarded integer slot, and the one routine allowed to hold
//! more than one slot's lock at a time.
//!
//! Lock guards never leave this module. Every public path through a
//! [`Field`] acquires exactly one lock and releases it before returning;
//! [`read_all`] is the only function that holds several guards together, and
//! it acquires them in ascending index order. Keeping both facts local to
//! this file is what keeps the lock-wait graph acyclic.

use std::sync::{RwLock, RwLockReadGuard};

use crate::error::{Error, Result};

#[derive(Debug)]
pub(crate) struct Field {
    index: usize,
    cell: RwLock<i64>,
}

impl Field {
    pub(crate) fn new(index: usize, value: i64) -> Self {
        Self {
            index,
            cell: RwLock::new(value),
        }
    }

    /// Shared-mode read of the value.
    pub(crate) fn load(&self) -> Result<i64> {
        let guard = self.share()?;
        Ok(*guard)
    }

    /// Exclusive-mode store of the value.
    pub(crate) fn store(&self, value: i64) -> Result<()> {
        let mut guard = self.cell.write().map_err(|_| self.poisoned())?;
        *guard = value;
        Ok(())
    }

    /// Read-modify-write under a single exclusive hold. Returns the new value.
    pub(crate) fn modify<F>(&self, f: F) -> Result<i64>
    where
        F: FnOnce(i64) -> i64,
    {
        let mut guard = self.cell.write().map_err(|_| self.poisoned())?;
        *guard = f(*guard);
        Ok(*guard)
    }

    fn share(&self) -> Result<RwLockReadGuard<'_, i64>> {
        self.cell.read().map_err(|_| self.poisoned())
    }

    fn poisoned(&self) -> Error {
        Error::LockPoisoned { index: self.index }
    }

    /// Runs `f` while holding this field in shared mode.
    #[cfg(test)]
    pub(crate) fn with_shared<R>(&self, f: impl FnOnce(i64) -> R) -> Result<R> {
        let guard = self.share()?;
        Ok(f(*guard))
    }

    /// Runs `f` while holding this field in exclusive mode.
    #[cfg(test)]
    pub(crate) fn with_exclusive<R>(&self, f: impl FnOnce(&mut i64) -> R) -> Result<R> {
        let mut guard = self.cell.write().map_err(|_| self.poisoned())?;
        Ok(f(&mut *guard))
    }
}

/// Acquire-all-then-read-all.
///
/// Shared locks are taken on every field in ascending index order before any
/// value is read, so the returned values all held at the instant the last
/// lock was granted. Guards are released when `held` drops.
pub(crate) fn read_all(fields: &[Field]) -> Result<Vec<i64>> {
    let mut held = Vec::with_capacity(fields.len());
    for field in fields {
        held.push(field.share()?);
    }
    Ok(held.iter().map(|guard| **guard).collect())
}
