//! # fieldlock-core
//!
//! A fixed-size store of integer fields, each behind its own reader-writer
//! lock, with a whole-store snapshot that observes every field at one
//! instant. Also carries the benchmark harness around it: workload
//! generation, operation files, and concurrent replay.

pub mod error;
mod field;
pub mod ops_file;
pub mod plan;
pub mod replay;
pub mod store;
pub mod types;
pub mod workload;

pub use error::{Error, Result};
pub use store::FieldStore;
pub use types::{Operation, Snapshot};

#[cfg(test)]
mod ops_file_test;
#[cfg(test)]
mod workload_test;
