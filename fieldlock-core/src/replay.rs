//! Replaying operation sequences against one shared store.

use serde::{Serialize, Serializer};
use std::fmt;
use std::hint::black_box;
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::store::FieldStore;
use crate::types::{Operation, Snapshot};

/// Number of characters of the final snapshot shown by `RunReport`'s
/// `Display`.
pub const PREVIEW_CHARS: usize = 200;

/// Per-worker operation counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WorkerStats {
    pub reads: u64,
    pub writes: u64,
    pub snapshots: u64,
}

impl WorkerStats {
    pub fn total(&self) -> u64 {
        self.reads + self.writes + self.snapshots
    }
}

/// Replay `ops` on the calling thread.
///
/// Read results are discarded. Snapshots are rendered to text and dropped,
/// so their cost includes formatting the whole store. No lock is held
/// between operations.
pub fn execute(store: &FieldStore, ops: &[Operation]) -> Result<WorkerStats> {
    let mut stats = WorkerStats::default();
    for op in ops {
        match *op {
            Operation::Read { idx } => {
                black_box(store.read(idx)?);
                stats.reads += 1;
            }
            Operation::Write { idx, value } => {
                store.write(idx, value)?;
                stats.writes += 1;
            }
            Operation::Snapshot => {
                let rendered = store.snapshot()?.to_string();
                black_box(rendered.len());
                stats.snapshots += 1;
            }
        }
    }
    Ok(stats)
}

/// Outcome of one concurrent replay.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub workers: usize,
    pub total_ops: u64,
    #[serde(rename = "elapsed_secs", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
    pub per_worker: Vec<WorkerStats>,
    pub final_snapshot: Snapshot,
}

impl RunReport {
    pub fn ops_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.total_ops as f64 / secs
        } else {
            0.0
        }
    }
}

fn serialize_secs<S: Serializer>(elapsed: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(elapsed.as_secs_f64())
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Execution with {} worker(s) finished in {:.6} s ({} ops, {:.0} ops/s)",
            self.workers,
            self.elapsed.as_secs_f64(),
            self.total_ops,
            self.ops_per_sec()
        )?;
        write!(f, "Final state: {}", self.final_snapshot.preview(PREVIEW_CHARS))
    }
}

/// Run one worker thread per sequence against `store`, wait for all of them,
/// then take a final snapshot.
///
/// Workers borrow the store for the duration of a thread scope, so none can
/// outlive it. Elapsed time covers spawn to last join and excludes the final
/// snapshot.
pub fn run(store: &FieldStore, sequences: &[Vec<Operation>]) -> Result<RunReport> {
    let started = Instant::now();

    let outcomes: Vec<Result<WorkerStats>> = thread::scope(|scope| {
        let handles: Vec<_> = sequences
            .iter()
            .map(|ops| scope.spawn(move || execute(store, ops)))
            .collect();

        handles
            .into_iter()
            .enumerate()
            .map(|(worker, handle)| {
                handle
                    .join()
                    .unwrap_or(Err(Error::WorkerPanicked { worker }))
            })
            .collect()
    });

    let elapsed = started.elapsed();
    let per_worker = outcomes.into_iter().collect::<Result<Vec<_>>>()?;
    let total_ops = per_worker.iter().map(WorkerStats::total).sum();
    let final_snapshot = store.snapshot()?;

    tracing::info!(
        workers = sequences.len(),
        total_ops,
        elapsed_ms = elapsed.as_millis() as u64,
        "replay finished"
    );

    Ok(RunReport {
        workers: sequences.len(),
        total_ops,
        elapsed,
        per_worker,
        final_snapshot,
    })
}
