//! Synthetic operation sequences.
//!
//! A [`Workload`] names a distribution over operations; [`generate`] draws
//! one sequence from it and [`generate_per_worker`] draws one independent,
//! seed-deterministic sequence per worker.

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Operation;

pub const DEFAULT_MAX_VALUE: i64 = 100;

/// One skewed step in this many is followed by an extra snapshot.
const SKEWED_SNAPSHOT_ODDS: u32 = 1000;

fn default_max_value() -> i64 {
    DEFAULT_MAX_VALUE
}

/// An operation distribution. Written values are drawn uniformly from
/// `1..=max_value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Workload {
    /// Read, write and snapshot equally likely; index uniform over all fields.
    Uniform {
        #[serde(default = "default_max_value")]
        max_value: i64,
    },
    /// Snapshot with probability `snapshot_prob`, otherwise read or write
    /// (even odds) with the index drawn from the matching weight vector.
    Weighted {
        read_weights: Vec<f64>,
        write_weights: Vec<f64>,
        snapshot_prob: f64,
        #[serde(default = "default_max_value")]
        max_value: i64,
    },
    /// Field 0 is hot: 70% reads of it, 15% writes to it, the rest spread
    /// over fields `1..m`. Occasionally appends a snapshot. On a one-field
    /// store the remaining share targets index 1 and replays as no-ops.
    Skewed {
        #[serde(default = "default_max_value")]
        max_value: i64,
    },
    /// 90% writes to field 0, 10% snapshots.
    WriteHeavy {
        #[serde(default = "default_max_value")]
        max_value: i64,
    },
    /// A fixed weighted menu of concrete actions.
    Mix {
        actions: Vec<MixEntry>,
        #[serde(default = "default_max_value")]
        max_value: i64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixEntry {
    pub action: MixAction,
    pub weight: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixAction {
    Read(usize),
    Write(usize),
    Snapshot,
}

impl Workload {
    pub fn uniform() -> Self {
        Workload::Uniform {
            max_value: DEFAULT_MAX_VALUE,
        }
    }

    pub fn skewed() -> Self {
        Workload::Skewed {
            max_value: DEFAULT_MAX_VALUE,
        }
    }

    pub fn write_heavy() -> Self {
        Workload::WriteHeavy {
            max_value: DEFAULT_MAX_VALUE,
        }
    }

    /// Reads and writes over fields 0..3 plus a quarter snapshots.
    pub fn variant6() -> Self {
        #[rustfmt::skip]
        let actions = [
            (MixAction::Read(0), 20), (MixAction::Write(0), 5),
            (MixAction::Read(1), 20), (MixAction::Write(1), 5),
            (MixAction::Read(2), 20), (MixAction::Write(2), 5),
            (MixAction::Snapshot, 25),
        ];
        Workload::Mix {
            actions: actions
                .into_iter()
                .map(|(action, weight)| MixEntry { action, weight })
                .collect(),
            max_value: DEFAULT_MAX_VALUE,
        }
    }

    /// Field 0 read-hot, field 1 write-hot, everything else flat, 5% snapshots.
    pub fn read_write_split(fields: usize) -> Self {
        let mut read_weights = vec![1.0; fields];
        let mut write_weights = vec![1.0; fields];
        if let Some(w) = read_weights.get_mut(0) {
            *w = 8.0;
        }
        if let Some(w) = write_weights.get_mut(0) {
            *w = 2.0;
        }
        if let Some(w) = write_weights.get_mut(1) {
            *w = 6.0;
        }
        Workload::Weighted {
            read_weights,
            write_weights,
            snapshot_prob: 0.05,
            max_value: DEFAULT_MAX_VALUE,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Workload::Uniform { .. } => "uniform",
            Workload::Weighted { .. } => "weighted",
            Workload::Skewed { .. } => "skewed",
            Workload::WriteHeavy { .. } => "write_heavy",
            Workload::Mix { .. } => "mix",
        }
    }

    fn max_value(&self) -> i64 {
        match self {
            Workload::Uniform { max_value }
            | Workload::Weighted { max_value, .. }
            | Workload::Skewed { max_value }
            | Workload::WriteHeavy { max_value }
            | Workload::Mix { max_value, .. } => *max_value,
        }
    }

    /// Check that the workload can be drawn for a store of `fields` fields.
    pub fn validate(&self, fields: usize) -> Result<()> {
        self.sampler(fields).map(|_| ())
    }

    fn sampler(&self, fields: usize) -> Result<Sampler<'_>> {
        if fields == 0 {
            return Err(Error::InvalidWorkload("store must have at least one field".into()));
        }
        let max_value = self.max_value();
        if max_value < 1 {
            return Err(Error::InvalidWorkload(format!(
                "max_value must be at least 1, got {}",
                max_value
            )));
        }

        let sampler = match self {
            Workload::Uniform { .. } => Sampler::Uniform { fields, max_value },
            Workload::Weighted {
                read_weights,
                write_weights,
                snapshot_prob,
                ..
            } => {
                if !(0.0..=1.0).contains(snapshot_prob) {
                    return Err(Error::InvalidWorkload(format!(
                        "snapshot_prob must lie in [0, 1], got {}",
                        snapshot_prob
                    )));
                }
                Sampler::Weighted {
                    reads: weight_index(read_weights, fields, "read_weights")?,
                    writes: weight_index(write_weights, fields, "write_weights")?,
                    snapshot_prob: *snapshot_prob,
                    max_value,
                }
            }
            Workload::Skewed { .. } => Sampler::Skewed { fields, max_value },
            Workload::WriteHeavy { .. } => Sampler::WriteHeavy { max_value },
            Workload::Mix { actions, .. } => {
                let index = WeightedIndex::new(actions.iter().map(|e| e.weight)).map_err(|e| {
                    Error::InvalidWorkload(format!("mix weights: {}", e))
                })?;
                Sampler::Mix {
                    actions,
                    index,
                    max_value,
                }
            }
        };
        Ok(sampler)
    }
}

fn weight_index(weights: &[f64], fields: usize, what: &str) -> Result<WeightedIndex<f64>> {
    if weights.len() != fields {
        return Err(Error::InvalidWorkload(format!(
            "{} has {} entries, store has {} fields",
            what,
            weights.len(),
            fields
        )));
    }
    WeightedIndex::new(weights).map_err(|e| Error::InvalidWorkload(format!("{}: {}", what, e)))
}

enum Sampler<'a> {
    Uniform {
        fields: usize,
        max_value: i64,
    },
    Weighted {
        reads: WeightedIndex<f64>,
        writes: WeightedIndex<f64>,
        snapshot_prob: f64,
        max_value: i64,
    },
    Skewed {
        fields: usize,
        max_value: i64,
    },
    WriteHeavy {
        max_value: i64,
    },
    Mix {
        actions: &'a [MixEntry],
        index: WeightedIndex<u32>,
        max_value: i64,
    },
}

impl Sampler<'_> {
    /// Draw the next step; the skewed workload may emit two operations.
    fn draw<R: Rng + ?Sized>(&self, rng: &mut R, out: &mut Vec<Operation>) {
        match self {
            Sampler::Uniform { fields, max_value } => {
                let op = match rng.gen_range(0..3) {
                    0 => Operation::Read {
                        idx: rng.gen_range(0..*fields),
                    },
                    1 => Operation::Write {
                        idx: rng.gen_range(0..*fields),
                        value: rng.gen_range(1..=*max_value),
                    },
                    _ => Operation::Snapshot,
                };
                out.push(op);
            }
            Sampler::Weighted {
                reads,
                writes,
                snapshot_prob,
                max_value,
            } => {
                let op = if rng.gen_bool(*snapshot_prob) {
                    Operation::Snapshot
                } else if rng.gen_bool(0.5) {
                    Operation::Read {
                        idx: reads.sample(rng),
                    }
                } else {
                    Operation::Write {
                        idx: writes.sample(rng),
                        value: rng.gen_range(1..=*max_value),
                    }
                };
                out.push(op);
            }
            Sampler::Skewed { fields, max_value } => {
                let roll = rng.gen_range(0..100);
                let op = if roll < 70 {
                    Operation::Read { idx: 0 }
                } else if roll < 85 {
                    Operation::Write {
                        idx: 0,
                        value: rng.gen_range(1..=*max_value),
                    }
                } else {
                    // With one field this is index 1, which the store absorbs
                    let idx = 1 + rng.gen_range(0..(*fields - 1).max(1));
                    if rng.gen_bool(0.5) {
                        Operation::Read { idx }
                    } else {
                        Operation::Write {
                            idx,
                            value: rng.gen_range(1..=*max_value),
                        }
                    }
                };
                out.push(op);
                if rng.gen_range(0..SKEWED_SNAPSHOT_ODDS) == 0 {
                    out.push(Operation::Snapshot);
                }
            }
            Sampler::WriteHeavy { max_value } => {
                let op = if rng.gen_range(0..100) < 90 {
                    Operation::Write {
                        idx: 0,
                        value: rng.gen_range(1..=*max_value),
                    }
                } else {
                    Operation::Snapshot
                };
                out.push(op);
            }
            Sampler::Mix {
                actions,
                index,
                max_value,
            } => {
                let op = match actions[index.sample(rng)].action {
                    MixAction::Read(idx) => Operation::Read { idx },
                    MixAction::Write(idx) => Operation::Write {
                        idx,
                        value: rng.gen_range(1..=*max_value),
                    },
                    MixAction::Snapshot => Operation::Snapshot,
                };
                out.push(op);
            }
        }
    }
}

/// Draw `count` steps from `workload` for a store of `fields` fields.
///
/// The skewed workload may return slightly more than `count` operations
/// because of its appended snapshots.
pub fn generate<R: Rng + ?Sized>(
    workload: &Workload,
    fields: usize,
    count: usize,
    rng: &mut R,
) -> Result<Vec<Operation>> {
    let sampler = workload.sampler(fields)?;
    let mut ops = Vec::with_capacity(count);
    for _ in 0..count {
        sampler.draw(rng, &mut ops);
    }
    Ok(ops)
}

/// Split `total_ops` evenly across `workers` sequences, each drawn from its
/// own RNG stream derived from `seed`.
pub fn generate_per_worker(
    workload: &Workload,
    fields: usize,
    total_ops: usize,
    workers: usize,
    seed: u64,
) -> Result<Vec<Vec<Operation>>> {
    if workers == 0 {
        return Err(Error::InvalidWorkload("at least one worker is required".into()));
    }
    let per_worker = total_ops / workers;

    (0..workers)
        .map(|worker| {
            let mut rng = StdRng::seed_from_u64(worker_seed(seed, worker));
            let ops = generate(workload, fields, per_worker, &mut rng)?;
            tracing::debug!(
                workload = workload.name(),
                worker,
                ops = ops.len(),
                "generated worker sequence"
            );
            Ok(ops)
        })
        .collect()
}

fn worker_seed(seed: u64, worker: usize) -> u64 {
    seed ^ (worker as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
