//! Benchmark plans: a set of named workloads, each replayed at every worker
//! count from 1 to `max_workers`.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::replay::{self, RunReport};
use crate::store::FieldStore;
use crate::workload::{self, Workload};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchCase {
    pub name: String,
    pub workload: Workload,
}

impl BenchCase {
    pub fn new(name: impl Into<String>, workload: Workload) -> Self {
        Self {
            name: name.into(),
            workload,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchPlan {
    pub fields: usize,
    pub ops_per_worker: usize,
    pub max_workers: usize,
    pub seed: u64,
    /// Initial value of every field in each fresh store.
    pub initial_value: i64,
    pub cases: Vec<BenchCase>,
}

impl Default for BenchPlan {
    fn default() -> Self {
        Self {
            fields: 3,
            ops_per_worker: 100_000,
            max_workers: 3,
            seed: 0x5eed,
            initial_value: 0,
            cases: vec![
                BenchCase::new("variant6", Workload::variant6()),
                BenchCase::new("uniform", Workload::uniform()),
                BenchCase::new("skewed", Workload::write_heavy()),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseResult {
    pub case: String,
    pub workers: usize,
    pub report: RunReport,
}

impl BenchPlan {
    pub fn validate(&self) -> Result<()> {
        if self.fields == 0 {
            return Err(Error::InvalidWorkload("fields must be at least 1".into()));
        }
        if self.max_workers == 0 {
            return Err(Error::InvalidWorkload("max_workers must be at least 1".into()));
        }
        self.total_ops()?;
        if self.cases.is_empty() {
            return Err(Error::InvalidWorkload("plan has no cases".into()));
        }
        for case in &self.cases {
            case.workload.validate(self.fields).map_err(|e| match e {
                Error::InvalidWorkload(msg) => {
                    Error::InvalidWorkload(format!("case '{}': {}", case.name, msg))
                }
                other => other,
            })?;
        }
        Ok(())
    }

    /// Operations generated per case across all `max_workers` sequences.
    pub fn total_ops(&self) -> Result<usize> {
        self.ops_per_worker.checked_mul(self.max_workers).ok_or_else(|| {
            Error::InvalidWorkload(format!(
                "{} ops per worker across {} workers overflows",
                self.ops_per_worker, self.max_workers
            ))
        })
    }

    /// Run every case at 1..=max_workers workers.
    ///
    /// Sequences are generated once per case for `max_workers` workers; a run
    /// with `w` workers replays the first `w` of them against a fresh store.
    pub fn run(&self) -> Result<Vec<CaseResult>> {
        self.validate()?;
        let total_ops = self.total_ops()?;
        let mut results = Vec::new();

        for case in &self.cases {
            let sequences = workload::generate_per_worker(
                &case.workload,
                self.fields,
                total_ops,
                self.max_workers,
                self.seed,
            )?;

            for workers in 1..=self.max_workers {
                let store = FieldStore::with_value(self.fields, self.initial_value);
                let report = replay::run(&store, &sequences[..workers])?;
                tracing::info!(
                    case = %case.name,
                    workers,
                    elapsed_secs = report.elapsed.as_secs_f64(),
                    "case finished"
                );
                results.push(CaseResult {
                    case: case.name.clone(),
                    workers,
                    report,
                });
            }
        }

        Ok(results)
    }
}
