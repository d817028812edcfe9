use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;

use fieldlock_core::ops_file;
use fieldlock_core::plan::{BenchPlan, CaseResult};
use fieldlock_core::replay;
use fieldlock_core::workload::{self, Workload};
use fieldlock_core::FieldStore;

// ─── Workload Selection ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WorkloadKind {
    /// Reads, writes and snapshots in equal shares over all fields
    Uniform,
    /// Field 0 read-hot, field 1 write-hot, 5% snapshots
    Weighted,
    /// Field 0 hot, rare snapshots
    Skewed,
    /// 90% writes to field 0, 10% snapshots
    WriteHeavy,
    /// Fixed menu over fields 0..3 with 25% snapshots
    Variant6,
}

impl WorkloadKind {
    pub fn to_workload(self, fields: usize) -> Workload {
        match self {
            WorkloadKind::Uniform => Workload::uniform(),
            WorkloadKind::Weighted => Workload::read_write_split(fields),
            WorkloadKind::Skewed => Workload::skewed(),
            WorkloadKind::WriteHeavy => Workload::write_heavy(),
            WorkloadKind::Variant6 => Workload::variant6(),
        }
    }
}

// ─── Generate ───────────────────────────────────────────────────────────────

pub fn generate(
    kind: WorkloadKind,
    fields: usize,
    total_ops: usize,
    workers: usize,
    prefix: &str,
    out_dir: &Path,
    seed: u64,
) -> Result<()> {
    let workload = kind.to_workload(fields);
    let sequences = workload::generate_per_worker(&workload, fields, total_ops, workers, seed)
        .context("failed to generate operations")?;

    fs::create_dir_all(out_dir)
        .with_context(|| format!("cannot create output directory {}", out_dir.display()))?;

    for (i, ops) in sequences.iter().enumerate() {
        let path = worker_file(out_dir, prefix, i);
        ops_file::save_ops(&path, ops)
            .with_context(|| format!("cannot write {}", path.display()))?;
        println!("Generated {} ({} ops)", path.display(), ops.len());
    }
    Ok(())
}

pub fn worker_file(out_dir: &Path, prefix: &str, worker: usize) -> PathBuf {
    out_dir.join(format!("{}_t{}.txt", prefix, worker))
}

// ─── Run ────────────────────────────────────────────────────────────────────

pub fn run(fields: usize, initial: i64, files: &[PathBuf], json: bool) -> Result<()> {
    let mut sequences = Vec::with_capacity(files.len());
    for path in files {
        let ops = ops_file::load_ops(path)
            .with_context(|| format!("cannot load operations from {}", path.display()))?;
        eprintln!("File {} -> {} ops (loaded)", path.display(), ops.len());
        sequences.push(ops);
    }

    let store = FieldStore::with_value(fields, initial);
    let report = replay::run(&store, &sequences).context("replay failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }
    Ok(())
}

// ─── Bench ──────────────────────────────────────────────────────────────────

/// Command-line values that replace the corresponding plan settings.
#[derive(Debug, Default)]
pub struct BenchOverrides {
    pub fields: Option<usize>,
    pub ops_per_worker: Option<usize>,
    pub max_workers: Option<usize>,
    pub seed: Option<u64>,
}

pub fn load_plan(config: Option<&Path>, overrides: BenchOverrides) -> Result<BenchPlan> {
    let mut plan = match config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("cannot read plan {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("invalid plan {}", path.display()))?
        }
        None => BenchPlan::default(),
    };

    if let Some(fields) = overrides.fields {
        if fields != plan.fields {
            tracing::warn!(from = plan.fields, to = fields, "overriding field count");
        }
        plan.fields = fields;
    }
    if let Some(ops) = overrides.ops_per_worker {
        plan.ops_per_worker = ops;
    }
    if let Some(max_workers) = overrides.max_workers {
        plan.max_workers = max_workers;
    }
    if let Some(seed) = overrides.seed {
        plan.seed = seed;
    }

    plan.validate().context("invalid benchmark plan")?;
    Ok(plan)
}

pub fn bench(config: Option<&Path>, overrides: BenchOverrides, json: bool) -> Result<()> {
    let plan = load_plan(config, overrides)?;
    tracing::info!(
        fields = plan.fields,
        ops_per_worker = plan.ops_per_worker,
        max_workers = plan.max_workers,
        cases = plan.cases.len(),
        "starting benchmark"
    );

    let results = plan.run().context("benchmark failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print!("{}", render_table(&results));
    }
    Ok(())
}

pub fn render_table(results: &[CaseResult]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<12} {:>7} {:>10} {:>12} {:>14}",
        "case", "workers", "ops", "seconds", "ops/s"
    );
    let mut previous: Option<&str> = None;
    for result in results {
        if previous.is_some_and(|case| case != result.case) {
            out.push('\n');
        }
        previous = Some(result.case.as_str());
        let _ = writeln!(
            out,
            "{:<12} {:>7} {:>10} {:>12.6} {:>14.0}",
            result.case,
            result.workers,
            result.report.total_ops,
            result.report.elapsed.as_secs_f64(),
            result.report.ops_per_sec()
        );
    }
    out
}
