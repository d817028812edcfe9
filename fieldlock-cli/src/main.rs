mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BenchOverrides, WorkloadKind};

#[derive(Parser)]
#[command(
    name = "fieldlock",
    about = "fieldlock — per-field locking store and its concurrency benchmark",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one operation file per worker
    Generate {
        /// Operation distribution to draw from
        #[arg(long, value_enum, default_value = "uniform")]
        workload: WorkloadKind,

        /// Number of fields in the target store
        #[arg(short, long, default_value = "3")]
        fields: usize,

        /// Total operations, split evenly across workers
        #[arg(short, long, default_value = "300000")]
        ops: usize,

        /// Number of worker files to write
        #[arg(short, long, default_value = "3")]
        workers: usize,

        /// File name prefix; files are named <prefix>_t<i>.txt
        #[arg(long, default_value = "ops")]
        prefix: String,

        /// Directory to write into
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// RNG seed
        #[arg(long, env = "FIELDLOCK_SEED", default_value = "24301")]
        seed: u64,
    },

    /// Replay operation files concurrently, one worker per file
    Run {
        /// Number of fields in the store
        #[arg(short, long, default_value = "3")]
        fields: usize,

        /// Initial value of every field
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        initial: i64,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Operation files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Run the benchmark matrix (every case at 1..=max-workers workers)
    Bench {
        /// JSON benchmark plan; built-in plan when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        fields: Option<usize>,

        /// Operations per worker
        #[arg(long)]
        ops: Option<usize>,

        #[arg(long)]
        max_workers: Option<usize>,

        #[arg(long, env = "FIELDLOCK_SEED")]
        seed: Option<u64>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print version information
    Version,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            workload,
            fields,
            ops,
            workers,
            prefix,
            out_dir,
            seed,
        } => commands::generate(workload, fields, ops, workers, &prefix, &out_dir, seed),
        Commands::Run {
            fields,
            initial,
            json,
            files,
        } => commands::run(fields, initial, &files, json),
        Commands::Bench {
            config,
            fields,
            ops,
            max_workers,
            seed,
            json,
        } => {
            let overrides = BenchOverrides {
                fields,
                ops_per_worker: ops,
                max_workers,
                seed,
            };
            commands::bench(config.as_deref(), overrides, json)
        }
        Commands::Version => {
            println!("fieldlock {}", env!("CARGO_PKG_VERSION"));
            println!("Per-field reader-writer locked store with consistent snapshots");
            Ok(())
        }
    }
}
