//! Command-line driver: load a binary edge list and run single-level Louvain on it.
//!
//! Run with `RUST_LOG=debug louvain -f graph.bin -p 8` to see per-pass progress.

use clap::{Parser, ValueEnum};
use flat_louvain::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

const RULE: &str = "-------------------------------------------------------";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    ThreadLocal,
    SharedLock,
}

impl From<StrategyArg> for DeltaStrategy {
    fn from(s: StrategyArg) -> Self {
        match s {
            StrategyArg::ThreadLocal => DeltaStrategy::ThreadLocal,
            StrategyArg::SharedLock => DeltaStrategy::SharedLock,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "louvain",
    version,
    about = "Multi-threaded single-level Louvain community detection",
    after_help = "Sample usage: louvain -f /path/to/binary/file.bin"
)]
struct Args {
    /// Binary edge-list input file
    #[arg(short, long)]
    file: PathBuf,

    /// Minimum modularity gain per pass
    #[arg(short, long, default_value_t = 1.0e-6)]
    threshold: f64,

    /// Treat every edge weight as 1.0
    #[arg(short, long)]
    unit_weight: bool,

    /// Worker threads per pass, defaults to the available parallelism
    #[arg(short = 'p', long)]
    threads: Option<usize>,

    /// Initial reference and floor for the accepted modularity
    #[arg(short, long, default_value_t = -1.0, allow_hyphen_values = true)]
    lower: f64,

    /// How workers publish community deltas
    #[arg(long, value_enum, default_value_t = StrategyArg::ThreadLocal)]
    strategy: StrategyArg,
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    if args.unit_weight {
        println!("Warning: graph edge weights will be 1.0.");
    }

    let t0 = Instant::now();
    let graph = BinaryEdgeList::new(args.unit_weight).read_path(&args.file)?;
    println!("Input file: {}", args.file.display());
    let stats = graph.stats();
    println!("{RULE}");
    println!("Graph edge distribution characteristics");
    println!("{RULE}");
    println!("Number of vertices: {}", stats.vertices);
    println!("Number of edges: {}", stats.edges);
    println!("Maximum number of edges: {}", stats.max_degree);
    println!("Minimum number of edges: {}", stats.min_degree);
    println!("Expected value of X^2: {:.6}", stats.stddev_degree.powi(2) + stats.mean_degree.powi(2));
    println!("Variance: {:.6}", stats.stddev_degree.powi(2));
    println!("Standard deviation: {:.6}", stats.stddev_degree);
    println!("Average number of edges: {:.6}", stats.mean_degree);
    println!("Total edge weight: {}", stats.total_weight);
    println!("{RULE}");
    println!(
        "Time to read input file and create graph (in s): {:.6}",
        t0.elapsed().as_secs_f64()
    );

    let mut cfg = LouvainConfig::default()
        .with_threshold(args.threshold)
        .with_lower_bound(args.lower)
        .with_strategy(args.strategy.into());
    if let Some(threads) = args.threads {
        cfg = cfg.with_threads(threads);
    }
    log::info!("running with {cfg:?}");

    let mut timings = TimingObserver::default();
    let t0 = Instant::now();
    let outcome = Louvain::new(cfg).run_with_observer(&graph, &mut timings)?;
    let secs = t0.elapsed().as_secs_f64();

    println!("{RULE}");
    println!("Input file: {}", args.file.display());
    println!("{RULE}");
    println!("64-bit datatype");
    println!("{RULE}");
    println!("Total time (in s): {secs:.6}");
    println!(
        "Modularity, #Iterations: {}, {}",
        outcome.modularity, outcome.iterations
    );
    println!("MODS (final modularity * time): {}", outcome.modularity * secs);
    println!("Communities: {}", outcome.community_count());
    println!("{RULE}");
    let t = timings.totals;
    println!("Phase timings over {} passes (in s):", timings.passes);
    println!("  clear:      {:.6}", t.clear.as_secs_f64());
    println!("  sweep:      {:.6}", t.sweep.as_secs_f64());
    println!("  merge:      {:.6}", t.merge.as_secs_f64());
    println!("  modularity: {:.6}", t.modularity.as_secs_f64());
    println!("  commit:     {:.6}", t.commit.as_secs_f64());
    println!("{RULE}");
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
