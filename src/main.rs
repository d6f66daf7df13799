use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use lla::{Lla, LlaConfig, LlaError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lla", about = "Density-balanced sparse sorted array")]
struct Cli {
    /// Log construction, backoff and redistribution events.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Insert 10, 1, 5, 2, 20 into the reference structure and print it.
    Demo,
    /// Fill a structure with a generated workload and report insertion timings.
    Bench {
        /// Base size N.
        #[arg(long, default_value_t = 1 << 12)]
        n: usize,
        /// Capacity multiplier C (total slots = N·C).
        #[arg(long, default_value_t = 16)]
        c: usize,
        /// Root density ceiling.
        #[arg(long, default_value_t = 0.5)]
        tau0: f64,
        /// Leaf density ceiling.
        #[arg(long, default_value_t = 0.75)]
        taud: f64,
        /// Number of values to insert (stops early at capacity).
        #[arg(long, default_value_t = 10_000)]
        count: usize,
        /// Insertions per reported batch.
        #[arg(long, default_value_t = 1_000)]
        batch: usize,
        /// Order of generated values.
        #[arg(long, value_enum, default_value_t = Order::Random)]
        order: Order,
        /// Seed for the random order.
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Order {
    Increasing,
    Decreasing,
    Random,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Demo => run_demo()?,
        Commands::Bench {
            n,
            c,
            tau0,
            taud,
            count,
            batch,
            order,
            seed,
        } => run_bench(LlaConfig::new(n, c, tau0, taud), count, batch, order, seed)?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "lla=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_demo() -> Result<()> {
    let mut lla = Lla::new(LlaConfig::demo()).context("failed to build demo structure")?;
    for x in [10, 1, 5, 2, 20] {
        lla.insert(x)
            .with_context(|| format!("failed to insert {x}"))?;
    }
    print!("{lla}");
    Ok(())
}

fn run_bench(config: LlaConfig, count: usize, batch: usize, order: Order, seed: u64) -> Result<()> {
    let mut lla = Lla::new(config).with_context(|| format!("invalid bench configuration {config:?}"))?;
    let values = workload(order, count, seed);
    let batch = batch.max(1);

    println!(
        "N={} C={} capacity={} window={} depth={} headroom={}",
        config.n,
        config.c,
        lla.capacity(),
        lla.window_size(),
        lla.max_depth(),
        config.headroom()
    );
    println!(
        "{:>10} | {:>12} | {:>12} | {:>10}",
        "inserted", "batch", "ns/insert", "density"
    );
    println!("{}", "-".repeat(54));

    let mut total = Duration::ZERO;
    for chunk in values.chunks(batch) {
        let started = Instant::now();
        let mut done = 0;
        let mut stopped = None;
        for &x in chunk {
            match lla.insert(x) {
                Ok(()) => done += 1,
                Err(err @ LlaError::CapacityExceeded { .. }) => {
                    stopped = Some(err);
                    break;
                }
                Err(err) => return Err(err).with_context(|| format!("failed to insert {x}")),
            }
        }
        let elapsed = started.elapsed();
        total += elapsed;

        if done > 0 {
            println!(
                "{:>10} | {:>12?} | {:>12.1} | {:>10.4}",
                lla.len(),
                elapsed,
                elapsed.as_nanos() as f64 / done as f64,
                lla.density()
            );
        }

        if let Some(err) = stopped {
            println!("stopped: {err}");
            break;
        }
    }

    println!("{}", "-".repeat(54));
    println!(
        "total {:?} for {} inserts ({:.1} ns/insert)",
        total,
        lla.len(),
        total.as_nanos() as f64 / lla.len().max(1) as f64
    );

    Ok(())
}

fn workload(order: Order, count: usize, seed: u64) -> Vec<i64> {
    match order {
        Order::Increasing => (1..=count as i64).collect(),
        Order::Decreasing => (1..=count as i64).rev().collect(),
        Order::Random => {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..count).map(|_| rng.gen_range(1..=i64::from(u32::MAX))).collect()
        }
    }
}
