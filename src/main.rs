//! Radix Sort Benchmark Harness
//!
//! Generates reproducible random inputs, runs the sequential, parallel, and
//! (optionally) distributed radix sort over a range of array sizes, and
//! reports wall-clock times and speedups. A `std::sort_unstable` baseline is
//! measured alongside, and every output can be verified against it.
//!
//! Distributed mode needs `sort-worker` processes listening on the addresses
//! passed via `--worker`:
//!
//! ```text
//! sort-worker --listen 127.0.0.1:7401 &
//! sort-worker --listen 127.0.0.1:7402 &
//! radix-sorting --worker 127.0.0.1:7401 --worker 127.0.0.1:7402 --participate
//! ```

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use radix_sorting::cluster::ClusterDispatcher;
use radix_sorting::dispatch::LocalPoolDispatcher;
use radix_sorting::lino_report::{BenchmarkReport, BenchmarkResult};
use radix_sorting::parallel::ParallelSorter;
use radix_sorting::radix::{is_sorted, radix_sort};
use radix_sorting::{Dispatch, SortError};

/// Benchmark LSD radix sort: sequential vs local pool vs distributed workers
#[derive(Parser, Debug)]
#[command(name = "radix-sorting")]
#[command(version, about, long_about = None)]
struct CliArgs {
    /// Array sizes to benchmark, comma separated
    #[arg(
        long = "sizes",
        value_delimiter = ',',
        default_values_t = [10_000usize, 100_000, 1_000_000]
    )]
    sizes: Vec<usize>,

    /// Also run the 10,000,000-element size (slow sequentially)
    #[arg(long = "large")]
    large: bool,

    /// Degree of parallelism for the local thread pool
    #[arg(short = 'p', long = "parallelism", default_value_t = 4)]
    parallelism: usize,

    /// RNG seed for reproducible inputs
    #[arg(long = "seed", default_value_t = 42)]
    seed: u64,

    /// Exclusive upper bound for generated values
    #[arg(long = "max-value", default_value_t = 1_000_000_000)]
    max_value: u64,

    /// Worker address (host:port); repeat once per worker to enable
    /// distributed mode
    #[arg(long = "worker", action = clap::ArgAction::Append)]
    workers: Vec<String>,

    /// Coordinator also sorts a partition (acts as rank 0 participant)
    #[arg(long = "participate")]
    participate: bool,

    /// Verify every output against std's sort
    #[arg(long = "verify")]
    verify: bool,

    /// Write a Links Notation report to this path
    #[arg(long = "report")]
    report: Option<PathBuf>,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Only log errors
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

fn setup_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Generate `len` values in `0..max_value` from the harness-owned generator.
fn generate_data(rng: &mut StdRng, len: usize, max_value: u64) -> Vec<u64> {
    (0..len).map(|_| rng.gen_range(0..max_value)).collect()
}

/// Check sortedness and multiset equality against a trusted reference sort.
fn verify_output(input: &[u64], output: &[u64]) -> radix_sorting::Result<()> {
    if !is_sorted(output) {
        return Err(SortError::Verification(
            "output is not non-decreasing".to_string(),
        ));
    }
    let mut reference = input.to_vec();
    reference.sort_unstable();
    if output != reference {
        return Err(SortError::Verification(
            "output is not a permutation of the input".to_string(),
        ));
    }
    Ok(())
}

fn ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    setup_logging(args.verbose, args.quiet);

    let mut sizes = args.sizes.clone();
    if args.large {
        sizes.push(10_000_000);
    }
    sizes.sort_unstable();
    sizes.dedup();

    println!("Radix Sorting Benchmark");
    println!("=======================\n");
    println!("Sizes: {:?}", sizes);
    println!("Local parallelism: {}", args.parallelism);
    println!("Seed: {}, values in 0..{}", args.seed, args.max_value);
    if !args.workers.is_empty() {
        println!(
            "Distributed: {} worker(s), coordinator participates: {}",
            args.workers.len(),
            args.participate
        );
    }
    println!();

    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut report = BenchmarkReport::new("sequential vs parallel vs distributed radix sort");

    // Dispatchers are built once and reused across sizes, so pool spin-up
    // and worker connections never count against the measured runs.
    let mut local = ParallelSorter::new(
        LocalPoolDispatcher::new(args.parallelism).context("building local thread pool")?,
    );
    let mut cluster = if args.workers.is_empty() {
        None
    } else {
        let dispatcher = ClusterDispatcher::connect(&args.workers, args.participate)
            .context("connecting to workers")?;
        info!(ranks = dispatcher.parallelism(), "distributed mode enabled");
        Some(ParallelSorter::new(dispatcher))
    };

    for &size in &sizes {
        println!("--- {} elements ---", size);
        let data = generate_data(&mut rng, size, args.max_value);

        // std::sort baseline (pdqsort), also the verification reference.
        let mut std_data = data.clone();
        let start = Instant::now();
        std_data.sort_unstable();
        let std_ms = ms(start.elapsed());
        println!("std sort:           {:>10.3} ms", std_ms);
        report.add_result(BenchmarkResult {
            algorithm: "std_sort".to_string(),
            mode: "sequential".to_string(),
            array_size: size,
            workers: None,
            time_ms: std_ms,
            verified: true,
        });

        // Sequential radix sort.
        let mut sequential_data = data.clone();
        let start = Instant::now();
        radix_sort(&mut sequential_data);
        let sequential_ms = ms(start.elapsed());
        if args.verify {
            verify_output(&data, &sequential_data).context("sequential radix sort")?;
        }
        println!("sequential radix:   {:>10.3} ms", sequential_ms);
        report.add_result(BenchmarkResult {
            algorithm: "radix_sequential".to_string(),
            mode: "sequential".to_string(),
            array_size: size,
            workers: None,
            time_ms: sequential_ms,
            verified: args.verify,
        });

        // Parallel radix sort on the local pool.
        let start = Instant::now();
        let parallel_sorted = local.sort(data.clone()).context("parallel radix sort")?;
        let parallel_ms = ms(start.elapsed());
        if args.verify {
            verify_output(&data, &parallel_sorted).context("parallel radix sort")?;
        }
        println!(
            "parallel radix:     {:>10.3} ms  (p={}, {:.2}x vs sequential)",
            parallel_ms,
            args.parallelism,
            sequential_ms / parallel_ms
        );
        report.add_result(BenchmarkResult {
            algorithm: "radix_parallel".to_string(),
            mode: "parallel".to_string(),
            array_size: size,
            workers: Some(args.parallelism),
            time_ms: parallel_ms,
            verified: args.verify,
        });

        // Distributed radix sort across the cluster.
        if let Some(sorter) = cluster.as_mut() {
            let ranks = sorter.dispatcher_mut().parallelism();
            // Fence before timing so the measurement starts with every
            // worker idle and reachable.
            sorter
                .dispatcher_mut()
                .barrier()
                .context("cluster barrier")?;
            let start = Instant::now();
            let distributed_sorted = sorter.sort(data.clone()).context("distributed radix sort")?;
            let distributed_ms = ms(start.elapsed());
            if args.verify {
                verify_output(&data, &distributed_sorted).context("distributed radix sort")?;
            }
            println!(
                "distributed radix:  {:>10.3} ms  (ranks={}, {:.2}x vs sequential)",
                distributed_ms,
                ranks,
                sequential_ms / distributed_ms
            );
            report.add_result(BenchmarkResult {
                algorithm: "radix_distributed".to_string(),
                mode: "distributed".to_string(),
                array_size: size,
                workers: Some(ranks),
                time_ms: distributed_ms,
                verified: args.verify,
            });
        }

        println!();
    }

    if let Some(path) = args.report {
        report
            .save_lino(&path)
            .with_context(|| format!("writing report to {}", path.display()))?;
        println!("Report written to {}", path.display());
    }

    if let Some(sorter) = cluster {
        sorter.into_dispatcher().shutdown()?;
    }

    Ok(())
}
