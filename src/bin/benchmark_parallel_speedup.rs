//! Run Monte Carlo once in sequential and once in parallel, then print timings and speedup.
//!
//! Usage: cargo run --release --bin benchmark_parallel_speedup

use std::process;
use std::time::Instant;

use moonkin::optimizer::monte_carlo::{run_monte_carlo, run_monte_carlo_parallel};
use moonkin::rotation::Tuning;

fn main() {
    let tuning = Tuning::default();
    let duration = 300.0;
    let seed = 12345u64;
    let iterations = 20_000;

    println!("Monte Carlo: {iterations} runs × {duration} s (seed={seed})");
    println!();

    // Sequential
    let t0 = Instant::now();
    let seq = run_monte_carlo(&tuning, duration, iterations, seed);
    let elapsed_seq = t0.elapsed();

    // Parallel
    let t0 = Instant::now();
    let par = run_monte_carlo_parallel(&tuning, duration, iterations, seed);
    let elapsed_par = t0.elapsed();

    let (seq, par) = match (seq, par) {
        (Ok(seq), Ok(par)) => (seq, par),
        (Err(err), _) | (_, Err(err)) => {
            eprintln!("monte carlo failed: {err}");
            process::exit(1);
        }
    };

    let seq_ms = elapsed_seq.as_secs_f64() * 1000.0;
    let par_ms = elapsed_par.as_secs_f64() * 1000.0;
    println!(
        "Sequential:  {:.2} ms  ({:.1} sims/s)",
        seq_ms,
        iterations as f64 / elapsed_seq.as_secs_f64()
    );
    println!(
        "Parallel:    {:.2} ms  ({:.1} sims/s)",
        par_ms,
        iterations as f64 / elapsed_par.as_secs_f64()
    );
    println!();
    println!("Speedup:     {:.2}x faster (parallel vs sequential)", seq_ms / par_ms);

    if seq != par {
        eprintln!("sequential and parallel summaries differ");
        process::exit(1);
    }
    println!("(Results match sequential vs parallel, mean DPS {:.2})", seq.mean_dps);
}
