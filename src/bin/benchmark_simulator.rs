//! Run the rotation benchmark and optionally append one line to a log file for trend tracking.
//!
//! Usage:
//!   cargo run --release --bin benchmark_simulator
//!   cargo run --release --bin benchmark_simulator -- --log
//!
//! --log  Append one row to benchmark_log.csv (date, runs_per_sec, runs_per_min, casts_per_sec, casts_per_run).

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::process;
use std::time::Instant;

use moonkin::rotation::{simulate_rotation, SimulationConfig, TraceMode, Tuning};

const LOG_PATH: &str = "benchmark_log.csv";

fn main() {
    let log = std::env::args().any(|a| a == "--log");

    let tuning = Tuning::default();
    let duration = 300.0;

    // Run for at least this long or this many simulations
    const MIN_DURATION_MS: u128 = 2000;
    const MIN_RUNS: u64 = 500;

    let start = Instant::now();
    let mut runs: u64 = 0;
    let mut casts: u64 = 0;
    while start.elapsed().as_millis() < MIN_DURATION_MS || runs < MIN_RUNS {
        let config = SimulationConfig {
            duration,
            seed: runs,
            trace_mode: TraceMode::Off,
        };
        match simulate_rotation(&tuning, config) {
            Ok(result) => casts += result.casts.total(),
            Err(err) => {
                eprintln!("simulation failed: {err}");
                process::exit(1);
            }
        }
        runs += 1;
    }
    let elapsed_secs = start.elapsed().as_secs_f64();

    let runs_per_sec = runs as f64 / elapsed_secs;
    let runs_per_min = runs_per_sec * 60.0;
    let casts_per_sec = casts as f64 / elapsed_secs;
    let casts_per_run = casts as f64 / runs as f64;

    println!("Rotation benchmark ({duration} s/run):");
    println!("  Runs:        {}", runs);
    println!("  Duration:    {:.2} s", elapsed_secs);
    println!("  Runs/s:      {:.2}", runs_per_sec);
    println!("  Runs/min:    {:.2}", runs_per_min);
    println!("  Casts/s:     {:.2}", casts_per_sec);
    println!("  Casts/run:   {:.2}", casts_per_run);

    if log {
        let line = format!(
            "{},{:.4},{:.4},{:.4},{:.2}\n",
            chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
            runs_per_sec,
            runs_per_min,
            casts_per_sec,
            casts_per_run
        );
        if let Err(err) = append_log_line(&line) {
            eprintln!("failed to append {LOG_PATH}: {err}");
            process::exit(1);
        }
        println!("Appended to {}", LOG_PATH);
    }
}

fn append_log_line(line: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(LOG_PATH)?;
    if file.metadata().map(|m| m.len() == 0).unwrap_or(true) {
        file.write_all(b"date,runs_per_sec,runs_per_min,casts_per_sec,casts_per_run\n")?;
    }
    file.write_all(line.as_bytes())?;
    file.flush()
}
