use serde::Serialize;

use crate::optimizer::{compare_tunings, preset_variants, ComparisonScenario};
use crate::parallel::{run_simulation_batches, WorkerPool};
use crate::report::render_report;
use crate::rotation::{
    entropy_seed, simulate_rotation, SimulationConfig, TraceMode, Tuning,
    DEFAULT_DURATION_SECONDS,
};

const DEFAULT_ITERATIONS: usize = 1000;
const DEFAULT_BATCHES: usize = 10;
const USAGE: &str = "usage: moonkin [simulate [duration] [seed] [--json] [--trace] | \
montecarlo [duration] [iterations] [seed] [--workers N] [--batches N] | \
compare [duration] [iterations] [seed]]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// No arguments: the reference 300-second run as a text report.
    Reference,
    Simulate,
    MonteCarlo,
    Compare,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        None => Some(Command::Reference),
        Some("simulate") => Some(Command::Simulate),
        Some("montecarlo") => Some(Command::MonteCarlo),
        Some("compare") => Some(Command::Compare),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Reference) => run_text_report(DEFAULT_DURATION_SECONDS, entropy_seed()),
        Some(Command::Simulate) => handle_simulate(args),
        Some(Command::MonteCarlo) => handle_monte_carlo(args),
        Some(Command::Compare) => handle_compare(args),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

fn handle_simulate(args: &[String]) -> i32 {
    let positional = positional_args(args);
    let duration = parse_f64_arg(positional.first().copied(), "duration", DEFAULT_DURATION_SECONDS);
    let seed = parse_seed_arg(positional.get(1).copied());
    let as_json = has_flag(args, "--json");
    let trace = has_flag(args, "--trace");

    if !as_json {
        if trace {
            log::warn!("--trace only applies together with --json");
        }
        return run_text_report(duration, seed);
    }

    let config = SimulationConfig {
        duration,
        seed,
        trace_mode: if trace { TraceMode::Casts } else { TraceMode::Off },
    };
    match simulate_rotation(&Tuning::default(), config) {
        Ok(result) => print_json(&result),
        Err(err) => {
            eprintln!("simulation failed: {err}");
            1
        }
    }
}

fn handle_monte_carlo(args: &[String]) -> i32 {
    let positional = positional_args(args);
    let duration = parse_f64_arg(positional.first().copied(), "duration", DEFAULT_DURATION_SECONDS);
    let iterations = parse_usize_arg(positional.get(1).copied(), "iterations", DEFAULT_ITERATIONS);
    let seed = parse_seed_arg(positional.get(2).copied());
    let workers = parse_usize_arg(flag_value(args, "--workers"), "workers", 0);
    let batches = parse_usize_arg(flag_value(args, "--batches"), "batches", DEFAULT_BATCHES);

    let summary = run_simulation_batches(
        &Tuning::default(),
        duration,
        iterations,
        seed,
        &WorkerPool::with_workers(workers),
        batches,
        |done, total| log::info!("monte carlo progress: {done}/{total}"),
    );
    match summary {
        Ok(summary) => print_json(&summary),
        Err(err) => {
            eprintln!("monte carlo failed: {err}");
            1
        }
    }
}

fn handle_compare(args: &[String]) -> i32 {
    let positional = positional_args(args);
    let scenario = ComparisonScenario {
        duration: parse_f64_arg(positional.first().copied(), "duration", DEFAULT_DURATION_SECONDS),
        iterations: parse_usize_arg(positional.get(1).copied(), "iterations", DEFAULT_ITERATIONS),
        seed: parse_seed_arg(positional.get(2).copied()),
    };

    match compare_tunings(&preset_variants(), &scenario) {
        Ok(ranked) => print_json(&ranked),
        Err(err) => {
            eprintln!("comparison failed: {err}");
            1
        }
    }
}

fn run_text_report(duration: f64, seed: u64) -> i32 {
    log::info!("simulating {duration}s with seed {seed}");
    let config = SimulationConfig {
        duration,
        seed,
        trace_mode: TraceMode::Off,
    };
    match simulate_rotation(&Tuning::default(), config) {
        Ok(result) => {
            print!("{}", render_report(&result));
            0
        }
        Err(err) => {
            eprintln!("simulation failed: {err}");
            1
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize output: {err}");
            1
        }
    }
}

/// Arguments after the command name that are neither flags nor flag values.
fn positional_args(args: &[String]) -> Vec<&str> {
    let mut positional = Vec::new();
    let mut rest = args.iter().skip(2);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--workers" | "--batches" => {
                rest.next();
            }
            flag if flag.starts_with("--") => {}
            value => positional.push(value),
        }
    }
    positional
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().skip(2).any(|arg| arg == flag)
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .skip(2)
        .position(|arg| arg == flag)
        .and_then(|index| args.get(index + 3))
        .map(String::as_str)
}

fn parse_f64_arg(raw: Option<&str>, name: &str, default: f64) -> f64 {
    raw.and_then(|value| value.parse::<f64>().ok())
        .unwrap_or_else(|| {
            if let Some(value) = raw {
                log::warn!("invalid {name} '{value}', defaulting to {default}");
            }
            default
        })
}

fn parse_usize_arg(raw: Option<&str>, name: &str, default: usize) -> usize {
    raw.and_then(|value| value.parse::<usize>().ok())
        .unwrap_or_else(|| {
            if let Some(value) = raw {
                log::warn!("invalid {name} '{value}', defaulting to {default}");
            }
            default
        })
}

fn parse_seed_arg(raw: Option<&str>) -> u64 {
    match raw {
        Some(value) => value.parse::<u64>().unwrap_or_else(|_| {
            let seed = entropy_seed();
            log::warn!("invalid seed '{value}', using random seed {seed}");
            seed
        }),
        None => entropy_seed(),
    }
}
