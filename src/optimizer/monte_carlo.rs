use std::ops::Range;

use rayon::prelude::*;
use serde::Serialize;

use crate::error::{Result, SimulationError};
use crate::rotation::{
    simulate_rotation, DamageLedger, SimulationConfig, SimulationResult, TraceMode, Tuning,
};

/// DPS statistics over repeated seeded runs of one tuning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DpsSummary {
    pub iterations: usize,
    pub duration: f64,
    pub mean_dps: f64,
    /// Population standard deviation.
    pub std_dev_dps: f64,
    pub min_dps: f64,
    pub max_dps: f64,
    pub mean_breakdown: DamageLedger,
}

pub fn run_monte_carlo(
    tuning: &Tuning,
    duration: f64,
    iterations: usize,
    seed: u64,
) -> Result<DpsSummary> {
    run_monte_carlo_with_parallelism(tuning, duration, iterations, seed, false)
}

/// Like [run_monte_carlo] but spreads iterations across the current Rayon pool.
/// Output is identical to the sequential path for the same inputs.
pub fn run_monte_carlo_parallel(
    tuning: &Tuning,
    duration: f64,
    iterations: usize,
    seed: u64,
) -> Result<DpsSummary> {
    run_monte_carlo_with_parallelism(tuning, duration, iterations, seed, true)
}

fn run_monte_carlo_with_parallelism(
    tuning: &Tuning,
    duration: f64,
    iterations: usize,
    seed: u64,
    parallel: bool,
) -> Result<DpsSummary> {
    if !duration.is_finite() || duration <= 0.0 {
        return Err(SimulationError::InvalidDuration(duration));
    }
    tuning.validate()?;

    let runs = run_iterations(tuning, duration, seed, 0..iterations, parallel)?;

    log::debug!(
        "monte carlo: {iterations} runs of {duration}s (parallel={parallel}, seed={seed})"
    );
    Ok(summarize(duration, &runs))
}

/// Runs the seeded iterations in `range`; iteration `i` uses
/// `seed.wrapping_add(i)`. Results are returned in iteration order.
pub fn run_iterations(
    tuning: &Tuning,
    duration: f64,
    seed: u64,
    range: Range<usize>,
    parallel: bool,
) -> Result<Vec<SimulationResult>> {
    let run_one = |iteration: usize| {
        simulate_rotation(
            tuning,
            SimulationConfig {
                duration,
                seed: seed.wrapping_add(iteration as u64),
                trace_mode: TraceMode::Off,
            },
        )
    };

    if parallel {
        range.into_par_iter().map(run_one).collect()
    } else {
        range.map(run_one).collect()
    }
}

/// Aggregates runs in input order so sequential and parallel batches agree
/// bit for bit.
pub fn summarize(duration: f64, runs: &[SimulationResult]) -> DpsSummary {
    if runs.is_empty() {
        return DpsSummary {
            iterations: 0,
            duration,
            mean_dps: 0.0,
            std_dev_dps: 0.0,
            min_dps: 0.0,
            max_dps: 0.0,
            mean_breakdown: DamageLedger::new(),
        };
    }

    let count = runs.len() as f64;
    let mut dps_sum = 0.0;
    let mut min_dps = f64::INFINITY;
    let mut max_dps = f64::NEG_INFINITY;
    let mut breakdown_sum = DamageLedger::new();
    for run in runs {
        dps_sum += run.dps;
        min_dps = min_dps.min(run.dps);
        max_dps = max_dps.max(run.dps);
        breakdown_sum.merge_from(&run.breakdown);
    }
    let mean_dps = dps_sum / count;
    let variance = runs
        .iter()
        .map(|run| (run.dps - mean_dps).powi(2))
        .sum::<f64>()
        / count;

    DpsSummary {
        iterations: runs.len(),
        duration,
        mean_dps,
        std_dev_dps: variance.sqrt(),
        min_dps,
        max_dps,
        mean_breakdown: breakdown_sum.scaled(1.0 / count),
    }
}
