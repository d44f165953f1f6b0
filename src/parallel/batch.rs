//! Batch distribution for Monte Carlo runs.
//!
//! Splits iterations into contiguous batches so long runs can report
//! progress between batches while each batch still fans out across the pool.

use crate::error::{Result, SimulationError};
use crate::optimizer::monte_carlo::{run_iterations, summarize, DpsSummary};
use crate::parallel::pool::WorkerPool;
use crate::rotation::Tuning;

/// Split `total` items into up to `num_batches` ranges `[start, end)`.
/// Batches are as equal in size as possible; later batches may be smaller.
///
/// # Example
/// ```
/// # use moonkin::parallel::batch_ranges;
/// let ranges = batch_ranges(100, 4);
/// assert_eq!(ranges, vec![(0, 25), (25, 50), (50, 75), (75, 100)]);
/// ```
pub fn batch_ranges(total: usize, num_batches: usize) -> Vec<(usize, usize)> {
    if total == 0 || num_batches == 0 {
        return Vec::new();
    }
    let num_batches = num_batches.min(total);
    let base = total / num_batches;
    let remainder = total % num_batches;
    let mut ranges = Vec::with_capacity(num_batches);
    let mut start = 0;
    for i in 0..num_batches {
        let size = base + if i < remainder { 1 } else { 0 };
        let end = start + size;
        ranges.push((start, end));
        start = end;
    }
    ranges
}

/// Runs Monte Carlo inside `pool` in `num_batches` batches, calling
/// `on_batch(completed, total)` after each one. The summary equals the one
/// [crate::optimizer::monte_carlo::run_monte_carlo] returns for the same
/// inputs.
pub fn run_simulation_batches<F>(
    tuning: &Tuning,
    duration: f64,
    iterations: usize,
    seed: u64,
    pool: &WorkerPool,
    num_batches: usize,
    mut on_batch: F,
) -> Result<DpsSummary>
where
    F: FnMut(usize, usize) + Send,
{
    if !duration.is_finite() || duration <= 0.0 {
        return Err(SimulationError::InvalidDuration(duration));
    }
    tuning.validate()?;

    pool.install(|| -> Result<DpsSummary> {
        let mut runs = Vec::with_capacity(iterations);
        for (start, end) in batch_ranges(iterations, num_batches.max(1)) {
            runs.extend(run_iterations(tuning, duration, seed, start..end, true)?);
            on_batch(end, iterations);
        }
        Ok(summarize(duration, &runs))
    })
}
