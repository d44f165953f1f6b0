pub mod monte_carlo;
pub mod ranking;

use crate::error::Result;
use crate::optimizer::monte_carlo::run_monte_carlo_parallel;
use crate::optimizer::ranking::{rank_results, RankedTuning};
use crate::rotation::{Empowerment, InstantSpell, Tuning, DEFAULT_DURATION_SECONDS};

/// A named set of tuning numbers to compare against others.
#[derive(Debug, Clone, PartialEq)]
pub struct TuningVariant {
    pub name: String,
    pub tuning: Tuning,
}

impl TuningVariant {
    pub fn new(name: impl Into<String>, tuning: Tuning) -> Self {
        Self {
            name: name.into(),
            tuning,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ComparisonScenario {
    pub duration: f64,
    pub iterations: usize,
    pub seed: u64,
}

impl Default for ComparisonScenario {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION_SECONDS,
            iterations: 1000,
            seed: 0,
        }
    }
}

/// Built-in variants; the reference tuning comes first so deltas are
/// reported against it.
pub fn preset_variants() -> Vec<TuningVariant> {
    let baseline = Tuning::default();
    vec![
        TuningVariant::new("baseline", baseline),
        TuningVariant::new("no_procs", baseline.with_proc_chances(0, 0)),
        TuningVariant::new("guaranteed_procs", baseline.with_proc_chances(100, 100)),
        TuningVariant::new(
            "empowered_lunar_strike",
            Tuning {
                lunar: Empowerment {
                    damage_factor: 1.5,
                    ..baseline.lunar
                },
                ..baseline
            },
        ),
        TuningVariant::new(
            "cheap_starsurge",
            Tuning {
                starsurge: InstantSpell {
                    cost: 30.0,
                    ..baseline.starsurge
                },
                ..baseline
            },
        ),
    ]
}

/// Monte Carlo every variant with the same seeds, then rank by mean DPS.
pub fn compare_tunings(
    variants: &[TuningVariant],
    scenario: &ComparisonScenario,
) -> Result<Vec<RankedTuning>> {
    let mut results = Vec::with_capacity(variants.len());
    for variant in variants {
        let summary = run_monte_carlo_parallel(
            &variant.tuning,
            scenario.duration,
            scenario.iterations,
            scenario.seed,
        )?;
        log::debug!(
            "variant {}: mean dps {:.2} over {} runs",
            variant.name,
            summary.mean_dps,
            summary.iterations
        );
        results.push((variant.name.clone(), summary));
    }
    Ok(rank_results(results))
}
