use serde::Serialize;

use crate::optimizer::monte_carlo::DpsSummary;

#[derive(Debug, Clone, Serialize)]
pub struct RankedTuning {
    pub rank: usize,
    pub name: String,
    pub mean_dps: f64,
    pub std_dev_dps: f64,
    /// Mean DPS relative to the first variant handed in, in percent.
    pub delta_vs_first_percent: f64,
    pub summary: DpsSummary,
}

/// Orders variants by mean DPS, then by lower spread, then by name.
/// `results` keeps the caller's order; the first entry is the comparison
/// baseline for `delta_vs_first_percent`.
pub fn rank_results(results: Vec<(String, DpsSummary)>) -> Vec<RankedTuning> {
    let baseline = results
        .first()
        .map(|(_, summary)| summary.mean_dps)
        .unwrap_or(0.0);

    let mut ranked: Vec<RankedTuning> = results
        .into_iter()
        .map(|(name, summary)| {
            let delta_vs_first_percent = if baseline > 0.0 {
                (summary.mean_dps / baseline - 1.0) * 100.0
            } else {
                0.0
            };
            RankedTuning {
                rank: 0,
                name,
                mean_dps: summary.mean_dps,
                std_dev_dps: summary.std_dev_dps,
                delta_vs_first_percent,
                summary,
            }
        })
        .collect();

    ranked.sort_by(|left, right| {
        right
            .mean_dps
            .total_cmp(&left.mean_dps)
            .then_with(|| left.std_dev_dps.total_cmp(&right.std_dev_dps))
            .then_with(|| left.name.cmp(&right.name))
    });
    for (index, entry) in ranked.iter_mut().enumerate() {
        entry.rank = index + 1;
    }

    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::DamageLedger;

    fn summary(mean_dps: f64, std_dev_dps: f64) -> DpsSummary {
        DpsSummary {
            iterations: 10,
            duration: 300.0,
            mean_dps,
            std_dev_dps,
            min_dps: mean_dps,
            max_dps: mean_dps,
            mean_breakdown: DamageLedger::new(),
        }
    }

    #[test]
    fn ranks_by_mean_then_spread_then_name() {
        let ranked = rank_results(vec![
            ("baseline".to_string(), summary(1000.0, 5.0)),
            ("steady".to_string(), summary(1100.0, 1.0)),
            ("swingy".to_string(), summary(1100.0, 9.0)),
            ("alpha".to_string(), summary(900.0, 0.0)),
            ("beta".to_string(), summary(900.0, 0.0)),
        ]);
        let names: Vec<&str> = ranked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["steady", "swingy", "baseline", "alpha", "beta"]);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[4].rank, 5);
        assert!((ranked[0].delta_vs_first_percent - 10.0).abs() < 1e-9);
        assert!((ranked[3].delta_vs_first_percent + 10.0).abs() < 1e-9);
    }

    #[test]
    fn empty_input_ranks_nothing() {
        assert!(rank_results(Vec::new()).is_empty());
    }
}
