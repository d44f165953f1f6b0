//! Text report for a single rotation run.

use std::fmt::Write as _;

use crate::rotation::{SimulationResult, Spell};

/// Renders the summary line and per-spell breakdown.
///
/// Damage figures are truncated to whole numbers; DPS and shares carry two
/// decimals.
pub fn render_report(result: &SimulationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} damage done over {} seconds - DPS = {:.2}",
        whole(result.total_damage),
        result.duration,
        result.dps
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Breakdown:");
    for spell in Spell::ALL {
        let _ = writeln!(
            out,
            "{} - {} {:.2}%",
            spell.display_name(),
            whole(result.breakdown.get(spell)),
            result.breakdown.share_percent(spell)
        );
    }
    out
}

fn whole(damage: f64) -> i64 {
    damage.trunc() as i64
}
