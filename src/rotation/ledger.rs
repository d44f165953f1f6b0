use std::collections::BTreeMap;

use serde::Serialize;

use crate::rotation::spells::Spell;

/// Running damage per spell. Every spell has an entry from the start so the
/// breakdown always lists all five, zero or not.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DamageLedger {
    totals: BTreeMap<Spell, f64>,
}

impl Default for DamageLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl DamageLedger {
    pub fn new() -> Self {
        Self {
            totals: Spell::ALL.into_iter().map(|spell| (spell, 0.0)).collect(),
        }
    }

    pub fn add(&mut self, spell: Spell, damage: f64) {
        *self.totals.entry(spell).or_insert(0.0) += damage;
    }

    pub fn get(&self, spell: Spell) -> f64 {
        self.totals.get(&spell).copied().unwrap_or(0.0)
    }

    /// Grand total, summed in breakdown order.
    pub fn total(&self) -> f64 {
        self.totals.values().sum()
    }

    pub fn entries(&self) -> impl Iterator<Item = (Spell, f64)> + '_ {
        self.totals.iter().map(|(spell, damage)| (*spell, *damage))
    }

    /// Share of the grand total in percent; 0 when nothing was dealt.
    pub fn share_percent(&self, spell: Spell) -> f64 {
        let total = self.total();
        if total > 0.0 {
            self.get(spell) / total * 100.0
        } else {
            0.0
        }
    }

    /// Adds every entry of `other` into self.
    pub fn merge_from(&mut self, other: &DamageLedger) {
        for (spell, damage) in other.entries() {
            self.add(spell, damage);
        }
    }

    /// Same ledger with every entry multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> DamageLedger {
        DamageLedger {
            totals: self
                .totals
                .iter()
                .map(|(spell, damage)| (*spell, damage * factor))
                .collect(),
        }
    }
}
