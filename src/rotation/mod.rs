pub mod engine;
pub mod ledger;
pub mod rng;
pub mod spells;
pub mod trace;
pub mod tuning;

pub use engine::{
    dot_opening, max_reactive_casts, next_spell, simulate, simulate_rotation,
    simulate_with_rolls, CastCounts, DotOpening, SimulationConfig, SimulationResult,
};
pub use ledger::DamageLedger;
pub use rng::{entropy_seed, ProcRoll, Rng};
pub use spells::{DotSpell, DotUptime, Empowerment, InstantSpell, ReactiveSpell, Spell};
pub use trace::{serialize_events_json, CastEvent, TraceCollector, TraceMode};
pub use tuning::{AstralPower, Tuning, DEFAULT_DURATION_SECONDS};
