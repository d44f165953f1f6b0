//! Priority-loop simulation of the Balance rotation.
//!
//! A run has two phases. DOT upkeep is settled in closed form first: both
//! DOTs are assumed to hold 100% uptime for the whole window, and the Astral
//! Power they generate is converted into bonus Starsurges whose time is
//! pre-spent on the clock. The reactive loop then picks spells by priority
//! until the clock reaches the requested duration.

use serde::Serialize;

use crate::error::{Result, SimulationError};
use crate::rotation::ledger::DamageLedger;
use crate::rotation::rng::{entropy_seed, ProcRoll, Rng};
use crate::rotation::spells::{DotUptime, ReactiveSpell, Spell};
use crate::rotation::trace::{CastEvent, TraceCollector, TraceMode};
use crate::rotation::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    /// Simulated window in seconds.
    pub duration: f64,
    pub seed: u64,
    pub trace_mode: TraceMode,
}

/// DOT upkeep settled before the reactive loop.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DotOpening {
    pub moonfire: DotUptime,
    pub sunfire: DotUptime,
    /// Starsurges funded by DOT-generated Astral Power (fractional).
    pub bonus_starsurges: f64,
    /// Clock offset the reactive loop starts from.
    pub pre_spent_time: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CastCounts {
    pub starsurge: u64,
    pub solar_wrath: u64,
    pub lunar_strike: u64,
    pub empowered_solar_wrath: u64,
    pub empowered_lunar_strike: u64,
}

impl CastCounts {
    pub fn total(&self) -> u64 {
        self.starsurge + self.solar_wrath + self.lunar_strike
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub duration: f64,
    pub total_damage: f64,
    pub dps: f64,
    pub breakdown: DamageLedger,
    pub opening: DotOpening,
    pub casts: CastCounts,
    /// Clock value when the loop stopped; may overshoot `duration` by part
    /// of the final cast.
    pub final_clock: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<CastEvent>,
}

/// Mutable state of one run. Never shared between runs.
#[derive(Debug, Clone)]
struct RotationState {
    clock: f64,
    astral_power: f64,
    solar_stacks: u32,
    lunar_stacks: u32,
    ledger: DamageLedger,
    casts: CastCounts,
}

struct CastOutcome {
    damage: f64,
    elapsed: f64,
    empowered: bool,
    proc_gained: bool,
}

/// Runs the reference tuning with an OS-entropy seed.
pub fn simulate(duration: f64) -> Result<SimulationResult> {
    simulate_rotation(
        &Tuning::default(),
        SimulationConfig {
            duration,
            seed: entropy_seed(),
            trace_mode: TraceMode::Off,
        },
    )
}

/// Runs `tuning` with proc rolls drawn from a [Rng] seeded by `config.seed`.
pub fn simulate_rotation(tuning: &Tuning, config: SimulationConfig) -> Result<SimulationResult> {
    let mut rng = Rng::new(config.seed);
    simulate_with_rolls(tuning, config.duration, config.trace_mode, &mut rng)
}

/// Runs `tuning` with proc rolls drawn from `rolls`.
pub fn simulate_with_rolls<R: ProcRoll + ?Sized>(
    tuning: &Tuning,
    duration: f64,
    trace_mode: TraceMode,
    rolls: &mut R,
) -> Result<SimulationResult> {
    if !duration.is_finite() || duration <= 0.0 {
        return Err(SimulationError::InvalidDuration(duration));
    }
    tuning.validate()?;

    let opening = dot_opening(tuning, duration);
    let mut state = RotationState {
        clock: opening.pre_spent_time,
        astral_power: tuning.opening_astral_power(),
        solar_stacks: 0,
        lunar_stacks: 0,
        ledger: DamageLedger::new(),
        casts: CastCounts::default(),
    };
    state.ledger.add(Spell::Moonfire, opening.moonfire.damage());
    state.ledger.add(Spell::Sunfire, opening.sunfire.damage());
    state.ledger.add(
        Spell::Starsurge,
        opening.bonus_starsurges * tuning.starsurge.damage,
    );

    log::debug!(
        "rotation start: duration={duration}s pre_spent={:.3}s bonus_starsurges={:.3}",
        opening.pre_spent_time,
        opening.bonus_starsurges
    );

    let cast_limit = cast_limit(tuning, duration);
    let mut trace = TraceCollector::for_mode(trace_mode);

    while state.clock < duration {
        if state.casts.total() >= cast_limit {
            return Err(SimulationError::CastLimitExceeded {
                limit: cast_limit,
                duration,
            });
        }

        let spell = next_spell(
            tuning,
            state.astral_power,
            state.solar_stacks,
            state.lunar_stacks,
        );
        let start = state.clock;
        let outcome = apply_cast(tuning, &mut state, spell, rolls);
        state.ledger.add(spell.spell(), outcome.damage);
        state.clock += outcome.elapsed;

        log::trace!(
            "t={start:.3} {} dmg={:.1} empowered={} ap={} solar={} lunar={}",
            spell.spell(),
            outcome.damage,
            outcome.empowered,
            state.astral_power,
            state.solar_stacks,
            state.lunar_stacks
        );

        if trace.is_enabled() {
            trace.record(CastEvent {
                index: state.casts.total() - 1,
                spell,
                start,
                end: state.clock,
                damage: outcome.damage,
                empowered: outcome.empowered,
                proc_gained: outcome.proc_gained,
                astral_power: state.astral_power,
                solar_stacks: state.solar_stacks,
                lunar_stacks: state.lunar_stacks,
            });
        }
    }

    let total_damage = state.ledger.total();
    let dps = total_damage / duration;
    log::debug!(
        "rotation done: casts={} total={total_damage:.1} dps={dps:.2}",
        state.casts.total()
    );

    Ok(SimulationResult {
        duration,
        total_damage,
        dps,
        breakdown: state.ledger,
        opening,
        casts: state.casts,
        final_clock: state.clock,
        events: trace.into_events(),
    })
}

/// Fixed priority: Starsurge when affordable, then Solar Wrath on a Solar
/// stack, then Lunar Strike on a Lunar stack, else Solar Wrath as filler.
pub fn next_spell(
    tuning: &Tuning,
    astral_power: f64,
    solar_stacks: u32,
    lunar_stacks: u32,
) -> ReactiveSpell {
    if astral_power >= tuning.starsurge.cost {
        ReactiveSpell::Starsurge
    } else if solar_stacks > 0 {
        ReactiveSpell::SolarWrath
    } else if lunar_stacks > 0 {
        ReactiveSpell::LunarStrike
    } else {
        ReactiveSpell::SolarWrath
    }
}

/// Closed-form DOT damage and the Starsurges their Astral Power buys.
pub fn dot_opening(tuning: &Tuning, duration: f64) -> DotOpening {
    let moonfire = tuning.moonfire.uptime(duration);
    let sunfire = tuning.sunfire.uptime(duration);
    let astral_power = moonfire.astral_power_gained + sunfire.astral_power_gained;
    let bonus_starsurges = astral_power / tuning.starsurge.cost;
    DotOpening {
        moonfire,
        sunfire,
        bonus_starsurges,
        pre_spent_time: bonus_starsurges * tuning.starsurge_step(),
    }
}

/// Upper bound on reactive casts for a window: `ceil(duration / min_step)`.
pub fn max_reactive_casts(tuning: &Tuning, duration: f64) -> u64 {
    (duration / tuning.min_step()).ceil() as u64
}

fn cast_limit(tuning: &Tuning, duration: f64) -> u64 {
    max_reactive_casts(tuning, duration).saturating_add(1)
}

fn apply_cast<R: ProcRoll + ?Sized>(
    tuning: &Tuning,
    state: &mut RotationState,
    spell: ReactiveSpell,
    rolls: &mut R,
) -> CastOutcome {
    match spell {
        ReactiveSpell::Starsurge => {
            let starsurge = &tuning.starsurge;
            state.astral_power = (state.astral_power - starsurge.cost
                + starsurge.astral_power_gain)
                .min(tuning.astral_power.cap);
            state.solar_stacks += 1;
            state.lunar_stacks += 1;
            state.casts.starsurge += 1;
            CastOutcome {
                damage: starsurge.damage,
                elapsed: tuning.starsurge_step(),
                empowered: false,
                proc_gained: false,
            }
        }
        ReactiveSpell::SolarWrath => {
            let wrath = &tuning.solar_wrath;
            let empowered = state.solar_stacks > 0;
            let (damage, elapsed) = if empowered {
                state.solar_stacks -= 1;
                state.casts.empowered_solar_wrath += 1;
                (
                    wrath.damage * tuning.solar.damage_factor,
                    wrath.cast_time * tuning.solar.cast_time_factor,
                )
            } else {
                (wrath.damage, wrath.cast_time)
            };
            state.casts.solar_wrath += 1;
            gain_astral_power(tuning, state, wrath.astral_power_gain);

            let proc_gained = rolls.procs(tuning.lunar.proc_chance_percent);
            if proc_gained {
                state.lunar_stacks += 1;
            }
            CastOutcome {
                damage,
                elapsed,
                empowered,
                proc_gained,
            }
        }
        ReactiveSpell::LunarStrike => {
            let strike = &tuning.lunar_strike;
            let empowered = state.lunar_stacks > 0;
            let (damage, elapsed) = if empowered {
                state.lunar_stacks -= 1;
                state.casts.empowered_lunar_strike += 1;
                (
                    strike.damage * tuning.lunar.damage_factor,
                    strike.cast_time * tuning.lunar.cast_time_factor,
                )
            } else {
                (strike.damage, strike.cast_time)
            };
            state.casts.lunar_strike += 1;
            gain_astral_power(tuning, state, strike.astral_power_gain);

            let proc_gained = rolls.procs(tuning.solar.proc_chance_percent);
            if proc_gained {
                state.solar_stacks += 1;
            }
            CastOutcome {
                damage,
                elapsed,
                empowered,
                proc_gained,
            }
        }
    }
}

fn gain_astral_power(tuning: &Tuning, state: &mut RotationState, gain: f64) {
    if gain > 0.0 {
        state.astral_power = (state.astral_power + gain).min(tuning.astral_power.cap);
    }
}
