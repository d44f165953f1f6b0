//! Tunable numbers for the Balance rotation.
//!
//! [Tuning::default] carries the reference values; variants are built with
//! struct update syntax and checked with [Tuning::validate] before a run.

use serde::Serialize;

use crate::error::{Result, SimulationError};
use crate::rotation::spells::{DotSpell, Empowerment, InstantSpell};

pub const DEFAULT_DURATION_SECONDS: f64 = 300.0;
pub const GLOBAL_COOLDOWN: f64 = 1.0;
pub const ASTRAL_POWER_START: f64 = 40.0;
pub const ASTRAL_POWER_CAP: f64 = 100.0;

pub const STARSURGE: InstantSpell = InstantSpell::new(20_000.0, 0.0, 40.0, 0.0);
pub const SOLAR_WRATH: InstantSpell = InstantSpell::new(450.0, 1.85, 0.0, 0.0);
pub const LUNAR_STRIKE: InstantSpell = InstantSpell::new(3_000.0, 2.05, 0.0, 0.0);

pub const MOONFIRE: DotSpell = DotSpell {
    initial_damage: 600.0,
    tick_damage: 200.0,
    tick_interval: 1.0,
    duration: 24.0,
    astral_power_gain: 5.0,
};

pub const SUNFIRE: DotSpell = DotSpell {
    initial_damage: 350.0,
    tick_damage: 220.0,
    tick_interval: 1.0,
    duration: 18.0,
    astral_power_gain: 7.0,
};

pub const SOLAR_EMPOWERMENT: Empowerment = Empowerment {
    proc_chance_percent: 13,
    damage_factor: 1.20,
    cast_time_factor: 0.8,
};

pub const LUNAR_EMPOWERMENT: Empowerment = Empowerment {
    proc_chance_percent: 8,
    damage_factor: 1.25,
    cast_time_factor: 0.5,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AstralPower {
    pub start: f64,
    pub cap: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tuning {
    pub starsurge: InstantSpell,
    pub solar_wrath: InstantSpell,
    pub lunar_strike: InstantSpell,
    pub moonfire: DotSpell,
    pub sunfire: DotSpell,
    /// Consumed by Solar Wrath, granted by Lunar Strike.
    pub solar: Empowerment,
    /// Consumed by Lunar Strike, granted by Solar Wrath.
    pub lunar: Empowerment,
    pub global_cooldown: f64,
    pub astral_power: AstralPower,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            starsurge: STARSURGE,
            solar_wrath: SOLAR_WRATH,
            lunar_strike: LUNAR_STRIKE,
            moonfire: MOONFIRE,
            sunfire: SUNFIRE,
            solar: SOLAR_EMPOWERMENT,
            lunar: LUNAR_EMPOWERMENT,
            global_cooldown: GLOBAL_COOLDOWN,
            astral_power: AstralPower {
                start: ASTRAL_POWER_START,
                cap: ASTRAL_POWER_CAP,
            },
        }
    }
}

impl Tuning {
    /// Same numbers with both proc chances overridden.
    pub fn with_proc_chances(self, solar_percent: u32, lunar_percent: u32) -> Self {
        Self {
            solar: Empowerment {
                proc_chance_percent: solar_percent,
                ..self.solar
            },
            lunar: Empowerment {
                proc_chance_percent: lunar_percent,
                ..self.lunar
            },
            ..self
        }
    }

    /// Clock cost of one Starsurge, also used for each DOT-funded bonus cast.
    pub fn starsurge_step(&self) -> f64 {
        self.global_cooldown + self.starsurge.cast_time
    }

    /// Smallest amount of time any reactive cast can advance the clock.
    pub fn min_step(&self) -> f64 {
        [
            self.starsurge_step(),
            self.solar_wrath.cast_time,
            self.solar_wrath.cast_time * self.solar.cast_time_factor,
            self.lunar_strike.cast_time,
            self.lunar_strike.cast_time * self.lunar.cast_time_factor,
        ]
        .into_iter()
        .fold(f64::INFINITY, f64::min)
    }

    /// Starting Astral Power, never above the cap.
    pub fn opening_astral_power(&self) -> f64 {
        self.astral_power.start.min(self.astral_power.cap)
    }

    /// Rejects tunings that would divide by zero, stall the clock or roll
    /// outside the percent range.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("starsurge.damage", self.starsurge.damage),
            ("solar_wrath.damage", self.solar_wrath.damage),
            ("lunar_strike.damage", self.lunar_strike.damage),
            ("starsurge.cast_time", self.starsurge.cast_time),
            ("solar_wrath.cast_time", self.solar_wrath.cast_time),
            ("lunar_strike.cast_time", self.lunar_strike.cast_time),
            ("moonfire.initial_damage", self.moonfire.initial_damage),
            ("moonfire.tick_damage", self.moonfire.tick_damage),
            ("moonfire.astral_power_gain", self.moonfire.astral_power_gain),
            ("sunfire.initial_damage", self.sunfire.initial_damage),
            ("sunfire.tick_damage", self.sunfire.tick_damage),
            ("sunfire.astral_power_gain", self.sunfire.astral_power_gain),
            ("solar.damage_factor", self.solar.damage_factor),
            ("lunar.damage_factor", self.lunar.damage_factor),
            ("global_cooldown", self.global_cooldown),
            ("astral_power.start", self.astral_power.start),
        ] {
            non_negative(field, value)?;
        }

        positive("starsurge.cost", self.starsurge.cost)?;
        positive("moonfire.duration", self.moonfire.duration)?;
        positive("moonfire.tick_interval", self.moonfire.tick_interval)?;
        positive("sunfire.duration", self.sunfire.duration)?;
        positive("sunfire.tick_interval", self.sunfire.tick_interval)?;
        positive("astral_power.cap", self.astral_power.cap)?;

        if self.starsurge.cost > self.astral_power.cap {
            return Err(SimulationError::tuning(
                "starsurge.cost",
                format!(
                    "cost {} exceeds the Astral Power cap {}",
                    self.starsurge.cost, self.astral_power.cap
                ),
            ));
        }

        positive("starsurge step (global_cooldown + cast_time)", self.starsurge_step())?;
        positive("solar_wrath.cast_time", self.solar_wrath.cast_time)?;
        positive("lunar_strike.cast_time", self.lunar_strike.cast_time)?;
        positive("solar.cast_time_factor", self.solar.cast_time_factor)?;
        positive("lunar.cast_time_factor", self.lunar.cast_time_factor)?;

        percent("solar.proc_chance_percent", self.solar.proc_chance_percent)?;
        percent("lunar.proc_chance_percent", self.lunar.proc_chance_percent)?;

        Ok(())
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimulationError::tuning(
            field,
            format!("expected a finite value >= 0, got {value}"),
        ))
    }
}

fn positive(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimulationError::tuning(
            field,
            format!("expected a finite value > 0, got {value}"),
        ))
    }
}

fn percent(field: &'static str, value: u32) -> Result<()> {
    if value <= 100 {
        Ok(())
    } else {
        Err(SimulationError::tuning(
            field,
            format!("expected 0..=100, got {value}"),
        ))
    }
}
