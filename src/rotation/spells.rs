use std::fmt;

use serde::Serialize;

/// Every spell the rotation can put damage into. Declaration order is the
/// order used by the breakdown report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Spell {
    Starsurge,
    SolarWrath,
    LunarStrike,
    Moonfire,
    Sunfire,
}

impl Spell {
    pub const ALL: [Spell; 5] = [
        Spell::Starsurge,
        Spell::SolarWrath,
        Spell::LunarStrike,
        Spell::Moonfire,
        Spell::Sunfire,
    ];

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Starsurge => "Starsurge",
            Self::SolarWrath => "Solar Wrath",
            Self::LunarStrike => "Lunar Strike",
            Self::Moonfire => "Moonfire",
            Self::Sunfire => "Sunfire",
        }
    }

    pub const fn is_dot(self) -> bool {
        matches!(self, Self::Moonfire | Self::Sunfire)
    }
}

impl fmt::Display for Spell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Spells the priority loop can pick. DOTs never appear here; they are
/// accounted for in closed form before the loop starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactiveSpell {
    Starsurge,
    SolarWrath,
    LunarStrike,
}

impl ReactiveSpell {
    pub const fn spell(self) -> Spell {
        match self {
            Self::Starsurge => Spell::Starsurge,
            Self::SolarWrath => Spell::SolarWrath,
            Self::LunarStrike => Spell::LunarStrike,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InstantSpell {
    pub damage: f64,
    /// Seconds; 0 means instant.
    pub cast_time: f64,
    /// Astral Power spent per cast.
    pub cost: f64,
    /// Astral Power generated per cast.
    pub astral_power_gain: f64,
}

impl InstantSpell {
    pub const fn new(damage: f64, cast_time: f64, cost: f64, astral_power_gain: f64) -> Self {
        Self {
            damage,
            cast_time,
            cost,
            astral_power_gain,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DotSpell {
    pub initial_damage: f64,
    pub tick_damage: f64,
    pub tick_interval: f64,
    pub duration: f64,
    pub astral_power_gain: f64,
}

/// Closed-form contribution of one DOT held at 100% uptime for a window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DotUptime {
    pub applications: f64,
    pub tick_damage: f64,
    pub initial_damage: f64,
    pub astral_power_gained: f64,
}

impl DotUptime {
    pub fn damage(&self) -> f64 {
        self.tick_damage + self.initial_damage
    }
}

impl DotSpell {
    /// Damage and Astral Power from keeping this DOT up for `window` seconds.
    ///
    /// The DOT is assumed to be refreshed continuously, so applications
    /// scale linearly with `window / duration` and it ticks once per second
    /// of uptime.
    pub fn uptime(&self, window: f64) -> DotUptime {
        let applications = window / self.duration;
        DotUptime {
            applications,
            tick_damage: self.tick_damage * window,
            initial_damage: self.initial_damage * applications,
            astral_power_gained: self.astral_power_gain * applications,
        }
    }
}

/// Banked charge that buffs one follow-up spell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Empowerment {
    /// Chance in percent (0..=100) that the opposite spell grants a stack.
    pub proc_chance_percent: u32,
    pub damage_factor: f64,
    pub cast_time_factor: f64,
}
