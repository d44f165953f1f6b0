use serde::Serialize;

use crate::rotation::spells::ReactiveSpell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceMode {
    #[default]
    Off,
    Casts,
}

/// One cast of the priority loop. Stack and Astral Power values are the
/// state after the cast resolved, proc included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CastEvent {
    pub index: u64,
    pub spell: ReactiveSpell,
    pub start: f64,
    pub end: f64,
    pub damage: f64,
    pub empowered: bool,
    pub proc_gained: bool,
    pub astral_power: f64,
    pub solar_stacks: u32,
    pub lunar_stacks: u32,
}

#[derive(Debug, Clone, Default)]
pub struct TraceCollector {
    enabled: bool,
    events: Vec<CastEvent>,
}

impl TraceCollector {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            events: Vec::new(),
        }
    }

    pub fn for_mode(mode: TraceMode) -> Self {
        Self::new(mode == TraceMode::Casts)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn record(&mut self, event: CastEvent) {
        if self.enabled {
            self.events.push(event);
        }
    }

    pub fn events(&self) -> &[CastEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<CastEvent> {
        self.events
    }
}

pub fn serialize_events_json(events: &[CastEvent]) -> serde_json::Result<String> {
    serde_json::to_string(events)
}
