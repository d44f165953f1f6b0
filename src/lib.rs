//! Balance rotation DPS simulator.
//!
//! Runs a fixed-priority spell rotation forward in simulated time and
//! reports total damage, DPS and a per-spell breakdown, so tuning choices
//! (costs, cast times, proc chances, buff sizes) can be compared.

pub mod cli;
pub mod error;
pub mod optimizer;
pub mod parallel;
pub mod report;
pub mod rotation;

pub use error::SimulationError;
