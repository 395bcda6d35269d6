//! Battlers: parameters, gauges, states, skills and notes.

pub mod params;
pub mod unit;

pub use params::{Gauge, Param, Params};
pub use unit::{Battler, BattlerKind, GaugeFlags};
