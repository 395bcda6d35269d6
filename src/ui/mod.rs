//! Menu and screen helpers: party commands, play time, weather.
//!
//! These produce the data a host window draws; no rendering happens here.

pub mod party_command;
pub mod playtime;
pub mod weather;

pub use party_command::{CommandEntry, PartyCommand, PartyCommandList};
pub use playtime::{MenuPlaytimeLayout, Playtime, Rect, WindowMetrics};
pub use weather::{BattleWeather, Screen, WeatherKind};
