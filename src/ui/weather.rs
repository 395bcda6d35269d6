//! Screen weather.
//!
//! The map and the troop each own a [`Screen`]. Weather changes fade the
//! power toward its target over a number of frames. During battle the
//! [`BattleWeather`] shows the map's weather as it was when the battle
//! started, then follows weather commands aimed at the troop screen.

use serde::{Deserialize, Serialize};

/// Weather effect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherKind {
    #[default]
    None,
    Rain,
    Storm,
    Snow,
}

/// Weather state of one screen.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Screen {
    kind: WeatherKind,
    power: f64,
    target: f64,
    duration: u32,
}

impl Screen {
    /// Clear screen.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current weather.
    #[must_use]
    pub fn weather(&self) -> WeatherKind {
        self.kind
    }

    /// Current power.
    #[must_use]
    pub fn power(&self) -> f64 {
        self.power
    }

    /// Frames left in the current transition.
    #[must_use]
    pub fn transition_frames(&self) -> u32 {
        self.duration
    }

    /// Start a weather change.
    ///
    /// Switching to `None` fades the old weather out before clearing it;
    /// a zero duration applies the change immediately.
    pub fn change_weather(&mut self, kind: WeatherKind, power: u32, duration: u32) {
        if kind != WeatherKind::None || duration == 0 {
            self.kind = kind;
        }
        self.target = if kind == WeatherKind::None {
            0.0
        } else {
            f64::from(power)
        };
        self.duration = duration;
        if duration == 0 {
            self.power = self.target;
        }
    }

    /// Advance one frame.
    pub fn update(&mut self) {
        if self.duration == 0 {
            return;
        }
        let d = f64::from(self.duration);
        self.power = (self.power * (d - 1.0) + self.target) / d;
        self.duration -= 1;
        if self.duration == 0 && self.target == 0.0 {
            self.kind = WeatherKind::None;
        }
    }
}

/// Weather shown on the battle screen.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BattleWeather {
    pub kind: WeatherKind,
    pub power: f64,
}

impl BattleWeather {
    /// Copy the map weather when the battle starts.
    #[must_use]
    pub fn from_map(map: &Screen) -> Self {
        Self {
            kind: map.weather(),
            power: map.power(),
        }
    }

    /// Follow the troop screen once battle commands change it.
    pub fn sync(&mut self, troop: &Screen) {
        self.kind = troop.weather();
        self.power = troop.power();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_immediate_change() {
        let mut screen = Screen::new();
        screen.change_weather(WeatherKind::Rain, 5, 0);
        assert_eq!(screen.weather(), WeatherKind::Rain);
        assert_eq!(screen.power(), 5.0);
    }

    #[test]
    fn test_gradual_change() {
        let mut screen = Screen::new();
        screen.change_weather(WeatherKind::Snow, 9, 3);
        assert_eq!(screen.weather(), WeatherKind::Snow);
        assert_eq!(screen.power(), 0.0);

        screen.update();
        assert_eq!(screen.power(), 3.0);
        screen.update();
        assert_eq!(screen.power(), 6.0);
        screen.update();
        assert_eq!(screen.power(), 9.0);
        assert_eq!(screen.transition_frames(), 0);
    }

    #[test]
    fn test_fade_out_clears_kind_at_end() {
        let mut screen = Screen::new();
        screen.change_weather(WeatherKind::Storm, 4, 0);
        screen.change_weather(WeatherKind::None, 0, 2);
        assert_eq!(screen.weather(), WeatherKind::Storm);

        screen.update();
        assert_eq!(screen.weather(), WeatherKind::Storm);
        assert_eq!(screen.power(), 2.0);
        screen.update();
        assert_eq!(screen.weather(), WeatherKind::None);
        assert_eq!(screen.power(), 0.0);
    }

    #[test]
    fn test_battle_weather_from_map() {
        let mut map = Screen::new();
        map.change_weather(WeatherKind::Rain, 7, 0);
        let mut battle = BattleWeather::from_map(&map);
        assert_eq!(battle.kind, WeatherKind::Rain);
        assert_eq!(battle.power, 7.0);

        let mut troop = Screen::new();
        troop.change_weather(WeatherKind::Snow, 2, 0);
        battle.sync(&troop);
        assert_eq!(battle.kind, WeatherKind::Snow);
    }
}
