//! Battler parameters and gauges.
//!
//! ## Parameters
//!
//! The eight standard parameters plus level:
//! `mhp, mmp, atk, def, mat, mdf, agi, luk, level` and the TP maximum.
//!
//! ## Gauges
//!
//! `hp`, `mp`, `tp`: current values bounded by their maximum.
//!
//! Notetags refer to these by name. Names are matched case-insensitively
//! and accept the long forms (`maxhp`) as well as the short forms (`mhp`).

use serde::{Deserialize, Serialize};

/// A numeric battler parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Param {
    MaxHp,
    MaxMp,
    MaxTp,
    Atk,
    Def,
    Mat,
    Mdf,
    Agi,
    Luk,
    Level,
}

impl Param {
    /// All parameters, in storage order.
    pub const ALL: [Param; 10] = [
        Param::MaxHp,
        Param::MaxMp,
        Param::MaxTp,
        Param::Atk,
        Param::Def,
        Param::Mat,
        Param::Mdf,
        Param::Agi,
        Param::Luk,
        Param::Level,
    ];

    /// Parse a parameter name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let param = match name.to_ascii_lowercase().as_str() {
            "maxhp" | "mhp" => Param::MaxHp,
            "maxmp" | "mmp" => Param::MaxMp,
            "maxtp" | "mtp" => Param::MaxTp,
            "atk" => Param::Atk,
            "def" => Param::Def,
            "mat" => Param::Mat,
            "mdf" => Param::Mdf,
            "agi" => Param::Agi,
            "luk" => Param::Luk,
            "level" => Param::Level,
            _ => return None,
        };
        Some(param)
    }

    /// Canonical short name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Param::MaxHp => "mhp",
            Param::MaxMp => "mmp",
            Param::MaxTp => "mtp",
            Param::Atk => "atk",
            Param::Def => "def",
            Param::Mat => "mat",
            Param::Mdf => "mdf",
            Param::Agi => "agi",
            Param::Luk => "luk",
            Param::Level => "level",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

/// A bounded resource gauge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gauge {
    Hp,
    Mp,
    Tp,
}

impl Gauge {
    /// Parse a gauge name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "hp" => Some(Gauge::Hp),
            "mp" => Some(Gauge::Mp),
            "tp" => Some(Gauge::Tp),
            _ => None,
        }
    }

    /// The parameter holding this gauge's maximum.
    #[must_use]
    pub const fn max_param(self) -> Param {
        match self {
            Gauge::Hp => Param::MaxHp,
            Gauge::Mp => Param::MaxMp,
            Gauge::Tp => Param::MaxTp,
        }
    }
}

/// Parameter values for one battler.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params([i64; 10]);

impl Params {
    /// Build parameters from max HP/MP; everything else starts at 10,
    /// level at 1 and max TP at 100.
    #[must_use]
    pub fn new(mhp: i64, mmp: i64) -> Self {
        let mut values = [10; 10];
        values[Param::MaxHp.index()] = mhp.max(1);
        values[Param::MaxMp.index()] = mmp.max(0);
        values[Param::MaxTp.index()] = 100;
        values[Param::Level.index()] = 1;
        Self(values)
    }

    /// Get a parameter.
    #[must_use]
    pub fn get(&self, param: Param) -> i64 {
        self.0[param.index()]
    }

    /// Set a parameter.
    pub fn set(&mut self, param: Param, value: i64) {
        self.0[param.index()] = value;
    }

    /// Builder form of `set`.
    #[must_use]
    pub fn with(mut self, param: Param, value: i64) -> Self {
        self.set(param, value);
        self
    }
}

impl Default for Params {
    fn default() -> Self {
        Self::new(100, 0)
    }
}
