//! Engine configuration.
//!
//! Hosts configure the engine at startup by providing an `EngineConfig`:
//! - `Features`: which rule systems are active
//! - `TechConfig`: tech point defaults
//! - `AutoStateConfig`: auto-state dispatch limits
//! - `PartyCommandConfig`: party command menu rules
//! - `PlaytimeConfig`: play time display
//!
//! Every section has defaults, so a TOML file only needs the keys it
//! changes:
//!
//! ```
//! use battler_rules::core::EngineConfig;
//!
//! let config = EngineConfig::from_toml_str(r#"
//!     rng_seed = 7
//!
//!     [tech]
//!     default_limit = 10
//! "#).unwrap();
//!
//! assert_eq!(config.rng_seed, 7);
//! assert_eq!(config.tech.default_limit, 10);
//! assert_eq!(config.tech.default_growth, "1 + level / 5");
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ids::SwitchId;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Rule systems the engine runs.
///
/// A disabled feature keeps its data but its listener is not installed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Features {
    /// Apply states from `<apply auto state>` blocks.
    pub auto_state: bool,
    /// Gate and charge skills with tech points.
    pub tech_points: bool,
    /// Allow weather changes during battle.
    pub battle_weather: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            auto_state: true,
            tech_points: true,
            battle_weather: true,
        }
    }
}

/// Tech point defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechConfig {
    /// Growth expression used when neither battler nor skill overrides it.
    pub default_growth: String,
    /// Limit used when neither battler nor skill overrides it.
    pub default_limit: i64,
    /// Only skills tagged `<tech skill>` use tech points.
    pub tag_required: bool,
}

impl Default for TechConfig {
    fn default() -> Self {
        Self {
            default_growth: "1 + level / 5".to_string(),
            default_limit: 20,
            tag_required: false,
        }
    }
}

/// Auto-state dispatch settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoStateConfig {
    /// Maximum nesting of events raised while handling another event.
    /// A state applied by a rule fires `state on`, which may apply another
    /// state, and so on.
    pub max_cascade_depth: u32,
}

impl Default for AutoStateConfig {
    fn default() -> Self {
        Self {
            max_cascade_depth: 8,
        }
    }
}

/// Party command menu settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartyCommandConfig {
    /// While this switch is ON the Fight command is disabled.
    pub fight_disable_switch: Option<SwitchId>,
}

impl Default for PartyCommandConfig {
    fn default() -> Self {
        Self {
            fight_disable_switch: Some(SwitchId::new(15)),
        }
    }
}

/// Play time display settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaytimeConfig {
    /// Frames per second used to convert frame counts to time.
    pub frame_rate: u32,
    /// Show play time above the gold window (otherwise below).
    pub above_gold: bool,
    /// Draw play time inside the gold window instead of its own window.
    pub in_gold_window: bool,
}

impl Default for PlaytimeConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60,
            above_gold: true,
            in_gold_window: false,
        }
    }
}

/// Complete engine configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for the rule RNG.
    pub rng_seed: u64,

    /// Active rule systems.
    pub features: Features,

    /// Tech point defaults.
    pub tech: TechConfig,

    /// Auto-state dispatch settings.
    pub auto_state: AutoStateConfig,

    /// Party command menu settings.
    pub party_command: PartyCommandConfig,

    /// Play time display settings.
    pub playtime: PlaytimeConfig,
}

impl EngineConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tech.default_limit < 0 {
            return Err(ConfigError::Invalid(format!(
                "tech.default_limit must not be negative (got {})",
                self.tech.default_limit
            )));
        }
        if self.tech.default_growth.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "tech.default_growth must not be empty".to_string(),
            ));
        }
        if self.playtime.frame_rate == 0 {
            return Err(ConfigError::Invalid(
                "playtime.frame_rate must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }

    /// Replace the feature set.
    #[must_use]
    pub fn with_features(mut self, features: Features) -> Self {
        self.features = features;
        self
    }

    /// Set the default tech growth expression.
    #[must_use]
    pub fn with_tech_growth(mut self, growth: impl Into<String>) -> Self {
        self.tech.default_growth = growth.into();
        self
    }

    /// Set the default tech limit.
    #[must_use]
    pub fn with_tech_limit(mut self, limit: i64) -> Self {
        self.tech.default_limit = limit;
        self
    }

    /// Restrict tech points to `<tech skill>` skills.
    #[must_use]
    pub fn tech_tag_required(mut self) -> Self {
        self.tech.tag_required = true;
        self
    }

    /// Set the maximum cascade depth.
    #[must_use]
    pub fn with_max_cascade_depth(mut self, depth: u32) -> Self {
        self.auto_state.max_cascade_depth = depth;
        self
    }

    /// Set or clear the switch that disables Fight.
    #[must_use]
    pub fn with_fight_disable_switch(mut self, switch: Option<SwitchId>) -> Self {
        self.party_command.fight_disable_switch = switch;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::new();
        assert!(config.features.auto_state);
        assert!(config.features.tech_points);
        assert_eq!(config.tech.default_growth, "1 + level / 5");
        assert_eq!(config.tech.default_limit, 20);
        assert_eq!(config.auto_state.max_cascade_depth, 8);
        assert_eq!(config.party_command.fight_disable_switch, Some(SwitchId::new(15)));
        assert_eq!(config.playtime.frame_rate, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let config = EngineConfig::from_toml_str(
            r#"
            [features]
            tech_points = false

            [party_command]
            fight_disable_switch = 3

            [playtime]
            above_gold = false
            "#,
        )
        .unwrap();

        assert!(config.features.auto_state);
        assert!(!config.features.tech_points);
        assert_eq!(config.party_command.fight_disable_switch, Some(SwitchId::new(3)));
        assert!(!config.playtime.above_gold);
        assert_eq!(config.playtime.frame_rate, 60);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = EngineConfig::from_toml_str("[tech]\ndefault_limit = -1").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = EngineConfig::from_toml_str("[playtime]\nframe_rate = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = EngineConfig::from_toml_str("rng_seed = \"abc\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::new()
            .with_seed(9)
            .with_tech_growth("2 + level")
            .with_tech_limit(5)
            .tech_tag_required()
            .with_max_cascade_depth(2)
            .with_fight_disable_switch(None);

        assert_eq!(config.rng_seed, 9);
        assert_eq!(config.tech.default_growth, "2 + level");
        assert_eq!(config.tech.default_limit, 5);
        assert!(config.tech.tag_required);
        assert_eq!(config.auto_state.max_cascade_depth, 2);
        assert_eq!(config.party_command.fight_disable_switch, None);
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::load(Path::new("/nonexistent/battler-rules.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
