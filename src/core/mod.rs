//! Core types: identifiers, RNG, configuration.
//!
//! These are the building blocks every other module shares. Hosts
//! configure behaviour via `EngineConfig` rather than global flags.

pub mod ids;
pub mod rng;
pub mod config;

pub use ids::{ActorId, BattlerRef, ItemId, SkillId, StateId, SwitchId, VariableId};
pub use rng::{GameRng, GameRngState};
pub use config::{
    AutoStateConfig, ConfigError, EngineConfig, Features, PartyCommandConfig, PlaytimeConfig,
    TechConfig,
};
