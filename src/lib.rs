//! # battler-rules
//!
//! Notetag-driven battle rules for 2D RPG battlers.
//!
//! ## Design Principles
//!
//! 1. **Data, not scripts**: rules live in note text attached to actors,
//!    states, skills and items. Conditions are a small expression language
//!    evaluated against a fixed set of battler queries.
//!
//! 2. **Events Over Patches**: the host reports what happened through
//!    [`Engine`] methods; rule systems are [`BattleListener`]s.
//!
//! 3. **Configuration Over Convention**: tunables and feature toggles live
//!    in [`EngineConfig`], loadable from TOML.
//!
//! ## Modules
//!
//! - `core`: IDs, RNG, configuration
//! - `expr`: Condition expression lexer, parser and evaluator
//! - `rules`: Auto-state triggers, conditions and the rule matcher
//! - `notetags`: Notetag scanning for auto-state blocks and tech tags
//! - `data`: State, skill and item definitions
//! - `battler`: Parameters, gauges, states and skills of one battler
//! - `tech`: Per-skill tech points
//! - `events`: Battle events and listeners
//! - `engine`: World, dispatch and event commands
//! - `ui`: Party command list, play time layout, weather

pub mod core;
pub mod expr;
pub mod rules;
pub mod notetags;
pub mod data;
pub mod battler;
pub mod tech;
pub mod events;
pub mod engine;
pub mod ui;

// Re-export commonly used types
pub use crate::core::{
    ActorId, BattlerRef, ItemId, SkillId, StateId, SwitchId, VariableId,
    GameRng, GameRngState,
    AutoStateConfig, ConfigError, EngineConfig, Features, PartyCommandConfig, PlaytimeConfig,
    TechConfig,
};

pub use crate::expr::{Expr, ExprContext, ExprError};

pub use crate::rules::{
    CompareOp, Condition, Threshold,
    AutoStateRule, RuleMatcher,
    Trigger, TriggerKind,
};

pub use crate::notetags::NoteTagError;

pub use crate::data::{Database, ItemDef, SkillDef, StateDef};

pub use crate::battler::{Battler, BattlerKind, Gauge, Param, Params};

pub use crate::tech::{TechEnv, TechPoints, TechTracker};

pub use crate::events::{
    ActionItem, BattleEvent, BattleListener, ListenerRegistry,
    AutoStateListener, TechPointListener,
};

pub use crate::engine::{Command, Engine, GameFlags, Interpreter, SubjectContext, World};

pub use crate::ui::{
    BattleWeather, MenuPlaytimeLayout, PartyCommand, PartyCommandList, Playtime, Screen,
    WeatherKind,
};
