//! Game database: states, skills and items.
//!
//! Every definition carries a free-text `note` that notetags are read
//! from. The database is loaded once and shared read-only by the engine.

pub mod database;
pub mod definition;

pub use database::{Database, DatabaseFile};
pub use definition::{ItemDef, SkillDef, StateDef};
