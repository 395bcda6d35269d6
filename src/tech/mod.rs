//! Tech points: per-skill use counters that grow with the battler.
//!
//! ## Example
//!
//! ```
//! use battler_rules::core::{SkillId, TechConfig};
//! use battler_rules::data::{Database, SkillDef};
//! use battler_rules::expr::ExprContext;
//! use battler_rules::tech::{TechEnv, TechTracker};
//!
//! struct Level(i64);
//!
//! impl ExprContext for Level {
//!     fn stat(&self, name: &str) -> Option<i64> { (name == "level").then_some(self.0) }
//!     fn has_state(&self, _: u32) -> bool { false }
//!     fn state_addable(&self, _: u32) -> bool { true }
//!     fn switch(&self, _: u32) -> bool { false }
//!     fn variable(&self, _: u32) -> i64 { 0 }
//!     fn rand(&mut self, _: i64) -> i64 { 0 }
//! }
//!
//! let slash = SkillId::new(3);
//! let db = Database::new().with_skill(SkillDef::new(slash, "Cross Slash"));
//! let config = TechConfig::default();
//! let env = TechEnv::new("", &db, &config);
//!
//! let mut tracker = TechTracker::new();
//! tracker.setup(slash, &env, &mut Level(10));
//! assert_eq!(tracker.max(slash), 3);
//!
//! tracker.pay(slash, &env, &mut Level(10));
//! assert_eq!(tracker.points(slash), 2);
//! ```

pub mod tracker;

pub use tracker::{TechEnv, TechPoints, TechTracker};
