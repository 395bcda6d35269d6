//! Auto-state rules.
//!
//! A battler's notes may carry `<apply auto state>` blocks. Each block
//! names a [`Trigger`], a list of states and a list of [`Condition`]s.
//! When a battle event fires the trigger, the [`RuleMatcher`] evaluates
//! the conditions against the battler and returns the states to apply.
//!
//! ## Example
//!
//! ```
//! use battler_rules::core::StateId;
//! use battler_rules::expr::ExprContext;
//! use battler_rules::rules::{RuleMatcher, Trigger, TriggerKind};
//!
//! struct Gauge { hp: i64, mhp: i64 }
//!
//! impl ExprContext for Gauge {
//!     fn stat(&self, name: &str) -> Option<i64> {
//!         match name { "hp" => Some(self.hp), "mhp" => Some(self.mhp), _ => None }
//!     }
//!     fn has_state(&self, _: u32) -> bool { false }
//!     fn state_addable(&self, _: u32) -> bool { true }
//!     fn switch(&self, _: u32) -> bool { false }
//!     fn variable(&self, _: u32) -> i64 { 0 }
//!     fn rand(&mut self, _: i64) -> i64 { 0 }
//! }
//!
//! let matcher = RuleMatcher::parse(
//!     "<apply auto state hp damage: 14>\nhp lower 25%;\n</apply auto state>",
//! );
//! let damage = Trigger::new(TriggerKind::HpDamage);
//!
//! let mut weak = Gauge { hp: 20, mhp: 100 };
//! assert_eq!(matcher.matching_states(damage, &mut weak), vec![StateId::new(14)]);
//!
//! let mut healthy = Gauge { hp: 30, mhp: 100 };
//! assert!(matcher.matching_states(damage, &mut healthy).is_empty());
//! ```

pub mod condition;
pub mod matcher;
pub mod trigger;

pub use condition::{CompareOp, Condition, Threshold};
pub use matcher::{matching_states, parse_rules, AutoStateRule, RuleMatcher};
pub use trigger::{Trigger, TriggerKind};
