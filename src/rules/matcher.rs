//! Auto-state rule matching.
//!
//! Given a battler's notes, a trigger and the battler itself, work out
//! which states should be applied. The matcher never fails: malformed
//! blocks and conditions are logged and treated as "not met".

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::core::StateId;
use crate::expr::ExprContext;
use crate::notetags;

use super::condition::Condition;
use super::trigger::Trigger;

/// One parsed `<apply auto state>` block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoStateRule {
    /// When the rule is checked.
    pub trigger: Trigger,

    /// States applied when every condition holds, in listed order.
    pub states: SmallVec<[StateId; 4]>,

    /// Conditions, ANDed in order. Empty means always.
    pub conditions: Vec<Condition>,
}

impl AutoStateRule {
    /// Check every condition in order, stopping at the first one not met.
    ///
    /// Evaluation errors count as "not met".
    pub fn conditions_met(&self, ctx: &mut dyn ExprContext) -> bool {
        for condition in &self.conditions {
            match condition.evaluate(ctx) {
                Ok(true) => {}
                Ok(false) => return false,
                Err(err) => {
                    warn!(trigger = %self.trigger, condition = %condition, error = %err,
                        "auto state condition failed to evaluate");
                    return false;
                }
            }
        }
        true
    }
}

/// Parse every well-formed auto-state block in `notes`.
///
/// Malformed blocks and unparseable conditions are reported at `warn`.
/// A block with an invalid condition is kept; that condition is never met.
pub fn parse_rules(notes: &str) -> Vec<AutoStateRule> {
    notetags::parse_blocks(notes)
        .into_iter()
        .filter_map(|block| match block {
            Ok(rule) => {
                for condition in rule.conditions.iter().filter(|c| c.is_invalid()) {
                    warn!(trigger = %rule.trigger, condition = %condition,
                        "unparseable auto state condition");
                }
                Some(rule)
            }
            Err(err) => {
                warn!(error = %err, "skipping malformed auto state block");
                None
            }
        })
        .collect()
}

/// The auto-state rules of one set of notes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleMatcher {
    rules: Vec<AutoStateRule>,
}

impl RuleMatcher {
    /// Build a matcher from already parsed rules.
    #[must_use]
    pub fn new(rules: Vec<AutoStateRule>) -> Self {
        Self { rules }
    }

    /// Parse `notes` into a matcher.
    #[must_use]
    pub fn parse(notes: &str) -> Self {
        Self::new(parse_rules(notes))
    }

    /// All rules.
    #[must_use]
    pub fn rules(&self) -> &[AutoStateRule] {
        &self.rules
    }

    /// Rules listening for `trigger`.
    pub fn rules_for(&self, trigger: Trigger) -> impl Iterator<Item = &AutoStateRule> {
        self.rules.iter().filter(move |rule| rule.trigger == trigger)
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Are there no rules?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// States to apply for `trigger`, in block order, without duplicates.
    pub fn matching_states(&self, trigger: Trigger, ctx: &mut dyn ExprContext) -> Vec<StateId> {
        let mut states = Vec::new();
        for rule in self.rules_for(trigger) {
            if !rule.conditions_met(ctx) {
                continue;
            }
            debug!(trigger = %trigger, states = ?rule.states, "auto state rule fired");
            for &state in &rule.states {
                if !states.contains(&state) {
                    states.push(state);
                }
            }
        }
        states
    }
}

/// Parse `notes` and return the states to apply for `trigger`.
pub fn matching_states(notes: &str, trigger: Trigger, ctx: &mut dyn ExprContext) -> Vec<StateId> {
    RuleMatcher::parse(notes).matching_states(trigger, ctx)
}
