//! Applies `<apply auto state>` rules when their triggers fire.

use tracing::debug;

use crate::core::BattlerRef;
use crate::engine::Engine;
use crate::rules::RuleMatcher;

use super::event::BattleEvent;
use super::listener::BattleListener;

/// Adds the states of every matching auto-state rule.
///
/// Rules are read from the battler's own note plus the notes of its
/// current states, so a state can carry rules that chain into others.
#[derive(Clone, Copy, Debug, Default)]
pub struct AutoStateListener;

impl BattleListener for AutoStateListener {
    fn name(&self) -> &'static str {
        "auto_state"
    }

    fn handles(&self, event: &BattleEvent) -> bool {
        !event.triggers().is_empty()
    }

    fn on_event(&self, engine: &mut Engine, who: BattlerRef, event: &BattleEvent) {
        let Some(notes) = engine
            .battler(who)
            .map(|battler| battler.all_notes(&engine.world().database))
        else {
            return;
        };
        let matcher = RuleMatcher::parse(&notes);
        if matcher.is_empty() {
            return;
        }

        for trigger in event.triggers() {
            let states = engine
                .with_context(who, |ctx| matcher.matching_states(trigger, ctx))
                .unwrap_or_default();
            for state in states {
                if engine.add_state(who, state) {
                    debug!(%who, %trigger, %state, "auto state applied");
                }
            }
        }
    }
}
