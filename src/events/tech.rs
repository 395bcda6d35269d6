//! Keeps tech points in step with the battler.

use crate::core::BattlerRef;
use crate::engine::Engine;

use super::event::{ActionItem, BattleEvent};
use super::listener::BattleListener;

/// Refreshes tech maxima, restores points on full recovery, and applies
/// the tech tags of skills and items that hit the battler.
#[derive(Clone, Copy, Debug, Default)]
pub struct TechPointListener;

impl BattleListener for TechPointListener {
    fn name(&self) -> &'static str {
        "tech_points"
    }

    fn priority(&self) -> i32 {
        -10
    }

    fn handles(&self, event: &BattleEvent) -> bool {
        matches!(
            event,
            BattleEvent::Refreshed | BattleEvent::RecoveredAll | BattleEvent::ItemApplied(_)
        )
    }

    fn on_event(&self, engine: &mut Engine, who: BattlerRef, event: &BattleEvent) {
        let Some(skills) = engine.battler(who).map(|b| b.skills().to_vec()) else {
            return;
        };

        match *event {
            BattleEvent::Refreshed => {
                engine.with_tech(who, |tech, env, ctx| tech.refresh_all(&skills, env, ctx));
            }
            BattleEvent::RecoveredAll => {
                engine.with_tech(who, |tech, env, ctx| tech.recover_all(&skills, env, ctx));
            }
            BattleEvent::ItemApplied(item) => {
                let database = &engine.world().database;
                let note = match item {
                    ActionItem::Skill(id) => database.skill(id).map(|s| s.note.clone()),
                    ActionItem::Item(id) => database.item(id).map(|i| i.note.clone()),
                };
                if let Some(note) = note {
                    engine.with_tech(who, |tech, env, ctx| tech.apply_item_effects(&note, env, ctx));
                }
            }
            _ => {}
        }
    }
}
