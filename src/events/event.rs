//! Battle events.
//!
//! Events are what the host tells the engine happened to a battler. Each
//! event maps to zero or more auto-state [`Trigger`]s.

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use crate::core::{ItemId, SkillId, StateId};
use crate::rules::{Trigger, TriggerKind};

/// The skill or item an action uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionItem {
    Skill(SkillId),
    Item(ItemId),
}

impl std::fmt::Display for ActionItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionItem::Skill(id) => write!(f, "{}", id),
            ActionItem::Item(id) => write!(f, "{}", id),
        }
    }
}

/// Something that happened to one battler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleEvent {
    // === Gauges ===
    HpChanged,
    MpChanged,
    TpChanged,
    HpDamaged,
    HpRecovered,
    MpDamaged,
    MpRecovered,

    // === Battle flow ===
    BattleStarted,
    BattleEnded,
    TurnStarted,
    TurnEnded,
    ActionStarted(Option<ActionItem>),
    ActionEnded,

    // === States ===
    /// Raised before the state is added.
    StateAdded(StateId),
    /// Raised before the state is removed.
    StateRemoved(StateId),

    // === Bookkeeping ===
    Refreshed,
    RecoveredAll,
    /// A skill or item hit the battler.
    ItemApplied(ActionItem),
}

fn simple(kind: TriggerKind) -> SmallVec<[Trigger; 2]> {
    smallvec![Trigger::new(kind)]
}

impl BattleEvent {
    /// Auto-state triggers fired by this event.
    #[must_use]
    pub fn triggers(&self) -> SmallVec<[Trigger; 2]> {
        match *self {
            BattleEvent::HpChanged => simple(TriggerKind::HpChange),
            BattleEvent::MpChanged => simple(TriggerKind::MpChange),
            BattleEvent::TpChanged => simple(TriggerKind::TpChange),
            BattleEvent::HpDamaged => simple(TriggerKind::HpDamage),
            BattleEvent::HpRecovered => simple(TriggerKind::HpRecover),
            BattleEvent::MpDamaged => simple(TriggerKind::MpDamage),
            BattleEvent::MpRecovered => simple(TriggerKind::MpRecover),
            BattleEvent::BattleStarted => simple(TriggerKind::BattleStart),
            BattleEvent::BattleEnded => simple(TriggerKind::BattleEnd),
            BattleEvent::TurnStarted => simple(TriggerKind::TurnStart),
            BattleEvent::TurnEnded => simple(TriggerKind::TurnEnd),
            BattleEvent::ActionEnded => simple(TriggerKind::ActionEnd),

            BattleEvent::ActionStarted(item) => {
                let mut triggers = simple(TriggerKind::ActionStart);
                match item {
                    Some(ActionItem::Skill(id)) => {
                        triggers.push(Trigger::with_id(TriggerKind::SkillUse, id.raw()));
                    }
                    Some(ActionItem::Item(id)) => {
                        triggers.push(Trigger::with_id(TriggerKind::ItemUse, id.raw()));
                    }
                    None => {}
                }
                triggers
            }

            BattleEvent::StateAdded(id) => smallvec![Trigger::with_id(TriggerKind::StateOn, id.raw())],
            BattleEvent::StateRemoved(id) => {
                smallvec![Trigger::with_id(TriggerKind::StateOff, id.raw())]
            }

            BattleEvent::Refreshed | BattleEvent::RecoveredAll | BattleEvent::ItemApplied(_) => {
                SmallVec::new()
            }
        }
    }
}
