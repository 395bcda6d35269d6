//! Auto-state triggers.
//!
//! A trigger names the battle event that causes a rule to be checked.
//! Some triggers carry an id (`skill use 5`, `state off 1`); for the rest
//! the id is 0. A rule matches a query only when both kind and id agree.
//!
//! ## Trigger Kinds
//!
//! | notetag text   | fired when                         |
//! |----------------|------------------------------------|
//! | `hp change`    | HP changed, checked on refresh     |
//! | `mp change`    | MP changed, checked on refresh     |
//! | `tp change`    | TP changed, checked on refresh     |
//! | `hp damage`    | HP damage taken                    |
//! | `hp recover`   | HP recovered                       |
//! | `mp damage`    | MP damage taken                    |
//! | `mp recover`   | MP recovered                       |
//! | `battle start` | battle starts                      |
//! | `battle end`   | battle ends                        |
//! | `turn start`   | a turn starts                      |
//! | `turn end`     | a turn ends                        |
//! | `action start` | the battler starts an action       |
//! | `action end`   | the battler finishes an action     |
//! | `skill use x`  | the battler starts using skill x   |
//! | `item use x`   | the battler starts using item x    |
//! | `state on x`   | state x is added                   |
//! | `state off x`  | state x is removed                 |

use serde::{Deserialize, Serialize};

use crate::notetags::NoteTagError;

/// Category of battle event a rule listens for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerKind {
    HpChange,
    MpChange,
    TpChange,
    HpDamage,
    HpRecover,
    MpDamage,
    MpRecover,
    BattleStart,
    BattleEnd,
    TurnStart,
    TurnEnd,
    ActionStart,
    ActionEnd,
    SkillUse,
    ItemUse,
    StateOn,
    StateOff,
}

impl TriggerKind {
    /// All trigger kinds.
    pub const ALL: [TriggerKind; 17] = [
        TriggerKind::HpChange,
        TriggerKind::MpChange,
        TriggerKind::TpChange,
        TriggerKind::HpDamage,
        TriggerKind::HpRecover,
        TriggerKind::MpDamage,
        TriggerKind::MpRecover,
        TriggerKind::BattleStart,
        TriggerKind::BattleEnd,
        TriggerKind::TurnStart,
        TriggerKind::TurnEnd,
        TriggerKind::ActionStart,
        TriggerKind::ActionEnd,
        TriggerKind::SkillUse,
        TriggerKind::ItemUse,
        TriggerKind::StateOn,
        TriggerKind::StateOff,
    ];

    /// Notetag spelling of this kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            TriggerKind::HpChange => "hp change",
            TriggerKind::MpChange => "mp change",
            TriggerKind::TpChange => "tp change",
            TriggerKind::HpDamage => "hp damage",
            TriggerKind::HpRecover => "hp recover",
            TriggerKind::MpDamage => "mp damage",
            TriggerKind::MpRecover => "mp recover",
            TriggerKind::BattleStart => "battle start",
            TriggerKind::BattleEnd => "battle end",
            TriggerKind::TurnStart => "turn start",
            TriggerKind::TurnEnd => "turn end",
            TriggerKind::ActionStart => "action start",
            TriggerKind::ActionEnd => "action end",
            TriggerKind::SkillUse => "skill use",
            TriggerKind::ItemUse => "item use",
            TriggerKind::StateOn => "state on",
            TriggerKind::StateOff => "state off",
        }
    }

    /// Look up a kind by its notetag spelling.
    ///
    /// Case and runs of whitespace are ignored: `"HP  Damage"` is
    /// `HpDamage`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name
            .split_whitespace()
            .map(str::to_ascii_lowercase)
            .collect::<Vec<_>>()
            .join(" ");
        Self::ALL.into_iter().find(|kind| kind.name() == normalized)
    }

    /// Does this kind take an id?
    #[must_use]
    pub const fn takes_id(self) -> bool {
        matches!(
            self,
            TriggerKind::SkillUse | TriggerKind::ItemUse | TriggerKind::StateOn | TriggerKind::StateOff
        )
    }
}

impl std::fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A trigger: kind plus optional id (0 when absent).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Trigger {
    pub kind: TriggerKind,
    pub id: u32,
}

impl Trigger {
    /// Trigger without an id.
    #[must_use]
    pub const fn new(kind: TriggerKind) -> Self {
        Self { kind, id: 0 }
    }

    /// Trigger with an id.
    #[must_use]
    pub const fn with_id(kind: TriggerKind, id: u32) -> Self {
        Self { kind, id }
    }

    /// Parse notetag trigger text such as `hp damage` or `skill use 5`.
    pub fn parse(text: &str) -> Result<Self, NoteTagError> {
        let text = text.trim();
        let (words, id) = match text.rfind(|c: char| !c.is_ascii_digit()) {
            Some(pos) if pos + 1 < text.len() => {
                let digits = &text[pos + 1..];
                let id = digits
                    .parse::<u32>()
                    .map_err(|_| NoteTagError::UnknownTrigger(text.to_string()))?;
                (&text[..=pos], id)
            }
            Some(_) => (text, 0),
            None => return Err(NoteTagError::UnknownTrigger(text.to_string())),
        };

        let kind = TriggerKind::from_name(words)
            .ok_or_else(|| NoteTagError::UnknownTrigger(text.to_string()))?;

        Ok(Self { kind, id })
    }
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.id == 0 {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{} {}", self.kind, self.id)
        }
    }
}

impl From<TriggerKind> for Trigger {
    fn from(kind: TriggerKind) -> Self {
        Self::new(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        assert_eq!(Trigger::parse("hp damage"), Ok(Trigger::new(TriggerKind::HpDamage)));
        assert_eq!(Trigger::parse("  Battle   Start "), Ok(Trigger::new(TriggerKind::BattleStart)));
        assert_eq!(Trigger::parse("TURN END"), Ok(Trigger::new(TriggerKind::TurnEnd)));
    }

    #[test]
    fn test_parse_with_id() {
        assert_eq!(
            Trigger::parse("skill use 5"),
            Ok(Trigger::with_id(TriggerKind::SkillUse, 5))
        );
        assert_eq!(
            Trigger::parse("state off 1"),
            Ok(Trigger::with_id(TriggerKind::StateOff, 1))
        );
        assert_eq!(
            Trigger::parse("item use12"),
            Ok(Trigger::with_id(TriggerKind::ItemUse, 12))
        );
    }

    #[test]
    fn test_parse_unknown() {
        assert!(matches!(Trigger::parse("hp explode"), Err(NoteTagError::UnknownTrigger(_))));
        assert!(matches!(Trigger::parse("42"), Err(NoteTagError::UnknownTrigger(_))));
        assert!(matches!(Trigger::parse(""), Err(NoteTagError::UnknownTrigger(_))));
    }

    #[test]
    fn test_all_kinds_round_trip_through_names() {
        for kind in TriggerKind::ALL {
            assert_eq!(TriggerKind::from_name(kind.name()), Some(kind));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Trigger::new(TriggerKind::HpDamage)), "hp damage");
        assert_eq!(format!("{}", Trigger::with_id(TriggerKind::StateOn, 3)), "state on 3");
    }

    #[test]
    fn test_takes_id() {
        assert!(TriggerKind::SkillUse.takes_id());
        assert!(!TriggerKind::TurnEnd.takes_id());
    }

    #[test]
    fn test_id_must_match() {
        assert_ne!(
            Trigger::with_id(TriggerKind::SkillUse, 5),
            Trigger::with_id(TriggerKind::SkillUse, 6)
        );
        assert_ne!(
            Trigger::new(TriggerKind::SkillUse),
            Trigger::with_id(TriggerKind::SkillUse, 6)
        );
    }
}
