//! Static record definitions.
//!
//! Definitions are immutable data. Live battlers refer to them by id.

use serde::{Deserialize, Serialize};

use crate::core::{ItemId, SkillId, StateId};
use crate::notetags::tech;

/// A status effect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDef {
    pub id: StateId,
    pub name: String,
    #[serde(default)]
    pub note: String,
}

impl StateDef {
    /// Create a state with an empty note.
    pub fn new(id: StateId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            note: String::new(),
        }
    }

    /// Set the note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}

/// A skill.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillDef {
    pub id: SkillId,
    pub name: String,
    #[serde(default)]
    pub note: String,
}

impl SkillDef {
    /// Create a skill with an empty note.
    pub fn new(id: SkillId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            note: String::new(),
        }
    }

    /// Set the note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Tagged `<tech skill>`?
    #[must_use]
    pub fn is_tech_skill(&self) -> bool {
        tech::is_tech_skill(&self.note)
    }

    /// The skill's `<tech growth: expr>` source, if any.
    #[must_use]
    pub fn tech_growth(&self) -> Option<&str> {
        tech::skill_growth(&self.note)
    }

    /// The skill's `<tech limit: n>`, if any.
    #[must_use]
    pub fn tech_limit(&self) -> Option<i64> {
        tech::skill_limit(&self.note)
    }
}

/// A usable item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub note: String,
}

impl ItemDef {
    /// Create an item with an empty note.
    pub fn new(id: ItemId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            note: String::new(),
        }
    }

    /// Set the note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_tech_tags() {
        let skill = SkillDef::new(SkillId::new(3), "Cross Slash")
            .with_note("<tech skill>\n<tech growth: 2 + level / 10>\n<tech limit: 8>");
        assert!(skill.is_tech_skill());
        assert_eq!(skill.tech_growth(), Some("2 + level / 10"));
        assert_eq!(skill.tech_limit(), Some(8));

        let plain = SkillDef::new(SkillId::new(1), "Attack");
        assert!(!plain.is_tech_skill());
        assert_eq!(plain.tech_growth(), None);
        assert_eq!(plain.tech_limit(), None);
    }

    #[test]
    fn test_serde_note_defaults_empty() {
        let state: StateDef = serde_json::from_str(r#"{"id":2,"name":"Poison"}"#).unwrap();
        assert_eq!(state, StateDef::new(StateId::new(2), "Poison"));
    }
}
