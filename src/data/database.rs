//! Database of static definitions.

use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{ConfigError, ItemId, SkillId, StateId};

use super::definition::{ItemDef, SkillDef, StateDef};

/// All state, skill and item definitions of a game.
///
/// ## Example
///
/// ```
/// use battler_rules::core::StateId;
/// use battler_rules::data::{Database, StateDef};
///
/// let mut db = Database::new();
/// db.register_state(StateDef::new(StateId::new(2), "Poison"));
///
/// assert_eq!(db.state(StateId::new(2)).unwrap().name, "Poison");
/// assert!(db.state(StateId::new(3)).is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Database {
    states: FxHashMap<StateId, StateDef>,
    skills: FxHashMap<SkillId, SkillDef>,
    items: FxHashMap<ItemId, ItemDef>,
}

/// On-disk form of a [`Database`].
///
/// ```toml
/// [[states]]
/// id = 14
/// name = "Berserk"
/// note = "..."
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseFile {
    pub states: Vec<StateDef>,
    pub skills: Vec<SkillDef>,
    pub items: Vec<ItemDef>,
}

impl Database {
    /// Create an empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let file: DatabaseFile = toml::from_str(text)?;
        Ok(Self::from(file))
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Register a state, returning any definition it replaced.
    pub fn register_state(&mut self, state: StateDef) -> Option<StateDef> {
        self.states.insert(state.id, state)
    }

    /// Register a skill, returning any definition it replaced.
    pub fn register_skill(&mut self, skill: SkillDef) -> Option<SkillDef> {
        self.skills.insert(skill.id, skill)
    }

    /// Register an item, returning any definition it replaced.
    pub fn register_item(&mut self, item: ItemDef) -> Option<ItemDef> {
        self.items.insert(item.id, item)
    }

    /// Builder form of `register_state`.
    #[must_use]
    pub fn with_state(mut self, state: StateDef) -> Self {
        self.register_state(state);
        self
    }

    /// Builder form of `register_skill`.
    #[must_use]
    pub fn with_skill(mut self, skill: SkillDef) -> Self {
        self.register_skill(skill);
        self
    }

    /// Builder form of `register_item`.
    #[must_use]
    pub fn with_item(mut self, item: ItemDef) -> Self {
        self.register_item(item);
        self
    }

    /// Look up a state.
    #[must_use]
    pub fn state(&self, id: StateId) -> Option<&StateDef> {
        self.states.get(&id)
    }

    /// Look up a skill.
    #[must_use]
    pub fn skill(&self, id: SkillId) -> Option<&SkillDef> {
        self.skills.get(&id)
    }

    /// Look up an item.
    #[must_use]
    pub fn item(&self, id: ItemId) -> Option<&ItemDef> {
        self.items.get(&id)
    }

    /// Iterate over states in id order.
    pub fn states(&self) -> impl Iterator<Item = &StateDef> {
        sorted_by_id(&self.states)
    }

    /// Iterate over skills in id order.
    pub fn skills(&self) -> impl Iterator<Item = &SkillDef> {
        sorted_by_id(&self.skills)
    }

    /// Iterate over items in id order.
    pub fn items(&self) -> impl Iterator<Item = &ItemDef> {
        sorted_by_id(&self.items)
    }
}

fn sorted_by_id<K: Ord, V>(map: &FxHashMap<K, V>) -> impl Iterator<Item = &V> {
    let mut entries: Vec<(&K, &V)> = map.iter().collect();
    entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
    entries.into_iter().map(|(_, def)| def)
}

impl From<DatabaseFile> for Database {
    fn from(file: DatabaseFile) -> Self {
        let mut db = Database::new();
        for state in file.states {
            db.register_state(state);
        }
        for skill in file.skills {
            db.register_skill(skill);
        }
        for item in file.items {
            db.register_item(item);
        }
        db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let db = Database::new()
            .with_state(StateDef::new(StateId::new(1), "Knockout"))
            .with_skill(SkillDef::new(SkillId::new(3), "Cross Slash").with_note("<tech skill>"))
            .with_item(ItemDef::new(ItemId::new(1), "Potion"));

        assert_eq!(db.state(StateId::new(1)).unwrap().name, "Knockout");
        assert!(db.skill(SkillId::new(3)).unwrap().is_tech_skill());
        assert_eq!(db.item(ItemId::new(1)).unwrap().name, "Potion");
        assert!(db.skill(SkillId::new(4)).is_none());
    }

    #[test]
    fn test_register_replaces() {
        let mut db = Database::new();
        assert!(db.register_state(StateDef::new(StateId::new(1), "Old")).is_none());
        let old = db.register_state(StateDef::new(StateId::new(1), "New"));
        assert_eq!(old.unwrap().name, "Old");
        assert_eq!(db.state(StateId::new(1)).unwrap().name, "New");
        assert_eq!(db.states().count(), 1);
    }

    #[test]
    fn test_iteration_in_id_order() {
        let mut db = Database::new();
        for raw in [40, 3, 17, 1, 25, 9, 12, 30] {
            db.register_state(StateDef::new(StateId::new(raw), "State"));
            db.register_skill(SkillDef::new(SkillId::new(raw), "Skill"));
            db.register_item(ItemDef::new(ItemId::new(raw), "Item"));
        }

        let expected = [1, 3, 9, 12, 17, 25, 30, 40];
        let states: Vec<u32> = db.states().map(|s| s.id.raw()).collect();
        let skills: Vec<u32> = db.skills().map(|s| s.id.raw()).collect();
        let items: Vec<u32> = db.items().map(|i| i.id.raw()).collect();
        assert_eq!(states, expected);
        assert_eq!(skills, expected);
        assert_eq!(items, expected);
    }

    #[test]
    fn test_from_toml() {
        let db = Database::from_toml_str(
            r#"
            [[states]]
            id = 14
            name = "Berserk"

            [[skills]]
            id = 3
            name = "Cross Slash"
            note = "<tech skill>"
            "#,
        )
        .unwrap();

        assert_eq!(db.state(StateId::new(14)).unwrap().name, "Berserk");
        assert!(db.skill(SkillId::new(3)).unwrap().is_tech_skill());
        assert_eq!(db.items().count(), 0);
    }

    #[test]
    fn test_from_toml_rejects_garbage() {
        assert!(matches!(
            Database::from_toml_str("states = 3"),
            Err(ConfigError::Toml(_))
        ));
    }
}
