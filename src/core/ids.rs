//! Typed identifiers for database records and battlers.
//!
//! Every kind of record has its own newtype so a skill id can never be
//! passed where a state id is expected.
//!
//! ## Usage
//!
//! ```
//! use battler_rules::core::{ActorId, BattlerRef, StateId};
//!
//! let poison = StateId::new(2);
//! assert_eq!(poison.raw(), 2);
//! assert_eq!(format!("{}", poison), "State(2)");
//!
//! let hero = BattlerRef::Actor(ActorId::new(1));
//! assert!(hero.is_actor());
//! ```

use serde::{Deserialize, Serialize};

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            /// Create a new ID.
            #[must_use]
            pub const fn new(id: u32) -> Self {
                Self(id)
            }

            /// Get the raw ID value.
            #[must_use]
            pub const fn raw(self) -> u32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($label, "({})"), self.0)
            }
        }

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }
    };
}

record_id!(
    /// Actor (party member) identifier.
    ActorId,
    "Actor"
);

record_id!(
    /// State (status effect) identifier.
    StateId,
    "State"
);

record_id!(
    /// Skill identifier.
    SkillId,
    "Skill"
);

record_id!(
    /// Item identifier.
    ItemId,
    "Item"
);

record_id!(
    /// Game switch identifier.
    SwitchId,
    "Switch"
);

record_id!(
    /// Game variable identifier.
    VariableId,
    "Variable"
);

/// Reference to a battler taking part in the game.
///
/// Actors are addressed by their database id, enemies by their index in
/// the current troop. A reference that points at nothing is not an error:
/// operations on it do nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattlerRef {
    /// A party member.
    Actor(ActorId),
    /// An enemy by troop index.
    Enemy(usize),
}

impl BattlerRef {
    /// Check if this refers to an actor.
    #[must_use]
    pub const fn is_actor(self) -> bool {
        matches!(self, BattlerRef::Actor(_))
    }

    /// Get the actor id, if this refers to an actor.
    #[must_use]
    pub const fn actor_id(self) -> Option<ActorId> {
        match self {
            BattlerRef::Actor(id) => Some(id),
            BattlerRef::Enemy(_) => None,
        }
    }
}

impl std::fmt::Display for BattlerRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BattlerRef::Actor(id) => write!(f, "{}", id),
            BattlerRef::Enemy(index) => write!(f, "Enemy[{}]", index),
        }
    }
}

impl From<ActorId> for BattlerRef {
    fn from(id: ActorId) -> Self {
        BattlerRef::Actor(id)
    }
}
