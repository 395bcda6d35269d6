//! Game world: database, switches, variables, battlers and screens.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::battler::Battler;
use crate::core::{ActorId, BattlerRef, GameRng, SwitchId, VariableId};
use crate::data::Database;
use crate::ui::{BattleWeather, Screen};

/// Game switches and variables.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameFlags {
    switches: FxHashMap<SwitchId, bool>,
    variables: FxHashMap<VariableId, i64>,
}

impl GameFlags {
    /// Switch value; unset switches are OFF.
    #[must_use]
    pub fn switch(&self, id: SwitchId) -> bool {
        self.switches.get(&id).copied().unwrap_or(false)
    }

    /// Set a switch.
    pub fn set_switch(&mut self, id: SwitchId, value: bool) {
        self.switches.insert(id, value);
    }

    /// Variable value; unset variables are 0.
    #[must_use]
    pub fn variable(&self, id: VariableId) -> i64 {
        self.variables.get(&id).copied().unwrap_or(0)
    }

    /// Set a variable.
    pub fn set_variable(&mut self, id: VariableId, value: i64) {
        self.variables.insert(id, value);
    }
}

/// Everything the rules read or change.
#[derive(Clone, Debug, Default)]
pub struct World {
    pub database: Database,
    pub flags: GameFlags,
    actors: FxHashMap<ActorId, Battler>,
    party: Vec<ActorId>,
    troop: Vec<Battler>,
    pub map_screen: Screen,
    pub troop_screen: Screen,
    pub battle_weather: Option<BattleWeather>,
    pub rng: GameRng,
    pub in_battle: bool,
    pub can_escape: bool,
    pub frame_count: u64,
}

/// Borrowed view of the world around one battler.
pub(crate) struct Surroundings<'a> {
    pub database: &'a Database,
    pub flags: &'a GameFlags,
    pub rng: &'a mut GameRng,
}

impl World {
    /// World with the given database and RNG seed.
    #[must_use]
    pub fn new(database: Database, seed: u64) -> Self {
        Self {
            database,
            rng: GameRng::new(seed),
            can_escape: true,
            ..Self::default()
        }
    }

    // === Switches and variables ===

    /// Switch value.
    #[must_use]
    pub fn switch(&self, id: SwitchId) -> bool {
        self.flags.switch(id)
    }

    /// Set a switch.
    pub fn set_switch(&mut self, id: SwitchId, value: bool) {
        self.flags.set_switch(id, value);
    }

    /// Variable value.
    #[must_use]
    pub fn variable(&self, id: VariableId) -> i64 {
        self.flags.variable(id)
    }

    /// Set a variable.
    pub fn set_variable(&mut self, id: VariableId, value: i64) {
        self.flags.set_variable(id, value);
    }

    // === Battlers ===

    /// Register an actor. It is not in the party until [`add_to_party`](Self::add_to_party).
    pub fn insert_actor(&mut self, id: ActorId, actor: Battler) -> Option<Battler> {
        self.actors.insert(id, actor)
    }

    /// Add a registered actor to the party. Unknown or present actors are ignored.
    pub fn add_to_party(&mut self, id: ActorId) {
        if self.actors.contains_key(&id) && !self.party.contains(&id) {
            self.party.push(id);
        }
    }

    /// Remove an actor from the party.
    pub fn remove_from_party(&mut self, id: ActorId) {
        self.party.retain(|&member| member != id);
    }

    /// Party members in order.
    #[must_use]
    pub fn party(&self) -> &[ActorId] {
        &self.party
    }

    /// Add an enemy to the troop, returning its reference.
    pub fn add_enemy(&mut self, enemy: Battler) -> BattlerRef {
        self.troop.push(enemy);
        BattlerRef::Enemy(self.troop.len() - 1)
    }

    /// Remove every enemy.
    pub fn clear_troop(&mut self) {
        self.troop.clear();
    }

    /// Party members then troop members.
    #[must_use]
    pub fn battle_members(&self) -> Vec<BattlerRef> {
        self.party
            .iter()
            .map(|&id| BattlerRef::Actor(id))
            .chain((0..self.troop.len()).map(BattlerRef::Enemy))
            .collect()
    }

    /// Look up a battler.
    #[must_use]
    pub fn battler(&self, who: BattlerRef) -> Option<&Battler> {
        match who {
            BattlerRef::Actor(id) => self.actors.get(&id),
            BattlerRef::Enemy(index) => self.troop.get(index),
        }
    }

    /// Look up a battler mutably.
    pub fn battler_mut(&mut self, who: BattlerRef) -> Option<&mut Battler> {
        match who {
            BattlerRef::Actor(id) => self.actors.get_mut(&id),
            BattlerRef::Enemy(index) => self.troop.get_mut(index),
        }
    }

    /// Does the reference name a battler?
    #[must_use]
    pub fn contains(&self, who: BattlerRef) -> bool {
        self.battler(who).is_some()
    }

    /// A battler together with the rest of the world it reads.
    pub(crate) fn split(&mut self, who: BattlerRef) -> Option<(&mut Battler, Surroundings<'_>)> {
        let battler = match who {
            BattlerRef::Actor(id) => self.actors.get_mut(&id)?,
            BattlerRef::Enemy(index) => self.troop.get_mut(index)?,
        };
        Some((
            battler,
            Surroundings {
                database: &self.database,
                flags: &self.flags,
                rng: &mut self.rng,
            },
        ))
    }

    // === Screens ===

    /// The screen weather commands affect: troop in battle, map otherwise.
    pub fn active_screen(&mut self) -> &mut Screen {
        if self.in_battle {
            &mut self.troop_screen
        } else {
            &mut self.map_screen
        }
    }

    /// Advance screens and the play time clock by one frame.
    ///
    /// During battle the battle weather follows the troop screen every
    /// frame, so weather commands issued in battle show immediately.
    pub fn update(&mut self) {
        self.frame_count += 1;
        self.map_screen.update();
        self.troop_screen.update();
        if let Some(weather) = self.battle_weather.as_mut() {
            weather.sync(&self.troop_screen);
        }
    }
}
