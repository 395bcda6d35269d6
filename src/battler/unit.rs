//! Live battler state.
//!
//! A `Battler` holds just enough of an actor or enemy to run the battle
//! rules: parameters, the three gauges, applied states, known skills,
//! notes and tech points.
//!
//! Gauge setters clamp into `[0, max]` and raise a change flag only when
//! the stored value actually changes. The engine reads the flags on
//! refresh to fire `hp change`, `mp change` and `tp change` triggers.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{SkillId, StateId};
use crate::data::Database;
use crate::tech::TechTracker;

use super::params::{Gauge, Param, Params};

/// Actor or enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattlerKind {
    Actor,
    Enemy,
}

/// Pending gauge-change flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GaugeFlags {
    pub hp: bool,
    pub mp: bool,
    pub tp: bool,
}

impl GaugeFlags {
    /// Is any flag raised?
    #[must_use]
    pub fn any(self) -> bool {
        self.hp || self.mp || self.tp
    }

    fn raise(&mut self, gauge: Gauge) {
        match gauge {
            Gauge::Hp => self.hp = true,
            Gauge::Mp => self.mp = true,
            Gauge::Tp => self.tp = true,
        }
    }
}

/// A battler.
///
/// ## Example
///
/// ```
/// use battler_rules::battler::{Battler, Gauge, Params};
///
/// let mut hero = Battler::actor("Eric", Params::new(100, 20));
/// assert_eq!(hero.hp(), 100);
///
/// assert!(!hero.set_hp(250));
/// assert_eq!(hero.hp(), 100);
/// assert!(!hero.flags().hp);
///
/// assert!(hero.set_hp(40));
/// assert!(hero.flags().hp);
/// assert_eq!(hero.stat("hp"), Some(40));
/// assert_eq!(hero.rate(Gauge::Hp), 0.4);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Battler {
    pub name: String,
    pub kind: BattlerKind,
    params: Params,
    hp: i64,
    mp: i64,
    tp: i64,
    custom: FxHashMap<String, i64>,
    states: Vec<StateId>,
    state_resists: Vec<StateId>,
    skills: Vec<SkillId>,
    notes: String,
    flags: GaugeFlags,
    /// Per-skill tech points.
    pub tech: TechTracker,
}

impl Battler {
    /// Create a battler at full HP and MP with no TP.
    pub fn new(name: impl Into<String>, kind: BattlerKind, params: Params) -> Self {
        let hp = params.get(Param::MaxHp);
        let mp = params.get(Param::MaxMp);
        Self {
            name: name.into(),
            kind,
            params,
            hp,
            mp,
            tp: 0,
            custom: FxHashMap::default(),
            states: Vec::new(),
            state_resists: Vec::new(),
            skills: Vec::new(),
            notes: String::new(),
            flags: GaugeFlags::default(),
            tech: TechTracker::new(),
        }
    }

    /// Create an actor.
    pub fn actor(name: impl Into<String>, params: Params) -> Self {
        Self::new(name, BattlerKind::Actor, params)
    }

    /// Create an enemy.
    pub fn enemy(name: impl Into<String>, params: Params) -> Self {
        Self::new(name, BattlerKind::Enemy, params)
    }

    /// Append a note line (actor, class, equipment or enemy note).
    #[must_use]
    pub fn with_note(mut self, note: impl AsRef<str>) -> Self {
        self.add_note(note.as_ref());
        self
    }

    /// Learn a skill.
    #[must_use]
    pub fn with_skill(mut self, skill: SkillId) -> Self {
        self.learn_skill(skill);
        self
    }

    /// Resist a state.
    #[must_use]
    pub fn with_resist(mut self, state: StateId) -> Self {
        if !self.state_resists.contains(&state) {
            self.state_resists.push(state);
        }
        self
    }

    /// Set a custom stat.
    #[must_use]
    pub fn with_custom(mut self, name: impl Into<String>, value: i64) -> Self {
        self.custom.insert(name.into(), value);
        self
    }

    /// Start with a state applied, without firing anything.
    #[must_use]
    pub fn with_state(mut self, state: StateId) -> Self {
        self.insert_state(state);
        self
    }

    /// Start with the given gauge value, without raising a flag.
    #[must_use]
    pub fn with_gauge(mut self, gauge: Gauge, value: i64) -> Self {
        self.set_gauge(gauge, value);
        self.flags = GaugeFlags::default();
        self
    }

    // === Parameters ===

    /// Parameter value.
    #[must_use]
    pub fn param(&self, param: Param) -> i64 {
        self.params.get(param)
    }

    /// Change a parameter. Gauges are clamped to the new maxima.
    pub fn set_param(&mut self, param: Param, value: i64) {
        let value = match param {
            Param::MaxHp => value.max(1),
            Param::MaxMp | Param::MaxTp => value.max(0),
            _ => value,
        };
        self.params.set(param, value);
        for gauge in [Gauge::Hp, Gauge::Mp, Gauge::Tp] {
            let current = self.gauge(gauge);
            self.set_gauge(gauge, current);
        }
    }

    /// Level.
    #[must_use]
    pub fn level(&self) -> i64 {
        self.params.get(Param::Level)
    }

    /// Custom stat.
    #[must_use]
    pub fn custom(&self, name: &str) -> Option<i64> {
        self.custom.get(name).copied()
    }

    /// Set a custom stat.
    pub fn set_custom(&mut self, name: impl Into<String>, value: i64) {
        self.custom.insert(name.into(), value);
    }

    /// Resolve a stat by name: gauges, parameters, then custom stats.
    #[must_use]
    pub fn stat(&self, name: &str) -> Option<i64> {
        if let Some(gauge) = Gauge::from_name(name) {
            return Some(self.gauge(gauge));
        }
        if let Some(param) = Param::from_name(name) {
            return Some(self.param(param));
        }
        self.custom(name)
    }

    // === Gauges ===

    /// Current HP.
    #[must_use]
    pub fn hp(&self) -> i64 {
        self.hp
    }

    /// Current MP.
    #[must_use]
    pub fn mp(&self) -> i64 {
        self.mp
    }

    /// Current TP.
    #[must_use]
    pub fn tp(&self) -> i64 {
        self.tp
    }

    /// Current gauge value.
    #[must_use]
    pub fn gauge(&self, gauge: Gauge) -> i64 {
        match gauge {
            Gauge::Hp => self.hp,
            Gauge::Mp => self.mp,
            Gauge::Tp => self.tp,
        }
    }

    /// Gauge maximum.
    #[must_use]
    pub fn gauge_max(&self, gauge: Gauge) -> i64 {
        self.params.get(gauge.max_param())
    }

    /// Set a gauge, clamped into `[0, max]`.
    ///
    /// Returns whether the stored value changed; only then is the
    /// gauge's change flag raised.
    pub fn set_gauge(&mut self, gauge: Gauge, value: i64) -> bool {
        let clamped = value.clamp(0, self.gauge_max(gauge).max(0));
        let slot = match gauge {
            Gauge::Hp => &mut self.hp,
            Gauge::Mp => &mut self.mp,
            Gauge::Tp => &mut self.tp,
        };
        if *slot == clamped {
            return false;
        }
        *slot = clamped;
        self.flags.raise(gauge);
        true
    }

    /// Set HP. See [`set_gauge`](Self::set_gauge).
    pub fn set_hp(&mut self, value: i64) -> bool {
        self.set_gauge(Gauge::Hp, value)
    }

    /// Set MP. See [`set_gauge`](Self::set_gauge).
    pub fn set_mp(&mut self, value: i64) -> bool {
        self.set_gauge(Gauge::Mp, value)
    }

    /// Set TP. See [`set_gauge`](Self::set_gauge).
    pub fn set_tp(&mut self, value: i64) -> bool {
        self.set_gauge(Gauge::Tp, value)
    }

    /// Current over maximum, `0.0` when the maximum is zero.
    #[must_use]
    pub fn rate(&self, gauge: Gauge) -> f64 {
        let max = self.gauge_max(gauge);
        if max <= 0 {
            0.0
        } else {
            self.gauge(gauge) as f64 / max as f64
        }
    }

    /// Pending change flags.
    #[must_use]
    pub fn flags(&self) -> GaugeFlags {
        self.flags
    }

    /// Return and clear all change flags.
    pub fn take_flags(&mut self) -> GaugeFlags {
        std::mem::take(&mut self.flags)
    }

    /// Restore HP and MP to maximum and clear every state.
    ///
    /// States are dropped without firing `state off`.
    pub fn recover_all(&mut self) {
        self.states.clear();
        self.set_hp(self.gauge_max(Gauge::Hp));
        self.set_mp(self.gauge_max(Gauge::Mp));
    }

    // === States ===

    /// Applied states, in the order they were added.
    #[must_use]
    pub fn states(&self) -> &[StateId] {
        &self.states
    }

    /// Is the state applied?
    #[must_use]
    pub fn has_state(&self, state: StateId) -> bool {
        self.states.contains(&state)
    }

    /// Does the battler resist the state?
    #[must_use]
    pub fn resists(&self, state: StateId) -> bool {
        self.state_resists.contains(&state)
    }

    /// The state exists and is not resisted.
    #[must_use]
    pub fn state_addable(&self, state: StateId, database: &Database) -> bool {
        database.state(state).is_some() && !self.resists(state)
    }

    /// Add a state directly. Returns false if already present.
    pub(crate) fn insert_state(&mut self, state: StateId) -> bool {
        if self.has_state(state) {
            return false;
        }
        self.states.push(state);
        true
    }

    /// Remove a state directly. Returns false if absent.
    pub(crate) fn erase_state(&mut self, state: StateId) -> bool {
        let before = self.states.len();
        self.states.retain(|&s| s != state);
        self.states.len() != before
    }

    // === Skills and notes ===

    /// Known skills.
    #[must_use]
    pub fn skills(&self) -> &[SkillId] {
        &self.skills
    }

    /// Learn a skill.
    pub fn learn_skill(&mut self, skill: SkillId) {
        if !self.skills.contains(&skill) {
            self.skills.push(skill);
        }
    }

    /// Own notes, without state notes.
    #[must_use]
    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Append a note.
    pub fn add_note(&mut self, note: &str) {
        if !self.notes.is_empty() {
            self.notes.push('\n');
        }
        self.notes.push_str(note);
    }

    /// Own notes followed by the note of every applied state.
    #[must_use]
    pub fn all_notes(&self, database: &Database) -> String {
        let mut notes = self.notes.clone();
        for state in self.states.iter().filter_map(|&id| database.state(id)) {
            notes.push('\n');
            notes.push_str(&state.note);
        }
        notes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::StateDef;

    fn hero() -> Battler {
        Battler::actor("Eric", Params::new(100, 50).with(Param::MaxTp, 100))
    }

    #[test]
    fn test_starts_full() {
        let b = hero();
        assert_eq!(b.hp(), 100);
        assert_eq!(b.mp(), 50);
        assert_eq!(b.tp(), 0);
        assert!(!b.flags().any());
    }

    #[test]
    fn test_set_gauge_clamps_and_flags() {
        let mut b = hero();
        assert!(b.set_hp(-20));
        assert_eq!(b.hp(), 0);
        assert!(b.flags().hp);
        assert!(!b.flags().mp);

        assert!(b.set_mp(999));
        assert_eq!(b.mp(), 50);
        assert!(!b.flags().mp); // already full

        let flags = b.take_flags();
        assert!(flags.hp);
        assert!(!b.flags().any());
    }

    #[test]
    fn test_unchanged_value_does_not_flag() {
        let mut b = hero();
        assert!(!b.set_hp(100));
        assert!(!b.flags().hp);
        assert!(b.set_tp(30));
        assert!(!b.set_tp(30));
        assert!(b.flags().tp);
    }

    #[test]
    fn test_rate() {
        let b = hero().with_gauge(Gauge::Hp, 25);
        assert_eq!(b.rate(Gauge::Hp), 0.25);
        assert!(!b.flags().hp);

        let mute = Battler::enemy("Slime", Params::new(10, 0));
        assert_eq!(mute.rate(Gauge::Mp), 0.0);
    }

    #[test]
    fn test_stat_lookup() {
        let b = hero().with_custom("fury", 7).with_gauge(Gauge::Hp, 60);
        assert_eq!(b.stat("hp"), Some(60));
        assert_eq!(b.stat("MHP"), Some(100));
        assert_eq!(b.stat("maxmp"), Some(50));
        assert_eq!(b.stat("level"), Some(1));
        assert_eq!(b.stat("fury"), Some(7));
        assert_eq!(b.stat("charisma"), None);
    }

    #[test]
    fn test_set_param_reclamps() {
        let mut b = hero();
        b.set_param(Param::MaxHp, 40);
        assert_eq!(b.hp(), 40);
        assert!(b.flags().hp);
    }

    #[test]
    fn test_states_and_notes() {
        let db = Database::new()
            .with_state(StateDef::new(StateId::new(2), "Poison").with_note("<poison note>"))
            .with_state(StateDef::new(StateId::new(3), "Blind"));
        let mut b = hero().with_note("<actor note>").with_resist(StateId::new(3));

        assert!(b.state_addable(StateId::new(2), &db));
        assert!(!b.state_addable(StateId::new(3), &db));
        assert!(!b.state_addable(StateId::new(9), &db));

        assert!(b.insert_state(StateId::new(2)));
        assert!(!b.insert_state(StateId::new(2)));
        assert_eq!(b.all_notes(&db), "<actor note>\n<poison note>");

        assert!(b.erase_state(StateId::new(2)));
        assert!(!b.erase_state(StateId::new(2)));
        assert_eq!(b.all_notes(&db), "<actor note>");
    }

    #[test]
    fn test_recover_all() {
        let mut b = hero().with_state(StateId::new(4));
        b.set_hp(1);
        b.set_mp(0);
        b.take_flags();

        b.recover_all();
        assert_eq!(b.hp(), 100);
        assert_eq!(b.mp(), 50);
        assert!(b.states().is_empty());
        assert!(b.flags().hp && b.flags().mp);
    }

    #[test]
    fn test_learn_skill_once() {
        let mut b = hero().with_skill(SkillId::new(3));
        b.learn_skill(SkillId::new(3));
        assert_eq!(b.skills(), &[SkillId::new(3)]);
    }
}
