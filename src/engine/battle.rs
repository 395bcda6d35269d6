//! The host-facing engine.
//!
//! The host calls an `Engine` method whenever something happens in battle
//! (damage, a turn ending, a state being added). The engine updates the
//! [`World`] and dispatches the matching [`BattleEvent`] to every
//! registered listener in priority order.
//!
//! ## Dispatch
//!
//! Listeners run synchronously and may raise further events: an auto-state
//! rule adds a state, which raises `StateAdded`, which may match another
//! rule. Nesting deeper than `AutoStateConfig::max_cascade_depth` is
//! dropped with a warning.
//!
//! ## Missing Battlers
//!
//! Every operation on a [`BattlerRef`] that names no battler is a no-op.

use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::battler::{Battler, Gauge};
use crate::core::{BattlerRef, EngineConfig, SkillId, StateId};
use crate::events::{
    ActionItem, AutoStateListener, BattleEvent, BattleListener, ListenerRegistry, TechPointListener,
};
use crate::expr::ExprContext;
use crate::tech::{TechEnv, TechTracker};
use crate::ui::BattleWeather;

use super::context::SubjectContext;
use super::world::World;

/// Battle rules engine.
///
/// ## Example
///
/// ```
/// use battler_rules::battler::{Battler, Params};
/// use battler_rules::core::{ActorId, BattlerRef, EngineConfig, StateId};
/// use battler_rules::data::{Database, StateDef};
/// use battler_rules::engine::{Engine, World};
///
/// let db = Database::new().with_state(StateDef::new(StateId::new(14), "Berserk"));
/// let mut world = World::new(db, 0);
/// let hero = ActorId::new(1);
/// world.insert_actor(
///     hero,
///     Battler::actor("Eric", Params::new(100, 0)).with_note(
///         "<apply auto state hp damage: 14>\nhp lower 25%;\n</apply auto state>",
///     ),
/// );
/// world.add_to_party(hero);
///
/// let mut engine = Engine::new(EngineConfig::default(), world);
/// let who = BattlerRef::Actor(hero);
///
/// engine.change_hp(who, -70);
/// assert!(!engine.battler(who).unwrap().has_state(StateId::new(14)));
///
/// engine.change_hp(who, -10);
/// assert!(engine.battler(who).unwrap().has_state(StateId::new(14)));
/// ```
pub struct Engine {
    config: EngineConfig,
    world: World,
    listeners: ListenerRegistry,
    depth: u32,
}

impl Engine {
    /// Create an engine with the listeners enabled by `config.features`.
    #[must_use]
    pub fn new(config: EngineConfig, world: World) -> Self {
        let mut listeners = ListenerRegistry::new();
        if config.features.auto_state {
            listeners.register(Arc::new(AutoStateListener));
        }
        if config.features.tech_points {
            listeners.register(Arc::new(TechPointListener));
        }
        Self::with_listeners(config, world, listeners)
    }

    /// Create an engine with an explicit listener set.
    #[must_use]
    pub fn with_listeners(config: EngineConfig, world: World, listeners: ListenerRegistry) -> Self {
        Self {
            config,
            world,
            listeners,
            depth: 0,
        }
    }

    /// Configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// World.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// World, mutably. Changes made here fire no events.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Consume the engine, returning the world.
    #[must_use]
    pub fn into_world(self) -> World {
        self.world
    }

    /// Add a listener.
    pub fn register_listener(&mut self, listener: Arc<dyn BattleListener>) {
        self.listeners.register(listener);
    }

    /// Registered listeners.
    #[must_use]
    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    /// Look up a battler.
    #[must_use]
    pub fn battler(&self, who: BattlerRef) -> Option<&Battler> {
        self.world.battler(who)
    }

    // === Dispatch ===

    /// Raise an event for `who` and run every interested listener.
    pub fn dispatch(&mut self, who: BattlerRef, event: BattleEvent) {
        if !self.world.contains(who) {
            return;
        }
        let limit = self.config.auto_state.max_cascade_depth;
        if self.depth >= limit {
            warn!(%who, ?event, limit, "event cascade too deep, dropping event");
            return;
        }

        self.depth += 1;
        let listeners = self.listeners.snapshot();
        for listener in listeners.iter().filter(|l| l.handles(&event)) {
            trace!(listener = listener.name(), %who, ?event, depth = self.depth, "dispatch");
            listener.on_event(self, who, &event);
        }
        self.depth -= 1;
    }

    /// Run `f` with an expression context for `who`.
    pub fn with_context<R>(
        &mut self,
        who: BattlerRef,
        f: impl FnOnce(&mut dyn ExprContext) -> R,
    ) -> Option<R> {
        let (battler, mut surroundings) = self.world.split(who)?;
        let mut ctx = SubjectContext::around(battler, &mut surroundings);
        Some(f(&mut ctx))
    }

    /// Run `f` on the tech points of `who`.
    pub fn with_tech<R>(
        &mut self,
        who: BattlerRef,
        f: impl FnOnce(&mut TechTracker, &TechEnv<'_>, &mut dyn ExprContext) -> R,
    ) -> Option<R> {
        let (battler, mut surroundings) = self.world.split(who)?;
        let mut tracker = std::mem::take(&mut battler.tech);
        let notes = battler.all_notes(surroundings.database);

        let result = {
            let env = TechEnv::new(&notes, surroundings.database, &self.config.tech);
            let mut ctx = SubjectContext::around(battler, &mut surroundings);
            f(&mut tracker, &env, &mut ctx)
        };

        battler.tech = tracker;
        Some(result)
    }

    // === Gauges ===

    /// Set a gauge and refresh.
    pub fn set_gauge(&mut self, who: BattlerRef, gauge: Gauge, value: i64) -> bool {
        let Some(battler) = self.world.battler_mut(who) else {
            return false;
        };
        let changed = battler.set_gauge(gauge, value);
        self.refresh(who);
        changed
    }

    /// Set HP and refresh.
    pub fn set_hp(&mut self, who: BattlerRef, value: i64) -> bool {
        self.set_gauge(who, Gauge::Hp, value)
    }

    /// Set MP and refresh.
    pub fn set_mp(&mut self, who: BattlerRef, value: i64) -> bool {
        self.set_gauge(who, Gauge::Mp, value)
    }

    /// Set TP and refresh.
    pub fn set_tp(&mut self, who: BattlerRef, value: i64) -> bool {
        self.set_gauge(who, Gauge::Tp, value)
    }

    /// Fire change events for raised gauge flags, then `Refreshed`.
    ///
    /// All three flags are cleared.
    pub fn refresh(&mut self, who: BattlerRef) {
        let Some(battler) = self.world.battler_mut(who) else {
            return;
        };
        let flags = battler.take_flags();

        if flags.hp {
            self.dispatch(who, BattleEvent::HpChanged);
        }
        if flags.mp {
            self.dispatch(who, BattleEvent::MpChanged);
        }
        if flags.tp {
            self.dispatch(who, BattleEvent::TpChanged);
        }
        self.dispatch(who, BattleEvent::Refreshed);
    }

    /// Add `delta` to HP; negative is damage, positive is recovery.
    pub fn change_hp(&mut self, who: BattlerRef, delta: i64) {
        let Some(hp) = self.battler(who).map(Battler::hp) else {
            return;
        };
        self.set_hp(who, hp.saturating_add(delta));
        self.fire_by_sign(who, -delta, BattleEvent::HpDamaged, BattleEvent::HpRecovered);
    }

    /// Add `delta` to MP; negative is damage, positive is recovery.
    pub fn change_mp(&mut self, who: BattlerRef, delta: i64) {
        let Some(mp) = self.battler(who).map(Battler::mp) else {
            return;
        };
        self.set_mp(who, mp.saturating_add(delta));
        self.fire_by_sign(who, -delta, BattleEvent::MpDamaged, BattleEvent::MpRecovered);
    }

    /// Apply a damage result. Positive values are damage, negative
    /// values are recovery.
    pub fn execute_damage(&mut self, who: BattlerRef, hp_damage: i64, mp_damage: i64) {
        let Some(battler) = self.world.battler_mut(who) else {
            return;
        };
        let (hp, mp) = (battler.hp(), battler.mp());
        battler.set_hp(hp.saturating_sub(hp_damage));
        battler.set_mp(mp.saturating_sub(mp_damage));
        self.refresh(who);

        self.fire_by_sign(who, hp_damage, BattleEvent::HpDamaged, BattleEvent::HpRecovered);
        self.fire_by_sign(who, mp_damage, BattleEvent::MpDamaged, BattleEvent::MpRecovered);
    }

    /// Damage from walking on a damage floor. Never knocks the battler out.
    pub fn floor_damage(&mut self, who: BattlerRef, amount: i64) {
        let Some(hp) = self.battler(who).map(Battler::hp) else {
            return;
        };
        let damage = amount.min((hp - 1).max(0));
        self.set_hp(who, hp - damage);
        if amount > 0 {
            self.dispatch(who, BattleEvent::HpDamaged);
        }
    }

    fn fire_by_sign(&mut self, who: BattlerRef, damage: i64, hurt: BattleEvent, healed: BattleEvent) {
        if damage > 0 {
            self.dispatch(who, hurt);
        } else if damage < 0 {
            self.dispatch(who, healed);
        }
    }

    // === States ===

    /// Add a state if it is addable and not already applied.
    ///
    /// `StateAdded` fires before the state is inserted. Returns whether
    /// the state is now applied because of this call.
    pub fn add_state(&mut self, who: BattlerRef, state: StateId) -> bool {
        let Some(battler) = self.world.battler(who) else {
            return false;
        };
        if battler.has_state(state) || !battler.state_addable(state, &self.world.database) {
            return false;
        }

        self.dispatch(who, BattleEvent::StateAdded(state));

        let added = self
            .world
            .battler_mut(who)
            .is_some_and(|battler| battler.insert_state(state));
        if added {
            debug!(%who, %state, "state added");
        }
        added
    }

    /// Remove a state if applied.
    ///
    /// `StateRemoved` fires before the state is removed.
    pub fn remove_state(&mut self, who: BattlerRef, state: StateId) -> bool {
        if !self.battler(who).is_some_and(|b| b.has_state(state)) {
            return false;
        }

        self.dispatch(who, BattleEvent::StateRemoved(state));

        let removed = self
            .world
            .battler_mut(who)
            .is_some_and(|battler| battler.erase_state(state));
        if removed {
            debug!(%who, %state, "state removed");
        }
        removed
    }

    // === Battle flow ===

    /// Start a battle: copy the map weather and fire `BattleStarted` for
    /// every battle member.
    pub fn battle_start(&mut self) {
        self.world.in_battle = true;
        if self.config.features.battle_weather {
            self.world.troop_screen = self.world.map_screen.clone();
            self.world.battle_weather = Some(BattleWeather::from_map(&self.world.map_screen));
        } else {
            self.world.troop_screen = Default::default();
            self.world.battle_weather = None;
        }
        self.for_each_member(BattleEvent::BattleStarted);
    }

    /// Fire `TurnStarted` for every battle member.
    pub fn turn_start(&mut self) {
        self.for_each_member(BattleEvent::TurnStarted);
    }

    /// A battler begins acting.
    pub fn action_start(&mut self, who: BattlerRef, item: Option<ActionItem>) {
        self.dispatch(who, BattleEvent::ActionStarted(item));
    }

    /// A battler finished acting.
    pub fn action_end(&mut self, who: BattlerRef) {
        self.dispatch(who, BattleEvent::ActionEnded);
    }

    /// Fire `TurnEnded` for every battle member.
    pub fn turn_end(&mut self) {
        self.for_each_member(BattleEvent::TurnEnded);
    }

    /// Fire `BattleEnded` for every battle member and leave battle.
    pub fn battle_end(&mut self) {
        self.for_each_member(BattleEvent::BattleEnded);
        self.world.in_battle = false;
        self.world.battle_weather = None;
    }

    fn for_each_member(&mut self, event: BattleEvent) {
        for who in self.world.battle_members() {
            self.dispatch(who, event);
        }
    }

    // === Recovery, items and skills ===

    /// Full recovery: HP, MP, states and tech points.
    pub fn recover_all(&mut self, who: BattlerRef) {
        let Some(battler) = self.world.battler_mut(who) else {
            return;
        };
        battler.recover_all();
        self.refresh(who);
        self.dispatch(who, BattleEvent::RecoveredAll);
    }

    /// A skill or item hit the battler.
    pub fn item_apply(&mut self, who: BattlerRef, item: ActionItem) {
        self.dispatch(who, BattleEvent::ItemApplied(item));
    }

    /// Can the battler use the skill? Checks tech points only.
    pub fn skill_usable(&mut self, who: BattlerRef, skill: SkillId) -> bool {
        if !self.config.features.tech_points {
            return self.world.contains(who);
        }
        self.with_tech(who, |tech, env, ctx| tech.can_use(skill, env, ctx))
            .unwrap_or(false)
    }

    /// Charge the tech point cost of using the skill.
    pub fn pay_skill_cost(&mut self, who: BattlerRef, skill: SkillId) {
        if !self.config.features.tech_points {
            return;
        }
        self.with_tech(who, |tech, env, ctx| tech.pay(skill, env, ctx));
    }

    /// Tech cost text (`now/max`) for a skill tagged `<tech skill>`.
    #[must_use]
    pub fn tech_cost_text(&self, who: BattlerRef, skill: SkillId) -> Option<String> {
        if !self.config.features.tech_points {
            return None;
        }
        let battler = self.world.battler(who)?;
        let notes = battler.all_notes(&self.world.database);
        let env = TechEnv::new(&notes, &self.world.database, &self.config.tech);
        battler.tech.cost_text(skill, &env)
    }

    /// Advance one frame.
    pub fn update(&mut self) {
        self.world.update();
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("listeners", &self.listeners)
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}
