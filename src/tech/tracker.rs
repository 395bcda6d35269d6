//! Per-skill tech points.
//!
//! Each tracked skill has `now` and `max` points. Using the skill costs
//! one point; a skill with no points left cannot be used. The maximum
//! grows with the battler:
//!
//! 1. the largest `<tech growth S: expr>` among the battler's notes,
//!    else the skill's `<tech growth: expr>`, else the configured
//!    default (`1 + level / 5`);
//! 2. plus any max bonus from items or event comments;
//! 3. clamped into `[0, limit]`, where the limit is found the same way
//!    (`<tech limit S: n>`, `<tech limit: n>`, default 20).
//!
//! After any change or refresh `0 <= now <= max` holds.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{SkillId, TechConfig};
use crate::data::{Database, SkillDef};
use crate::expr::{self, ExprContext};
use crate::notetags::tech::{self as tags, TechChangeKind};

/// Current and maximum points of one skill.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechPoints {
    pub now: i64,
    pub max: i64,
}

/// Everything besides the battler's stats that tech rules read.
#[derive(Clone, Copy, Debug)]
pub struct TechEnv<'a> {
    /// The battler's notes, including state notes.
    pub notes: &'a str,
    pub database: &'a Database,
    pub config: &'a TechConfig,
}

impl<'a> TechEnv<'a> {
    /// Bundle the inputs.
    #[must_use]
    pub fn new(notes: &'a str, database: &'a Database, config: &'a TechConfig) -> Self {
        Self {
            notes,
            database,
            config,
        }
    }

    /// Does the skill consume tech points?
    ///
    /// Every skill does, unless `tag_required` limits it to `<tech skill>`.
    #[must_use]
    pub fn charges(&self, skill: SkillId) -> bool {
        !self.config.tag_required || self.skill(skill).is_some_and(SkillDef::is_tech_skill)
    }

    /// Do the notes grant unlimited use?
    #[must_use]
    pub fn infinite(&self) -> bool {
        tags::has_infinite_tech_points(self.notes)
    }

    fn skill(&self, skill: SkillId) -> Option<&'a SkillDef> {
        self.database.skill(skill)
    }
}

/// Tech points of one battler.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechTracker {
    points: FxHashMap<SkillId, TechPoints>,
    bonus: FxHashMap<SkillId, i64>,
}

impl TechTracker {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // === Queries ===

    /// Points of a tracked skill.
    #[must_use]
    pub fn get(&self, skill: SkillId) -> Option<TechPoints> {
        self.points.get(&skill).copied()
    }

    /// Is the skill tracked?
    #[must_use]
    pub fn is_tracked(&self, skill: SkillId) -> bool {
        self.points.contains_key(&skill)
    }

    /// Current points, 0 when untracked.
    #[must_use]
    pub fn points(&self, skill: SkillId) -> i64 {
        self.get(skill).map_or(0, |p| p.now)
    }

    /// Maximum points, 0 when untracked.
    #[must_use]
    pub fn max(&self, skill: SkillId) -> i64 {
        self.get(skill).map_or(0, |p| p.max)
    }

    /// Max bonus from items and events.
    #[must_use]
    pub fn bonus(&self, skill: SkillId) -> i64 {
        self.bonus.get(&skill).copied().unwrap_or(0)
    }

    /// `now/max` for skills tagged `<tech skill>`.
    #[must_use]
    pub fn cost_text(&self, skill: SkillId, env: &TechEnv<'_>) -> Option<String> {
        env.skill(skill)
            .filter(|def| def.is_tech_skill())
            .map(|_| format!("{}/{}", self.points(skill), self.max(skill)))
    }

    /// Compute the skill's maximum from notes, bonus and limit.
    pub fn compute_max(&self, skill: SkillId, env: &TechEnv<'_>, ctx: &mut dyn ExprContext) -> i64 {
        let def = env.skill(skill);

        let growth = Self::growth(skill, def, env, ctx);
        let limit = tags::battler_limits(env.notes, skill)
            .into_iter()
            .max()
            .or_else(|| def.and_then(SkillDef::tech_limit))
            .unwrap_or(env.config.default_limit)
            .max(0);

        growth.saturating_add(self.bonus(skill)).clamp(0, limit)
    }

    fn growth(
        skill: SkillId,
        def: Option<&SkillDef>,
        env: &TechEnv<'_>,
        ctx: &mut dyn ExprContext,
    ) -> i64 {
        let battler_best = tags::battler_growths(env.notes, skill)
            .into_iter()
            .filter_map(|source| eval_growth(source, ctx))
            .max();
        if let Some(growth) = battler_best {
            return growth;
        }

        def.and_then(SkillDef::tech_growth)
            .and_then(|source| eval_growth(source, ctx))
            .or_else(|| eval_growth(&env.config.default_growth, ctx))
            .unwrap_or(0)
    }

    // === Updates ===

    /// Start tracking (or reset) a skill at full points.
    pub fn setup(&mut self, skill: SkillId, env: &TechEnv<'_>, ctx: &mut dyn ExprContext) {
        let max = self.compute_max(skill, env, ctx);
        self.points.insert(skill, TechPoints { now: max, max });
    }

    /// Recompute the maximum and clamp current points into `[0, max]`.
    ///
    /// An untracked skill is set up first.
    pub fn refresh(&mut self, skill: SkillId, env: &TechEnv<'_>, ctx: &mut dyn ExprContext) {
        let max = self.compute_max(skill, env, ctx);
        let entry = self
            .points
            .entry(skill)
            .or_insert(TechPoints { now: max, max });
        entry.max = max;
        entry.now = entry.now.clamp(0, max);
    }

    /// Refresh every listed skill.
    pub fn refresh_all(
        &mut self,
        skills: &[SkillId],
        env: &TechEnv<'_>,
        ctx: &mut dyn ExprContext,
    ) {
        for &skill in skills {
            self.refresh(skill, env, ctx);
        }
    }

    /// Set up every listed skill at full points.
    pub fn recover_all(
        &mut self,
        skills: &[SkillId],
        env: &TechEnv<'_>,
        ctx: &mut dyn ExprContext,
    ) {
        for &skill in skills {
            self.setup(skill, env, ctx);
        }
    }

    /// Add `delta` to current points, then refresh.
    pub fn change(
        &mut self,
        skill: SkillId,
        delta: i64,
        env: &TechEnv<'_>,
        ctx: &mut dyn ExprContext,
    ) {
        if !self.is_tracked(skill) {
            self.setup(skill, env, ctx);
        }
        if let Some(entry) = self.points.get_mut(&skill) {
            entry.now = entry.now.saturating_add(delta);
        }
        self.refresh(skill, env, ctx);
        debug!(%skill, delta, now = self.points(skill), max = self.max(skill), "tech points changed");
    }

    /// Add `delta` to the max bonus. A tracked skill is refreshed.
    pub fn change_max(
        &mut self,
        skill: SkillId,
        delta: i64,
        env: &TechEnv<'_>,
        ctx: &mut dyn ExprContext,
    ) {
        let bonus = self.bonus.entry(skill).or_insert(0);
        *bonus = bonus.saturating_add(delta);
        if self.is_tracked(skill) {
            self.refresh(skill, env, ctx);
        }
        debug!(%skill, delta, bonus = self.bonus(skill), "tech max bonus changed");
    }

    /// Can the skill be used?
    ///
    /// True with `<infinite tech points>` or for skills that do not
    /// charge; otherwise sets up an untracked skill and checks `now > 0`.
    pub fn can_use(&mut self, skill: SkillId, env: &TechEnv<'_>, ctx: &mut dyn ExprContext) -> bool {
        if !env.charges(skill) || env.infinite() {
            return true;
        }
        if !self.is_tracked(skill) {
            self.setup(skill, env, ctx);
        }
        self.points(skill) > 0
    }

    /// Charge one point for using the skill.
    pub fn pay(&mut self, skill: SkillId, env: &TechEnv<'_>, ctx: &mut dyn ExprContext) {
        if env.charges(skill) {
            self.change(skill, -1, env, ctx);
        }
    }

    /// Apply the `<change tech point>` and `<change max tech point>` tags
    /// of a skill or item that hit this battler.
    pub fn apply_item_effects(&mut self, note: &str, env: &TechEnv<'_>, ctx: &mut dyn ExprContext) {
        for change in tags::item_changes(note) {
            match change.kind {
                TechChangeKind::Points => self.change(change.skill, change.delta, env, ctx),
                TechChangeKind::Max => self.change_max(change.skill, change.delta, env, ctx),
            }
        }
    }
}

fn eval_growth(source: &str, ctx: &mut dyn ExprContext) -> Option<i64> {
    match expr::parse(source).and_then(|parsed| expr::evaluate_int(&parsed, ctx)) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(source, error = %err, "tech growth expression failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SkillDef;

    struct Level(i64);

    impl ExprContext for Level {
        fn stat(&self, name: &str) -> Option<i64> {
            (name == "level").then_some(self.0)
        }
        fn has_state(&self, _: u32) -> bool {
            false
        }
        fn state_addable(&self, _: u32) -> bool {
            true
        }
        fn switch(&self, _: u32) -> bool {
            false
        }
        fn variable(&self, _: u32) -> i64 {
            0
        }
        fn rand(&mut self, _: i64) -> i64 {
            0
        }
    }

    const SLASH: SkillId = SkillId::new(3);

    fn database() -> Database {
        Database::new()
            .with_skill(SkillDef::new(SLASH, "Cross Slash").with_note("<tech skill>"))
            .with_skill(
                SkillDef::new(SkillId::new(4), "Wind Slash")
                    .with_note("<tech skill>\n<tech growth: 2 + level / 10>\n<tech limit: 4>"),
            )
            .with_skill(SkillDef::new(SkillId::new(1), "Attack"))
    }

    #[test]
    fn test_default_growth() {
        let db = database();
        let config = TechConfig::default();
        let env = TechEnv::new("", &db, &config);
        let tracker = TechTracker::new();

        assert_eq!(tracker.compute_max(SLASH, &env, &mut Level(10)), 3);
        assert_eq!(tracker.compute_max(SLASH, &env, &mut Level(1)), 1);
        assert_eq!(tracker.compute_max(SLASH, &env, &mut Level(99)), 20);
    }

    #[test]
    fn test_skill_overrides() {
        let db = database();
        let config = TechConfig::default();
        let env = TechEnv::new("", &db, &config);
        let tracker = TechTracker::new();

        assert_eq!(tracker.compute_max(SkillId::new(4), &env, &mut Level(10)), 3);
        assert_eq!(tracker.compute_max(SkillId::new(4), &env, &mut Level(50)), 4);
    }

    #[test]
    fn test_battler_overrides_take_largest() {
        let db = database();
        let config = TechConfig::default();
        let notes = "<tech growth 4: 1>\n<tech growth 4: level>\n<tech limit 4: 6>\n<tech limit 4: 9>";
        let env = TechEnv::new(notes, &db, &config);
        let tracker = TechTracker::new();

        assert_eq!(tracker.compute_max(SkillId::new(4), &env, &mut Level(7)), 7);
        assert_eq!(tracker.compute_max(SkillId::new(4), &env, &mut Level(30)), 9);
    }

    #[test]
    fn test_broken_growth_falls_through() {
        let db = database();
        let config = TechConfig::default();
        let env = TechEnv::new("<tech growth 3: level +>", &db, &config);
        let tracker = TechTracker::new();

        assert_eq!(tracker.compute_max(SLASH, &env, &mut Level(10)), 3);
    }

    #[test]
    fn test_untracked_reads_zero() {
        let tracker = TechTracker::new();
        assert_eq!(tracker.points(SLASH), 0);
        assert_eq!(tracker.max(SLASH), 0);
        assert!(tracker.get(SLASH).is_none());
    }

    #[test]
    fn test_setup_and_pay() {
        let db = database();
        let config = TechConfig::default();
        let env = TechEnv::new("", &db, &config);
        let mut ctx = Level(10);
        let mut tracker = TechTracker::new();

        assert!(tracker.can_use(SLASH, &env, &mut ctx));
        assert_eq!(tracker.get(SLASH), Some(TechPoints { now: 3, max: 3 }));

        for _ in 0..3 {
            tracker.pay(SLASH, &env, &mut ctx);
        }
        assert_eq!(tracker.points(SLASH), 0);
        assert!(!tracker.can_use(SLASH, &env, &mut ctx));

        tracker.pay(SLASH, &env, &mut ctx);
        assert_eq!(tracker.points(SLASH), 0);
    }

    #[test]
    fn test_infinite_tech_points() {
        let db = database();
        let config = TechConfig::default();
        let env = TechEnv::new("<infinite tech points>", &db, &config);
        let mut ctx = Level(1);
        let mut tracker = TechTracker::new();

        tracker.pay(SLASH, &env, &mut ctx);
        assert_eq!(tracker.points(SLASH), 0);
        assert!(tracker.can_use(SLASH, &env, &mut ctx));
    }

    #[test]
    fn test_change_clamps() {
        let db = database();
        let config = TechConfig::default();
        let env = TechEnv::new("", &db, &config);
        let mut ctx = Level(10);
        let mut tracker = TechTracker::new();

        tracker.change(SLASH, 10, &env, &mut ctx);
        assert_eq!(tracker.get(SLASH), Some(TechPoints { now: 3, max: 3 }));

        tracker.change(SLASH, -10, &env, &mut ctx);
        assert_eq!(tracker.get(SLASH), Some(TechPoints { now: 0, max: 3 }));
    }

    #[test]
    fn test_change_max() {
        let db = database();
        let config = TechConfig::default();
        let env = TechEnv::new("", &db, &config);
        let mut ctx = Level(10);
        let mut tracker = TechTracker::new();

        // Untracked: only the bonus moves.
        tracker.change_max(SLASH, 2, &env, &mut ctx);
        assert!(!tracker.is_tracked(SLASH));
        tracker.setup(SLASH, &env, &mut ctx);
        assert_eq!(tracker.get(SLASH), Some(TechPoints { now: 5, max: 5 }));

        tracker.change_max(SLASH, -4, &env, &mut ctx);
        assert_eq!(tracker.get(SLASH), Some(TechPoints { now: 1, max: 1 }));

        tracker.change_max(SLASH, -10, &env, &mut ctx);
        assert_eq!(tracker.get(SLASH), Some(TechPoints { now: 0, max: 0 }));
    }

    #[test]
    fn test_refresh_follows_level() {
        let db = database();
        let config = TechConfig::default();
        let env = TechEnv::new("", &db, &config);
        let mut tracker = TechTracker::new();

        tracker.setup(SLASH, &env, &mut Level(10));
        tracker.pay(SLASH, &env, &mut Level(10));
        assert_eq!(tracker.get(SLASH), Some(TechPoints { now: 2, max: 3 }));

        tracker.refresh(SLASH, &env, &mut Level(20));
        assert_eq!(tracker.get(SLASH), Some(TechPoints { now: 2, max: 5 }));

        tracker.refresh(SLASH, &env, &mut Level(1));
        assert_eq!(tracker.get(SLASH), Some(TechPoints { now: 1, max: 1 }));
    }

    #[test]
    fn test_recover_all() {
        let db = database();
        let config = TechConfig::default();
        let env = TechEnv::new("", &db, &config);
        let mut ctx = Level(10);
        let mut tracker = TechTracker::new();

        tracker.change(SLASH, -3, &env, &mut ctx);
        tracker.recover_all(&[SLASH, SkillId::new(4)], &env, &mut ctx);
        assert_eq!(tracker.points(SLASH), 3);
        assert_eq!(tracker.points(SkillId::new(4)), 3);
    }

    #[test]
    fn test_item_effects() {
        let db = database();
        let config = TechConfig::default();
        let env = TechEnv::new("", &db, &config);
        let mut ctx = Level(10);
        let mut tracker = TechTracker::new();

        tracker.setup(SLASH, &env, &mut ctx);
        tracker.change(SLASH, -3, &env, &mut ctx);
        tracker.apply_item_effects(
            "<change tech point 3: +1>\n<change max tech point 3: +2>",
            &env,
            &mut ctx,
        );
        assert_eq!(tracker.get(SLASH), Some(TechPoints { now: 1, max: 5 }));
    }

    #[test]
    fn test_tag_required() {
        let db = database();
        let config = TechConfig {
            tag_required: true,
            ..TechConfig::default()
        };
        let env = TechEnv::new("", &db, &config);
        let mut ctx = Level(1);
        let mut tracker = TechTracker::new();

        let attack = SkillId::new(1);
        tracker.pay(attack, &env, &mut ctx);
        assert!(!tracker.is_tracked(attack));
        assert!(tracker.can_use(attack, &env, &mut ctx));

        tracker.pay(SLASH, &env, &mut ctx);
        assert!(!tracker.can_use(SLASH, &env, &mut ctx));
    }

    #[test]
    fn test_cost_text() {
        let db = database();
        let config = TechConfig::default();
        let env = TechEnv::new("", &db, &config);
        let mut tracker = TechTracker::new();

        assert_eq!(tracker.cost_text(SLASH, &env), Some("0/0".to_string()));
        tracker.setup(SLASH, &env, &mut Level(10));
        tracker.pay(SLASH, &env, &mut Level(10));
        assert_eq!(tracker.cost_text(SLASH, &env), Some("2/3".to_string()));
        assert_eq!(tracker.cost_text(SkillId::new(1), &env), None);
    }
}
