//! Expression context for one battler in its world.

use crate::battler::Battler;
use crate::core::{GameRng, StateId, SwitchId, VariableId};
use crate::data::Database;
use crate::expr::ExprContext;

use super::world::{GameFlags, Surroundings};

/// Answers expression queries about `battler`.
pub struct SubjectContext<'a> {
    battler: &'a Battler,
    database: &'a Database,
    flags: &'a GameFlags,
    rng: &'a mut GameRng,
}

impl<'a> SubjectContext<'a> {
    /// Build from parts.
    pub fn new(
        battler: &'a Battler,
        database: &'a Database,
        flags: &'a GameFlags,
        rng: &'a mut GameRng,
    ) -> Self {
        Self {
            battler,
            database,
            flags,
            rng,
        }
    }

    pub(crate) fn around(battler: &'a Battler, surroundings: &'a mut Surroundings<'_>) -> Self {
        Self::new(
            battler,
            surroundings.database,
            surroundings.flags,
            &mut *surroundings.rng,
        )
    }
}

impl ExprContext for SubjectContext<'_> {
    fn stat(&self, name: &str) -> Option<i64> {
        self.battler.stat(name)
    }

    fn has_state(&self, state_id: u32) -> bool {
        self.battler.has_state(StateId::new(state_id))
    }

    fn state_addable(&self, state_id: u32) -> bool {
        self.battler.state_addable(StateId::new(state_id), self.database)
    }

    fn switch(&self, switch_id: u32) -> bool {
        self.flags.switch(SwitchId::new(switch_id))
    }

    fn variable(&self, variable_id: u32) -> i64 {
        self.flags.variable(VariableId::new(variable_id))
    }

    fn rand(&mut self, n: i64) -> i64 {
        self.rng.rand(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battler::Params;
    use crate::data::StateDef;
    use crate::expr;

    #[test]
    fn test_queries() {
        let db = Database::new().with_state(StateDef::new(StateId::new(2), "Poison"));
        let mut flags = GameFlags::default();
        flags.set_switch(SwitchId::new(3), true);
        flags.set_variable(VariableId::new(4), 12);
        let mut rng = GameRng::new(1);
        let hero = Battler::actor("Eric", Params::new(100, 10)).with_state(StateId::new(2));

        let mut ctx = SubjectContext::new(&hero, &db, &flags, &mut rng);
        let check = |source: &str, ctx: &mut SubjectContext<'_>| {
            expr::evaluate_bool(&expr::parse(source).unwrap(), ctx).unwrap()
        };

        assert!(check("state?(2)", &mut ctx));
        assert!(!check("state_addable?(2) && state_addable?(5)", &mut ctx));
        assert!(check("$game_switches[3] && $game_variables[4] == 12", &mut ctx));
        assert!(check("mhp == 100 && hp == mhp", &mut ctx));
        assert!(check("rand(10) < 10", &mut ctx));
    }
}
