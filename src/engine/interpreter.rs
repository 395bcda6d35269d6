//! Event commands that touch the rules.
//!
//! Only the commands with rule side effects are modelled: changing MP
//! (which fires MP damage/recover triggers), changing the weather (which
//! works in battle too) and comments carrying tech-point calls.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{ActorId, BattlerRef, VariableId};
use crate::notetags::{comment_calls, CommentCall, TechChangeKind};
use crate::ui::WeatherKind;

use super::battle::Engine;

/// Which actors a command affects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorTarget {
    /// A fixed actor; id 0 means every party member.
    Fixed(ActorId),
    /// The actor whose id is stored in a variable.
    Variable(VariableId),
}

/// Direction of a value change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Increase,
    Decrease,
}

/// Where the amount comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operand {
    Constant(i64),
    Variable(VariableId),
}

/// An event command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    ChangeMp {
        target: ActorTarget,
        operation: Operation,
        operand: Operand,
    },
    ChangeWeather {
        kind: WeatherKind,
        power: u32,
        duration: u32,
        wait: bool,
    },
    Comment(String),
}

/// Runs event commands against an engine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Interpreter {
    wait_count: u32,
}

impl Interpreter {
    /// Create an idle interpreter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute one command. Returns the frames to wait before the next.
    pub fn execute(&mut self, engine: &mut Engine, command: &Command) -> u32 {
        match command {
            Command::ChangeMp {
                target,
                operation,
                operand,
            } => {
                let value = operate_value(engine, *operation, *operand);
                for actor in target_actors(engine, *target) {
                    engine.change_mp(BattlerRef::Actor(actor), value);
                }
                0
            }
            Command::ChangeWeather {
                kind,
                power,
                duration,
                wait,
            } => {
                let world = engine.world_mut();
                let in_battle = world.in_battle;
                world.active_screen().change_weather(*kind, *power, *duration);
                debug!(?kind, power, duration, in_battle, "weather changed");
                if *wait {
                    self.wait_count = *duration;
                    *duration
                } else {
                    0
                }
            }
            Command::Comment(text) => {
                run_comment(engine, text);
                0
            }
        }
    }

    /// Count down one frame of waiting.
    pub fn update(&mut self) {
        self.wait_count = self.wait_count.saturating_sub(1);
    }

    /// Is a wait in progress?
    #[must_use]
    pub fn is_waiting(&self) -> bool {
        self.wait_count > 0
    }

    /// Frames left to wait.
    #[must_use]
    pub fn wait_count(&self) -> u32 {
        self.wait_count
    }
}

fn operate_value(engine: &Engine, operation: Operation, operand: Operand) -> i64 {
    let value = match operand {
        Operand::Constant(value) => value,
        Operand::Variable(id) => engine.world().variable(id),
    };
    match operation {
        Operation::Increase => value,
        Operation::Decrease => value.saturating_neg(),
    }
}

fn target_actors(engine: &Engine, target: ActorTarget) -> Vec<ActorId> {
    let world = engine.world();
    let id = match target {
        ActorTarget::Fixed(id) if id.raw() == 0 => return world.party().to_vec(),
        ActorTarget::Fixed(id) => id,
        ActorTarget::Variable(variable) => {
            match u32::try_from(world.variable(variable)) {
                Ok(raw) => ActorId::new(raw),
                Err(_) => return Vec::new(),
            }
        }
    };
    if world.contains(BattlerRef::Actor(id)) {
        vec![id]
    } else {
        Vec::new()
    }
}

fn run_comment(engine: &mut Engine, text: &str) {
    for call in comment_calls(text) {
        match call {
            CommentCall::Change { actor, change } => {
                engine.with_tech(BattlerRef::Actor(actor), |tech, env, ctx| match change.kind {
                    TechChangeKind::Points => tech.change(change.skill, change.delta, env, ctx),
                    TechChangeKind::Max => tech.change_max(change.skill, change.delta, env, ctx),
                });
            }
            CommentCall::Recover(actor) => recover_tech(engine, BattlerRef::Actor(actor)),
            CommentCall::RecoverAll => {
                let party = engine.world().party().to_vec();
                for actor in party {
                    recover_tech(engine, BattlerRef::Actor(actor));
                }
            }
        }
    }
}

fn recover_tech(engine: &mut Engine, who: BattlerRef) {
    let Some(skills) = engine.battler(who).map(|b| b.skills().to_vec()) else {
        return;
    };
    engine.with_tech(who, |tech, env, ctx| tech.recover_all(&skills, env, ctx));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battler::{Battler, Params};
    use crate::core::{EngineConfig, SkillId, StateId};
    use crate::data::{Database, StateDef};
    use crate::engine::World;

    fn engine() -> Engine {
        let db = Database::new().with_state(StateDef::new(StateId::new(8), "Focus"));
        let mut world = World::new(db, 3);
        for (raw, name) in [(1, "Eric"), (2, "Natalie")] {
            world.insert_actor(
                ActorId::new(raw),
                Battler::actor(name, Params::new(100, 40))
                    .with_skill(SkillId::new(10))
                    .with_note("<apply auto state mp recover: 8>\n</apply auto state>"),
            );
            world.add_to_party(ActorId::new(raw));
        }
        world.insert_actor(ActorId::new(3), Battler::actor("Terence", Params::new(100, 40)));
        Engine::new(EngineConfig::default().with_tech_growth("2"), world)
    }

    fn mp(engine: &Engine, raw: u32) -> i64 {
        engine.battler(BattlerRef::Actor(ActorId::new(raw))).unwrap().mp()
    }

    #[test]
    fn test_change_mp_whole_party() {
        let mut engine = engine();
        let mut interpreter = Interpreter::new();
        interpreter.execute(
            &mut engine,
            &Command::ChangeMp {
                target: ActorTarget::Fixed(ActorId::new(0)),
                operation: Operation::Decrease,
                operand: Operand::Constant(15),
            },
        );
        assert_eq!(mp(&engine, 1), 25);
        assert_eq!(mp(&engine, 2), 25);
        assert_eq!(mp(&engine, 3), 40);
    }

    #[test]
    fn test_change_mp_fires_recover() {
        let mut engine = engine();
        engine.world_mut().set_variable(VariableId::new(5), 2);
        engine.world_mut().set_variable(VariableId::new(6), 7);
        let mut interpreter = Interpreter::new();
        interpreter.execute(
            &mut engine,
            &Command::ChangeMp {
                target: ActorTarget::Variable(VariableId::new(5)),
                operation: Operation::Increase,
                operand: Operand::Variable(VariableId::new(6)),
            },
        );
        let natalie = engine.battler(BattlerRef::Actor(ActorId::new(2))).unwrap();
        assert!(natalie.has_state(StateId::new(8)));
        let eric = engine.battler(BattlerRef::Actor(ActorId::new(1))).unwrap();
        assert!(!eric.has_state(StateId::new(8)));
    }

    #[test]
    fn test_change_mp_unknown_actor() {
        let mut engine = engine();
        let mut interpreter = Interpreter::new();
        let frames = interpreter.execute(
            &mut engine,
            &Command::ChangeMp {
                target: ActorTarget::Fixed(ActorId::new(42)),
                operation: Operation::Decrease,
                operand: Operand::Constant(5),
            },
        );
        assert_eq!(frames, 0);
        assert_eq!(mp(&engine, 1), 40);
    }

    #[test]
    fn test_weather_in_battle_and_wait() {
        let mut engine = engine();
        engine.battle_start();
        let mut interpreter = Interpreter::new();
        let frames = interpreter.execute(
            &mut engine,
            &Command::ChangeWeather {
                kind: WeatherKind::Storm,
                power: 5,
                duration: 2,
                wait: true,
            },
        );
        assert_eq!(frames, 2);
        assert!(interpreter.is_waiting());
        assert_eq!(engine.world().troop_screen.weather(), WeatherKind::Storm);
        assert_eq!(engine.world().map_screen.weather(), WeatherKind::None);

        interpreter.update();
        interpreter.update();
        assert!(!interpreter.is_waiting());
    }

    #[test]
    fn test_comment_calls() {
        let mut engine = engine();
        let eric = BattlerRef::Actor(ActorId::new(1));
        let natalie = BattlerRef::Actor(ActorId::new(2));
        engine.refresh(eric);
        engine.refresh(natalie);

        let mut interpreter = Interpreter::new();
        interpreter.execute(
            &mut engine,
            &Command::Comment("<change max tech point 1: 10, +3>\n<change tech point 9: 10, -1>".into()),
        );
        let tech = &engine.battler(eric).unwrap().tech;
        assert_eq!(tech.max(SkillId::new(10)), 5);
        assert_eq!(tech.points(SkillId::new(10)), 2);

        engine.pay_skill_cost(natalie, SkillId::new(10));
        engine.pay_skill_cost(natalie, SkillId::new(10));
        assert_eq!(engine.battler(natalie).unwrap().tech.points(SkillId::new(10)), 0);

        interpreter.execute(&mut engine, &Command::Comment("<recover all tech points>".into()));
        assert_eq!(engine.battler(natalie).unwrap().tech.points(SkillId::new(10)), 2);
        assert_eq!(engine.battler(eric).unwrap().tech.points(SkillId::new(10)), 5);
    }
}
