//! Battle flow tests.
//!
//! These tests run the engine the way a host would across a whole
//! battle:
//! - Loading configuration and the database from TOML
//! - Weather carried from the map into battle
//! - Event commands during battle
//! - Menu helpers reading the world

use battler_rules::battler::{Battler, Params};
use battler_rules::core::{ActorId, BattlerRef, EngineConfig, SkillId, StateId, SwitchId};
use battler_rules::data::Database;
use battler_rules::engine::{ActorTarget, Command, Engine, Interpreter, Operand, Operation, World};
use battler_rules::ui::{
    MenuPlaytimeLayout, PartyCommand, PartyCommandList, Playtime, WeatherKind, WindowMetrics,
};

const DATABASE: &str = r#"
[[states]]
id = 3
name = "Exhausted"
note = """
<apply auto state mp damage: 3>
mp lower 25%;
</apply auto state>
"""

[[states]]
id = 4
name = "Enraged"

[[skills]]
id = 10
name = "Slash"
note = "<tech skill>"
"#;

const CONFIG: &str = r#"
rng_seed = 5

[tech]
default_growth = "2"

[party_command]
fight_disable_switch = 9
"#;

fn setup() -> (Engine, BattlerRef) {
    let config = EngineConfig::from_toml_str(CONFIG).unwrap();
    let database = Database::from_toml_str(DATABASE).unwrap();
    let mut world = World::new(database, config.rng_seed);
    let id = ActorId::new(1);
    world.insert_actor(
        id,
        Battler::actor("Eric", Params::new(100, 40))
            .with_skill(SkillId::new(10))
            .with_note("<apply auto state mp damage: 3>\nmp lower 25%;\n</apply auto state>")
            .with_note("<apply auto state state on 3: 4>\n</apply auto state>"),
    );
    world.add_to_party(id);
    let mut engine = Engine::new(config, world);
    let who = BattlerRef::Actor(id);
    engine.refresh(who);
    (engine, who)
}

/// Test weather set on the map follows the party into battle.
#[test]
fn test_battle_weather_from_map() {
    let (mut engine, _) = setup();
    let mut interpreter = Interpreter::new();

    interpreter.execute(
        &mut engine,
        &Command::ChangeWeather {
            kind: WeatherKind::Rain,
            power: 6,
            duration: 0,
            wait: false,
        },
    );
    engine.battle_start();
    let weather = engine.world().battle_weather.clone().unwrap();
    assert_eq!(weather.kind, WeatherKind::Rain);
    assert_eq!(weather.power, 6.0);

    // A battle command changes the troop screen only.
    interpreter.execute(
        &mut engine,
        &Command::ChangeWeather {
            kind: WeatherKind::Snow,
            power: 4,
            duration: 4,
            wait: false,
        },
    );
    for _ in 0..4 {
        engine.update();
    }
    let weather = engine.world().battle_weather.clone().unwrap();
    assert_eq!(weather.kind, WeatherKind::Snow);
    assert!((weather.power - 4.0).abs() < 1e-9);
    assert_eq!(engine.world().map_screen.weather(), WeatherKind::Rain);

    engine.battle_end();
    assert!(engine.world().battle_weather.is_none());
}

/// Test MP loss from an event command chains two auto-state rules.
#[test]
fn test_change_mp_chain() {
    let (mut engine, who) = setup();
    engine.battle_start();

    let mut interpreter = Interpreter::new();
    interpreter.execute(
        &mut engine,
        &Command::ChangeMp {
            target: ActorTarget::Fixed(ActorId::new(1)),
            operation: Operation::Decrease,
            operand: Operand::Constant(35),
        },
    );
    let battler = engine.battler(who).unwrap();
    assert_eq!(battler.mp(), 5);
    assert_eq!(battler.states(), &[StateId::new(4), StateId::new(3)]);
}

/// Test comment calls during battle.
#[test]
fn test_comment_calls_in_battle() {
    let (mut engine, who) = setup();
    engine.battle_start();
    engine.pay_skill_cost(who, SkillId::new(10));
    assert_eq!(engine.tech_cost_text(who, SkillId::new(10)).as_deref(), Some("1/2"));

    let mut interpreter = Interpreter::new();
    interpreter.execute(&mut engine, &Command::Comment("<recover tech points: 1>".into()));
    assert_eq!(engine.tech_cost_text(who, SkillId::new(10)).as_deref(), Some("2/2"));

    interpreter.execute(
        &mut engine,
        &Command::Comment("<change max tech point 1: 10, +1>".into()),
    );
    assert_eq!(engine.tech_cost_text(who, SkillId::new(10)).as_deref(), Some("2/3"));
}

/// Test the party command list reads the configured switch.
#[test]
fn test_party_commands() {
    let (mut engine, _) = setup();
    let config = engine.config().party_command.clone();

    let list = PartyCommandList::build(engine.world(), &config);
    assert_eq!(list.confirm(), Some(PartyCommand::Fight));

    engine.world_mut().set_switch(SwitchId::new(9), true);
    engine.world_mut().can_escape = false;
    let mut list = PartyCommandList::build(engine.world(), &config);
    assert_eq!(list.confirm(), None);
    list.select(1);
    assert_eq!(list.confirm(), None);
}

/// Test play time follows the world's frame count.
#[test]
fn test_playtime() {
    let (mut engine, _) = setup();
    for _ in 0..125 {
        engine.update();
    }
    let frame_rate = engine.config().playtime.frame_rate;
    assert_eq!(Playtime::format(engine.world().frame_count, frame_rate), "00:00:02");

    let layout = MenuPlaytimeLayout::compute(&WindowMetrics::default(), &engine.config().playtime);
    assert!(layout.time_window.is_some());
}

/// Test invalid configuration is rejected.
#[test]
fn test_invalid_config() {
    assert!(EngineConfig::from_toml_str("[playtime]\nframe_rate = 0\n").is_err());
    assert!(EngineConfig::from_toml_str("[tech]\ndefault_limit = -1\n").is_err());
    assert!(EngineConfig::from_toml_str("rng_seed = \"x\"\n").is_err());
}
