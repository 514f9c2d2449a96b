//! End-to-end check of the apple-world scenario: a single agent learns
//! that eating becomes permissible once it has gone hungry long enough
//! for the user's stakeholder view to defeat the prohibition.

use std::collections::HashMap;

use rand::SeedableRng;

use pinocchio_core::{ConstitutiveNorm, Kind, NormativeAgent, QAgentConfig, RegulativeNorm, Role, SelectionMethod, Stakeholder};
use pinocchio_runtime::{Environment, Grid, PresetBuilder, PresetInit, PresetReload, StateDict, WorldObject};

struct AppleWorld;

fn apple_objects() -> HashMap<String, WorldObject> {
    let mut objects = HashMap::new();
    objects.insert("apple".to_string(), WorldObject::new((3, 3), 'A').with_reward(10.0).with_flags(["eat"]));
    objects
}

fn adam_start() -> HashMap<String, (i64, i64)> {
    let mut positions = HashMap::new();
    positions.insert("Adam".to_string(), (2, 2));
    positions
}

impl PresetBuilder for AppleWorld {
    fn build(&self) -> PresetInit {
        let grid = Grid::parse("#######\n#     #\n#     #\n#     #\n#     #\n#     #\n#######").unwrap();

        let mut config = QAgentConfig::default();
        config.selection = SelectionMethod::Lex;
        let mut adam: NormativeAgent<StateDict> = NormativeAgent::new("Adam", config);
        adam.add_signal("V", Role::Preference).unwrap();
        adam.add_signal("R", Role::Preference).unwrap();
        adam.set_actions(["up", "down", "left", "right"]);

        let r1 = RegulativeNorm::new(Kind::Prohibition, ["knowledge"], [] as [&str; 0]);
        adam.add_norm(r1.clone());
        adam.add_fact("eat", |_s: &StateDict, flags: &[String]| flags.iter().any(|f| f == "eat")).unwrap();
        adam.add_fact("longtime", |s: &StateDict, _f: &[String]| s.iterations > 5).unwrap();

        let mut god = Stakeholder::new("God");
        god.add_norm(&r1);
        god.add_constitutive_norm(&r1, ConstitutiveNorm::new(["eat"], ["knowledge"], [] as [&str; 0])).unwrap();

        let mut user = Stakeholder::new("User");
        user.add_norm(&r1);
        user.add_constitutive_norm(&r1, ConstitutiveNorm::new(["longtime"], ["hungry"], [] as [&str; 0])).unwrap();
        user.add_arguments(&r1, ["hungry"]).unwrap();
        user.add_attacks(&r1, [("hungry", r1.label())]).unwrap();

        adam.add_stakeholder(god);
        adam.add_stakeholder(user);
        adam.init_decay(30_000);

        PresetInit { grid, agents: vec![adam], objects: apple_objects(), positions: adam_start(), steps: 30_000, timeout: 10, stochasticity: 0.0 }
    }

    fn reload(&self) -> PresetReload { PresetReload { objects: apple_objects(), positions: adam_start() } }
}

#[test]
fn eating_the_apple_eventually_incurs_no_violation() {
    let mut env = Environment::new(Box::new(AppleWorld));
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    env.run(30_000, "adam training", &mut rng);

    for agent in env.agents_mut() {
        agent.set_optimal(true);
        agent.set_learning(false);
    }

    let record = env.run(200, "adam evaluation", &mut rng);
    let found = record.logs.iter().any(|log| log.r == 10.0 && log.v == 0.0);
    assert!(found, "expected at least one step eating the apple without violating the (by-then-defeated) prohibition");
}
