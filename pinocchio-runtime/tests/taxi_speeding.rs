//! End-to-end check of the taxi-speeding scenario: moving fast onto
//! pavement raises two active prohibitions at once, and enough training
//! with a tolerant selection method should nudge the driver off "fast".

use std::collections::HashMap;

use rand::SeedableRng;

use pinocchio_core::{Kind, NormativeAgent, QAgentConfig, RegulativeNorm, Role, SelectionMethod, Stakeholder, Tolerance};
use pinocchio_runtime::{Environment, Grid, PresetBuilder, PresetInit, PresetReload, StateDict};

struct TaxiWorld;

fn taxi_start() -> HashMap<String, (i64, i64)> {
    let mut positions = HashMap::new();
    positions.insert("Taxi".to_string(), (1, 1));
    positions
}

impl PresetBuilder for TaxiWorld {
    fn build(&self) -> PresetInit {
        let grid = Grid::parse("#########\n#-------#\n#       #\n#########").unwrap();

        let mut config = QAgentConfig::default();
        config.selection = SelectionMethod::DeltaLex(Tolerance::Percent(0.10));
        let mut taxi: NormativeAgent<StateDict> = NormativeAgent::new("Taxi", config);
        taxi.add_signal("V", Role::Preference).unwrap();
        taxi.add_signal("R", Role::Preference).unwrap();
        taxi.set_actions(["up", "down", "left", "right", "right:fast", "right:slow", "left:fast", "left:slow"]);

        let speeding = RegulativeNorm::new(Kind::Prohibition, ["speeding"], [] as [&str; 0]);
        let pavement = RegulativeNorm::new(Kind::Prohibition, ["pavement"], [] as [&str; 0]);
        taxi.add_norm(speeding.clone());
        taxi.add_norm(pavement.clone());
        taxi.add_fact("speeding", pinocchio_core::fact::builtins::flag_present("speeding")).unwrap();
        taxi.add_fact("pavement", pinocchio_core::fact::builtins::flag_present("pavement")).unwrap();

        let mut traffic = Stakeholder::new("Traffic");
        traffic.add_norm(&speeding);
        traffic.add_norm(&pavement);
        taxi.add_stakeholder(traffic);

        taxi.init_decay(2_000_000);

        PresetInit { grid, agents: vec![taxi], objects: HashMap::new(), positions: taxi_start(), steps: 2_000_000, timeout: 50, stochasticity: 0.0 }
    }

    fn reload(&self) -> PresetReload { PresetReload { objects: HashMap::new(), positions: taxi_start() } }
}

#[test]
#[ignore = "2,000,000-step training run; exercised explicitly, not on every test pass"]
fn speeding_on_pavement_is_eventually_avoided() {
    let mut env = Environment::new(Box::new(TaxiWorld));
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    env.run(2_000_000, "taxi training", &mut rng);

    for agent in env.agents_mut() {
        agent.set_optimal(true);
        agent.set_learning(false);
    }

    let record = env.run(20, "taxi evaluation", &mut rng);
    let violations: f64 = record.logs.iter().map(|l| l.v).sum();
    assert!(violations > -40.0, "expected the trained driver to mostly avoid double prohibitions, got total V = {violations}");
}
