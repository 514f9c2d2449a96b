//  ENV.rs
//    The episodic driver: steps a discrete environment, binds the judge
//    and the learner, derives the scalar signals each step, and resets
//    the episode on timeout.
//

use std::collections::HashMap;
use std::time::Instant;

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;

use pinocchio_core::StateKey;

use crate::action::{ActionSpec, Direction};
use crate::grid::Grid;
use crate::history::{moving_average, RunRecord, StepLog};
use crate::object::WorldObject;
use crate::preset::PresetBuilder;
use crate::state::{state_key_with_inventories, StateDict};


/***** LIBRARY *****/
/// Steps a discrete environment, binding the normative judge and the
/// multi-objective learner for every agent sequentially: single-threaded,
/// cooperative, one environment instance per thread.
pub struct Environment {
    grid: Grid,
    agents: Vec<pinocchio_core::NormativeAgent<StateDict>>,
    positions: HashMap<String, (i64, i64)>,
    objects: HashMap<String, WorldObject>,
    stochasticity: f64,
    steps: u64,
    timeout: u64,
    iterations: u64,
    preset: Box<dyn PresetBuilder>,
    historic: Vec<RunRecord>,
}

impl Environment {
    pub fn new(preset: Box<dyn PresetBuilder>) -> Self {
        let init = preset.build();
        info!("environment initialised: {} agents, {} steps, timeout {}", init.agents.len(), init.steps, init.timeout);
        Self {
            grid: init.grid,
            agents: init.agents,
            positions: init.positions,
            objects: init.objects,
            stochasticity: init.stochasticity,
            steps: init.steps,
            timeout: init.timeout,
            iterations: 0,
            preset,
            historic: Vec::new(),
        }
    }

    pub fn agents(&self) -> &[pinocchio_core::NormativeAgent<StateDict>] { &self.agents }
    pub fn agents_mut(&mut self) -> &mut [pinocchio_core::NormativeAgent<StateDict>] { &mut self.agents }
    pub fn grid(&self) -> &Grid { &self.grid }
    pub fn position_of(&self, agent_name: &str) -> Option<(i64, i64)> { self.positions.get(agent_name).copied() }
    pub fn historic(&self) -> &[RunRecord] { &self.historic }

    fn inventories(&self) -> HashMap<String, Vec<String>> { self.agents.iter().map(|a| (a.name().to_string(), a.inventory().to_vec())).collect() }

    fn state_key(&self) -> StateKey { state_key_with_inventories(&self.grid, &self.positions, &self.objects, &self.inventories(), self.iterations) }

    fn state_dict(&self) -> StateDict { StateDict { grid_hash: self.grid.layout_hash(), positions: self.positions.clone(), objects: self.objects.clone(), iterations: self.iterations } }

    /// Runs `total_steps` of [`Environment::step`], recording a
    /// [`RunRecord`] with windowed moving averages of R and V.
    pub fn run(&mut self, total_steps: u64, title: impl Into<String>, rng: &mut impl Rng) -> RunRecord {
        let title = title.into();
        let start = Instant::now();
        self.iterations = 0;

        let mut logs = Vec::new();
        let mut i = 0u64;
        let mut episode_ended = true;
        while i < total_steps || !episode_ended {
            i += 1;
            episode_ended = false;
            logs.push(self.step(rng));

            self.iterations += 1;
            if self.iterations >= self.timeout {
                self.reload_episode();
                self.iterations = 0;
                episode_ended = true;
            }
        }

        let window = 100usize.min(logs.len().max(1));
        let mut evolution = std::collections::BTreeMap::new();
        if !logs.is_empty() {
            let r: Vec<f64> = logs.iter().map(|l| l.r).collect();
            let v: Vec<f64> = logs.iter().map(|l| l.v).collect();
            evolution.insert("R".to_string(), moving_average(&r, window as i64).unwrap_or_default());
            evolution.insert("V".to_string(), moving_average(&v, window as i64).unwrap_or_default());
        }

        let record = RunRecord { id: self.historic.len(), title, steps: total_steps, total_time_secs: start.elapsed().as_secs_f64(), logs, evolution };
        self.historic.push(record.clone());
        record
    }

    /// Reloads the preset with `reset_agent=false`: fresh objects and
    /// starting positions, inventories cleared, Q-tables and norms kept
    /// Q-tables and norms survive the reload untouched.
    fn reload_episode(&mut self) {
        debug!("episode timeout reached, reloading preset (reset_agent=false)");
        let reload = self.preset.reload();
        self.objects = reload.objects;
        self.positions = reload.positions;
        for agent in &mut self.agents {
            agent.reset_inventory();
        }
    }

    /// One step, sequential over agents.
    pub fn step(&mut self, rng: &mut impl Rng) -> StepLog {
        let n = self.agents.len();
        let mut pre_keys = Vec::with_capacity(n);
        let mut actions = Vec::with_capacity(n);
        let mut rewards = vec![0.0; n];
        let mut flags: Vec<Vec<String>> = vec![Vec::new(); n];
        let mut global_flags: Vec<Vec<String>> = Vec::with_capacity(n);
        let mut post_keys = Vec::with_capacity(n);
        let mut post_dicts = Vec::with_capacity(n);

        for i in 0..n {
            let state_key = self.state_key();
            let action = self.agents[i].get_action(&state_key, rng);
            self.agents[i].set_last_action(action.clone());

            let (reward, step_flags, step_gflags) = self.do_action(i, &action, rng);

            pre_keys.push(state_key);
            actions.push(action);
            rewards[i] = reward;
            flags[i] = step_flags;
            global_flags.push(step_gflags);
            post_keys.push(self.state_key());
            post_dicts.push(self.state_dict());
        }

        // Global flags emitted by any agent's action are broadcast to
        // every agent's flag set before judgment.
        for gflags in &global_flags {
            for flag in gflags {
                for agent_flags in flags.iter_mut() {
                    if !agent_flags.contains(flag) {
                        agent_flags.push(flag.clone());
                    }
                }
            }
        }

        let mut last_log = StepLog::default();
        for i in 0..n {
            let judgment = self.agents[i].judge(&post_dicts[i], &flags[i]);
            let signals = HashMap::from([
                ("R".to_string(), rewards[i]),
                ("V".to_string(), judgment.signals.v),
                ("A".to_string(), judgment.signals.a),
                ("D".to_string(), judgment.signals.d),
            ]);

            let candidates = self.agents[i].select_best_actions(&post_keys[i]);
            let optimal_next = if self.agents[i].is_optimal() {
                candidates.first().cloned()
            } else {
                candidates.choose(rng).cloned()
            };

            self.agents[i]
                .update_q_functions(&pre_keys[i], &actions[i], &signals, &post_keys[i], optimal_next.as_deref())
                .expect("driver/agent signal mismatch: a registered preference has no entry in the signal dict");
            self.agents[i].set_last_signals(signals);

            for verdict in &judgment.verdicts {
                self.agents[i].update_responsible(&post_keys[i], &verdict.label, &actions[i]);
            }

            last_log = StepLog { r: rewards[i], v: judgment.signals.v, a: judgment.signals.a, d: judgment.signals.d };
        }
        last_log
    }

    /// Executes `action_label` for agent `idx`, applying movement
    /// stochasticity, wall blocking, speed penalties, and object
    /// triggers.
    fn do_action(&mut self, idx: usize, action_label: &str, rng: &mut impl Rng) -> (f64, Vec<String>, Vec<String>) {
        let Some(spec) = ActionSpec::parse(action_label) else {
            // Unknown action: silently ignored, position unchanged.
            return (0.0, Vec::new(), Vec::new());
        };

        let mut direction = spec.direction;
        if rng.gen::<f64>() < self.stochasticity {
            let alternatives: Vec<Direction> = Direction::ALL.into_iter().filter(|d| *d != direction).collect();
            if let Some(&replacement) = alternatives.choose(rng) {
                direction = replacement;
            }
        }

        let agent_name = self.agents[idx].name().to_string();
        let (x, y) = self.positions[&agent_name];
        let (dx, dy) = direction.delta();
        let (nx, ny) = (x + dx, y + dy);

        let mut reward;
        if self.grid.is_walkable(nx, ny) {
            self.positions.insert(agent_name.clone(), (nx, ny));
            reward = spec.speed.penalty();
        } else {
            debug!("do_action: {agent_name} blocked by wall at ({nx}, {ny}), position unchanged");
            reward = -10.0;
        }

        let pos_after = self.positions[&agent_name];
        let inventory = self.agents[idx].inventory().to_vec();
        let triggered: Vec<String> = self.objects.iter().filter(|(_, obj)| obj.pos == pos_after && obj.triggers_for(&inventory)).map(|(name, _)| name.clone()).collect();

        // Terrain and speed contribute their own flags directly, ahead of
        // whatever an object at the destination cell adds.
        let mut flags = Vec::new();
        let mut global_flags = Vec::new();
        if spec.speed == crate::action::Speed::Fast {
            flags.push("speeding".to_string());
        }
        if self.grid.cell(pos_after.0, pos_after.1) == Some(crate::grid::CellType::Pavement) {
            flags.push("pavement".to_string());
        }
        for name in triggered {
            let obj = self.objects.get(&name).expect("object vanished mid-trigger").clone();
            debug!("do_action: {agent_name} triggered object '{name}' at {pos_after:?}, reward += {}", obj.reward);
            reward += obj.reward;
            flags.extend(obj.flags.iter().cloned());
            global_flags.extend(obj.global_flags.iter().cloned());
            for item in &obj.inv_add {
                self.agents[idx].add_item(item.clone());
            }
            for item in &obj.inv_rem {
                self.agents[idx].remove_item(item);
            }
            if !obj.permanent {
                debug!("do_action: object '{name}' depleted, removing");
                self.objects.remove(&name);
            }
        }

        (reward, flags, global_flags)
    }
}


/***** TESTS *****/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::PresetInit;
    use pinocchio_core::{ConstitutiveNorm, Kind, NormativeAgent, QAgentConfig, RegulativeNorm, Role, SelectionMethod, Stakeholder, Tolerance};

    struct AppleWorld;

    impl PresetBuilder for AppleWorld {
        fn build(&self) -> PresetInit {
            let grid = Grid::parse("#######\n#     #\n#     #\n#     #\n#     #\n#     #\n#######").unwrap();

            let mut config = QAgentConfig::default();
            config.selection = SelectionMethod::DeltaLex(Tolerance::Percent(0.10));
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

            let mut objects = HashMap::new();
            objects.insert("apple".to_string(), WorldObject::new((3, 3), 'A').with_reward(10.0).with_flags(["eat"]));

            let mut positions = HashMap::new();
            positions.insert("Adam".to_string(), (2, 2));

            PresetInit { grid, agents: vec![adam], objects, positions, steps: 30_000, timeout: 10, stochasticity: 0.1 }
        }

        fn reload(&self) -> crate::preset::PresetReload {
            let mut objects = HashMap::new();
            objects.insert("apple".to_string(), WorldObject::new((3, 3), 'A').with_reward(10.0).with_flags(["eat"]));
            let mut positions = HashMap::new();
            positions.insert("Adam".to_string(), (2, 2));
            crate::preset::PresetReload { objects, positions }
        }
    }

    #[test]
    fn environment_steps_without_panicking() {
        let mut env = Environment::new(Box::new(AppleWorld));
        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            env.step(&mut rng);
        }
        assert!(env.position_of("Adam").is_some());
    }

    #[test]
    fn reload_resets_objects_and_inventory_but_keeps_q_tables() {
        let mut env = Environment::new(Box::new(AppleWorld));
        let mut rng = rand::thread_rng();
        for _ in 0..env.timeout + 1 {
            env.step(&mut rng);
        }
        // After a timeout reload, the apple respawns.
        assert!(env.objects.contains_key("apple"));
    }
}
