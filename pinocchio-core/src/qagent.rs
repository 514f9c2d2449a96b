//  QAGENT.rs
//    Per-signal tabular Q-learner: ε-greedy/optimal action selection by
//    lexicographic comparison over an ordered signal list, and one-step
//    off-policy TD updates.
//

use std::collections::HashMap;

use log::{debug, trace};
use rand::Rng;

use crate::error::Error;
use crate::state::StateKey;


/***** CONFIG *****/
/// How ε decays after every full preference sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecaySchedule {
    /// `ε <- max(ε_min, ε - ε_step)`, `ε_step = ε_init / total_steps`.
    Linear,
    /// `ε <- max(ε_min, ε * r)`, `r = 0.99^(1 / steps)`.
    Exponential,
}

/// The filter [`QAgent::select_best_actions`] uses to narrow the
/// candidate action set at each preference tier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SelectionMethod {
    /// Strict lexicographic: keep only actions matching the tier's max.
    Lex,
    /// δ-lex: keep actions within a tolerance band of the tier's max.
    DeltaLex(Tolerance),
    /// t-lex: keep actions at or above an absolute threshold, falling
    /// back to the strict max if none qualify.
    ThresholdLex(f64),
}

/// The tolerance band used by [`SelectionMethod::DeltaLex`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tolerance {
    /// A fraction of `(max - min)` over the current candidate set.
    Percent(f64),
    /// An absolute band around the max.
    Absolute(f64),
}

impl Default for Tolerance {
    /// Spec §4.4 default: a 10% band across all preference tiers.
    fn default() -> Self { Tolerance::Percent(0.10) }
}

/// Whether a registered signal participates in lexicographic action
/// selection ([`Role::Preference`]) or is only tracked for learning and
/// diagnostics ([`Role::NonOrdered`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Preference,
    NonOrdered,
}

/// Tunable parameters. Defaults match a conservative single-agent setup.
#[derive(Clone, Debug, PartialEq)]
pub struct QAgentConfig {
    pub alpha: f64,
    pub gamma: f64,
    pub epsilon_init: f64,
    pub epsilon_min: f64,
    pub decay: DecaySchedule,
    pub selection: SelectionMethod,
}

impl Default for QAgentConfig {
    fn default() -> Self {
        Self { alpha: 0.1, gamma: 1.0, epsilon_init: 1.0, epsilon_min: 0.2, decay: DecaySchedule::Linear, selection: SelectionMethod::Lex }
    }
}


/***** LIBRARY *****/
/// One tabular Q-function per registered signal: `Q[signal][state][action]`.
/// Missing entries default to `0.0`; on first update for a state, every
/// known action is initialised to `0.0`.
struct QTable {
    role: Role,
    values: HashMap<StateKey, HashMap<String, f64>>,
}

impl QTable {
    fn new(role: Role) -> Self { Self { role, values: HashMap::new() } }

    fn get(&self, state: &StateKey, action: &str) -> f64 { self.values.get(state).and_then(|m| m.get(action)).copied().unwrap_or(0.0) }

    fn row(&self, state: &StateKey) -> HashMap<String, f64> { self.values.get(state).cloned().unwrap_or_default() }

    fn ensure_row(&mut self, state: &StateKey, actions: &[String]) {
        let row = self.values.entry(state.clone()).or_default();
        for a in actions {
            row.entry(a.clone()).or_insert(0.0);
        }
    }

    fn set(&mut self, state: &StateKey, action: &str, value: f64) {
        let v = if value == 0.0 { 0.0 } else { (value * 100.0).round() / 100.0 };
        self.values.entry(state.clone()).or_default().insert(action.to_string(), v);
    }
}

/// A per-agent tabular Q-learner over one or more named signals.
///
/// Action dictionaries are never shared across signals — they diverge
/// immediately once updated.
pub struct QAgent {
    config: QAgentConfig,
    actions: Vec<String>,
    tables: HashMap<String, QTable>,
    /// Signals in lexicographic priority order, highest first.
    preferences: Vec<String>,
    epsilon: f64,
    epsilon_step: f64,
    epsilon_ratio: f64,
    pub is_random: bool,
    pub optimal: bool,
    pub learning: bool,
}

impl QAgent {
    /// Creates a learner with no signals and no actions registered yet.
    pub fn new(config: QAgentConfig) -> Self {
        Self {
            config,
            actions: Vec::new(),
            tables: HashMap::new(),
            preferences: Vec::new(),
            epsilon: 0.0,
            epsilon_step: 0.0,
            epsilon_ratio: 1.0,
            is_random: false,
            optimal: false,
            learning: true,
        }
    }

    /// Sets the fixed action set every Q-table indexes by.
    pub fn set_actions(&mut self, actions: impl IntoIterator<Item = impl Into<String>>) {
        self.actions = actions.into_iter().map(Into::into).collect();
    }

    pub fn actions(&self) -> &[String] { &self.actions }

    /// Registers a new signal's Q-table under `name`.
    ///
    /// # Errors
    /// Returns [`Error::DuplicateQFunction`] if `name` already exists.
    pub fn add_signal(&mut self, name: impl Into<String>, role: Role) -> Result<(), Error> {
        let name = name.into();
        if self.tables.contains_key(&name) {
            return Err(Error::DuplicateQFunction { name });
        }
        if role == Role::Preference {
            self.preferences.push(name.clone());
        }
        self.tables.insert(name, QTable::new(role));
        Ok(())
    }

    /// Registers `"R"` as the sole lexicographic preference: a learner
    /// that chases raw reward alone, ignoring every normative signal.
    ///
    /// # Errors
    /// Returns [`Error::DuplicateQFunction`] if `"R"` is already registered.
    pub fn reward_only(&mut self) -> Result<(), Error> { self.add_signal("R", Role::Preference) }

    /// Registers every signal in `preferences`, in lexicographic priority
    /// order, followed by every signal in `non_ordered` (tracked for
    /// learning and diagnostics but never consulted by selection).
    ///
    /// # Errors
    /// Returns [`Error::DuplicateQFunction`] on the first name already registered.
    pub fn lexicographic_with(&mut self, preferences: impl IntoIterator<Item = impl Into<String>>, non_ordered: impl IntoIterator<Item = impl Into<String>>) -> Result<(), Error> {
        for name in preferences {
            self.add_signal(name, Role::Preference)?;
        }
        for name in non_ordered {
            self.add_signal(name, Role::NonOrdered)?;
        }
        Ok(())
    }

    /// Initialises the ε-decay step/ratio for a planned run of `total_steps`
    /// TD updates: `ε_step = ε_init / total_steps`, `r = 0.99^(1/steps)`.
    pub fn init_decay(&mut self, total_steps: u64) {
        self.epsilon = self.config.epsilon_init;
        let steps = total_steps.max(1) as f64;
        self.epsilon_step = self.config.epsilon_init / steps;
        self.epsilon_ratio = 0.99_f64.powf(1.0 / steps);
    }

    pub fn epsilon(&self) -> f64 { self.epsilon }

    /// Returns the Q-values for `signal` at `state`, defaulting to empty
    /// if the state hasn't been visited yet.
    pub fn q_values(&self, signal: &str, state: &StateKey) -> HashMap<String, f64> {
        self.tables.get(signal).map(|t| t.row(state)).unwrap_or_default()
    }

    /// Chooses an action for `state`.
    ///
    /// If `optimal` is set, or a random draw clears ε (and `is_random` is
    /// false), delegates to [`QAgent::select_best_actions`] and returns
    /// its first element — a deterministic tie-break, never random, in
    /// optimal mode. Otherwise picks uniformly at random over the action set.
    pub fn get_action(&self, state: &StateKey, rng: &mut impl Rng) -> String {
        let exploit = self.optimal || (!self.is_random && rng.gen::<f64>() >= self.epsilon);
        if exploit {
            let candidates = self.select_best_actions(state);
            if let Some(first) = candidates.first() {
                return first.clone();
            }
        }
        self.random_action(rng)
    }

    fn random_action(&self, rng: &mut impl Rng) -> String {
        let idx = rng.gen_range(0..self.actions.len().max(1));
        self.actions.get(idx).cloned().unwrap_or_default()
    }

    /// Returns a non-empty candidate set of best actions for `state`,
    /// computed per [`QAgentConfig::selection`] over the `preferences`
    /// tiers in order. Non-ordered signals are never consulted here.
    pub fn select_best_actions(&self, state: &StateKey) -> Vec<String> {
        let mut candidates = self.actions.clone();
        if candidates.is_empty() {
            return candidates;
        }
        for signal in &self.preferences {
            let Some(table) = self.tables.get(signal) else { continue };
            candidates = match self.config.selection {
                SelectionMethod::Lex => Self::filter_strict_max(table, state, &candidates),
                SelectionMethod::DeltaLex(tol) => Self::filter_delta(table, state, &candidates, tol),
                SelectionMethod::ThresholdLex(threshold) => Self::filter_threshold(table, state, &candidates, threshold),
            };
            if candidates.is_empty() {
                break;
            }
        }
        if candidates.is_empty() {
            candidates = self.actions.clone();
        }
        trace!("select_best_actions: candidates = {candidates:?}");
        candidates
    }

    fn filter_strict_max(table: &QTable, state: &StateKey, candidates: &[String]) -> Vec<String> {
        let values: Vec<(String, f64)> = candidates.iter().map(|a| (a.clone(), table.get(state, a))).collect();
        let max = values.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);
        values.into_iter().filter(|(_, v)| *v == max).map(|(a, _)| a).collect()
    }

    fn filter_delta(table: &QTable, state: &StateKey, candidates: &[String], tol: Tolerance) -> Vec<String> {
        let values: Vec<(String, f64)> = candidates.iter().map(|a| (a.clone(), table.get(state, a))).collect();
        let max = values.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);
        let min = values.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
        let band = match tol {
            Tolerance::Percent(p) => p * (max - min),
            Tolerance::Absolute(a) => a,
        };
        values.into_iter().filter(|(_, v)| *v >= max - band).map(|(a, _)| a).collect()
    }

    fn filter_threshold(table: &QTable, state: &StateKey, candidates: &[String], threshold: f64) -> Vec<String> {
        let values: Vec<(String, f64)> = candidates.iter().map(|a| (a.clone(), table.get(state, a))).collect();
        let qualify: Vec<String> = values.iter().filter(|(_, v)| *v >= threshold).map(|(a, _)| a.clone()).collect();
        if !qualify.is_empty() {
            return qualify;
        }
        Self::filter_strict_max(table, state, candidates)
    }

    /// Runs one off-policy TD backup per signal in `signals`, for every
    /// signal registered as a preference or non-ordered. Only after
    /// updating the *last* preference does ε decay.
    ///
    /// # Errors
    /// Returns [`Error::MissingSignal`] if a registered preference or
    /// non-ordered signal has no entry in `signals`.
    pub fn update(&mut self, state: &StateKey, action: &str, signals: &HashMap<String, f64>, next_state: &StateKey, optimal_next_action: Option<&str>) -> Result<(), Error> {
        if !self.learning {
            return Ok(());
        }
        let names: Vec<String> = self.tables.keys().cloned().collect();
        let last_preference = self.preferences.last().cloned();

        for name in names {
            let Some(&reward) = signals.get(&name) else {
                return Err(Error::MissingSignal { signal: name });
            };
            self.update_one(&name, state, action, reward, next_state, optimal_next_action);
            if Some(&name) == last_preference.as_ref() {
                self.decay_epsilon();
            }
        }
        Ok(())
    }

    fn bootstrap(&self, signal: &str, next_state: &StateKey, optimal_next_action: Option<&str>) -> f64 {
        let table = &self.tables[signal];
        match optimal_next_action {
            Some(a) => table.get(next_state, a),
            None => table.row(next_state).values().copied().fold(0.0, f64::max),
        }
    }

    fn update_one(&mut self, signal: &str, state: &StateKey, action: &str, reward: f64, next_state: &StateKey, optimal_next_action: Option<&str>) {
        let bootstrap = self.bootstrap(signal, next_state, optimal_next_action);
        let table = self.tables.get_mut(signal).expect("signal table vanished mid-update");
        table.ensure_row(state, &self.actions);
        let current = table.get(state, action);
        let target = reward + self.config.gamma * bootstrap;
        let updated = current + self.config.alpha * (target - current);
        table.set(state, action, updated);
        debug!("update: signal={signal} state={state:?} action={action} -> {updated:.2}");
    }

    fn decay_epsilon(&mut self) {
        self.epsilon = match self.config.decay {
            DecaySchedule::Linear => (self.epsilon - self.epsilon_step).max(self.config.epsilon_min),
            DecaySchedule::Exponential => (self.epsilon * self.epsilon_ratio).max(self.config.epsilon_min),
        };
        trace!("decay_epsilon: epsilon -> {:.4}", self.epsilon);
    }
}


/***** TESTS *****/
