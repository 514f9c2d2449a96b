//  AGENT.rs
//    Defines `NormativeAgent`, which binds a `Judge` and a `QAgent`,
//    owns the norm list, stakeholders, fact extractors, and inventory.
//    Named after the Pinocchio class in the system this core generalises.
//

use std::collections::HashMap;

use log::debug;
use rand::Rng;

use crate::error::Error;
use crate::fact::FactRegistry;
use crate::judge::{Judge, Judgment};
use crate::norm::RegulativeNorm;
use crate::qagent::{QAgent, QAgentConfig, Role};
use crate::stakeholder::Stakeholder;
use crate::state::StateKey;


/***** LIBRARY *****/
/// A normative agent: a name, an inventory, the embedded [`QAgent`], the
/// regulative norms and stakeholders it is judged against, its fact
/// extractors, and an override map for forcing a norm's activation.
///
/// Exclusively owns its `QAgent`, its norm list, and its extractor map.
/// Stakeholders are shared by reference only within a single agent (spec
/// §3 "Ownership").
pub struct NormativeAgent<S> {
    name: String,
    inventory: Vec<String>,
    last_action: Option<String>,
    last_signals: HashMap<String, f64>,
    facts: FactRegistry<S>,
    norms: Vec<RegulativeNorm>,
    stakeholders: Vec<Stakeholder>,
    overrides: HashMap<String, bool>,
    /// Whether the agent's chosen action diverged from the D-maximizing
    /// set for each norm, the last time [`NormativeAgent::update_responsible`]
    /// ran — a diagnostic only, never consulted by action selection or
    /// by the learner.
    responsible: HashMap<String, bool>,
    qagent: QAgent,
}

impl<S> NormativeAgent<S> {
    pub fn new(name: impl Into<String>, config: QAgentConfig) -> Self {
        Self {
            name: name.into(),
            inventory: Vec::new(),
            last_action: None,
            last_signals: HashMap::new(),
            facts: FactRegistry::new(),
            norms: Vec::new(),
            stakeholders: Vec::new(),
            overrides: HashMap::new(),
            responsible: HashMap::new(),
            qagent: QAgent::new(config),
        }
    }

    pub fn name(&self) -> &str { &self.name }

    /// Registers a fact extractor.
    ///
    /// # Errors
    /// Propagates [`Error::DuplicateFact`].
    pub fn add_fact(&mut self, label: impl Into<String>, extractor: impl Fn(&S, &[String]) -> bool + 'static) -> Result<(), Error> {
        self.facts.register(label, extractor)
    }

    pub fn add_norm(&mut self, norm: RegulativeNorm) { self.norms.push(norm); }
    pub fn norms(&self) -> &[RegulativeNorm] { &self.norms }

    pub fn add_stakeholder(&mut self, stakeholder: Stakeholder) { self.stakeholders.push(stakeholder); }

    pub fn override_judgement(&mut self, norm_label: impl Into<String>, active: bool) { self.overrides.insert(norm_label.into(), active); }
    pub fn clear_overrides(&mut self) { self.overrides.clear(); }

    /// Registers a Q-signal on the embedded learner. See [`QAgent::add_signal`].
    pub fn add_signal(&mut self, name: impl Into<String>, role: Role) -> Result<(), Error> { self.qagent.add_signal(name, role) }

    /// See [`QAgent::reward_only`].
    pub fn reward_only(&mut self) -> Result<(), Error> { self.qagent.reward_only() }

    /// See [`QAgent::lexicographic_with`].
    pub fn lexicographic_with(&mut self, preferences: impl IntoIterator<Item = impl Into<String>>, non_ordered: impl IntoIterator<Item = impl Into<String>>) -> Result<(), Error> {
        self.qagent.lexicographic_with(preferences, non_ordered)
    }

    pub fn set_actions(&mut self, actions: impl IntoIterator<Item = impl Into<String>>) { self.qagent.set_actions(actions); }
    pub fn init_decay(&mut self, total_steps: u64) { self.qagent.init_decay(total_steps); }
    pub fn set_optimal(&mut self, optimal: bool) { self.qagent.optimal = optimal; }
    pub fn is_optimal(&self) -> bool { self.qagent.optimal }
    pub fn set_learning(&mut self, learning: bool) { self.qagent.learning = learning; }
    pub fn set_random(&mut self, is_random: bool) { self.qagent.is_random = is_random; }

    pub fn get_action(&self, state: &StateKey, rng: &mut impl Rng) -> String { self.qagent.get_action(state, rng) }
    pub fn select_best_actions(&self, state: &StateKey) -> Vec<String> { self.qagent.select_best_actions(state) }

    pub fn update_q_functions(&mut self, state: &StateKey, action: &str, signals: &HashMap<String, f64>, next_state: &StateKey, optimal_next_action: Option<&str>) -> Result<(), Error> {
        self.qagent.update(state, action, signals, next_state, optimal_next_action)
    }

    pub fn set_last_action(&mut self, action: impl Into<String>) { self.last_action = Some(action.into()); }
    pub fn last_action(&self) -> Option<&str> { self.last_action.as_deref() }
    pub fn set_last_signals(&mut self, signals: HashMap<String, f64>) { self.last_signals = signals; }
    pub fn last_signals(&self) -> &HashMap<String, f64> { &self.last_signals }

    /// Inventory is an ordered set: adding an already-present item, or
    /// removing an absent one, is a silent no-op.
    pub fn add_item(&mut self, item: impl Into<String>) {
        let item = item.into();
        if !self.inventory.contains(&item) {
            self.inventory.push(item);
        }
    }
    pub fn remove_item(&mut self, item: &str) { self.inventory.retain(|i| i != item); }
    pub fn has_item(&self, item: &str) -> bool { self.inventory.iter().any(|i| i == item) }
    pub fn inventory(&self) -> &[String] { &self.inventory }
    pub fn reset_inventory(&mut self) { self.inventory.clear(); }

    /// Judges `state` given the flags emitted by the last action.
    pub fn judge(&self, state: &S, flags: &[String]) -> Judgment { Judge::judge(&self.norms, &self.stakeholders, &self.facts, state, flags, &self.overrides) }

    /// Marks the agent "responsible" for norm `norm_label` if the action
    /// it actually took wasn't among the D-maximizing actions at `state`
    /// — a diagnostic bookkeeping hook, not a learning signal.
    pub fn update_responsible(&mut self, state: &StateKey, norm_label: &str, action_taken: &str) {
        let d_values = self.qagent.q_values("D", state);
        if d_values.is_empty() {
            return;
        }
        let max = d_values.values().copied().fold(f64::NEG_INFINITY, f64::max);
        let maximizers: Vec<&str> = d_values.iter().filter(|(_, v)| **v == max).map(|(a, _)| a.as_str()).collect();
        let responsible = !maximizers.contains(&action_taken);
        debug!("update_responsible: agent={} norm={norm_label} responsible={responsible}", self.name);
        self.responsible.insert(norm_label.to_string(), responsible);
    }

    pub fn is_responsible(&self, norm_label: &str) -> bool { self.responsible.get(norm_label).copied().unwrap_or(false) }
}


/***** TESTS *****/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::norm::Kind;

    #[test]
    fn inventory_is_an_ordered_set() {
        let mut a: NormativeAgent<()> = NormativeAgent::new("test", QAgentConfig::default());
        a.add_item("apple");
        a.add_item("apple");
        assert_eq!(a.inventory(), &["apple".to_string()]);
        a.remove_item("pear");
        assert_eq!(a.inventory(), &["apple".to_string()]);
        a.remove_item("apple");
        assert!(a.inventory().is_empty());
    }

    #[test]
    fn duplicate_fact_registration_errors() {
        let mut a: NormativeAgent<()> = NormativeAgent::new("test", QAgentConfig::default());
        a.add_fact("eat", |_s, _f: &[String]| true).unwrap();
        assert!(matches!(a.add_fact("eat", |_s, _f: &[String]| false), Err(Error::DuplicateFact { .. })));
    }

    #[test]
    fn judge_is_deterministic() {
        let mut a: NormativeAgent<()> = NormativeAgent::new("test", QAgentConfig::default());
        let r1 = RegulativeNorm::new(Kind::Prohibition, ["knowledge"], [] as [&str; 0]);
        a.add_norm(r1.clone());
        let mut sh = Stakeholder::new("God");
        sh.add_norm(&r1);
        a.add_stakeholder(sh);

        let j1 = a.judge(&(), &[]);
        let j2 = a.judge(&(), &[]);
        assert_eq!(j1.signals, j2.signals);
        assert_eq!(j1.verdicts, j2.verdicts);
    }
}
