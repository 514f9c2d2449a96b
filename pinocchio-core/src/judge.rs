//  JUDGE.rs
//    Merges per-stakeholder argumentation views into per-norm verdicts
//    and aggregates them into the three judgment signals.
//

use std::collections::{BTreeSet, HashMap};

use log::{debug, trace};

use crate::af::Af;
use crate::fact::FactRegistry;
use crate::norm::RegulativeNorm;
use crate::stakeholder::Stakeholder;


/***** LIBRARY *****/
/// The three judgment signals, summed over every norm the judge knows
/// about: a single signal dict where each key is a signal name and its
/// value is the sum over norms of that norm's contribution.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Signals {
    /// Σ(-weight if active ∧ ¬comply else 0): "you broke an active rule".
    pub v: f64,
    /// Σ(-1 if ¬comply else 0), compliance-blind of activation.
    pub a: f64,
    /// Σ(-1 if ¬active else 0): "an argument defeated the rule itself".
    pub d: f64,
}

/// The per-norm verdict, kept around for diagnostics and run-historic
/// logging even though only the aggregated [`Signals`] feed the learner.
#[derive(Clone, Debug, PartialEq)]
pub struct NormVerdict {
    pub label: String,
    pub active: bool,
    pub complied: bool,
    pub violated: bool,
}

/// A completed judgment: the aggregated signals plus the per-norm detail
/// they were derived from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Judgment {
    pub signals: Signals,
    pub verdicts: Vec<NormVerdict>,
}

/// Merges stakeholder views and decides activation/violation per norm.
///
/// The judge never retains references to stakeholders across calls —
/// every merged AF is assembled fresh each judgment, so there's no shared
/// mutable state to manage here.
pub struct Judge;

impl Judge {
    /// Judges `state` given the flags emitted by the last action, against
    /// `norms`/`stakeholders`, using `facts` to extract atomic facts and
    /// `overrides` to force a norm's activation decision.
    ///
    /// Runs the activation/compliance/aggregation pipeline for every norm
    /// in `norms`.
    pub fn judge<S>(
        norms: &[RegulativeNorm],
        stakeholders: &[Stakeholder],
        facts: &FactRegistry<S>,
        state: &S,
        flags: &[String],
        overrides: &HashMap<String, bool>,
    ) -> Judgment {
        // Step 1: seed facts = every norm's canonical label, plus every
        // extractor that evaluates true on (state, flags).
        let mut seed: Vec<String> = norms.iter().map(|n| n.label().to_string()).collect();
        seed.extend(facts.evaluate(state, flags));
        trace!("judge: seed facts = {seed:?}");

        let mut signals = Signals::default();
        let mut verdicts = Vec::with_capacity(norms.len());

        for norm in norms {
            // Step 2: closure per stakeholder.
            let mut facts_union: BTreeSet<String> = BTreeSet::new();
            let mut merged_af = Af::new();
            let mut active_set: BTreeSet<String> = BTreeSet::new();
            let mut all_attacks: Vec<(String, String)> = Vec::new();

            for sh in stakeholders {
                let closure = sh.closure(norm, seed.iter().cloned());
                facts_union.extend(closure.iter().cloned());

                // Step 3: assemble merged AF from each stakeholder's active arguments.
                for arg in sh.active_arguments(norm, &closure) {
                    merged_af.add_argument(arg.clone());
                    active_set.insert(arg);
                }
                if let Some(af) = sh.af(norm) {
                    for (a, b) in af.attacks() {
                        let pair = (a.to_string(), b.to_string());
                        if !all_attacks.contains(&pair) {
                            all_attacks.push(pair);
                        }
                    }
                }
            }
            for (a, b) in &all_attacks {
                if active_set.contains(a) && active_set.contains(b) {
                    // Both endpoints were already added as arguments above;
                    // this pair is unique per the `all_attacks` dedup, so
                    // the only failure mode would be a logic error here.
                    let _ = merged_af.add_attack(a.clone(), b.clone());
                }
            }

            // Step 4: acceptability.
            let extension = merged_af.grounded_extension();
            let mut active = extension.contains(norm.label());
            if let Some(&forced) = overrides.get(norm.label()) {
                active = forced;
            }

            // Step 5: verdict.
            let complied = norm.comply(&facts_union);
            let violated = active && !complied;

            if violated {
                signals.v -= norm.weight();
            }
            if !complied {
                signals.a -= 1.0;
            }
            if !active {
                signals.d -= 1.0;
            }

            debug!("judge: norm {} active={active} complied={complied} violated={violated}", norm.label());
            verdicts.push(NormVerdict { label: norm.label().to_string(), active, complied, violated });
        }

        Judgment { signals, verdicts }
    }
}


/***** TESTS *****/
