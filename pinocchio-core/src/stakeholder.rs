//  STAKEHOLDER.rs
//    A named bundle of per-norm constitutive closure rules and per-norm
//    argumentation frameworks.
//

use std::collections::{BTreeSet, HashMap};

use log::trace;

use crate::af::Af;
use crate::error::Error;
use crate::norm::{ConstitutiveNorm, RegulativeNorm};


/***** LIBRARY *****/
/// A named view that contributes constitutive norms and an [`Af`] per
/// regulative norm it has an opinion about.
#[derive(Debug, Default)]
pub struct Stakeholder {
    name: String,
    cnorms: HashMap<String, Vec<ConstitutiveNorm>>,
    afs: HashMap<String, Af>,
}

impl Stakeholder {
    pub fn new(name: impl Into<String>) -> Self { Self { name: name.into(), cnorms: HashMap::new(), afs: HashMap::new() } }

    pub fn name(&self) -> &str { &self.name }

    /// Registers a regulative norm with this stakeholder, creating empty
    /// constitutive-norm and AF slots for it. The norm's canonical label
    /// is added as the sole base argument, matching the original's
    /// `addNorm` + `setArguments(rnorm, [rnorm])` pattern.
    pub fn add_norm(&mut self, norm: &RegulativeNorm) {
        let key = norm.label().to_string();
        self.cnorms.entry(key.clone()).or_default();
        let af = self.afs.entry(key).or_insert_with(Af::new);
        af.add_argument(norm.label());
    }

    /// Appends a constitutive norm to norm `n`'s closure rules.
    ///
    /// # Errors
    /// Returns [`Error::UnknownNorm`] if `n` hasn't been added yet.
    pub fn add_constitutive_norm(&mut self, n: &RegulativeNorm, cnorm: ConstitutiveNorm) -> Result<(), Error> {
        let key = n.label();
        self.cnorms
            .get_mut(key)
            .ok_or_else(|| Error::UnknownNorm { stakeholder: self.name.clone(), norm: key.to_string() })?
            .push(cnorm);
        Ok(())
    }

    /// Adds auxiliary arguments to norm `n`'s AF (beyond the norm label
    /// itself, which [`Stakeholder::add_norm`] already added).
    ///
    /// # Errors
    /// Returns [`Error::UnknownNorm`] if `n` hasn't been added yet.
    pub fn add_arguments(&mut self, n: &RegulativeNorm, args: impl IntoIterator<Item = impl Into<String>>) -> Result<(), Error> {
        let key = n.label();
        let af = self.afs.get_mut(key).ok_or_else(|| Error::UnknownNorm { stakeholder: self.name.clone(), norm: key.to_string() })?;
        for arg in args {
            af.add_argument(arg);
        }
        Ok(())
    }

    /// Adds attacks to norm `n`'s AF.
    ///
    /// # Errors
    /// Returns [`Error::UnknownNorm`] if `n` hasn't been added yet, or
    /// whatever [`Af::add_attack`] returns for a duplicate pair.
    pub fn add_attacks(&mut self, n: &RegulativeNorm, attacks: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Result<(), Error> {
        let key = n.label();
        let af = self.afs.get_mut(key).ok_or_else(|| Error::UnknownNorm { stakeholder: self.name.clone(), norm: key.to_string() })?;
        for (a, b) in attacks {
            af.add_attack(a, b)?;
        }
        Ok(())
    }

    /// Returns this stakeholder's AF for norm `n`, if registered.
    pub fn af(&self, n: &RegulativeNorm) -> Option<&Af> { self.afs.get(n.label()) }

    /// Computes the ε-closure of `seed` under norm `n`'s constitutive
    /// norms: iterates [`Stakeholder::closure_step`] until a round adds
    /// no new fact. Monotone in the seed set, and a fixed point of
    /// `closure_step`.
    pub fn closure(&self, n: &RegulativeNorm, seed: impl IntoIterator<Item = String>) -> BTreeSet<String> {
        let mut facts: BTreeSet<String> = seed.into_iter().collect();
        let mut round = 0u32;
        loop {
            let before = facts.len();
            facts = self.closure_step(n, facts);
            trace!("closure: stakeholder {} norm {} round {round} facts = {facts:?}", self.name, n.label());
            if facts.len() == before {
                return facts;
            }
            round += 1;
        }
    }

    /// A single closure round: adds the conclusion of every constitutive
    /// norm under `n` whose premise (and context, if any) is a subset of
    /// `facts`.
    fn closure_step(&self, n: &RegulativeNorm, facts: BTreeSet<String>) -> BTreeSet<String> {
        let mut next = facts.clone();
        if let Some(cnorms) = self.cnorms.get(n.label()) {
            for cnorm in cnorms {
                if cnorm.applies(&facts) {
                    next.extend(cnorm.conclusion().iter().cloned());
                }
            }
        }
        next
    }

    /// Returns the intersection of norm `n`'s AF arguments with `facts` —
    /// the arguments this stakeholder considers "active" given the
    /// closure it just computed.
    pub fn active_arguments(&self, n: &RegulativeNorm, facts: &BTreeSet<String>) -> Vec<String> {
        match self.afs.get(n.label()) {
            Some(af) => af.arguments().iter().filter(|a| facts.contains(a.as_str())).cloned().collect(),
            None => Vec::new(),
        }
    }
}


/***** TESTS *****/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::norm::Kind;

    #[test]
    fn closure_fixpoint() {
        // cnorms: ({p},{q}), ({q},{r}); seed={p} => closure={p,q,r}
        let n = RegulativeNorm::new(Kind::Prohibition, ["irrelevant"], [] as [&str; 0]);
        let mut sh = Stakeholder::new("test");
        sh.add_norm(&n);
        sh.add_constitutive_norm(&n, ConstitutiveNorm::new(["p"], ["q"], [] as [&str; 0])).unwrap();
        sh.add_constitutive_norm(&n, ConstitutiveNorm::new(["q"], ["r"], [] as [&str; 0])).unwrap();

        let closure = sh.closure(&n, ["p".to_string()]);
        assert_eq!(closure, BTreeSet::from(["p".to_string(), "q".to_string(), "r".to_string()]));

        // One more manual step does not change it.
        let again = sh.closure_step(&n, closure.clone());
        assert_eq!(again, closure);
    }

    #[test]
    fn closure_is_monotone_in_seed() {
        let n = RegulativeNorm::new(Kind::Prohibition, ["x"], [] as [&str; 0]);
        let mut sh = Stakeholder::new("test");
        sh.add_norm(&n);
        sh.add_constitutive_norm(&n, ConstitutiveNorm::new(["a"], ["b"], [] as [&str; 0])).unwrap();

        let small = sh.closure(&n, ["a".to_string()]);
        let big = sh.closure(&n, ["a".to_string(), "c".to_string()]);
        assert!(small.is_subset(&big));
    }

    #[test]
    fn unknown_norm_errors() {
        let n = RegulativeNorm::new(Kind::Prohibition, ["x"], [] as [&str; 0]);
        let mut sh = Stakeholder::new("test");
        assert!(matches!(sh.add_constitutive_norm(&n, ConstitutiveNorm::new(["a"], ["b"], [] as [&str; 0])), Err(Error::UnknownNorm { .. })));
    }
}
