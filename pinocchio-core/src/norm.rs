//  NORM.rs
//    Defines constitutive and regulative norms, and what it means for a
//    regulative norm to be complied with.
//

use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};


/***** HELPERS *****/
/// Canonicalises a label set: sorted, deduplicated. Used so equivalent
/// norms (same premise/context up to ordering) always produce the same
/// canonical string.
fn canonicalise(labels: &[String]) -> Vec<String> {
    let set: BTreeSet<&str> = labels.iter().map(String::as_str).collect();
    set.into_iter().map(str::to_string).collect()
}

fn fmt_set(labels: &[String]) -> String { format!("[{}]", labels.join(", ")) }


/***** CONSTITUTIVE NORMS *****/
/// `C(premise, conclusion | context)`: under `context`, presence of every
/// label in `premise` implies derivation of every label in `conclusion`.
/// An empty `context` is a tautology (always applies). Immutable after
/// construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstitutiveNorm {
    premise: Vec<String>,
    conclusion: Vec<String>,
    context: Vec<String>,
}

impl ConstitutiveNorm {
    /// Builds a constitutive norm. Panics if `premise` or `conclusion` is
    /// empty: both must be non-empty sets of labels.
    pub fn new(premise: impl IntoIterator<Item = impl Into<String>>, conclusion: impl IntoIterator<Item = impl Into<String>>, context: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let premise: Vec<String> = premise.into_iter().map(Into::into).collect();
        let conclusion: Vec<String> = conclusion.into_iter().map(Into::into).collect();
        let context: Vec<String> = context.into_iter().map(Into::into).collect();
        assert!(!premise.is_empty(), "ConstitutiveNorm premise must be non-empty");
        assert!(!conclusion.is_empty(), "ConstitutiveNorm conclusion must be non-empty");
        Self { premise, conclusion, context }
    }

    pub fn premise(&self) -> &[String] { &self.premise }
    pub fn conclusion(&self) -> &[String] { &self.conclusion }
    pub fn context(&self) -> &[String] { &self.context }

    /// True iff `premise` (and, if present, `context`) are all present in `facts`.
    pub fn applies(&self, facts: &BTreeSet<String>) -> bool {
        self.premise.iter().all(|p| facts.contains(p)) && self.context.iter().all(|c| facts.contains(c))
    }
}

impl Display for ConstitutiveNorm {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.context.is_empty() {
            write!(f, "C({}, {})", fmt_set(&self.premise), fmt_set(&self.conclusion))
        } else {
            write!(f, "C({}, {} | {})", fmt_set(&self.premise), fmt_set(&self.conclusion), fmt_set(&self.context))
        }
    }
}


/***** REGULATIVE NORMS *****/
/// The deontic kind of a [`RegulativeNorm`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Forbidden: complies iff the premise is *not* fully satisfied.
    Prohibition,
    /// Permitted: complies trivially, permissions never violate.
    Permission,
    /// Obligatory: complies iff the premise *is* fully satisfied.
    Obligation,
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let c = match self {
            Kind::Prohibition => 'F',
            Kind::Permission => 'P',
            Kind::Obligation => 'O',
        };
        write!(f, "{c}")
    }
}

/// `Kind(premise | context)`: under `context`, `Kind` the condition `premise`.
/// The canonical label doubles as this norm's argument identifier in every
/// AF it appears in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegulativeNorm {
    kind: Kind,
    premise: Vec<String>,
    context: Vec<String>,
    weight: f64,
    label: String,
}

impl RegulativeNorm {
    /// Builds a regulative norm with the default weight (1.0).
    pub fn new(kind: Kind, premise: impl IntoIterator<Item = impl Into<String>>, context: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let premise: Vec<String> = canonicalise(&premise.into_iter().map(Into::into).collect::<Vec<_>>());
        let context: Vec<String> = canonicalise(&context.into_iter().map(Into::into).collect::<Vec<_>>());
        let label = Self::build_label(kind, &premise, &context);
        Self { kind, premise, context, weight: 1.0, label }
    }

    /// Builds a regulative norm with an explicit weight, used to scale the
    /// V-signal contribution on violation.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    fn build_label(kind: Kind, premise: &[String], context: &[String]) -> String {
        if context.is_empty() {
            format!("{kind}({})", fmt_set(premise))
        } else {
            format!("{kind}({} | {})", fmt_set(premise), fmt_set(context))
        }
    }

    pub fn kind(&self) -> Kind { self.kind }
    pub fn premise(&self) -> &[String] { &self.premise }
    pub fn context(&self) -> &[String] { &self.context }
    pub fn weight(&self) -> f64 { self.weight }

    /// The canonical label, e.g. `F([knowledge])`. Doubles as this norm's
    /// argument identifier.
    pub fn label(&self) -> &str { &self.label }

    /// Whether `facts` complies with this norm's body:
    /// - Prohibition: complies iff **not all** premise labels are in `facts`.
    /// - Obligation: complies iff **all** premise labels are in `facts`.
    /// - Permission: complies trivially.
    pub fn comply(&self, facts: &BTreeSet<String>) -> bool {
        let premise_holds = self.premise.iter().all(|p| facts.contains(p));
        match self.kind {
            Kind::Prohibition => !premise_holds,
            Kind::Obligation => premise_holds,
            Kind::Permission => true,
        }
    }
}

impl Display for RegulativeNorm {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { write!(f, "{}", self.label) }
}


/***** TESTS *****/
#[cfg(test)]
mod tests {
    use super::*;

    fn facts(labels: &[&str]) -> BTreeSet<String> { labels.iter().map(|s| s.to_string()).collect() }

    #[test]
    fn prohibition_complies_without_premise() {
        let n = RegulativeNorm::new(Kind::Prohibition, ["knowledge"], [] as [&str; 0]);
        assert!(n.comply(&facts(&[])));
        assert!(!n.comply(&facts(&["knowledge"])));
    }

    #[test]
    fn obligation_complies_with_premise() {
        let n = RegulativeNorm::new(Kind::Obligation, ["helmet"], [] as [&str; 0]);
        assert!(!n.comply(&facts(&[])));
        assert!(n.comply(&facts(&["helmet"])));
    }

    #[test]
    fn permission_always_complies() {
        let n = RegulativeNorm::new(Kind::Permission, ["anything"], [] as [&str; 0]);
        assert!(n.comply(&facts(&[])));
        assert!(n.comply(&facts(&["anything"])));
    }

    #[test]
    fn label_is_canonical_regardless_of_premise_order() {
        let a = RegulativeNorm::new(Kind::Prohibition, ["b", "a"], [] as [&str; 0]);
        let b = RegulativeNorm::new(Kind::Prohibition, ["a", "b"], [] as [&str; 0]);
        assert_eq!(a.label(), b.label());
    }

    #[test]
    fn constitutive_norm_applies_requires_context() {
        let c = ConstitutiveNorm::new(["eat"], ["knowledge"], ["daytime"]);
        assert!(!c.applies(&facts(&["eat"])));
        assert!(c.applies(&facts(&["eat", "daytime"])));
    }
}
