//  FACT.rs
//    Defines atomic fact extraction: pure predicates over a world state
//    and the transient flags emitted by the last action.
//

use std::collections::HashMap;

use crate::error::Error;


/***** LIBRARY *****/
/// A registry of named fact extractors.
///
/// Each extractor is a boxed closure `Fn(&S, &[String]) -> bool`, generic
/// over whatever rich state-dict type `S` the embedding crate uses.
/// Registration order is not meaningful: extractors must be independent
/// of one another.
pub struct FactRegistry<S> {
    extractors: HashMap<String, Box<dyn Fn(&S, &[String]) -> bool>>,
}

impl<S> Default for FactRegistry<S> {
    fn default() -> Self { Self { extractors: HashMap::new() } }
}

impl<S> FactRegistry<S> {
    pub fn new() -> Self { Self::default() }

    /// Registers a new extractor under `label`.
    ///
    /// # Errors
    /// Returns [`Error::DuplicateFact`] if `label` is already registered.
    pub fn register(&mut self, label: impl Into<String>, extractor: impl Fn(&S, &[String]) -> bool + 'static) -> Result<(), Error> {
        let label = label.into();
        if self.extractors.contains_key(&label) {
            return Err(Error::DuplicateFact { label });
        }
        self.extractors.insert(label, Box::new(extractor));
        Ok(())
    }

    /// Evaluates every registered extractor against `(state, flags)` and
    /// returns the labels whose extractor returned true. Evaluation order
    /// is unspecified: extractors are assumed independent, so a
    /// [`HashMap`]'s iteration order is fine here.
    pub fn evaluate(&self, state: &S, flags: &[String]) -> Vec<String> {
        self.extractors.iter().filter(|(_, f)| f(state, flags)).map(|(label, _)| label.clone()).collect()
    }

    pub fn len(&self) -> usize { self.extractors.len() }
    pub fn is_empty(&self) -> bool { self.extractors.is_empty() }
}


/***** BUILT-IN EXTRACTORS *****/
/// Common extractor shapes beyond a raw closure: positional comparisons,
/// inventory membership, time-window checks, and action-tuple inspection.
/// These are convenience constructors that
/// return the closure a caller passes to [`FactRegistry::register`]; they
/// aren't a separate enum because a boxed `Fn` already unifies them.
pub mod builtins {
    /// A fact that holds when `flag` is present in the step's flags.
    pub fn flag_present<S>(flag: impl Into<String>) -> impl Fn(&S, &[String]) -> bool {
        let flag = flag.into();
        move |_state, flags| flags.iter().any(|f| f == &flag)
    }
}


/***** TESTS *****/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_registration_errors() {
        let mut reg: FactRegistry<()> = FactRegistry::new();
        reg.register("eat", |_s, flags: &[String]| flags.iter().any(|f| f == "eat")).unwrap();
        assert!(matches!(reg.register("eat", |_s, _f: &[String]| true), Err(Error::DuplicateFact { .. })));
    }

    #[test]
    fn evaluate_collects_true_labels() {
        let mut reg: FactRegistry<()> = FactRegistry::new();
        reg.register("eat", |_s, flags: &[String]| flags.iter().any(|f| f == "eat")).unwrap();
        reg.register("never", |_s, _f: &[String]| false).unwrap();
        let facts = reg.evaluate(&(), &["eat".to_string()]);
        assert_eq!(facts, vec!["eat".to_string()]);
    }

    #[test]
    fn builtin_flag_present() {
        let f = builtins::flag_present::<()>("speeding");
        assert!(f(&(), &["speeding".to_string()]));
        assert!(!f(&(), &["pavement".to_string()]));
    }
}
