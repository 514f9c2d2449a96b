//  AF.rs
//    Implements the abstract argumentation framework (Dung-style) used
//    to resolve whether a regulative norm's canonical argument survives
//    once every stakeholder's attacks are merged.
//

use std::collections::{HashMap, HashSet};

use log::trace;

use crate::error::Error;


/***** LIBRARY *****/
/// A directed attack graph over string argument identifiers.
///
/// Arguments are kept in insertion order (important for deterministic
/// iteration in the grounded-extension fixpoint and for any caller that
/// wants a stable debug dump). Attacks are unique directed pairs; adding
/// a duplicate is an error rather than a silent no-op.
#[derive(Clone, Debug, Default)]
pub struct Af {
    arguments: Vec<String>,
    present: HashSet<String>,
    attacks: HashSet<(String, String)>,
    /// attackers_of[x] = { a : (a, x) is an attack }
    attackers_of: HashMap<String, Vec<String>>,
    /// attacks_from[x] = { b : (x, b) is an attack }
    attacks_from: HashMap<String, Vec<String>>,
}

impl Af {
    /// Creates an empty argumentation framework.
    pub fn new() -> Self { Self::default() }

    /// Adds an argument, idempotently. Insertion order is preserved across
    /// repeated calls: re-adding an existing argument does not move it.
    pub fn add_argument(&mut self, arg: impl Into<String>) {
        let arg = arg.into();
        if self.present.insert(arg.clone()) {
            self.arguments.push(arg);
        }
    }

    /// Registers a directed attack `attacker -> attacked`. Both endpoints
    /// are auto-added as arguments if not already present, since the
    /// judge assembles attacks before it knows the full active-argument
    /// set.
    ///
    /// # Errors
    /// Returns [`Error::DuplicateAttack`] if this exact pair was already
    /// registered.
    pub fn add_attack(&mut self, attacker: impl Into<String>, attacked: impl Into<String>) -> Result<(), Error> {
        let attacker = attacker.into();
        let attacked = attacked.into();
        if self.attacks.contains(&(attacker.clone(), attacked.clone())) {
            return Err(Error::DuplicateAttack { attacker, attacked });
        }
        self.add_argument(attacker.clone());
        self.add_argument(attacked.clone());

        self.attackers_of.entry(attacked.clone()).or_default().push(attacker.clone());
        self.attacks_from.entry(attacker.clone()).or_default().push(attacked.clone());
        self.attacks.insert((attacker, attacked));
        Ok(())
    }

    /// Returns the arguments attacking `arg`, i.e. `{ a : (a, arg) in Attacks }`.
    pub fn attackers_of(&self, arg: &str) -> &[String] {
        self.attackers_of.get(arg).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the arguments `arg` attacks, i.e. `{ b : (arg, b) in Attacks }`.
    pub fn attacked_by(&self, arg: &str) -> &[String] {
        self.attacks_from.get(arg).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns all registered arguments, in insertion order.
    pub fn arguments(&self) -> &[String] { &self.arguments }

    /// Returns all registered attacks, as `(attacker, attacked)` pairs.
    pub fn attacks(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attacks.iter().map(|(a, b)| (a.as_str(), b.as_str()))
    }

    /// Computes the grounded extension.
    ///
    /// Labels every argument UNDEC, then repeatedly finds every "root" —
    /// an UNDEC argument all of whose attackers are OUT — and sets every
    /// root IN in the same round, marking everything it attacks OUT.
    /// Arguments inside a cycle never acquire an IN attacker-free round
    /// and stay UNDEC forever, so they're correctly excluded. Terminates
    /// when a round finds no new root; O(V·E) in the worst case since
    /// each round removes at least one argument from contention.
    pub fn grounded_extension(&self) -> HashSet<String> {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Status {
            Undec,
            In,
            Out,
        }

        let mut status: HashMap<&str, Status> = self.arguments.iter().map(|a| (a.as_str(), Status::Undec)).collect();

        let mut round = 0u32;
        loop {
            let roots: Vec<&str> = self
                .arguments
                .iter()
                .map(String::as_str)
                .filter(|arg| status[arg] == Status::Undec)
                .filter(|arg| self.attackers_of(arg).iter().all(|a| status[a.as_str()] == Status::Out))
                .collect();

            if roots.is_empty() {
                trace!("grounded_extension: round {round} found no new root, fixpoint reached");
                break;
            }
            trace!("grounded_extension: round {round} roots = {roots:?}");
            round += 1;

            for &root in &roots {
                status.insert(root, Status::In);
            }
            for &root in &roots {
                for attacked in self.attacked_by(root) {
                    status.insert(attacked.as_str(), Status::Out);
                }
            }
        }

        status.into_iter().filter(|(_, s)| *s == Status::In).map(|(a, _)| a.to_string()).collect()
    }
}


/***** TESTS *****/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_af_has_empty_extension() {
        let af = Af::new();
        assert!(af.grounded_extension().is_empty());
    }

    #[test]
    fn no_attacks_extension_is_all_arguments() {
        let mut af = Af::new();
        af.add_argument("a");
        af.add_argument("b");
        let ext = af.grounded_extension();
        assert_eq!(ext, HashSet::from(["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn self_attacker_never_in() {
        let mut af = Af::new();
        af.add_attack("a", "a").unwrap();
        assert!(af.grounded_extension().is_empty());
    }

    #[test]
    fn duplicate_attack_errors() {
        let mut af = Af::new();
        af.add_attack("a", "b").unwrap();
        assert!(matches!(af.add_attack("a", "b"), Err(Error::DuplicateAttack { .. })));
    }

    #[test]
    fn duplicate_argument_is_noop() {
        let mut af = Af::new();
        af.add_argument("a");
        af.add_argument("a");
        assert_eq!(af.arguments(), &["a".to_string()]);
    }

    #[test]
    fn grounded_extension_cycle() {
        // args {a,b,c}, attacks {(a,b),(b,a),(c,a)} => extension {c}
        let mut af = Af::new();
        af.add_attack("a", "b").unwrap();
        af.add_attack("b", "a").unwrap();
        af.add_attack("c", "a").unwrap();
        let ext = af.grounded_extension();
        assert_eq!(ext, HashSet::from(["c".to_string()]));
    }

    #[test]
    fn grounded_extension_chain() {
        // args {a,b,c,d}, attacks {(a,b),(b,c),(c,d)} => extension {a,c}
        let mut af = Af::new();
        af.add_attack("a", "b").unwrap();
        af.add_attack("b", "c").unwrap();
        af.add_attack("c", "d").unwrap();
        let ext = af.grounded_extension();
        assert_eq!(ext, HashSet::from(["a".to_string(), "c".to_string()]));
    }

    #[test]
    fn grounded_extension_is_admissible_and_conflict_free() {
        let mut af = Af::new();
        af.add_attack("a", "b").unwrap();
        af.add_attack("b", "c").unwrap();
        af.add_attack("c", "d").unwrap();
        af.add_attack("x", "y").unwrap();
        let ext = af.grounded_extension();
        for arg in &ext {
            for attacker in af.attackers_of(arg) {
                assert!(!ext.contains(attacker), "'{attacker}' attacks IN argument '{arg}'");
            }
        }
    }
}
