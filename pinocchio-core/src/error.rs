//  ERROR.rs
//    Defines the fatal error conditions surfaced by the core at setup
//    and update time. Runtime conditions that are recovered locally
//    (blocked movement, unsatisfied object conditions, empty AFs) are
//    not represented here.
//

use std::error;
use std::fmt::{self, Display, Formatter};


/***** LIBRARY *****/
/// Fatal errors raised while building or driving a [`crate::agent::NormativeAgent`].
///
/// All of these indicate a setup mistake or a driver/agent mismatch; none
/// of them are expected to occur once a preset has been wired correctly,
/// so callers are expected to `unwrap`/propagate rather than recover.
#[derive(Debug)]
pub enum Error {
    /// Tried to register an attack that was already present in an [`crate::af::Af`].
    DuplicateAttack { attacker: String, attacked: String },
    /// Tried to set arguments, attacks, or constitutive norms on a regulative
    /// norm that hadn't been registered on the stakeholder yet.
    UnknownNorm { stakeholder: String, norm: String },
    /// Tried to register a fact extractor under a label that already exists.
    DuplicateFact { label: String },
    /// Tried to register a Q-function (signal) under a name that already exists.
    DuplicateQFunction { name: String },
    /// A preference (or non-ordered signal) had no corresponding entry in
    /// the signal dict handed to [`crate::qagent::QAgent::update`].
    MissingSignal { signal: String },
    /// A moving-average window was not strictly positive.
    InvalidWindow { window: i64 },
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use Error::*;
        match self {
            DuplicateAttack { attacker, attacked } => {
                write!(f, "attack from '{attacker}' to '{attacked}' already exists")
            },
            UnknownNorm { stakeholder, norm } => {
                write!(f, "norm '{norm}' is not registered on stakeholder '{stakeholder}'")
            },
            DuplicateFact { label } => write!(f, "fact '{label}' already has a registered extractor"),
            DuplicateQFunction { name } => write!(f, "Q-function '{name}' already exists"),
            MissingSignal { signal } => write!(f, "signal '{signal}' missing from the signal dict passed to updateQFunctions"),
            InvalidWindow { window } => write!(f, "moving-average window must be positive, got {window}"),
        }
    }
}
impl error::Error for Error {}
