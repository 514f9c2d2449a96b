//  LIB.rs
//    Core of a normative reinforcement-learning agent: an abstract
//    argumentation framework, a regulative/constitutive norm model, a
//    stakeholder-driven judge, and a multi-objective tabular Q-learner.
//
//!   This crate implements the judge and the learner described by the
//!   surrounding driver's specification. It owns no I/O: grid loading,
//!   display, and preset catalogs live in `pinocchio-runtime`.

pub mod af;
pub mod agent;
pub mod error;
pub mod fact;
pub mod judge;
pub mod norm;
pub mod qagent;
pub mod stakeholder;
pub mod state;

pub use af::Af;
pub use agent::NormativeAgent;
pub use error::Error;
pub use fact::FactRegistry;
pub use judge::{Judge, Judgment, NormVerdict, Signals};
pub use norm::{ConstitutiveNorm, Kind, RegulativeNorm};
pub use qagent::{DecaySchedule, QAgent, QAgentConfig, Role, SelectionMethod, Tolerance};
pub use stakeholder::Stakeholder;
pub use state::StateKey;
