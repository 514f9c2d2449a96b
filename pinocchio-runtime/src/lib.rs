//  LIB.rs
//    Episodic driver for pinocchio-core: a discrete grid world, world
//    objects, an action vocabulary, run-historic records, and the
//    environment that ties them to a judge and a learner every step.
//
//!   This crate owns all of the I/O pinocchio-core deliberately lacks:
//!   grid map loading, object definitions, and the preset interface
//!   concrete scenarios implement.

pub mod action;
pub mod env;
pub mod grid;
pub mod history;
pub mod object;
pub mod preset;
pub mod state;

pub use action::{ActionSpec, Direction, Speed};
pub use env::Environment;
pub use grid::{CellType, Grid, GridError};
pub use history::{moving_average, RunRecord, StepLog};
pub use object::{ItemCondition, WorldObject};
pub use preset::{PresetBuilder, PresetInit, PresetReload};
pub use state::{state_key_with_inventories, StateDict};
