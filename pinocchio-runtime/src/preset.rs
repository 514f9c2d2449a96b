//  PRESET.rs
//    The interface the driver consumes to obtain a world, its agents,
//    and its objects. Concrete preset catalogs (which norms, which
//    objects, which maps) are external collaborators, not part of this
//    core.
//

use std::collections::HashMap;

use crate::grid::Grid;
use crate::object::WorldObject;
use crate::state::StateDict;

use pinocchio_core::NormativeAgent;


/***** LIBRARY *****/
/// Everything the driver needs to start a fresh run: the grid, the fully
/// wired agents (norms, stakeholders, fact extractors, actions already
/// set), the starting objects, starting positions, and the run/episode
/// length.
pub struct PresetInit {
    pub grid: Grid,
    pub agents: Vec<NormativeAgent<StateDict>>,
    pub objects: HashMap<String, WorldObject>,
    pub positions: HashMap<String, (i64, i64)>,
    pub steps: u64,
    pub timeout: u64,
    pub stochasticity: f64,
}

/// What a `reset_agent=false` reload rebuilds: fresh objects and
/// starting positions. Q-tables, norms, and stakeholders are untouched.
pub struct PresetReload {
    pub objects: HashMap<String, WorldObject>,
    pub positions: HashMap<String, (i64, i64)>,
}

/// A preset builder: supplies the map, agent constructors, action set,
/// norms/stakeholders, and object definitions.
pub trait PresetBuilder {
    /// Builds everything from scratch, as if starting a brand-new run.
    fn build(&self) -> PresetInit;

    /// Rebuilds objects and starting positions only, for a
    /// `reset_agent=false` episode boundary.
    fn reload(&self) -> PresetReload;
}
