//  STATE.rs
//    Defines the opaque, hashable state key the Q-tables are indexed by,
//    preferring a structured key with derived Hash/Eq over a hash-string.
//

use std::hash::Hash;


/***** LIBRARY *****/
/// A deterministic, stable-within-a-run summary of: the grid layout hash
/// (cached once at load time, not rehashed every step), every agent's
/// position, every object's position, each agent's sorted inventory, and
/// a coarse iteration bucket (`iter / 5`).
///
/// Deriving `Hash`/`Eq` over a struct of plain fields is preferred over
/// hashing a formatted string every step.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StateKey {
    grid_hash: u64,
    agent_positions: Vec<(String, i64, i64)>,
    object_positions: Vec<(String, i64, i64)>,
    /// `(agent_name, sorted inventory)` tuples.
    inventories: Vec<(String, Vec<String>)>,
    iter_bucket: u64,
}

impl StateKey {
    /// Builds a state key. Callers are responsible for presenting
    /// `agent_positions`/`object_positions`/`inventories` in a
    /// deterministic order (e.g. sorted by name) so that two logically
    /// identical states hash equal regardless of iteration order
    /// upstream.
    pub fn from_parts(grid_hash: u64, agent_positions: Vec<(String, i64, i64)>, object_positions: Vec<(String, i64, i64)>, inventories: Vec<(String, Vec<String>)>, iteration: u64) -> Self {
        let mut inventories = inventories;
        for (_, inv) in &mut inventories {
            inv.sort();
        }
        Self { grid_hash, agent_positions, object_positions, inventories, iter_bucket: iteration / 5 }
    }
}


/***** TESTS *****/
