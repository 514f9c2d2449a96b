//  STATE.rs
//    The rich state-dict view fact extractors read, and the function
//    that condenses a live `Environment` snapshot into the opaque
//    `StateKey` the Q-tables index by.
//

use std::collections::HashMap;

use pinocchio_core::StateKey;

use crate::grid::Grid;
use crate::object::WorldObject;


/***** LIBRARY *****/
/// A snapshot of the world passed to fact extractors: grid layout hash,
/// every agent's position, the live object map, and the elapsed
/// iterations since the last episode reset.
#[derive(Clone, Debug)]
pub struct StateDict {
    pub grid_hash: u64,
    pub positions: HashMap<String, (i64, i64)>,
    pub objects: HashMap<String, WorldObject>,
    pub iterations: u64,
}

/// Condenses `(grid, positions, objects, inventories, iterations)` into a
/// deterministic [`StateKey`], sorting every map by name first so two
/// logically identical states hash equal regardless of iteration order.
/// Folds in each agent's sorted inventory as `(agent, sorted inventory)` tuples.
pub fn state_key_with_inventories(grid: &Grid, positions: &HashMap<String, (i64, i64)>, objects: &HashMap<String, WorldObject>, inventories: &HashMap<String, Vec<String>>, iteration: u64) -> StateKey {
    let mut agent_positions: Vec<(String, i64, i64)> = positions.iter().map(|(name, &(x, y))| (name.clone(), x, y)).collect();
    agent_positions.sort();

    let mut object_positions: Vec<(String, i64, i64)> = objects.iter().map(|(name, obj)| (name.clone(), obj.pos.0, obj.pos.1)).collect();
    object_positions.sort();

    let mut invs: Vec<(String, Vec<String>)> = inventories.iter().map(|(name, items)| (name.clone(), items.clone())).collect();
    invs.sort_by(|a, b| a.0.cmp(&b.0));

    StateKey::from_parts(grid.layout_hash(), agent_positions, object_positions, invs, iteration)
}


/***** TESTS *****/
