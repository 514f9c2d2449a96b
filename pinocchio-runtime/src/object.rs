//  OBJECT.rs
//    World objects: positioned, triggerable entities an agent interacts
//    with by stepping onto their cell.
//

use serde::{Deserialize, Serialize};


/***** CONDITION *****/
/// A single entry of an object's `condition` list: either requires an
/// item in the agent's inventory, or (an entry prefixed `"not-"`)
/// requires its absence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemCondition {
    Has(String),
    Lacks(String),
}

impl ItemCondition {
    /// Parses a single condition entry, splitting off a leading `"not-"`
    /// once at construction time rather than re-parsing it every step.
    pub fn parse(entry: &str) -> Self {
        match entry.strip_prefix("not-") {
            Some(item) => ItemCondition::Lacks(item.to_string()),
            None => ItemCondition::Has(entry.to_string()),
        }
    }

    pub fn satisfied(&self, inventory: &[String]) -> bool {
        match self {
            ItemCondition::Has(item) => inventory.iter().any(|i| i == item),
            ItemCondition::Lacks(item) => !inventory.iter().any(|i| i == item),
        }
    }
}


/***** OBJECT *****/
/// A world object definition, keyed by name in the preset's object map.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorldObject {
    pub pos: (i64, i64),
    pub symbol: char,
    pub flags: Vec<String>,
    pub global_flags: Vec<String>,
    pub reward: f64,
    pub permanent: bool,
    pub inv_add: Vec<String>,
    pub inv_rem: Vec<String>,
    pub condition: Vec<ItemCondition>,
}

impl WorldObject {
    pub fn new(pos: (i64, i64), symbol: char) -> Self {
        Self { pos, symbol, flags: Vec::new(), global_flags: Vec::new(), reward: 0.0, permanent: false, inv_add: Vec::new(), inv_rem: Vec::new(), condition: Vec::new() }
    }

    pub fn with_reward(mut self, reward: f64) -> Self {
        self.reward = reward;
        self
    }
    pub fn with_flags(mut self, flags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.flags = flags.into_iter().map(Into::into).collect();
        self
    }
    pub fn with_global_flags(mut self, flags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.global_flags = flags.into_iter().map(Into::into).collect();
        self
    }
    pub fn permanent(mut self) -> Self {
        self.permanent = true;
        self
    }
    pub fn with_inv_add(mut self, items: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.inv_add = items.into_iter().map(Into::into).collect();
        self
    }
    pub fn with_inv_rem(mut self, items: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.inv_rem = items.into_iter().map(Into::into).collect();
        self
    }
    pub fn with_condition(mut self, entries: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        self.condition = entries.into_iter().map(|e| ItemCondition::parse(e.as_ref())).collect();
        self
    }

    /// Whether this object currently triggers for an agent holding `inventory`.
    pub fn triggers_for(&self, inventory: &[String]) -> bool { self.condition.iter().all(|c| c.satisfied(inventory)) }
}


/***** TESTS *****/
