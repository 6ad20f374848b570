use std::collections::BTreeMap;
use std::sync::Arc;

use super::{NodeBuilder, NodeState, PropertyValue};

/// In-memory copy-on-write node.
///
/// Properties and children sit behind `Arc`s. Cloning a node shares both
/// maps; the first write through a clone copies the map it touches and
/// nothing else, so a clone taken before a mutation is a stable snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryNode {
    properties: Arc<BTreeMap<String, PropertyValue>>,
    children: Arc<BTreeMap<String, MemoryNode>>,
}

impl MemoryNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a read-only view of the current state.
    pub fn snapshot(&self) -> MemoryNode {
        self.clone()
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    /// Whether both nodes share the same child map without a copy.
    pub fn shares_children_with(&self, other: &MemoryNode) -> bool {
        Arc::ptr_eq(&self.children, &other.children)
    }
}

impl NodeState for MemoryNode {
    fn get_child(&self, name: &str) -> Option<&Self> {
        self.children.get(name)
    }

    fn get_property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    fn child_count(&self, max: usize) -> usize {
        self.children.len().min(max)
    }

    fn child_names(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.children.keys().map(String::as_str))
    }
}

impl NodeBuilder for MemoryNode {
    fn child(&mut self, name: &str) -> &mut Self {
        Arc::make_mut(&mut self.children)
            .entry(name.to_string())
            .or_default()
    }

    fn get_child_mut(&mut self, name: &str) -> Option<&mut Self> {
        // Avoid copying the child map for a miss.
        if !self.children.contains_key(name) {
            return None;
        }
        Arc::make_mut(&mut self.children).get_mut(name)
    }

    fn set_property(&mut self, name: &str, value: PropertyValue) {
        if self.properties.get(name) == Some(&value) {
            return;
        }
        Arc::make_mut(&mut self.properties).insert(name.to_string(), value);
    }

    fn remove_property(&mut self, name: &str) -> bool {
        if !self.properties.contains_key(name) {
            return false;
        }
        Arc::make_mut(&mut self.properties).remove(name).is_some()
    }

    fn remove_child(&mut self, name: &str) -> bool {
        if !self.children.contains_key(name) {
            return false;
        }
        Arc::make_mut(&mut self.children).remove(name).is_some()
    }
}
