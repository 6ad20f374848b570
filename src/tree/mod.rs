//! Node access traits for the hierarchical content tree.
//!
//! The index engine never owns the tree. It reads through [`NodeState`] and
//! writes through [`NodeBuilder`], which a copy-on-write store implements
//! on top of its own node representation. Changes staged on a builder are
//! only visible to other readers once the caller commits them.
//!
//! Children are addressed by name and have no native order. Anything that
//! needs an order (the ordered index) must keep it in properties.
//!
//! [`MemoryNode`] is an in-memory implementation backed by `Arc`-shared
//! maps: cloning a node is an O(1) snapshot and writes copy only the path
//! they touch.

pub mod memory;

pub use memory::MemoryNode;

/// A property value stored on a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyValue {
    String(String),
    Boolean(bool),
    Long(i64),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Boolean(b)
    }
}

impl From<i64> for PropertyValue {
    fn from(n: i64) -> Self {
        PropertyValue::Long(n)
    }
}

/// Read access to a node.
pub trait NodeState {
    /// Returns the named child, or `None` if it does not exist.
    fn get_child(&self, name: &str) -> Option<&Self>;

    fn get_property(&self, name: &str) -> Option<&PropertyValue>;

    /// Counts children, stopping once `max` is reached.
    fn child_count(&self, max: usize) -> usize;

    /// Names of all children, in store order.
    fn child_names(&self) -> Box<dyn Iterator<Item = &str> + '_>;

    fn has_child(&self, name: &str) -> bool {
        self.get_child(name).is_some()
    }

    fn has_property(&self, name: &str) -> bool {
        self.get_property(name).is_some()
    }

    fn get_string(&self, name: &str) -> Option<&str> {
        self.get_property(name).and_then(PropertyValue::as_str)
    }

    fn get_bool(&self, name: &str) -> bool {
        self.get_property(name)
            .and_then(PropertyValue::as_bool)
            .unwrap_or(false)
    }

    /// Resolves a chain of child names starting at this node.
    fn descendant<'a, I>(&self, names: I) -> Option<&Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .try_fold(self, |node, name| node.get_child(name))
    }
}

/// Write access to a node staged in a copy-on-write builder.
pub trait NodeBuilder: NodeState {
    /// Returns the named child, creating it when missing.
    fn child(&mut self, name: &str) -> &mut Self;

    /// Returns the named child only when it already exists.
    fn get_child_mut(&mut self, name: &str) -> Option<&mut Self>;

    fn set_property(&mut self, name: &str, value: PropertyValue);

    /// Removes a property. Returns whether it was present.
    fn remove_property(&mut self, name: &str) -> bool;

    /// Removes a child and its subtree. Returns whether it was present.
    fn remove_child(&mut self, name: &str) -> bool;

    fn descendant_mut<'a, I>(&mut self, names: I) -> Option<&mut Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .try_fold(self, |node, name| node.get_child_mut(name))
    }
}
