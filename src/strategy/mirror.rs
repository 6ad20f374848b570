use super::{prune_segments, validate_key, IndexEntry, IndexStoreStrategy};
use crate::error::Result;
use crate::tree::{NodeBuilder, NodeState};

/// Unordered content mirror: one child of the index per key, enumerated in
/// whatever order the store lists children.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentMirror;

impl IndexStoreStrategy for ContentMirror {
    type Entries<'a, N>
        = ChildEntries<'a, N>
    where
        N: NodeState + 'a;

    fn fetch_key_node<'a, N: NodeBuilder>(
        &self,
        index: &'a mut N,
        key: &str,
    ) -> Result<&'a mut N> {
        validate_key(key)?;
        Ok(index.child(key))
    }

    fn prune<N: NodeBuilder>(&self, index: &mut N, key: &str, segments: &[&str]) -> Result<()> {
        if prune_segments(index, key, segments) {
            index.remove_child(key);
        }
        Ok(())
    }

    fn entries<'a, N>(&self, index: &'a N) -> Self::Entries<'a, N>
    where
        N: NodeState + 'a,
    {
        ChildEntries {
            index,
            names: index.child_names(),
        }
    }
}

/// Key nodes of an unordered index, in store order.
pub struct ChildEntries<'a, N> {
    index: &'a N,
    names: Box<dyn Iterator<Item = &'a str> + 'a>,
}

impl<'a, N: NodeState> Iterator for ChildEntries<'a, N> {
    type Item = Result<IndexEntry<'a, N>>;

    fn next(&mut self) -> Option<Self::Item> {
        for name in self.names.by_ref() {
            if let Some(node) = self.index.get_child(name) {
                return Some(Ok(IndexEntry::new(name, Some(node))));
            }
        }
        None
    }
}
