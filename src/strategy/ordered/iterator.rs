use std::iter::FusedIterator;

use super::{NEXT, START};
use crate::error::{Error, Result};
use crate::strategy::IndexEntry;
use crate::tree::NodeState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor<'a> {
    /// The sentinel is yielded next.
    EmitStart,
    /// The entry named here is yielded next.
    Scanning { next: &'a str },
    Done,
}

impl<'a> Cursor<'a> {
    fn after(next: &'a str) -> Self {
        if next.is_empty() {
            Cursor::Done
        } else {
            Cursor::Scanning { next }
        }
    }
}

/// Walks the chain of an ordered index from `:start`.
///
/// The walk reads the snapshot it was created from and never sees later
/// writes. A pointer naming a missing node, or more hops than the index has
/// children, yields one [`Error::ChainCorruption`] and ends the walk.
pub struct OrderedEntries<'a, N> {
    index: &'a N,
    start: Option<&'a N>,
    cursor: Cursor<'a>,
    hops: usize,
    max_hops: usize,
}

impl<N> Clone for OrderedEntries<'_, N> {
    fn clone(&self) -> Self {
        Self {
            index: self.index,
            start: self.start,
            cursor: self.cursor,
            hops: self.hops,
            max_hops: self.max_hops,
        }
    }
}

impl<'a, N: NodeState> OrderedEntries<'a, N> {
    /// With `include_start`, the sentinel comes first even when it has not
    /// been materialized yet; its entry then carries no node.
    pub fn new(index: &'a N, include_start: bool) -> Self {
        let start = index.get_child(START);
        let cursor = if include_start {
            Cursor::EmitStart
        } else {
            Cursor::after(start.and_then(|s| s.get_string(NEXT)).unwrap_or(""))
        };

        Self {
            index,
            start,
            cursor,
            hops: 0,
            max_hops: index.child_count(usize::MAX),
        }
    }

    /// Pulls the next element, failing with [`Error::IteratorExhausted`]
    /// once the chain has ended.
    pub fn next_entry(&mut self) -> Result<IndexEntry<'a, N>> {
        self.next().unwrap_or(Err(Error::IteratorExhausted))
    }

    /// The traversal is read-only; removal always fails.
    pub fn remove(&mut self) -> Result<()> {
        Err(Error::UnsupportedMutation(
            "entries cannot be removed through an ordered traversal",
        ))
    }

    pub fn is_done(&self) -> bool {
        self.cursor == Cursor::Done
    }
}

impl<'a, N: NodeState> Iterator for OrderedEntries<'a, N> {
    type Item = Result<IndexEntry<'a, N>>;

    fn next(&mut self) -> Option<Self::Item> {
        match std::mem::replace(&mut self.cursor, Cursor::Done) {
            Cursor::Done => None,
            Cursor::EmitStart => {
                let entry = IndexEntry::new(START, self.start);
                self.cursor = Cursor::after(entry.next_key());
                Some(Ok(entry))
            }
            Cursor::Scanning { next } => {
                self.hops += 1;
                if self.hops > self.max_hops {
                    tracing::error!(key = next, hops = self.hops, "cycle in ordered index chain");
                    return Some(Err(Error::corruption(format!(
                        "chain longer than the {} nodes of the index at '{}'",
                        self.max_hops, next
                    ))));
                }
                let Some(node) = self.index.get_child(next) else {
                    tracing::error!(key = next, "dangling pointer in ordered index chain");
                    return Some(Err(Error::corruption(format!(
                        "chain points to missing entry '{}'",
                        next
                    ))));
                };

                let entry = IndexEntry::new(next, Some(node));
                self.cursor = Cursor::after(entry.next_key());
                Some(Ok(entry))
            }
        }
    }
}

impl<N: NodeState> FusedIterator for OrderedEntries<'_, N> {}
