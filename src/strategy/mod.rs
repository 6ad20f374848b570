//! Index store strategies.
//!
//! An index mirrors content paths below one node per indexed key:
//!
//! ```text
//! :index
//! ├── apple
//! │   └── content/foo      (match = true)
//! └── banana
//!     ├── content/bar      (match = true)
//!     └── content/baz      (match = true)
//! ```
//!
//! Match bookkeeping (marking a path under a key, removing the mark, and
//! pruning emptied branches) is the same for every strategy and lives in the
//! default methods of [`IndexStoreStrategy`]. A strategy only decides how a
//! key node is located or created ([`IndexStoreStrategy::fetch_key_node`]),
//! what happens when a key node empties ([`IndexStoreStrategy::prune`]), and
//! in which order entries are enumerated ([`IndexStoreStrategy::entries`]).
//!
//! - [`mirror::ContentMirror`]: key nodes in store order.
//! - [`ordered::OrderedMirror`]: key nodes linked into a sorted chain.

pub mod mirror;
pub mod ordered;

use std::collections::{BTreeSet, HashSet};

use itertools::{EitherOrBoth, Itertools};

use crate::encoding::path::{join_segments, path_segments};
use crate::error::{Error, Result};
use crate::tree::{NodeBuilder, NodeState, PropertyValue};

/// Property marking a mirrored path as currently matching its key.
pub const MATCH: &str = "match";

/// One element of a strategy's entry sequence.
///
/// `node` is `None` only for the ordered sentinel before its first write.
#[derive(Debug)]
pub struct IndexEntry<'a, N> {
    name: &'a str,
    node: Option<&'a N>,
}

impl<N> Clone for IndexEntry<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N> Copy for IndexEntry<'_, N> {}

impl<'a, N: NodeState> IndexEntry<'a, N> {
    pub fn new(name: &'a str, node: Option<&'a N>) -> Self {
        Self { name, node }
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn node(&self) -> Option<&'a N> {
        self.node
    }

    pub fn is_materialized(&self) -> bool {
        self.node.is_some()
    }

    /// The successor key, or `""` when this is the last chain element.
    pub fn next_key(&self) -> &'a str {
        self.node
            .and_then(|n| n.get_string(ordered::NEXT))
            .unwrap_or("")
    }
}

pub trait IndexStoreStrategy: Send + Sync {
    /// The iterator returned by entries().
    type Entries<'a, N>: Iterator<Item = Result<IndexEntry<'a, N>>>
    where
        N: NodeState + 'a;

    /// Returns the node for `key`, creating it when missing.
    fn fetch_key_node<'a, N: NodeBuilder>(&self, index: &'a mut N, key: &str)
        -> Result<&'a mut N>;

    /// Removes emptied nodes after the match for `segments` under `key` was
    /// cleared, innermost first, stopping at the first occupied node.
    fn prune<N: NodeBuilder>(&self, index: &mut N, key: &str, segments: &[&str]) -> Result<()>;

    /// Enumerates the key nodes of the index.
    fn entries<'a, N>(&self, index: &'a N) -> Self::Entries<'a, N>
    where
        N: NodeState + 'a;

    /// Reconciles the keys of one content path: marks `path` under keys
    /// only in `after_keys` and unmarks it under keys only in `before_keys`.
    fn update<N: NodeBuilder>(
        &self,
        index: &mut N,
        path: &str,
        before_keys: &BTreeSet<String>,
        after_keys: &BTreeSet<String>,
    ) -> Result<()> {
        tracing::debug!(
            path,
            before = ?before_keys,
            after = ?after_keys,
            "updating index"
        );

        for diff in before_keys.iter().merge_join_by(after_keys.iter(), |a, b| a.cmp(b)) {
            match diff {
                EitherOrBoth::Left(key) => self.remove(index, path, key)?,
                EitherOrBoth::Right(key) => self.insert(index, path, key)?,
                EitherOrBoth::Both(..) => {}
            }
        }

        Ok(())
    }

    /// Marks `path` as matching `key`.
    fn insert<N: NodeBuilder>(&self, index: &mut N, path: &str, key: &str) -> Result<()> {
        let mut node = self.fetch_key_node(index, key)?;
        for segment in path_segments(path) {
            node = node.child(segment);
        }
        node.set_property(MATCH, PropertyValue::Boolean(true));
        Ok(())
    }

    /// Clears the match of `path` under `key`. A missing key or path is a
    /// no-op, so removing twice is safe.
    fn remove<N: NodeBuilder>(&self, index: &mut N, path: &str, key: &str) -> Result<()> {
        if self.is_reserved(key) {
            return Err(Error::InvalidKey(format!("'{}' is reserved", key)));
        }
        let segments = path_segments(path);
        let Some(node) = index
            .get_child_mut(key)
            .and_then(|entry| entry.descendant_mut(segments.iter().copied()))
        else {
            tracing::trace!(key, path, "no match to remove");
            return Ok(());
        };

        node.remove_property(MATCH);
        self.prune(index, key, &segments)
    }

    /// Names the strategy keeps for its own bookkeeping nodes.
    fn is_reserved(&self, _key: &str) -> bool {
        false
    }

    fn contains_key<N: NodeState>(&self, index: &N, key: &str) -> bool {
        index.get_child(key).is_some()
    }

    /// Content paths matching any of `keys` (every key when `None`), in entry
    /// order. A path listed under several keys is returned once.
    fn query<N: NodeState>(&self, index: &N, keys: Option<&[&str]>) -> Result<Vec<String>> {
        let mut collector = MatchCollector::new(usize::MAX);
        self.collect_matches(index, keys, &mut collector)?;
        Ok(collector.paths)
    }

    /// Number of distinct matching paths, counting no further than `max`.
    fn count<N: NodeState>(&self, index: &N, keys: Option<&[&str]>, max: usize) -> Result<usize> {
        let mut collector = MatchCollector::new(max);
        self.collect_matches(index, keys, &mut collector)?;
        Ok(collector.paths.len())
    }

    #[doc(hidden)]
    fn collect_matches<N: NodeState>(
        &self,
        index: &N,
        keys: Option<&[&str]>,
        collector: &mut MatchCollector,
    ) -> Result<()> {
        match keys {
            None => {
                for entry in self.entries(index) {
                    if let Some(node) = entry?.node() {
                        if collector.visit(node, &mut Vec::new()) {
                            break;
                        }
                    }
                }
            }
            Some(keys) => {
                for key in keys {
                    if let Some(node) = index.get_child(key) {
                        if collector.visit(node, &mut Vec::new()) {
                            break;
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Depth-first collector of matching content paths below an entry.
#[derive(Debug)]
pub struct MatchCollector {
    paths: Vec<String>,
    seen: HashSet<String>,
    limit: usize,
}

impl MatchCollector {
    pub fn new(limit: usize) -> Self {
        Self {
            paths: Vec::new(),
            seen: HashSet::new(),
            limit,
        }
    }

    pub fn into_paths(self) -> Vec<String> {
        self.paths
    }

    pub fn is_full(&self) -> bool {
        self.paths.len() >= self.limit
    }

    /// Visits `node` and its subtree. Returns true once the limit is hit.
    pub fn visit<'a, N: NodeState>(&mut self, node: &'a N, segments: &mut Vec<&'a str>) -> bool {
        if self.is_full() {
            return true;
        }
        if node.get_bool(MATCH) {
            let path = join_segments(segments.as_slice());
            if self.seen.insert(path.clone()) {
                self.paths.push(path);
                if self.is_full() {
                    return true;
                }
            }
        }
        for name in node.child_names() {
            let Some(child) = node.get_child(name) else {
                continue;
            };
            segments.push(name);
            let full = self.visit(child, segments);
            segments.pop();
            if full {
                return true;
            }
        }
        false
    }
}

/// Number of matching paths in the subtree of `node`, itself included.
pub(crate) fn count_matches<N: NodeState>(node: &N) -> usize {
    let own = usize::from(node.get_bool(MATCH));
    node.child_names()
        .filter_map(|name| node.get_child(name))
        .map(count_matches)
        .sum::<usize>()
        + own
}

fn is_occupied<N: NodeState>(node: &N) -> bool {
    node.has_property(MATCH) || node.child_count(1) > 0
}

pub(crate) fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::InvalidKey("key must not be empty".to_string()));
    }
    if key.contains('/') {
        return Err(Error::InvalidKey(format!(
            "'{}' is not a single node name",
            key
        )));
    }
    Ok(())
}

/// Removes emptied path segments below the entry `key`, innermost first.
///
/// Returns true when every segment is gone and the entry itself holds no
/// match and no children, leaving the entry for the caller to remove.
pub(crate) fn prune_segments<N: NodeBuilder>(index: &mut N, key: &str, segments: &[&str]) -> bool {
    for depth in (1..=segments.len()).rev() {
        let name = segments[depth - 1];
        let Some(parent) = index
            .get_child_mut(key)
            .and_then(|entry| entry.descendant_mut(segments[..depth - 1].iter().copied()))
        else {
            continue;
        };
        match parent.get_child(name).map(is_occupied) {
            None => continue,
            Some(true) => return false,
            Some(false) => {
                parent.remove_child(name);
            }
        }
    }
    index.get_child(key).is_some_and(|entry| !is_occupied(entry))
}
