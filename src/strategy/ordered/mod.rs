//! Ordered content mirror.
//!
//! Children of a tree node have no order, so the ordered index threads its
//! key nodes into a singly-linked list through a `:next` property, rooted
//! at a reserved `:start` child:
//!
//! ```text
//! :index
//! ├── :start   { :next = "n1" }
//! ├── n0       { :next = "n3", content/foo (match = true) }
//! ├── n1       { :next = "n0", content/foo1 (match = true) }
//! ├── n2       { :next = "" }  <- end of the list
//! └── n3       { :next = "n2", content/foo3 (match = true) }
//! ```
//!
//! # Write amplification
//!
//! An insert touches at most two nodes: the predecessor, whose pointer moves
//! to the new key, and the new entry. There is no back-pointer, so a delete
//! finds the predecessor by walking from `:start`. Both operations are
//! O(entries).
//!
//! # Failure
//!
//! Every insertion point and predecessor is located read-only before the
//! first write. A chain that cannot be walked surfaces as
//! [`Error::ChainCorruption`]; the builder passed in must then be discarded
//! rather than committed.

pub mod filter;
pub mod iterator;
pub mod state;

use std::collections::BTreeSet;
use std::ops::RangeBounds;

pub use filter::RangeFilter;
pub use iterator::OrderedEntries;
pub use state::ChainMetrics;

use super::{prune_segments, validate_key, IndexStoreStrategy, MatchCollector};
use crate::config::{IndexConfig, OrderDirection, DEFAULT_MAX_KEY_LENGTH};
use crate::encoding::{encode_values, Key};
use crate::error::{Error, Result};
use crate::tree::{NodeBuilder, NodeState, PropertyValue};

/// Property linking an entry to the key of its successor.
pub const NEXT: &str = ":next";

/// Child acting as the head of the list.
pub const START: &str = ":start";

/// Finds the entry whose successor is a given key.
pub trait PredecessorLookup: Send + Sync {
    /// Returns the name of the node pointing at `target` (possibly
    /// `:start`), or `None` if `target` is the sentinel or not chained.
    fn find_predecessor<'a, N: NodeState>(&self, index: &'a N, target: &str)
        -> Result<Option<&'a str>>;
}

/// Walks the chain from `:start`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearScan;

impl PredecessorLookup for LinearScan {
    fn find_predecessor<'a, N: NodeState>(
        &self,
        index: &'a N,
        target: &str,
    ) -> Result<Option<&'a str>> {
        if target == START {
            return Ok(None);
        }
        let mut previous = None;
        for entry in OrderedEntries::new(index, true) {
            let entry = entry?;
            if entry.name() == target {
                return Ok(previous);
            }
            previous = Some(entry.name());
        }
        Ok(None)
    }
}

/// Content mirror whose keys are kept in a sorted linked list.
#[derive(Debug, Clone)]
pub struct OrderedMirror<P = LinearScan> {
    direction: OrderDirection,
    max_key_length: usize,
    lookup: P,
}

impl Default for OrderedMirror {
    fn default() -> Self {
        Self::new(OrderDirection::default())
    }
}

impl OrderedMirror {
    pub fn new(direction: OrderDirection) -> Self {
        Self {
            direction,
            max_key_length: DEFAULT_MAX_KEY_LENGTH,
            lookup: LinearScan,
        }
    }

    pub fn ascending() -> Self {
        Self::new(OrderDirection::Ascending)
    }

    pub fn descending() -> Self {
        Self::new(OrderDirection::Descending)
    }

    pub fn from_config(config: &IndexConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            direction: config.direction,
            max_key_length: config.max_key_length,
            lookup: LinearScan,
        })
    }
}

impl<P: PredecessorLookup> OrderedMirror<P> {
    /// Replaces the predecessor lookup.
    pub fn with_lookup<Q: PredecessorLookup>(self, lookup: Q) -> OrderedMirror<Q> {
        OrderedMirror {
            direction: self.direction,
            max_key_length: self.max_key_length,
            lookup,
        }
    }

    pub fn direction(&self) -> OrderDirection {
        self.direction
    }

    /// Walks the chain. See [`OrderedEntries`].
    pub fn ordered_entries<'a, N: NodeState>(
        &self,
        index: &'a N,
        include_start: bool,
    ) -> OrderedEntries<'a, N> {
        OrderedEntries::new(index, include_start)
    }

    pub fn find_predecessor<'a, N: NodeState>(
        &self,
        index: &'a N,
        target: &str,
    ) -> Result<Option<&'a str>> {
        self.lookup.find_predecessor(index, target)
    }

    /// Entries whose key is in `range`, in chain order.
    pub fn range<'a, N, R>(&self, index: &'a N, range: R) -> RangeFilter<'a, N, R>
    where
        N: NodeState,
        R: RangeBounds<String>,
    {
        RangeFilter::new(OrderedEntries::new(index, false), range, self.direction)
    }

    /// Content paths whose key is in `range`, in chain order.
    pub fn query_range<N, R>(&self, index: &N, range: R) -> Result<Vec<String>>
    where
        N: NodeState,
        R: RangeBounds<String>,
    {
        let mut collector = MatchCollector::new(usize::MAX);
        for entry in self.range(index, range) {
            if let Some(node) = entry?.node() {
                collector.visit(node, &mut Vec::new());
            }
        }
        Ok(collector.into_paths())
    }

    /// The head of the chain.
    pub fn first_key<'a, N: NodeState>(&self, index: &'a N) -> Option<&'a str> {
        index
            .get_child(START)
            .and_then(|start| start.get_string(NEXT))
            .filter(|key| !key.is_empty())
    }

    /// The tail of the chain, found by walking it.
    pub fn last_key<'a, N: NodeState>(&self, index: &'a N) -> Result<Option<&'a str>> {
        let mut last = None;
        for entry in OrderedEntries::new(index, false) {
            last = Some(entry?.name());
        }
        Ok(last)
    }

    /// Encodes raw property values and applies [`IndexStoreStrategy::update`].
    pub fn update_values<N: NodeBuilder>(
        &self,
        index: &mut N,
        path: &str,
        before: &[PropertyValue],
        after: &[PropertyValue],
    ) -> Result<()> {
        let before_keys = encode_values(before, self.max_key_length);
        let after_keys = encode_values(after, self.max_key_length);
        self.update(index, path, &before_keys, &after_keys)
    }

    /// Encodes one value the way `update_values` does.
    pub fn encode_key<K: Key + ?Sized>(&self, value: &K) -> String {
        encode_values(std::iter::once(value), self.max_key_length)
            .into_iter()
            .next()
            .unwrap_or_default()
    }

    pub fn check_integrity<N: NodeState>(&self, index: &N) -> Result<ChainMetrics> {
        state::check_integrity(index, self.direction)
    }

    pub fn collect_metrics<N: NodeState>(&self, index: &N) -> Result<ChainMetrics> {
        state::collect_metrics(index, self.direction)
    }

    /// Finds the node after which `key` belongs and that node's successor.
    fn locate<N: NodeState>(&self, index: &N, key: &str) -> Result<(String, String)> {
        for entry in OrderedEntries::new(index, true) {
            let entry = entry?;
            let next = entry.next_key();
            if next.is_empty() || self.direction.precedes(key, next) {
                return Ok((entry.name().to_string(), next.to_string()));
            }
        }
        Err(Error::corruption(format!(
            "no insertion point for '{}'",
            key
        )))
    }

    /// Relinks the predecessor of `key` past it and deletes the entry.
    fn unlink<N: NodeBuilder>(&self, index: &mut N, key: &str) -> Result<()> {
        let next = index
            .get_child(key)
            .and_then(|entry| entry.get_string(NEXT))
            .unwrap_or("")
            .to_string();
        let previous = match self.lookup.find_predecessor(&*index, key)? {
            Some(previous) => previous.to_string(),
            None => {
                tracing::error!(key, "no predecessor for chained entry");
                return Err(Error::corruption(format!(
                    "entry '{}' is not reachable from {}",
                    key, START
                )));
            }
        };

        tracing::debug!(key, previous = %previous, next = %next, "unlinking entry");
        index.child(&previous).set_property(NEXT, next.into());
        index.remove_child(key);
        Ok(())
    }
}

impl<P: PredecessorLookup> IndexStoreStrategy for OrderedMirror<P> {
    type Entries<'a, N>
        = OrderedEntries<'a, N>
    where
        N: NodeState + 'a;

    fn fetch_key_node<'a, N: NodeBuilder>(
        &self,
        index: &'a mut N,
        key: &str,
    ) -> Result<&'a mut N> {
        validate_key(key)?;
        if self.is_reserved(key) {
            return Err(Error::InvalidKey(format!("'{}' is reserved", key)));
        }

        match index.get_child(key).map(|node| node.has_property(NEXT)) {
            Some(true) => return Ok(index.child(key)),
            Some(false) => {
                return Err(Error::corruption(format!(
                    "node '{}' exists outside the chain",
                    key
                )))
            }
            None => {}
        }

        let (previous, next) = if self.first_key(&*index).is_none() {
            (START.to_string(), String::new())
        } else {
            self.locate(&*index, key)?
        };

        tracing::trace!(key, previous = %previous, next = %next, "linking new entry");
        index.child(&previous).set_property(NEXT, key.into());
        let entry = index.child(key);
        entry.set_property(NEXT, next.into());
        Ok(entry)
    }

    fn prune<N: NodeBuilder>(&self, index: &mut N, key: &str, segments: &[&str]) -> Result<()> {
        if !prune_segments(index, key, segments) {
            return Ok(());
        }
        if index.get_child(key).is_some_and(|entry| entry.has_property(NEXT)) {
            self.unlink(index, key)
        } else {
            index.remove_child(key);
            Ok(())
        }
    }

    fn entries<'a, N>(&self, index: &'a N) -> Self::Entries<'a, N>
    where
        N: NodeState + 'a,
    {
        OrderedEntries::new(index, false)
    }

    fn is_reserved(&self, key: &str) -> bool {
        key == START
    }

    fn contains_key<N: NodeState>(&self, index: &N, key: &str) -> bool {
        !self.is_reserved(key)
            && index
                .get_child(key)
                .is_some_and(|entry| entry.has_property(NEXT))
    }
}

/// Collects owned keys for [`IndexStoreStrategy::update`].
pub fn key_set<I, S>(keys: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    keys.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::MATCH;
    use crate::tree::MemoryNode;

    fn keys(index: &MemoryNode, strategy: &OrderedMirror) -> Vec<String> {
        strategy
            .entries(index)
            .map(|e| e.unwrap().name().to_string())
            .collect()
    }

    fn next_of<'a>(index: &'a MemoryNode, name: &str) -> &'a str {
        index.get_child(name).unwrap().get_string(NEXT).unwrap()
    }

    fn build(strategy: &OrderedMirror, entries: &[&str]) -> MemoryNode {
        let mut index = MemoryNode::new();
        for key in entries {
            strategy.insert(&mut index, "/content/foo", key).unwrap();
        }
        index
    }

    /// Fails every lookup, as if the chain had been cut.
    struct Unreachable;

    impl PredecessorLookup for Unreachable {
        fn find_predecessor<'a, N: NodeState>(&self, _: &'a N, _: &str) -> Result<Option<&'a str>> {
            Ok(None)
        }
    }

    #[test]
    fn test_insert_ascending() {
        let strategy = OrderedMirror::ascending();
        let index = build(&strategy, &["b", "a", "c"]);
        assert_eq!(keys(&index, &strategy), vec!["a", "b", "c"]);
        assert_eq!(next_of(&index, START), "a");
        assert_eq!(next_of(&index, "c"), "");
    }

    #[test]
    fn test_insert_descending() {
        let strategy = OrderedMirror::descending();
        let index = build(&strategy, &["b", "a", "c"]);
        assert_eq!(keys(&index, &strategy), vec!["c", "b", "a"]);
        assert_eq!(strategy.first_key(&index), Some("c"));
        assert_eq!(strategy.last_key(&index).unwrap(), Some("a"));
    }

    #[test]
    fn test_insert_before_first_entry() {
        // The entry right after the sentinel takes part in the comparison.
        let strategy = OrderedMirror::ascending();
        let mut index = build(&strategy, &["b"]);
        strategy.insert(&mut index, "/x", "a").unwrap();
        assert_eq!(keys(&index, &strategy), vec!["a", "b"]);
        assert_eq!(next_of(&index, START), "a");
        assert_eq!(next_of(&index, "a"), "b");

        strategy.insert(&mut index, "/x", "0").unwrap();
        assert_eq!(keys(&index, &strategy), vec!["0", "a", "b"]);
    }

    #[test]
    fn test_remove_middle() {
        let strategy = OrderedMirror::ascending();
        let mut index = build(&strategy, &["a", "b", "c"]);
        strategy.remove(&mut index, "/content/foo", "b").unwrap();
        assert_eq!(keys(&index, &strategy), vec!["a", "c"]);
        assert_eq!(next_of(&index, "a"), "c");
        assert!(!index.has_child("b"));
    }

    #[test]
    fn test_remove_head() {
        let strategy = OrderedMirror::ascending();
        let mut index = build(&strategy, &["a", "b", "c"]);
        strategy.remove(&mut index, "/content/foo", "a").unwrap();
        assert_eq!(next_of(&index, START), "b");
        assert_eq!(keys(&index, &strategy), vec!["b", "c"]);
    }

    #[test]
    fn test_remove_tail() {
        let strategy = OrderedMirror::ascending();
        let mut index = build(&strategy, &["a", "b", "c"]);
        strategy.remove(&mut index, "/content/foo", "c").unwrap();
        assert_eq!(next_of(&index, "b"), "");
        assert_eq!(keys(&index, &strategy), vec!["a", "b"]);
    }

    #[test]
    fn test_remove_last_entry_leaves_empty_sentinel() {
        let strategy = OrderedMirror::ascending();
        let mut index = build(&strategy, &["a"]);
        strategy.remove(&mut index, "/content/foo", "a").unwrap();

        assert_eq!(next_of(&index, START), "");
        assert_eq!(index.child_count(usize::MAX), 1);
        assert_eq!(strategy.entries(&index).count(), 0);
        let with_start: Vec<_> = strategy
            .ordered_entries(&index, true)
            .map(|e| e.unwrap().name())
            .collect();
        assert_eq!(with_start, vec![START]);

        strategy.insert(&mut index, "/p", "z").unwrap();
        assert_eq!(keys(&index, &strategy), vec!["z"]);
    }

    #[test]
    fn test_duplicate_key_reuses_entry() {
        let strategy = OrderedMirror::ascending();
        let mut index = build(&strategy, &["a", "b"]);
        strategy.insert(&mut index, "/other", "a").unwrap();

        assert_eq!(keys(&index, &strategy), vec!["a", "b"]);
        let entry = index.get_child("a").unwrap();
        assert!(entry.descendant(["content", "foo"]).unwrap().get_bool(MATCH));
        assert!(entry.descendant(["other"]).unwrap().get_bool(MATCH));
        assert_eq!(next_of(&index, "a"), "b");

        // The first removal keeps the entry chained.
        strategy.remove(&mut index, "/other", "a").unwrap();
        assert_eq!(keys(&index, &strategy), vec!["a", "b"]);
        strategy.remove(&mut index, "/content/foo", "a").unwrap();
        assert_eq!(keys(&index, &strategy), vec!["b"]);
    }

    #[test]
    fn test_fetch_key_node_is_stable() {
        let strategy = OrderedMirror::ascending();
        let mut index = MemoryNode::new();
        strategy
            .fetch_key_node(&mut index, "a")
            .unwrap()
            .set_property("marker", true.into());
        let entry = strategy.fetch_key_node(&mut index, "a").unwrap();
        assert!(entry.get_bool("marker"));
        assert_eq!(index.child_count(usize::MAX), 2);
    }

    #[test]
    fn test_reserved_and_invalid_keys() {
        let strategy = OrderedMirror::ascending();
        let mut index = MemoryNode::new();
        for key in [START, "", "a/b"] {
            assert!(matches!(
                strategy.insert(&mut index, "/p", key),
                Err(Error::InvalidKey(_))
            ));
        }
        assert_eq!(index, MemoryNode::new());
        assert!(!strategy.contains_key(&index, START));
    }

    #[test]
    fn test_remove_reserved_key() {
        let strategy = OrderedMirror::ascending();
        let mut index = MemoryNode::new();
        strategy.insert(&mut index, "/a", "a").unwrap();
        let before = index.snapshot();

        let err = strategy
            .update(&mut index, "/", &key_set([START]), &key_set::<_, String>([]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidKey(_)));
        assert!(!err.is_fatal());
        assert!(matches!(
            strategy.remove(&mut index, "/", START),
            Err(Error::InvalidKey(_))
        ));
        assert_eq!(index, before);
        assert_eq!(strategy.check_integrity(&index).unwrap().entry_count, 1);
    }

    #[test]
    fn test_unchained_node_is_corruption() {
        let strategy = OrderedMirror::ascending();
        let mut index = build(&strategy, &["a"]);
        index.child("stray").child("p").set_property(MATCH, true.into());
        let before = index.snapshot();

        let err = strategy.insert(&mut index, "/q", "stray").unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(index, before);
    }

    #[test]
    fn test_missing_predecessor_is_corruption() {
        let strategy = OrderedMirror::ascending();
        let mut index = build(&strategy, &["a", "b"]);
        // Cut "b" out of the chain without deleting it.
        index.child("a").set_property(NEXT, "".into());

        let err = strategy.remove(&mut index, "/content/foo", "b").unwrap_err();
        assert!(matches!(err, Error::ChainCorruption(_)));
        assert!(index.has_child("b"));
    }

    #[test]
    fn test_custom_lookup() {
        let strategy = OrderedMirror::ascending().with_lookup(Unreachable);
        let mut index = MemoryNode::new();
        strategy.insert(&mut index, "/p", "a").unwrap();
        strategy.insert(&mut index, "/q", "a").unwrap();

        // Removing one of two matches never needs the predecessor.
        strategy.remove(&mut index, "/q", "a").unwrap();
        assert!(strategy.remove(&mut index, "/p", "a").is_err());
    }

    #[test]
    fn test_find_predecessor() {
        let strategy = OrderedMirror::ascending();
        let index = build(&strategy, &["a", "b"]);
        assert_eq!(strategy.find_predecessor(&index, "a").unwrap(), Some(START));
        assert_eq!(strategy.find_predecessor(&index, "b").unwrap(), Some("a"));
        assert_eq!(strategy.find_predecessor(&index, "zz").unwrap(), None);
        assert_eq!(strategy.find_predecessor(&index, START).unwrap(), None);
    }

    #[test]
    fn test_update_is_idempotent() {
        let strategy = OrderedMirror::ascending();
        let mut index = MemoryNode::new();
        let after = key_set(["b", "a"]);
        strategy.update(&mut index, "/p", &key_set::<_, String>([]), &after).unwrap();
        let once = index.snapshot();
        strategy.update(&mut index, "/p", &after, &after).unwrap();
        assert_eq!(index, once);

        strategy.update(&mut index, "/p", &after, &key_set(["c"])).unwrap();
        assert_eq!(keys(&index, &strategy), vec!["c"]);
    }

    #[test]
    fn test_update_values_encodes() {
        let strategy =
            OrderedMirror::from_config(&IndexConfig::new("title").max_key_length(3)).unwrap();
        let mut index = MemoryNode::new();
        let values = [PropertyValue::from("hello world"), PropertyValue::from("")];
        strategy.update_values(&mut index, "/doc", &[], &values).unwrap();

        assert_eq!(keys(&index, &strategy), vec![":", "hel"]);
        assert_eq!(strategy.encode_key("a b"), "a+b");

        strategy.update_values(&mut index, "/doc", &values, &[]).unwrap();
        assert_eq!(strategy.entries(&index).count(), 0);
    }

    #[test]
    fn test_from_config() {
        let config = IndexConfig::new("price").direction(OrderDirection::Descending);
        let strategy = OrderedMirror::from_config(&config).unwrap();
        assert_eq!(strategy.direction(), OrderDirection::Descending);

        let invalid = IndexConfig::new("price").max_key_length(0);
        assert!(matches!(
            OrderedMirror::from_config(&invalid),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_query_in_chain_order() {
        let strategy = OrderedMirror::descending();
        let mut index = MemoryNode::new();
        strategy.insert(&mut index, "/x", "a").unwrap();
        strategy.insert(&mut index, "/y", "c").unwrap();
        strategy.insert(&mut index, "/z", "b").unwrap();

        assert_eq!(strategy.query(&index, None).unwrap(), vec!["/y", "/z", "/x"]);
        assert_eq!(strategy.count(&index, None, 2).unwrap(), 2);
        assert_eq!(strategy.query(&index, Some(&["b"])).unwrap(), vec!["/z"]);
    }

    #[test]
    fn test_query_range() {
        let strategy = OrderedMirror::ascending();
        let mut index = MemoryNode::new();
        for (key, path) in [("10", "/a"), ("20", "/b"), ("30", "/c"), ("40", "/d")] {
            strategy.insert(&mut index, path, key).unwrap();
        }

        let found = strategy
            .query_range(&index, "20".to_string()..="30".to_string())
            .unwrap();
        assert_eq!(found, vec!["/b", "/c"]);

        let found = strategy.query_range(&index, .."20".to_string()).unwrap();
        assert_eq!(found, vec!["/a"]);

        let keys: Vec<_> = strategy
            .range(&index, "25".to_string()..)
            .map(|e| e.unwrap().name())
            .collect();
        assert_eq!(keys, vec!["30", "40"]);
    }

    #[test]
    fn test_integrity_after_churn() {
        let strategy = OrderedMirror::ascending();
        let mut index = build(&strategy, &["d", "b", "a", "c"]);
        strategy.remove(&mut index, "/content/foo", "b").unwrap();
        strategy.insert(&mut index, "/q", "e").unwrap();

        let metrics = strategy.collect_metrics(&index).unwrap();
        assert_eq!(metrics.entry_count, 4);
        assert_eq!(metrics.match_count, 4);
        assert_eq!(metrics.first_key.as_deref(), Some("a"));
        assert_eq!(metrics.last_key.as_deref(), Some("e"));
    }

    #[test]
    fn test_writes_are_isolated_from_snapshots() {
        let strategy = OrderedMirror::ascending();
        let mut index = build(&strategy, &["a", "c"]);
        let committed = index.snapshot();

        strategy.insert(&mut index, "/p", "b").unwrap();
        assert_eq!(keys(&committed, &strategy), vec!["a", "c"]);
        assert_eq!(keys(&index, &strategy), vec!["a", "b", "c"]);
        // Only the predecessor and the new entry were rewritten.
        assert_eq!(committed.get_child("c"), index.get_child("c"));
    }

    mod proptests {
        use std::collections::{BTreeMap, BTreeSet};

        use proptest::prelude::*;

        use super::*;

        #[derive(Debug, Clone)]
        enum Op {
            Insert(String, String),
            Remove(String, String),
        }

        fn op() -> impl Strategy<Value = Op> {
            let key = "[a-e]{1,2}";
            let path = prop::sample::select(vec!["/p", "/q", "/r/s"]).prop_map(String::from);
            prop_oneof![
                (key, path.clone()).prop_map(|(k, p)| Op::Insert(k, p)),
                (key, path).prop_map(|(k, p)| Op::Remove(k, p)),
            ]
        }

        fn direction() -> impl Strategy<Value = OrderDirection> {
            prop_oneof![
                Just(OrderDirection::Ascending),
                Just(OrderDirection::Descending)
            ]
        }

        proptest! {
            #[test]
            fn test_chain_matches_model(
                direction in direction(),
                ops in prop::collection::vec(op(), 1..40),
            ) {
                let strategy = OrderedMirror::new(direction);
                let mut index = MemoryNode::new();
                let mut model: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

                for op in ops {
                    match op {
                        Op::Insert(key, path) => {
                            strategy.insert(&mut index, &path, &key).unwrap();
                            model.entry(key).or_default().insert(path);
                        }
                        Op::Remove(key, path) => {
                            strategy.remove(&mut index, &path, &key).unwrap();
                            if let Some(paths) = model.get_mut(&key) {
                                paths.remove(&path);
                                if paths.is_empty() {
                                    model.remove(&key);
                                }
                            }
                        }
                    }

                    let metrics = strategy.check_integrity(&index).unwrap();
                    prop_assert_eq!(metrics.entry_count, model.len());
                    prop_assert_eq!(
                        metrics.match_count,
                        model.values().map(BTreeSet::len).sum::<usize>()
                    );

                    let mut expected: Vec<&String> = model.keys().collect();
                    if direction == OrderDirection::Descending {
                        expected.reverse();
                    }
                    let actual: Vec<String> = strategy
                        .entries(&index)
                        .map(|e| e.unwrap().name().to_string())
                        .collect();
                    prop_assert_eq!(actual.iter().collect::<Vec<_>>(), expected);
                }
            }
        }
    }
}
