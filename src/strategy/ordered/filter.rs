//! Key-range filtering over an ordered traversal.
//!
//! The chain is sorted, so a scan can stop at the first key past the far
//! end of the range. Which bound is "far" depends on the direction: the
//! upper bound for an ascending chain, the lower bound for a descending one.

use std::ops::{Bound, RangeBounds};

use super::iterator::OrderedEntries;
use crate::config::OrderDirection;
use crate::error::Result;
use crate::strategy::IndexEntry;
use crate::tree::NodeState;

/// Filters an ordered traversal down to the entries whose key lies in
/// `range`.
///
/// # Examples
///
/// ```ignore
/// let filtered = index.range(&root, "b".to_string()..="d".to_string());
/// for entry in filtered {
///     // Only entries with keys in the range will be yielded
/// }
/// ```
pub struct RangeFilter<'a, N, R>
where
    R: RangeBounds<String>,
{
    inner: OrderedEntries<'a, N>,
    range: R,
    direction: OrderDirection,
    done: bool,
}

impl<'a, N, R> RangeFilter<'a, N, R>
where
    N: NodeState,
    R: RangeBounds<String>,
{
    pub fn new(inner: OrderedEntries<'a, N>, range: R, direction: OrderDirection) -> Self {
        Self {
            inner,
            range,
            direction,
            done: false,
        }
    }

    /// Check if a key is within the filter's range.
    fn is_key_in_range(&self, key: &str) -> bool {
        !self.is_below_start(key) && !self.is_beyond_end(key)
    }

    fn is_below_start(&self, key: &str) -> bool {
        match self.range.start_bound() {
            Bound::Included(start) => key < start.as_str(),
            Bound::Excluded(start) => key <= start.as_str(),
            Bound::Unbounded => false,
        }
    }

    fn is_beyond_end(&self, key: &str) -> bool {
        match self.range.end_bound() {
            Bound::Included(end) => key > end.as_str(),
            Bound::Excluded(end) => key >= end.as_str(),
            Bound::Unbounded => false,
        }
    }

    /// Whether no later entry of the chain can be in range.
    fn is_past_range(&self, key: &str) -> bool {
        if self.direction.is_ascending() {
            self.is_beyond_end(key)
        } else {
            self.is_below_start(key)
        }
    }
}

impl<'a, N, R> Iterator for RangeFilter<'a, N, R>
where
    N: NodeState,
    R: RangeBounds<String>,
{
    type Item = Result<IndexEntry<'a, N>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.inner.next()? {
                Ok(entry) => {
                    if self.is_key_in_range(entry.name()) {
                        return Some(Ok(entry));
                    }
                    if self.is_past_range(entry.name()) {
                        tracing::trace!(key = entry.name(), "range scan ended early");
                        self.done = true;
                        return None;
                    }
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::ordered::{NEXT, START};
    use crate::tree::{MemoryNode, NodeBuilder};

    fn chain(keys: &[&str]) -> MemoryNode {
        let mut index = MemoryNode::new();
        let mut previous = START;
        for &key in keys {
            index.child(previous).set_property(NEXT, key.into());
            previous = key;
        }
        index.child(previous).set_property(NEXT, "".into());
        index
    }

    fn keys<R: RangeBounds<String>>(index: &MemoryNode, range: R, direction: OrderDirection) -> Vec<String> {
        RangeFilter::new(OrderedEntries::new(index, false), range, direction)
            .map(|e| e.unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn test_range_filter_inclusive() {
        let index = chain(&["a", "b", "c", "d", "e"]);
        let found = keys(&index, "b".to_string()..="d".to_string(), OrderDirection::Ascending);
        assert_eq!(found, vec!["b", "c", "d"]);
    }

    #[test]
    fn test_range_filter_exclusive() {
        let index = chain(&["a", "b", "c", "d", "e"]);
        let found = keys(&index, "b".to_string().."d".to_string(), OrderDirection::Ascending);
        assert_eq!(found, vec!["b", "c"]);

        let found = keys(
            &index,
            (Bound::Excluded("b".to_string()), Bound::Unbounded),
            OrderDirection::Ascending,
        );
        assert_eq!(found, vec!["c", "d", "e"]);
    }

    #[test]
    fn test_range_filter_descending() {
        let index = chain(&["e", "d", "c", "b", "a"]);
        let found = keys(&index, "b".to_string()..="d".to_string(), OrderDirection::Descending);
        assert_eq!(found, vec!["d", "c", "b"]);

        let found = keys(&index, .."c".to_string(), OrderDirection::Descending);
        assert_eq!(found, vec!["b", "a"]);
    }

    #[test]
    fn test_range_filter_unbounded_and_empty() {
        let index = chain(&["a", "b"]);
        assert_eq!(keys(&index, .., OrderDirection::Ascending), vec!["a", "b"]);
        assert!(keys(&index, "x".to_string().., OrderDirection::Ascending).is_empty());
        assert!(keys(&MemoryNode::new(), .., OrderDirection::Ascending).is_empty());
    }

    #[test]
    fn test_range_filter_stops_early() {
        // "c" points nowhere; an early stop at "b" never reaches it.
        let mut index = chain(&["a", "b", "c"]);
        index.child("c").set_property(NEXT, "ghost".into());

        let found = keys(&index, ..="a".to_string(), OrderDirection::Ascending);
        assert_eq!(found, vec!["a"]);

        let results: Vec<_> = RangeFilter::new(
            OrderedEntries::new(&index, false),
            "c".to_string()..,
            OrderDirection::Ascending,
        )
        .collect();
        assert_eq!(results.len(), 2);
        assert!(results[1].is_err());
    }
}
