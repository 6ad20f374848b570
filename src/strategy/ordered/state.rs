use std::collections::HashSet;

use super::iterator::OrderedEntries;
use super::{NEXT, START};
use crate::config::OrderDirection;
use crate::error::{Error, Result};
use crate::strategy::{count_matches, MATCH};
use crate::tree::NodeState;

/// Metrics snapshot of an ordered index chain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainMetrics {
    pub entry_count: usize,
    pub match_count: usize,
    pub first_key: Option<String>,
    pub last_key: Option<String>,
}

/// Validates the chain of `index` and returns its metrics.
///
/// Checks that the sentinel holds no match data, that the chain ends, that
/// consecutive keys are strictly ordered, that every chained entry still
/// has a match, and that no entry is left outside the chain.
pub fn check_integrity<N: NodeState>(index: &N, direction: OrderDirection) -> Result<ChainMetrics> {
    if let Some(start) = index.get_child(START) {
        if start.has_property(MATCH) || start.child_count(1) > 0 {
            return Err(Error::corruption("sentinel carries match data"));
        }
    }

    let mut metrics = ChainMetrics::default();
    let mut reachable = HashSet::new();
    let mut previous: Option<&str> = None;

    for entry in OrderedEntries::new(index, false) {
        let entry = entry?;
        let key = entry.name();

        if let Some(prev) = previous {
            if !direction.precedes(prev, key) {
                return Err(Error::corruption(format!(
                    "'{}' and '{}' are out of {} order",
                    prev, key, direction
                )));
            }
        }
        if !reachable.insert(key) {
            return Err(Error::corruption(format!("'{}' is chained twice", key)));
        }

        let matches = entry.node().map(count_matches).unwrap_or(0);
        if matches == 0 {
            return Err(Error::corruption(format!(
                "chained entry '{}' has no match",
                key
            )));
        }

        metrics.match_count += matches;
        metrics.first_key.get_or_insert_with(|| key.to_string());
        previous = Some(key);
    }

    for name in index.child_names() {
        if name == START || reachable.contains(name) {
            continue;
        }
        if index.get_child(name).is_some_and(|n| n.has_property(NEXT)) {
            return Err(Error::corruption(format!(
                "entry '{}' is not reachable from {}",
                name, START
            )));
        }
    }

    metrics.entry_count = reachable.len();
    metrics.last_key = previous.map(str::to_string);
    Ok(metrics)
}

/// Collect metrics from an ordered index and log them
pub fn collect_metrics<N: NodeState>(index: &N, direction: OrderDirection) -> Result<ChainMetrics> {
    let metrics = match check_integrity(index, direction) {
        Ok(metrics) => metrics,
        Err(e) => {
            tracing::error!(error = %e, "Ordered index integrity check failed");
            return Err(e);
        }
    };

    tracing::info!(
        entry_count = metrics.entry_count,
        match_count = metrics.match_count,
        first_key = ?metrics.first_key,
        last_key = ?metrics.last_key,
        %direction,
        "Ordered index metrics"
    );

    Ok(metrics)
}
