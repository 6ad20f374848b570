pub mod config;
pub mod encoding;
pub mod error;
pub mod strategy;
pub mod tree;

pub use crate::config::{IndexConfig, OrderDirection};
pub use crate::error::{Error, Result};
pub use crate::strategy::mirror::ContentMirror;
pub use crate::strategy::ordered::{
    ChainMetrics, LinearScan, OrderedEntries, OrderedMirror, PredecessorLookup, RangeFilter, NEXT,
    START,
};
pub use crate::strategy::{IndexEntry, IndexStoreStrategy, MATCH};
pub use crate::tree::{MemoryNode, NodeBuilder, NodeState, PropertyValue};
