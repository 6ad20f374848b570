use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default cap on the length of an indexed value before encoding.
pub const DEFAULT_MAX_KEY_LENGTH: usize = 100;

/// Sort direction of an ordered index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    #[default]
    #[serde(alias = "asc", alias = "ASCENDING", alias = "Ascending")]
    Ascending,
    #[serde(alias = "desc", alias = "DESCENDING", alias = "Descending")]
    Descending,
}

impl OrderDirection {
    pub fn is_ascending(self) -> bool {
        self == OrderDirection::Ascending
    }

    /// Compares two keys in traversal order.
    pub fn compare(self, a: &str, b: &str) -> Ordering {
        match self {
            OrderDirection::Ascending => a.cmp(b),
            OrderDirection::Descending => b.cmp(a),
        }
    }

    /// Whether `key` belongs strictly before `existing` in the chain.
    pub fn precedes(self, key: &str, existing: &str) -> bool {
        self.compare(key, existing) == Ordering::Less
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderDirection::Ascending => "ascending",
            OrderDirection::Descending => "descending",
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ascending" | "asc" => Ok(OrderDirection::Ascending),
            "descending" | "desc" => Ok(OrderDirection::Descending),
            other => Err(Error::InvalidConfig(format!(
                "unknown order direction '{}'",
                other
            ))),
        }
    }
}

/// Definition of one property index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndexConfig {
    /// Name of the index definition node
    pub name: String,

    /// Properties whose values are indexed
    pub property_names: Vec<String>,

    /// Chain order (default: ascending)
    pub direction: OrderDirection,

    /// Values are truncated to this many chars before encoding (default: 100)
    pub max_key_length: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            property_names: Vec::new(),
            direction: OrderDirection::default(),
            max_key_length: DEFAULT_MAX_KEY_LENGTH,
        }
    }
}

impl IndexConfig {
    /// Create a new config for the named index
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add an indexed property
    pub fn property(mut self, name: impl Into<String>) -> Self {
        self.property_names.push(name.into());
        self
    }

    /// Set the chain order
    pub fn direction(mut self, direction: OrderDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Set the value truncation length
    pub fn max_key_length(mut self, len: usize) -> Self {
        self.max_key_length = len;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_key_length == 0 {
            return Err(Error::InvalidConfig(
                "max_key_length must be positive".to_string(),
            ));
        }
        if self.property_names.iter().any(|p| p.is_empty()) {
            return Err(Error::InvalidConfig(format!(
                "index '{}' has an empty property name",
                self.name
            )));
        }
        Ok(())
    }

    pub fn indexes(&self, property: &str) -> bool {
        self.property_names.iter().any(|p| p == property)
    }
}
