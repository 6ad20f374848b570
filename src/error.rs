use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The persisted chain no longer describes a finite, fully linked list.
    /// The enclosing mutation must be discarded.
    #[error("Chain corruption: {0}")]
    ChainCorruption(String),

    /// A checked pull past the last element of a traversal.
    #[error("Iterator exhausted")]
    IteratorExhausted,

    #[error("Unsupported mutation: {0}")]
    UnsupportedMutation(&'static str),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub fn corruption(msg: impl Into<String>) -> Self {
        Error::ChainCorruption(msg.into())
    }

    /// Whether the error must abort the enclosing mutation.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::ChainCorruption(_))
    }
}
