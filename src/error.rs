use alloy_primitives::{Address, B256};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DropError {
    #[error("Invalid address {0:?}: not a hex string")]
    InvalidAddress(String),

    #[error("Invalid address length: expected 20 bytes, got {0}")]
    AddressLength(usize),

    #[error("Invalid amount {0:?}: expected a non-negative integer")]
    InvalidAmount(String),

    #[error("Amount {0} does not fit in 256 bits")]
    AmountOverflow(String),

    #[error("Cannot build a Merkle tree without leaves")]
    EmptyTree,

    #[error("Leaf {0} is not part of the tree")]
    LeafNotFound(B256),

    #[error("Leaf index {index} is out of bounds for tree with {leaves} leaves")]
    LeafIndexOutOfBounds { index: usize, leaves: usize },

    #[error("Address {0} appears more than once in the distribution")]
    DuplicateAddress(Address),
}

impl DropError {
    /// Whether the error comes from turning text into a leaf.
    pub fn is_encoding(&self) -> bool {
        matches!(
            self,
            DropError::InvalidAddress(_)
                | DropError::AddressLength(_)
                | DropError::InvalidAmount(_)
                | DropError::AmountOverflow(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DropError>;
