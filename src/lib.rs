pub mod distribution;
pub mod error;
pub mod schema;
pub mod tree;
pub mod utils;
pub mod verify;

pub use distribution::{Claim, Distribution, Recipient};
pub use error::{DropError, Result};
pub use schema::{DistributionFile, DistributionInput};
pub use tree::{LeafOrder, MerkleTree};
pub use verify::{verify_claim, verify_proof};
