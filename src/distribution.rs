use crate::error::{DropError, Result};
use crate::tree::{LeafOrder, MerkleTree};
use crate::utils::{hash::hash_leaf, leaf::encode_leaf};
use crate::verify::verify_claim;
use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, info, warn};

/// A recipient and the total amount it is entitled to so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Recipient {
    pub address: Address,
    pub amount: U256,
}

impl Recipient {
    pub fn new(address: Address, amount: U256) -> Self {
        Self { address, amount }
    }

    /// Digest of the encoded (address, amount) leaf.
    pub fn leaf_hash(&self) -> B256 {
        hash_leaf(&encode_leaf(&self.address, self.amount))
    }
}

/// Everything a recipient needs to claim against the published root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    #[serde(with = "crate::schema::checksum_address")]
    pub address: Address,
    #[serde(with = "crate::schema::decimal_amount")]
    pub amount: U256,
    pub proof: Vec<B256>,
}

impl Claim {
    pub fn verify(&self, root: B256) -> bool {
        verify_claim(root, &self.address, self.amount, &self.proof)
    }
}

/// A generated distribution: the root plus one claim per recipient, in the
/// order the recipients were supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    root: B256,
    claims: Vec<Claim>,
}

impl Distribution {
    /// Builds the tree over `recipients` and generates every claim.
    ///
    /// Any problem aborts the whole run; a recipient is never dropped silently.
    ///
    /// # Errors
    ///
    /// * [`DropError::EmptyTree`] if there are no recipients.
    /// * [`DropError::DuplicateAddress`] if an address is listed twice.
    ///
    /// # Examples
    ///
    /// ```
    /// use alloy_primitives::{Address, U256};
    /// use merkle_drop::{Distribution, LeafOrder, Recipient};
    ///
    /// let recipients = [
    ///     Recipient::new(Address::repeat_byte(0xaa), U256::from(100)),
    ///     Recipient::new(Address::repeat_byte(0xbb), U256::from(250)),
    /// ];
    /// let drop = Distribution::generate(&recipients, LeafOrder::Sorted).unwrap();
    /// assert_eq!(drop.len(), 2);
    /// assert!(drop.verify_all());
    /// ```
    pub fn generate(recipients: &[Recipient], order: LeafOrder) -> Result<Self> {
        if recipients.is_empty() {
            return Err(DropError::EmptyTree);
        }

        let mut seen = HashSet::with_capacity(recipients.len());
        for recipient in recipients {
            if !seen.insert(recipient.address) {
                return Err(DropError::DuplicateAddress(recipient.address));
            }
        }

        let started = Instant::now();
        let leaves: Vec<B256> = recipients.iter().map(Recipient::leaf_hash).collect();
        let tree = MerkleTree::from_leaves(&leaves, order)?;
        debug!(
            leaves = tree.leaf_count(),
            depth = tree.depth(),
            elapsed = ?started.elapsed(),
            "built merkle tree"
        );

        let claims = recipients
            .iter()
            .zip(&leaves)
            .map(|(recipient, leaf)| {
                Ok(Claim {
                    address: recipient.address,
                    amount: recipient.amount,
                    proof: tree.proof(leaf)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let root = tree.root();
        info!(
            recipients = claims.len(),
            %root,
            elapsed = ?started.elapsed(),
            "generated distribution"
        );

        Ok(Self { root, claims })
    }

    /// Assembles a distribution from parts, e.g. a previously written artifact.
    /// Nothing is checked here; call [`Distribution::verify_all`] for that.
    pub fn from_parts(root: B256, claims: Vec<Claim>) -> Self {
        Self { root, claims }
    }

    pub fn root(&self) -> B256 {
        self.root
    }

    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    pub fn claim_for(&self, address: &Address) -> Option<&Claim> {
        self.claims.iter().find(|claim| &claim.address == address)
    }

    /// Sum of all cumulative amounts, or `None` if it does not fit in 256 bits.
    pub fn total_amount(&self) -> Option<U256> {
        self.claims
            .iter()
            .try_fold(U256::ZERO, |total, claim| total.checked_add(claim.amount))
    }

    /// Claims whose proof does not verify against the root.
    pub fn invalid_claims(&self) -> Vec<&Claim> {
        self.claims
            .iter()
            .filter(|claim| !claim.verify(self.root))
            .collect()
    }

    /// Re-verifies every claim against the root, as the verifier contract would.
    pub fn verify_all(&self) -> bool {
        let invalid = self.invalid_claims();
        for claim in &invalid {
            warn!(address = %claim.address, amount = %claim.amount, "claim does not verify");
        }
        invalid.is_empty()
    }
}
