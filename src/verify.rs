//! Stateless proof verification, computed the same way the on-chain
//! verifier computes it: from the root, the leaf and the proof alone.

use crate::utils::{
    hash::{hash_leaf, hash_sorted_pair},
    leaf::encode_leaf,
};
use alloy_primitives::{Address, B256, U256};

/// Folds a proof into the root it implies for `leaf_hash`.
pub fn process_proof(leaf_hash: B256, proof: &[B256]) -> B256 {
    proof
        .iter()
        .fold(leaf_hash, |node, sibling| hash_sorted_pair(&node, sibling))
}

/// Checks that the encoded `leaf` is committed to by `root` through `proof`.
///
/// # Examples
///
/// ```
/// use alloy_primitives::{Address, U256};
/// use merkle_drop::utils::{hash::hash_leaf, leaf::encode_leaf};
/// use merkle_drop::verify::verify_proof;
///
/// // A single-leaf tree: the root is the leaf digest and the proof is empty.
/// let leaf = encode_leaf(&Address::repeat_byte(0xaa), U256::from(100));
/// assert!(verify_proof(hash_leaf(&leaf), &leaf, &[]));
/// ```
pub fn verify_proof(root: B256, leaf: &[u8], proof: &[B256]) -> bool {
    process_proof(hash_leaf(leaf), proof) == root
}

/// Checks a claim the way the verifier contract does: re-encode the
/// (address, amount) pair, then verify the proof against `root`.
pub fn verify_claim(root: B256, address: &Address, amount: U256, proof: &[B256]) -> bool {
    verify_proof(root, &encode_leaf(address, amount), proof)
}
