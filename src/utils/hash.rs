use alloy_primitives::{keccak256, Keccak256, B256};
use rand::Rng;

/// Hashes two B256 values to a single B256 value using Keccak256, in the order given.
///
/// # Arguments
///
/// * `left` - The B256 value hashed first.
/// * `right` - The B256 value hashed second.
///
/// # Returns
///
/// A B256 value that is the hash of the two input values.
///
/// # Examples
///
/// ```
/// use alloy_primitives::B256;
/// use merkle_drop::utils::hash::hash_to_parent;
///
/// let left = B256::repeat_byte(0x11);
/// let right = B256::repeat_byte(0x22);
/// let parent = hash_to_parent(&left, &right);
/// assert_ne!(parent, hash_to_parent(&right, &left));
/// ```
pub fn hash_to_parent(left: &B256, right: &B256) -> B256 {
    let mut hasher = Keccak256::new();
    hasher.update(left.as_slice());
    hasher.update(right.as_slice());
    hasher.finalize()
}

/// Hashes two sibling digests after ordering them byte-lexicographically.
///
/// This is the only way two nodes are ever combined: the tree builder and the
/// verifier both go through it, so a proof never has to say whether a sibling
/// sat on the left or on the right.
///
/// # Examples
///
/// ```
/// use alloy_primitives::B256;
/// use merkle_drop::utils::hash::{hash_sorted_pair, hash_to_parent};
///
/// let a = B256::repeat_byte(0x11);
/// let b = B256::repeat_byte(0x22);
/// assert_eq!(hash_sorted_pair(&a, &b), hash_sorted_pair(&b, &a));
/// assert_eq!(hash_sorted_pair(&b, &a), hash_to_parent(&a, &b));
/// ```
pub fn hash_sorted_pair(a: &B256, b: &B256) -> B256 {
    if a <= b {
        hash_to_parent(a, b)
    } else {
        hash_to_parent(b, a)
    }
}

/// Hashes an encoded leaf into its tree digest.
///
/// The digest commits to the encoded bytes, never to the raw (address, amount)
/// tuple, so both fields are bound together.
pub fn hash_leaf(leaf: &[u8]) -> B256 {
    keccak256(leaf)
}

/// Generates a random B256 value. Mostly used for testing purposes.
///
/// # Examples
///
/// ```
/// use alloy_primitives::B256;
/// use merkle_drop::utils::hash::get_random_hash;
///
/// let hash = get_random_hash();
/// assert_ne!(hash, B256::ZERO);
/// ```
pub fn get_random_hash() -> B256 {
    rand::thread_rng().gen::<[u8; 32]>().into()
}
