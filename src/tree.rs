/*
Reference tree with 5 leaves (sorted-pair hashing, lone nodes carried up):

Level 3 |                  [0]
        |                 /   \
Level 2 |            [0]       [1] <- carried up from level 1
        |           /   \        |
Level 1 |        [0]     [1]    [2] <- carried up from level 0
        |       /   \   /   \    |
Level 0 |     [0]  [1] [2]  [3] [4]

Every parent is keccak256(min(a, b) ++ max(a, b)). A lone last node is
promoted unchanged, never duplicated or hashed with itself, so it has no
sibling at that level and contributes nothing to the proof there.

The proof for leaf [4] is therefore a single digest: level 2 [0].
*/

use crate::error::{DropError, Result};
use crate::utils::hash::hash_sorted_pair;
use alloy_primitives::B256;
use std::collections::HashMap;

/// How leaf digests are arranged before pairing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LeafOrder {
    /// Sort leaf digests ascending first. The root then depends only on the
    /// set of leaves, not on the order the recipients were listed in.
    #[default]
    Sorted,
    /// Pair leaves in the order they were supplied.
    Insertion,
}

/// A binary Merkle tree over keccak256 digests, kept level by level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    levels: Vec<Vec<B256>>,
    positions: HashMap<B256, usize>,
}

impl MerkleTree {
    /// Builds the tree from leaf digests.
    ///
    /// # Errors
    ///
    /// Returns [`DropError::EmptyTree`] when `leaves` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use alloy_primitives::B256;
    /// use merkle_drop::tree::{LeafOrder, MerkleTree};
    /// use merkle_drop::utils::hash::hash_sorted_pair;
    ///
    /// let a = B256::repeat_byte(0x22);
    /// let b = B256::repeat_byte(0x11);
    /// let tree = MerkleTree::from_leaves(&[a, b], LeafOrder::Sorted).unwrap();
    /// assert_eq!(tree.root(), hash_sorted_pair(&a, &b));
    /// assert_eq!(tree.proof(&a).unwrap(), vec![b]);
    /// ```
    pub fn from_leaves(leaves: &[B256], order: LeafOrder) -> Result<Self> {
        if leaves.is_empty() {
            return Err(DropError::EmptyTree);
        }

        let mut base = leaves.to_vec();
        if order == LeafOrder::Sorted {
            base.sort_unstable();
        }

        let mut positions = HashMap::with_capacity(base.len());
        for (index, leaf) in base.iter().enumerate() {
            // Identical digests sit on the same root path; any of them proves.
            positions.entry(*leaf).or_insert(index);
        }

        let mut levels = vec![base];
        while let Some(level) = levels.last().filter(|level| level.len() > 1) {
            let parents = parent_level(level);
            levels.push(parents);
        }

        Ok(Self { levels, positions })
    }

    /// Returns the root digest.
    pub fn root(&self) -> B256 {
        // Construction guarantees at least one level whose last entry is the root.
        self.levels
            .last()
            .and_then(|level| level.first())
            .copied()
            .unwrap_or(B256::ZERO)
    }

    /// Leaf digests in tree order.
    pub fn leaves(&self) -> &[B256] {
        &self.levels[0]
    }

    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// Number of hashing levels above the leaves; 0 for a single-leaf tree.
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// All levels, leaves first and the root level last.
    pub fn levels(&self) -> &[Vec<B256>] {
        &self.levels
    }

    pub fn contains(&self, leaf: &B256) -> bool {
        self.positions.contains_key(leaf)
    }

    /// Returns the position of a leaf digest in tree order.
    pub fn position(&self, leaf: &B256) -> Option<usize> {
        self.positions.get(leaf).copied()
    }

    /// Generates the inclusion proof for a leaf digest.
    ///
    /// # Errors
    ///
    /// Returns [`DropError::LeafNotFound`] when the digest is not a leaf of this tree.
    pub fn proof(&self, leaf: &B256) -> Result<Vec<B256>> {
        let index = self.position(leaf).ok_or(DropError::LeafNotFound(*leaf))?;
        self.proof_at(index)
    }

    /// Generates the inclusion proof for the leaf at `index` in tree order.
    ///
    /// Siblings are emitted bottom to top, which is the order a verifier folds
    /// them in. Levels where the node was carried up alone contribute nothing.
    ///
    /// # Errors
    ///
    /// Returns [`DropError::LeafIndexOutOfBounds`] for an index past the last leaf.
    pub fn proof_at(&self, index: usize) -> Result<Vec<B256>> {
        if index >= self.leaf_count() {
            return Err(DropError::LeafIndexOutOfBounds {
                index,
                leaves: self.leaf_count(),
            });
        }

        let mut proof = Vec::with_capacity(self.depth());
        let mut position = index;
        for level in &self.levels[..self.depth()] {
            if let Some(sibling) = level.get(position ^ 1) {
                proof.push(*sibling);
            }
            position /= 2;
        }

        Ok(proof)
    }
}

fn parent_level(level: &[B256]) -> Vec<B256> {
    level
        .chunks(2)
        .map(|pair| match pair {
            [left, right] => hash_sorted_pair(left, right),
            // chunks(2) only yields a single node for the last one of an odd level.
            [lone] => *lone,
            _ => unreachable!("chunks(2) yields one or two nodes"),
        })
        .collect()
}
