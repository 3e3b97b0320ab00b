//! Seed trees
//!
//! A tree over `n` leaves has depth `ceil_log2(n) + 1` and is stored as a
//! flat array in heap order: node `i` has children `2i + 1` and `2i + 2`,
//! and the leaves are the last `n` nodes. When `n` is not a power of two the
//! rightmost part of the last two levels is absent; [`TreeShape`] tracks
//! which nodes exist.
//!
//! A seed tree expands a root seed top-down. Revealing "all leaves except a
//! hide set" publishes the roots of the maximal subtrees that avoid every
//! hidden leaf; the holder re-expands those subtrees to recover the rest.

use picnic_algorithms::{HashPrefix, PicnicHash};
use picnic_internal::bits::ceil_log2;
use picnic_params::ParameterSet;
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// Node layout shared by seed trees and Merkle trees
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TreeShape {
    depth: usize,
    num_nodes: usize,
    num_leaves: usize,
    exists: Vec<bool>,
}

impl TreeShape {
    pub(crate) fn new(num_leaves: usize) -> Self {
        let depth = ceil_log2(num_leaves) + 1;
        let num_nodes = ((1usize << depth) - 1) - ((1usize << (depth - 1)) - num_leaves);
        let first_leaf = num_nodes - num_leaves;

        let mut exists = vec![false; num_nodes];
        exists[first_leaf..].iter_mut().for_each(|e| *e = true);
        let mut shape = Self {
            depth,
            num_nodes,
            num_leaves,
            exists,
        };
        for i in (1..=first_leaf).rev() {
            if shape.exists(2 * i + 1) || shape.exists(2 * i + 2) {
                shape.exists[i] = true;
            }
        }
        shape.exists[0] = true;
        shape
    }

    pub(crate) fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub(crate) fn num_leaves(&self) -> usize {
        self.num_leaves
    }

    pub(crate) fn first_leaf(&self) -> usize {
        self.num_nodes - self.num_leaves
    }

    pub(crate) fn exists(&self, node: usize) -> bool {
        node < self.num_nodes && self.exists[node]
    }

    /// Parent of a non-root node
    pub(crate) fn parent(node: usize) -> usize {
        debug_assert!(node != 0);
        if Self::is_left_child(node) {
            (node - 1) / 2
        } else {
            (node - 2) / 2
        }
    }

    /// Indices of the nodes that can have children
    ///
    /// Empty for a single-leaf tree, whose root is its only leaf.
    pub(crate) fn non_leaves(&self) -> core::ops::Range<usize> {
        if self.num_nodes == 1 {
            return 0..0;
        }
        0..Self::parent(self.num_nodes - 1) + 1
    }

    fn is_left_child(node: usize) -> bool {
        node % 2 == 1
    }

    // Tests the node itself, not its right child: an in-range but absent
    // right child still counts.
    pub(crate) fn has_right_child(&self, node: usize) -> bool {
        2 * node + 2 < self.num_nodes && self.exists(node)
    }

    fn is_leaf(&self, node: usize) -> bool {
        2 * node + 1 >= self.num_nodes
    }

    fn has_sibling(&self, node: usize) -> bool {
        if !self.exists(node) {
            return false;
        }
        !(Self::is_left_child(node) && !self.exists(node + 1))
    }

    fn sibling(node: usize) -> usize {
        if Self::is_left_child(node) {
            node + 1
        } else {
            node - 1
        }
    }

    /// Nodes to publish so every leaf outside `hide` can be re-derived
    ///
    /// The order depends on the order of `hide` and is part of the wire
    /// format. With nothing hidden the root alone covers every leaf.
    pub(crate) fn revealed_nodes(&self, hide: &[u16]) -> Vec<usize> {
        if hide.is_empty() {
            return vec![0];
        }
        let path_len = self.depth - 1;
        let first_leaf = self.first_leaf();

        // paths[d][i]: the ancestor of hidden leaf i at height d
        let mut paths = vec![vec![0usize; hide.len()]; path_len];
        for (i, &leaf) in hide.iter().enumerate() {
            let mut node = leaf as usize + first_leaf;
            for level in paths.iter_mut() {
                level[i] = node;
                node = Self::parent(node);
            }
        }

        let mut revealed = Vec::new();
        for level in &paths {
            for &node in level {
                if !self.has_sibling(node) {
                    continue;
                }
                let mut sibling = Self::sibling(node);
                if level.contains(&sibling) {
                    continue;
                }
                while !self.has_right_child(sibling) && !self.is_leaf(sibling) {
                    sibling = 2 * sibling + 1;
                }
                if !revealed.contains(&sibling) {
                    revealed.push(sibling);
                }
            }
        }
        revealed
    }
}

/// Bytes needed to reveal all leaves of an `num_leaves` tree except `hide`
pub(crate) fn reveal_size(num_leaves: usize, hide: &[u16], seed_size: usize) -> usize {
    TreeShape::new(num_leaves).revealed_nodes(hide).len() * seed_size
}

/// A tree of pseudorandom seeds
pub(crate) struct SeedTree {
    shape: TreeShape,
    seed_size: usize,
    nodes: Zeroizing<Vec<u8>>,
    have: Vec<bool>,
}

impl SeedTree {
    fn empty(params: &ParameterSet, num_leaves: usize) -> Self {
        let shape = TreeShape::new(num_leaves);
        let seed_size = params.seed_size_bytes;
        let num_nodes = shape.num_nodes();
        Self {
            shape,
            seed_size,
            nodes: Zeroizing::new(vec![0u8; num_nodes * seed_size]),
            have: vec![false; num_nodes],
        }
    }

    /// Expand `root` into `num_leaves` leaf seeds
    pub(crate) fn generate(
        params: &ParameterSet,
        num_leaves: usize,
        root: &[u8],
        salt: &[u8],
        rep_index: usize,
    ) -> Result<Self> {
        let mut tree = Self::empty(params, num_leaves);
        tree.node_mut(0).copy_from_slice(root);
        tree.have[0] = true;
        tree.expand(params, salt, rep_index)?;
        Ok(tree)
    }

    /// Rebuild every leaf outside `hide` from a reveal produced by [`SeedTree::reveal`]
    pub(crate) fn reconstruct(
        params: &ParameterSet,
        num_leaves: usize,
        hide: &[u16],
        revealed: &[u8],
        salt: &[u8],
        rep_index: usize,
    ) -> Result<Self> {
        let mut tree = Self::empty(params, num_leaves);
        let nodes = tree.shape.revealed_nodes(hide);
        let expected = nodes.len() * tree.seed_size;
        if revealed.len() != expected {
            return Err(Error::MalformedReveal {
                context: "seed tree",
                expected,
                actual: revealed.len(),
            });
        }

        for (node, seed) in nodes.into_iter().zip(revealed.chunks_exact(tree.seed_size)) {
            tree.node_mut(node).copy_from_slice(seed);
            tree.have[node] = true;
        }
        tree.expand(params, salt, rep_index)?;
        Ok(tree)
    }

    /// Serialize the subtree roots covering every leaf outside `hide`
    pub(crate) fn reveal(&self, hide: &[u16]) -> Vec<u8> {
        let nodes = self.shape.revealed_nodes(hide);
        let mut out = Vec::with_capacity(nodes.len() * self.seed_size);
        for node in nodes {
            out.extend_from_slice(self.node(node));
        }
        out
    }

    /// Leaf seed, if this tree holds it
    pub(crate) fn leaf(&self, index: usize) -> Option<&[u8]> {
        let node = self.shape.first_leaf() + index;
        self.have[node].then(|| self.node(node))
    }

    pub(crate) fn num_leaves(&self) -> usize {
        self.shape.num_leaves()
    }

    fn node(&self, node: usize) -> &[u8] {
        &self.nodes[node * self.seed_size..(node + 1) * self.seed_size]
    }

    fn node_mut(&mut self, node: usize) -> &mut [u8] {
        &mut self.nodes[node * self.seed_size..(node + 1) * self.seed_size]
    }

    fn expand(&mut self, params: &ParameterSet, salt: &[u8], rep_index: usize) -> Result<()> {
        let mut children = Zeroizing::new(vec![0u8; 2 * self.seed_size]);
        for i in self.shape.non_leaves() {
            if !self.have[i] {
                continue;
            }
            hash_seed(params, self.node(i), salt, rep_index, i, &mut children)?;

            let left = 2 * i + 1;
            if !self.have[left] {
                let (l, _) = children.split_at(self.seed_size);
                self.node_mut(left).copy_from_slice(l);
                self.have[left] = true;
            }

            let right = 2 * i + 2;
            if self.shape.exists(right) && !self.have[right] {
                let (_, r) = children.split_at(self.seed_size);
                self.node_mut(right).copy_from_slice(r);
                self.have[right] = true;
            }
        }
        Ok(())
    }
}

// children = H_1(seed || salt || rep || node), left half then right half
fn hash_seed(
    params: &ParameterSet,
    seed: &[u8],
    salt: &[u8],
    rep_index: usize,
    node: usize,
    out: &mut [u8],
) -> Result<()> {
    let mut h = PicnicHash::new(params, HashPrefix::One)?;
    h.update(seed)?;
    h.update(salt)?;
    h.update_u16_le(rep_index as u16)?;
    h.update_u16_le(node as u16)?;
    h.finalize()?;
    h.squeeze(out)?;
    Ok(())
}
