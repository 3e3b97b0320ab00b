//! Merkle tree over the per-repetition view commitments
//!
//! Uses the [`TreeShape`] layout of the seed trees. An interior node is
//! `H_3(left || [right] || salt || index)`, where the right child is absorbed
//! whenever the node has one in range.

use picnic_algorithms::{HashPrefix, PicnicHash};
use picnic_params::ParameterSet;

use super::tree::TreeShape;
use crate::error::{Error, Result};

pub(crate) struct MerkleTree {
    shape: TreeShape,
    digest_size: usize,
    nodes: Vec<u8>,
    have: Vec<bool>,
}

impl MerkleTree {
    pub(crate) fn new(params: &ParameterSet, num_leaves: usize) -> Self {
        let shape = TreeShape::new(num_leaves);
        let num_nodes = shape.num_nodes();
        Self {
            shape,
            digest_size: params.digest_size_bytes,
            nodes: vec![0u8; num_nodes * params.digest_size_bytes],
            have: vec![false; num_nodes],
        }
    }

    /// Hash a full set of leaves up to the root
    pub(crate) fn build(
        params: &ParameterSet,
        leaves: &[Vec<u8>],
        salt: &[u8],
    ) -> Result<Self> {
        let mut tree = Self::new(params, leaves.len());
        let first_leaf = tree.shape.first_leaf();
        for (i, leaf) in leaves.iter().enumerate() {
            tree.node_mut(first_leaf + i).copy_from_slice(leaf);
            tree.have[first_leaf + i] = true;
        }
        tree.hash_up(params, salt)?;
        Ok(tree)
    }

    pub(crate) fn root(&self) -> &[u8] {
        self.node(0)
    }

    /// Interior nodes a verifier holding every leaf outside `missing` needs
    pub(crate) fn open(&self, missing: &[u16]) -> Vec<u8> {
        let nodes = revealed_nodes(&self.shape, missing);
        let mut out = Vec::with_capacity(nodes.len() * self.digest_size);
        for node in nodes {
            out.extend_from_slice(self.node(node));
        }
        out
    }

    /// Install the nodes of an opening for the leaves in `missing`
    pub(crate) fn add_nodes(&mut self, missing: &[u16], opening: &[u8]) -> Result<()> {
        let nodes = revealed_nodes(&self.shape, missing);
        if opening.len() != nodes.len() * self.digest_size {
            return Err(Error::MerkleVerification("opening has the wrong length"));
        }
        for (node, digest) in nodes.into_iter().zip(opening.chunks_exact(self.digest_size)) {
            self.node_mut(node).copy_from_slice(digest);
            self.have[node] = true;
        }
        Ok(())
    }

    /// Fill in the known leaves and recompute the root
    ///
    /// `leaves[i]` is `None` for leaves covered by the opening. Supplying a
    /// leaf for a position the opening already set is an error.
    pub(crate) fn verify(
        &mut self,
        params: &ParameterSet,
        leaves: &[Option<Vec<u8>>],
        salt: &[u8],
    ) -> Result<&[u8]> {
        let first_leaf = self.shape.first_leaf();
        for (i, leaf) in leaves.iter().enumerate() {
            if let Some(leaf) = leaf {
                if self.have[first_leaf + i] {
                    return Err(Error::MerkleVerification("leaf supplied twice"));
                }
                self.node_mut(first_leaf + i).copy_from_slice(leaf);
                self.have[first_leaf + i] = true;
            }
        }
        self.hash_up(params, salt)?;
        if !self.have[0] {
            return Err(Error::MerkleVerification("root not reached"));
        }
        Ok(self.root())
    }

    fn node(&self, node: usize) -> &[u8] {
        &self.nodes[node * self.digest_size..(node + 1) * self.digest_size]
    }

    fn node_mut(&mut self, node: usize) -> &mut [u8] {
        &mut self.nodes[node * self.digest_size..(node + 1) * self.digest_size]
    }

    fn hash_up(&mut self, params: &ParameterSet, salt: &[u8]) -> Result<()> {
        for child in (1..=self.shape.num_nodes()).rev() {
            self.compute_parent(params, child, salt)?;
        }
        Ok(())
    }

    fn compute_parent(&mut self, params: &ParameterSet, child: usize, salt: &[u8]) -> Result<()> {
        if !self.shape.exists(child) {
            return Ok(());
        }
        let parent = TreeShape::parent(child);
        if self.have[parent] {
            return Ok(());
        }
        let (left, right) = (2 * parent + 1, 2 * parent + 2);
        if !self.have[left] || (self.shape.exists(right) && !self.have[right]) {
            return Ok(());
        }

        let mut h = PicnicHash::new(params, HashPrefix::Three)?;
        h.update(self.node(left))?;
        if self.shape.has_right_child(parent) {
            h.update(self.node(right))?;
        }
        h.update(salt)?;
        h.update_u16_le(parent as u16)?;
        h.finalize()?;
        let mut digest = vec![0u8; self.digest_size];
        h.squeeze(&mut digest)?;

        self.node_mut(parent).copy_from_slice(&digest);
        self.have[parent] = true;
        Ok(())
    }
}

/// Bytes in an opening for the leaves in `missing`
pub(crate) fn open_size(num_leaves: usize, missing: &[u16], digest_size: usize) -> usize {
    revealed_nodes(&TreeShape::new(num_leaves), missing).len() * digest_size
}

// Highest node on each missing leaf's path whose parent is not itself
// entirely missing.
fn revealed_nodes(shape: &TreeShape, missing: &[u16]) -> Vec<usize> {
    let first_leaf = shape.first_leaf();
    let mut missing_nodes = vec![false; shape.num_nodes()];
    for &leaf in missing {
        missing_nodes[first_leaf + leaf as usize] = true;
    }

    for i in (1..shape.non_leaves().end).rev() {
        if !shape.exists(i) {
            continue;
        }
        let left = missing_nodes[2 * i + 1];
        missing_nodes[i] = if shape.exists(2 * i + 2) {
            left && missing_nodes[2 * i + 2]
        } else {
            left
        };
    }

    let mut revealed = Vec::new();
    for &leaf in missing {
        let mut node = first_leaf + leaf as usize;
        while node != 0 {
            let parent = TreeShape::parent(node);
            if !missing_nodes[parent] {
                if !revealed.contains(&node) {
                    revealed.push(node);
                }
                break;
            }
            node = parent;
        }
    }
    revealed
}
