//! Per-node digest computation
//!
//! A node's digest is SHA256 over:
//!
//! ```text
//! locality || length || node data || padding
//! ```
//!
//! where `locality` is the 64-bit little-endian value `offset | level`
//! (node offsets are multiples of [`NODE_SIZE`], so the level fits in the
//! low bits without collision), `length` is the 32-bit little-endian count
//! of actual node bytes, and `padding` is zeros up to the node size. The
//! locality prefix binds each digest to its position in the tree; the
//! length field binds the payload's true length into the last node.

use sha2::{Digest as _, Sha256};

use crate::digest::Digest;
use crate::NODE_SIZE;

pub(crate) const ZERO_NODE: [u8; NODE_SIZE] = [0u8; NODE_SIZE];

/// Incremental hash of a single node.
pub(crate) struct NodeHasher {
    sha: Sha256,
}

impl NodeHasher {
    /// Start a node hash, absorbing the locality and length fields.
    /// `remaining` is the number of bytes left in the level from this
    /// node's start; the length field is `min(remaining, NODE_SIZE)`.
    pub fn new(locality: u64, remaining: usize) -> Self {
        let mut sha = Sha256::new();
        sha.update(locality.to_le_bytes());
        sha.update((remaining.min(NODE_SIZE) as u32).to_le_bytes());
        NodeHasher { sha }
    }

    /// Absorb data up to the next node boundary, as determined by
    /// `offset` within the level. Returns the number of bytes consumed;
    /// the caller advances its offset by that amount.
    pub fn update(&mut self, data: &[u8], offset: usize) -> usize {
        let chunk = data.len().min(NODE_SIZE - offset % NODE_SIZE);
        self.sha.update(&data[..chunk]);
        chunk
    }

    /// Pad with zeros to the node boundary and produce the digest.
    pub fn finish(mut self, offset: usize) -> Digest {
        let tail = offset % NODE_SIZE;
        if tail != 0 {
            self.sha.update(&ZERO_NODE[..NODE_SIZE - tail]);
        }
        let raw: [u8; 32] = self.sha.finalize().into();
        Digest::from(raw)
    }
}
