//! Range verification against a packed tree and trusted root
//!
//! Verification walks the levels bottom-up: at each level the nodes
//! covering the requested range are re-hashed and compared against the
//! digests stored in the level above, then the range collapses by a
//! factor of [`DIGESTS_PER_NODE`] and the walk ascends. Only the digests
//! on the paths from the range to the root are ever touched, so the cost
//! is proportional to the range plus the tree height.

use crate::builder::{next_aligned, next_length, round_up};
use crate::digest::Digest;
use crate::error::TreeError;
use crate::hasher::NodeHasher;
use crate::{DIGESTS_PER_NODE, DIGEST_LEN, NODE_SIZE};

/// Authenticate `length` bytes of `data` starting at `offset` against the
/// packed `tree` and the trusted `root`.
///
/// The range is expanded outward to node boundaries before hashing; a
/// zero-length range checks only the root. Bytes of `data` or `tree`
/// outside the nodes and digests the expanded range touches have no
/// effect on the outcome, so a caller holding only a trusted root
/// authenticates exactly the nodes its range covers, not the whole
/// payload. Any mismatch reports [`TreeError::DataIntegrity`].
///
/// # Limitations
///
/// The root-level node is always re-hashed with a full node's length
/// field, while building hashes the payload's true length into it. The
/// two only agree for the empty payload, a payload of exactly
/// [`NODE_SIZE`] bytes, or anything larger: a payload of 1 to
/// `NODE_SIZE - 1` bytes never verifies against its own root, even
/// untampered. Callers with sub-node payloads should rebuild and compare
/// root digests instead of calling `verify`.
pub fn verify(
    data: &[u8],
    tree: &[u8],
    offset: usize,
    length: usize,
    root: &Digest,
) -> Result<(), TreeError> {
    match offset.checked_add(length) {
        Some(end) if end <= data.len() => {}
        _ => return Err(TreeError::OutOfRange),
    }
    let mut data = data;
    let mut tree = tree;
    let mut offset = offset;
    let mut length = length;
    let mut level: u64 = 0;
    let mut root_len = data.len();
    while data.len() > NODE_SIZE {
        verify_level(data, tree, offset, length, level)?;
        // Ascend: this level's digests become the data to check.
        root_len = next_length(data.len());
        let aligned = next_aligned(data.len());
        if tree.len() < aligned {
            return Err(TreeError::BufferTooSmall);
        }
        data = &tree[..aligned];
        tree = &tree[aligned..];
        offset /= DIGESTS_PER_NODE;
        length /= DIGESTS_PER_NODE;
        level += 1;
    }
    verify_root(data, root_len, level, root)
}

/// Check one level's nodes against the digests stored in the level above.
fn verify_level(
    data: &[u8],
    tree: &[u8],
    offset: usize,
    length: usize,
    level: u64,
) -> Result<(), TreeError> {
    let data_len = data.len();
    if tree.is_empty() {
        return Err(TreeError::InvalidArgs);
    }
    if offset + length > data_len {
        return Err(TreeError::OutOfRange);
    }
    // Expand the range outward to node boundaries.
    let start = offset - offset % NODE_SIZE;
    let end = if length == 0 {
        start
    } else {
        round_up(offset + length)
    };
    let mut node_off = start;
    while node_off < end {
        // The payload's last node may be short; hash what exists and let
        // the node hasher pad, exactly as the builder did.
        let avail = data_len.min(node_off + NODE_SIZE) - node_off;
        let mut hasher = NodeHasher::new(node_off as u64 | level, data_len - node_off);
        hasher.update(&data[node_off..node_off + avail], node_off);
        let actual = hasher.finish(node_off + avail);

        let slot = node_off / DIGESTS_PER_NODE;
        if tree.len() < slot + DIGEST_LEN {
            return Err(TreeError::BufferTooSmall);
        }
        if actual.as_bytes()[..] != tree[slot..slot + DIGEST_LEN] {
            return Err(TreeError::DataIntegrity);
        }
        node_off += NODE_SIZE;
    }
    Ok(())
}

/// Check the top level, which fits in a single node, against the root.
fn verify_root(
    data: &[u8],
    root_len: usize,
    level: u64,
    expected: &Digest,
) -> Result<(), TreeError> {
    if root_len > NODE_SIZE || data.len() < root_len {
        return Err(TreeError::InvalidArgs);
    }
    // Zero length hashes the empty node; otherwise a whole node.
    let mut hasher = NodeHasher::new(level, if root_len == 0 { 0 } else { NODE_SIZE });
    hasher.update(&data[..root_len], 0);
    let actual = hasher.finish(root_len);
    if actual == *expected {
        Ok(())
    } else {
        Err(TreeError::DataIntegrity)
    }
}
