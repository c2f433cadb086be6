//! Streaming Merkle tree construction
//!
//! The builder consumes the payload incrementally and emits level-0 node
//! digests into the caller's tree buffer; each completed digest is fed
//! into the next level's builder, so the whole tree and the root fall out
//! of a single `init` / `update`* / `finalize` pass over the payload.
//! Chunk boundaries in the input never change the result: feeding the
//! payload byte by byte produces the same tree bytes and root as one call.

use crate::digest::Digest;
use crate::error::TreeError;
use crate::hasher::{NodeHasher, ZERO_NODE};
use crate::{DIGESTS_PER_NODE, DIGEST_LEN, NODE_SIZE};

/// Round `len` up to a whole number of nodes.
pub(crate) fn round_up(len: usize) -> usize {
    (len + NODE_SIZE - 1) / NODE_SIZE * NODE_SIZE
}

/// Length of the next level up: one digest per node of this level, or 0
/// once the level fits in a single node.
pub(crate) fn next_length(len: usize) -> usize {
    if len > NODE_SIZE {
        round_up(len) / DIGESTS_PER_NODE
    } else {
        0
    }
}

/// Node-aligned length of the next level up.
pub(crate) fn next_aligned(len: usize) -> usize {
    round_up(next_length(len))
}

/// Streaming Merkle tree builder.
///
/// One builder instance drives one level of the tree and owns the builder
/// for the level above it; the caller only ever touches the leaf-level
/// instance. The protocol is `init(payload_len, tree_len)`, any number of
/// `update` calls totalling exactly `payload_len` bytes, then `finalize`,
/// which returns the root digest. After `finalize` (or a failed `init`)
/// the builder must be re-`init`ed before further use.
///
/// The tree buffer passed to `update` and `finalize` must be the same
/// buffer each time and at least [`TreeBuilder::tree_length`] bytes; the
/// builder writes nothing else.
#[derive(Default)]
pub struct TreeBuilder {
    initialized: bool,
    level: u64,
    offset: usize,
    length: usize,
    node: Option<NodeHasher>,
    digest: Option<Digest>,
    next: Option<Box<TreeBuilder>>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        TreeBuilder::default()
    }

    /// Required tree buffer size for a payload of `data_len` bytes.
    ///
    /// Zero when the payload fits in a single node; the root is then
    /// computed directly from the payload.
    pub fn tree_length(data_len: usize) -> usize {
        let next = next_aligned(data_len);
        if next == 0 {
            0
        } else {
            next + Self::tree_length(next)
        }
    }

    /// Begin building a tree for exactly `data_len` payload bytes.
    ///
    /// `tree_len` is the size of the tree buffer the subsequent `update`
    /// and `finalize` calls will receive; fails with
    /// [`TreeError::BufferTooSmall`] if it cannot hold every level.
    pub fn init(&mut self, data_len: usize, tree_len: usize) -> Result<(), TreeError> {
        self.initialized = false;
        self.offset = 0;
        self.length = data_len;
        self.node = None;
        self.digest = None;
        self.next = None;
        if data_len > NODE_SIZE {
            let aligned = next_aligned(data_len);
            if tree_len < aligned {
                return Err(TreeError::BufferTooSmall);
            }
            let mut next = Box::new(TreeBuilder {
                level: self.level + 1,
                ..TreeBuilder::default()
            });
            next.init(aligned, tree_len - aligned)?;
            self.next = Some(next);
        }
        self.initialized = true;
        Ok(())
    }

    /// Feed the next `data.len()` payload bytes.
    ///
    /// Completed node digests are written into their slots in `tree` and
    /// cascaded into the levels above. Fails with
    /// [`TreeError::OutOfRange`] if the total fed exceeds the length
    /// declared at `init`.
    pub fn update(&mut self, data: &[u8], tree: &mut [u8]) -> Result<(), TreeError> {
        if !self.initialized {
            return Err(TreeError::BadState);
        }
        if data.is_empty() {
            return Ok(());
        }
        match self.offset.checked_add(data.len()) {
            Some(end) if end <= self.length => {}
            _ => return Err(TreeError::OutOfRange),
        }
        if self.length > NODE_SIZE && tree.len() < Self::tree_length(self.length) {
            return Err(TreeError::InvalidArgs);
        }
        // This level's digest slots are the first node-aligned chunk of
        // the tree buffer; everything after belongs to the levels above.
        let (slots, upper) = if self.length > NODE_SIZE {
            tree.split_at_mut(next_aligned(self.length))
        } else {
            (tree, Default::default())
        };
        let mut data = data;
        while !data.is_empty() {
            if self.offset % NODE_SIZE == 0 {
                self.node = Some(NodeHasher::new(
                    self.offset as u64 | self.level,
                    self.length - self.offset,
                ));
            }
            let Some(hasher) = self.node.as_mut() else {
                return Err(TreeError::BadState);
            };
            let chunk = hasher.update(data, self.offset);
            self.offset += chunk;
            data = &data[chunk..];
            // Keep absorbing until a node boundary or the end of the level.
            if self.offset % NODE_SIZE != 0 && self.offset != self.length {
                break;
            }
            let Some(hasher) = self.node.take() else {
                return Err(TreeError::BadState);
            };
            let digest = hasher.finish(self.offset);
            if self.length <= NODE_SIZE {
                // Top of the tree; hold the digest for `finalize`.
                self.digest = Some(digest);
                break;
            }
            let slot = (self.offset - 1) / NODE_SIZE * DIGEST_LEN;
            if slot % NODE_SIZE == 0 {
                // Entering a fresh tree node: zero it so the slack past
                // the last digest hashes as padding in the level above.
                slots[slot..slot + NODE_SIZE].fill(0);
            }
            slots[slot..slot + DIGEST_LEN].copy_from_slice(digest.as_bytes());
            let Some(next) = self.next.as_mut() else {
                return Err(TreeError::BadState);
            };
            next.update(digest.as_bytes(), upper)?;
        }
        Ok(())
    }

    /// Close the build and return the root digest.
    ///
    /// Fails with [`TreeError::BadState`] unless every payload byte
    /// declared at `init` has been fed. Upper levels are zero-padded to
    /// their node-aligned lengths, cascading the final digests upward.
    pub fn finalize(&mut self, tree: &mut [u8]) -> Result<Digest, TreeError> {
        if !self.initialized || (self.level == 0 && self.offset != self.length) {
            return Err(TreeError::BadState);
        }
        if self.length > NODE_SIZE && tree.len() < Self::tree_length(self.length) {
            return Err(TreeError::InvalidArgs);
        }
        if self.length == 0 {
            // The empty payload hashes as an empty level-0 node.
            self.digest = Some(NodeHasher::new(0, 0).finish(0));
        }
        let pad = self.length - self.offset;
        if pad > 0 {
            self.update(&ZERO_NODE[..pad], tree)?;
        }
        self.initialized = false;
        if self.length <= NODE_SIZE {
            return self.digest.take().ok_or(TreeError::BadState);
        }
        let (_, upper) = tree.split_at_mut(next_aligned(self.length));
        match self.next.as_mut() {
            Some(next) => next.finalize(upper),
            None => Err(TreeError::BadState),
        }
    }

    /// One-shot build: init, feed the whole payload, finalize.
    pub fn build(data: &[u8], tree: &mut [u8]) -> Result<Digest, TreeError> {
        let mut builder = TreeBuilder::new();
        builder.init(data.len(), tree.len())?;
        builder.update(data, tree)?;
        builder.finalize(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_length() {
        assert_eq!(TreeBuilder::tree_length(0), 0);
        assert_eq!(TreeBuilder::tree_length(1), 0);
        assert_eq!(TreeBuilder::tree_length(NODE_SIZE), 0);
        assert_eq!(TreeBuilder::tree_length(NODE_SIZE + 1), NODE_SIZE);
        assert_eq!(
            TreeBuilder::tree_length(NODE_SIZE * DIGESTS_PER_NODE),
            NODE_SIZE
        );
        assert_eq!(
            TreeBuilder::tree_length(NODE_SIZE * DIGESTS_PER_NODE + 1),
            3 * NODE_SIZE
        );
    }

    #[test]
    fn test_next_length() {
        assert_eq!(next_length(0), 0);
        assert_eq!(next_length(NODE_SIZE), 0);
        assert_eq!(next_length(NODE_SIZE + 1), 2 * DIGEST_LEN);
        assert_eq!(next_length(4 * NODE_SIZE), 4 * DIGEST_LEN);
        assert_eq!(next_aligned(4 * NODE_SIZE), NODE_SIZE);
    }

    #[test]
    fn test_init_accepts_empty_payload() {
        let mut builder = TreeBuilder::new();
        builder.init(0, 0).unwrap();
        // Re-init without finalize is allowed.
        builder.init(0, 0).unwrap();
    }

    #[test]
    fn test_init_tree_too_small() {
        let data_len = 4 * NODE_SIZE;
        let mut builder = TreeBuilder::new();
        let needed = TreeBuilder::tree_length(data_len);
        assert_eq!(
            builder.init(data_len, needed - 1),
            Err(TreeError::BufferTooSmall)
        );
        // A failed init leaves the builder unusable.
        let mut tree = vec![0u8; needed];
        assert_eq!(
            builder.update(&[0u8; 16], &mut tree),
            Err(TreeError::BadState)
        );
    }

    #[test]
    fn test_update_before_init() {
        let mut builder = TreeBuilder::new();
        assert_eq!(
            builder.update(&[0u8; 1], &mut []),
            Err(TreeError::BadState)
        );
    }

    #[test]
    fn test_update_too_much_data() {
        let data = vec![0u8; NODE_SIZE];
        let mut builder = TreeBuilder::new();
        builder.init(data.len(), 0).unwrap();
        builder.update(&data, &mut []).unwrap();
        assert_eq!(
            builder.update(&[0u8; 1], &mut []),
            Err(TreeError::OutOfRange)
        );
    }

    #[test]
    fn test_update_missing_tree() {
        let mut builder = TreeBuilder::new();
        builder
            .init(2 * NODE_SIZE, TreeBuilder::tree_length(2 * NODE_SIZE))
            .unwrap();
        assert_eq!(
            builder.update(&[0u8; 16], &mut []),
            Err(TreeError::InvalidArgs)
        );
    }

    #[test]
    fn test_finalize_incomplete_data() {
        let data = vec![0u8; 2 * NODE_SIZE];
        let mut tree = vec![0u8; TreeBuilder::tree_length(data.len())];
        let mut builder = TreeBuilder::new();
        builder.init(data.len(), tree.len()).unwrap();
        builder.update(&data[..data.len() - 1], &mut tree).unwrap();
        assert_eq!(builder.finalize(&mut tree), Err(TreeError::BadState));
    }

    #[test]
    fn test_finalize_before_init() {
        let mut builder = TreeBuilder::new();
        assert_eq!(builder.finalize(&mut []), Err(TreeError::BadState));
    }

    #[test]
    fn test_builder_reuse_after_finalize() {
        let data = vec![0x11u8; NODE_SIZE];
        let mut builder = TreeBuilder::new();

        builder.init(data.len(), 0).unwrap();
        builder.update(&data, &mut []).unwrap();
        let first = builder.finalize(&mut []).unwrap();

        // Finalize without a fresh init is rejected.
        assert_eq!(builder.finalize(&mut []), Err(TreeError::BadState));

        builder.init(data.len(), 0).unwrap();
        builder.update(&data, &mut []).unwrap();
        assert_eq!(builder.finalize(&mut []).unwrap(), first);
    }
}
