//! Veritree - Merkle tree integrity for linear byte payloads
//!
//! Builds a SHA256 Merkle tree over a payload in fixed-size nodes and
//! verifies arbitrary byte ranges of the payload against a trusted root,
//! touching only the nodes and digests that authenticate the range.
//!
//! # Core Concepts
//!
//! - **Node**: an 8 KiB window over a level's bytes; the unit of hashing.
//! - **Level**: level 0 is the payload; level k+1 is the packed digests of
//!   level k's nodes. Levels ascend until one fits in a single node.
//! - **Packed tree**: levels 1.. concatenated, each zero-padded to whole
//!   nodes. The layout is byte-for-byte deterministic.
//! - **Root**: the digest of the topmost level's single node.
//!
//! Each node is hashed with a locality prefix (`offset | level`, little
//! endian) and the node's byte length, so digests are bound to their
//! position in the tree and payloads of different lengths cannot collide.
//!
//! # Example
//!
//! ```rust
//! use veritree::{verify, TreeBuilder, NODE_SIZE};
//!
//! # fn main() -> Result<(), veritree::TreeError> {
//! let payload = vec![0xabu8; 3 * NODE_SIZE];
//! let mut tree = vec![0u8; TreeBuilder::tree_length(payload.len())];
//!
//! let root = TreeBuilder::build(&payload, &mut tree)?;
//!
//! // Authenticate just the middle node.
//! verify(&payload, &tree, NODE_SIZE, NODE_SIZE, &root)?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod digest;
pub mod error;
pub mod verifier;

mod hasher;

pub use builder::TreeBuilder;
pub use digest::{Digest, DigestParseError};
pub use error::TreeError;
pub use verifier::verify;

/// Size of a tree node in bytes.
pub const NODE_SIZE: usize = 8192;

/// Size of a digest in bytes (SHA256).
pub const DIGEST_LEN: usize = 32;

/// Number of digests that fit in one node. If `len` is a node-aligned
/// length in one level, `len / DIGESTS_PER_NODE` is the corresponding
/// length in the next level up.
pub const DIGESTS_PER_NODE: usize = NODE_SIZE / DIGEST_LEN;
