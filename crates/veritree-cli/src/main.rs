//! Veritree CLI
//!
//! Usage:
//!   veritree root <path>...
//!   veritree tree <path> --out <tree-path>
//!   veritree verify <path> --root <hex> [--tree <tree-path>] [--offset N] [--length N]
//!
//! `root` prints sha256sum-style lines. `verify` exits 1 when the range
//! does not authenticate against the root.
//!
//! Note that `verify` only works for empty files, files of exactly one
//! node (8192 bytes), or larger: the tree format hashes the root node
//! with a full node's length field on the verify side, so a file of 1 to
//! 8191 bytes never verifies against its own root. For files that small,
//! re-run `root` and compare digests instead.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use veritree::{verify, Digest, TreeBuilder, TreeError};

#[derive(Parser)]
#[command(name = "veritree")]
#[command(about = "Merkle tree roots and range verification for files", long_about = None)]
struct Cli {
    /// Verbose logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the Merkle root of each file
    Root {
        /// Files to hash
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Write a file's packed Merkle tree and print its root
    Tree {
        /// File to build the tree for
        path: PathBuf,
        /// Where to write the packed tree
        #[arg(long, short)]
        out: PathBuf,
    },
    /// Verify a byte range of a file against a tree and a trusted root
    ///
    /// Only defined for empty files and files of at least one full node
    /// (8192 bytes): a smaller file never verifies against its own root
    /// because the root node is re-hashed with a full node's length
    /// field. Compare `root` output directly for such files.
    Verify {
        /// File to verify
        path: PathBuf,
        /// Trusted root digest, 64 hex characters
        #[arg(long)]
        root: Digest,
        /// Packed tree (required for files larger than one node)
        #[arg(long)]
        tree: Option<PathBuf>,
        /// First byte of the range to verify
        #[arg(long, default_value_t = 0)]
        offset: usize,
        /// Number of bytes to verify; defaults to the rest of the file
        #[arg(long)]
        length: Option<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(if cli.verbose { "debug" } else { "warn" })
            }),
        )
        .init();

    match cli.command {
        Commands::Root { paths } => {
            for path in paths {
                let root = file_root(&path)?;
                println!("{root}  {}", path.display());
            }
        }
        Commands::Tree { path, out } => {
            let data =
                fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
            let mut tree = vec![0u8; TreeBuilder::tree_length(data.len())];
            let root = TreeBuilder::build(&data, &mut tree)?;
            fs::write(&out, &tree)
                .with_context(|| format!("failed to write {}", out.display()))?;
            debug!(tree_len = tree.len(), "wrote packed tree");
            println!("{root}  {}", path.display());
        }
        Commands::Verify {
            path,
            root,
            tree,
            offset,
            length,
        } => {
            let data =
                fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
            let tree = match tree {
                Some(tree_path) => fs::read(&tree_path)
                    .with_context(|| format!("failed to read {}", tree_path.display()))?,
                None => Vec::new(),
            };
            let length = length.unwrap_or_else(|| data.len().saturating_sub(offset));
            debug!(offset, length, data_len = data.len(), "verifying range");
            match verify(&data, &tree, offset, length, &root) {
                Ok(()) => println!("ok: {} [{offset}..{}]", path.display(), offset + length),
                Err(TreeError::DataIntegrity) => {
                    bail!("verification FAILED for {}", path.display())
                }
                Err(err) => return Err(err).context("unable to verify"),
            }
        }
    }
    Ok(())
}

/// Build a file's tree in memory and return the root.
fn file_root(path: &Path) -> Result<Digest> {
    let data = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mut tree = vec![0u8; TreeBuilder::tree_length(data.len())];
    let root = TreeBuilder::build(&data, &mut tree)?;
    Ok(root)
}
