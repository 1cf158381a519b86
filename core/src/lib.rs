//! Schema and hashing of the hex-radix Merkle Patricia Trie.
//!
//! This crate defines the node model of an authenticated key-value
//! dictionary in a digest-agnostic manner. Keys are lowercase hex strings;
//! the tree fans out over the 16 hex digits.
//!
//! There are two kinds of nodes: [`Extension`] nodes, which carry an edge
//! label, an optional value, and an optional child, and [`Branch`] nodes,
//! which carry up to 16 extension children indexed by the leading hex digit
//! of their labels. Every node caches a hash over its serialized pre-image,
//! so the root hash commits to the entire key-value set.
//!
//! Nothing within this crate relies on the standard library.

#![no_std]
#![warn(missing_docs)]

extern crate alloc;

pub mod hasher;
pub mod trie;

#[cfg(feature = "blake3-hasher")]
pub use hasher::Blake3Hasher;
#[cfg(any(feature = "sha2-hasher", test))]
pub use hasher::Sha2Hasher;
pub use hasher::{CryptoHasher, HashBlob, Hasher, HasherError};
pub use trie::{Branch, Extension, Node, Value};
