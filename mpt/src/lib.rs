#![warn(missing_docs)]

//! An authenticated key-value dictionary backed by a hex-radix Merkle
//! Patricia Trie.
//!
//! Keys are arbitrary non-empty byte strings, hex-encoded internally;
//! values are arbitrary byte strings. Every node caches a hash over its
//! serialized content and its children's hashes, so
//! [`MerklePatriciaTrie::root_hash`] commits to the entire map. The tree is
//! kept in canonical shape across mutations: common prefixes are fused
//! into single edges, branches fan out only at points of divergence, and a
//! branch left with a single child is spliced back into its parent edge.
//! Because the shape is canonical, the root hash depends only on the final
//! key-value set, never on the order of insertions and deletions.
//!
//! Compact inclusion proofs are available through
//! [`MerklePatriciaTrie::find_merkle_path`], which returns the
//! leaf-to-root chain of node hashes for a stored key.
//!
//! The digest is injected through the [`Hasher`] port; see
//! [`mpt_core::hasher`] for the adapters. All operations are synchronous,
//! purely in-memory, and complete in steps bounded by the hex key length
//! and the 16-way fan-out.

use mpt_core::trie::{Branch, Extension, Node, Value};

mod error;
mod path;

pub use error::Error;
pub use path::{MerklePath, MerkleSet};

#[cfg(feature = "blake3-hasher")]
pub use mpt_core::Blake3Hasher;
#[cfg(feature = "sha2-hasher")]
pub use mpt_core::Sha2Hasher;
pub use mpt_core::{CryptoHasher, HashBlob, Hasher, HasherError};

/// An authenticated map from byte keys to byte values.
///
/// The root is always a branch node, even when the map is empty. Mutations
/// restructure the tree in place and refresh node hashes bottom-up, so the
/// root hash is ready as soon as an operation returns.
///
/// Not safe for concurrent use; callers requiring concurrency wrap the
/// trie with their own exclusion.
pub struct MerklePatriciaTrie<H: Hasher> {
    hasher: H,
    root: Branch,
}

impl<H: Hasher> MerklePatriciaTrie<H> {
    /// Create an empty trie over the injected digest.
    ///
    /// The root branch hash is computed immediately, so
    /// [`MerklePatriciaTrie::root_hash`] is defined from the start.
    pub fn new(hasher: H) -> Result<Self, Error> {
        let mut root = Branch::new();
        root.refresh_hash(&hasher)?;
        Ok(MerklePatriciaTrie { hasher, root })
    }

    /// The hash committing to the entire contents of the trie.
    pub fn root_hash(&self) -> &HashBlob {
        self.root.hash()
    }

    /// Insert a key-value pair.
    ///
    /// Fails with [`Error::EmptyKey`] on an empty key and with
    /// [`Error::DuplicateKey`] if the key is already present; values are
    /// never overwritten in place.
    pub fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), Error> {
        if key.is_empty() {
            return Err(Error::EmptyKey);
        }
        let hex_key = hex::encode(key);
        insert_into_branch(&mut self.root, &hex_key, Value::new(value.to_vec()), &self.hasher)?;
        self.root.refresh_hash(&self.hasher)?;
        Ok(())
    }

    /// Remove a key and its value.
    ///
    /// Fails with [`Error::EmptyKey`] on an empty key and with
    /// [`Error::NotFound`] if the key holds no value, including when it is
    /// merely a prefix of a stored key.
    pub fn delete(&mut self, key: &[u8]) -> Result<(), Error> {
        if key.is_empty() {
            return Err(Error::EmptyKey);
        }
        let hex_key = hex::encode(key);
        // the root may legally go empty or keep a single child, so its
        // collapse signal is ignored
        delete_from_branch(&mut self.root, &hex_key, &self.hasher)?;
        self.root.refresh_hash(&self.hasher)?;
        Ok(())
    }

    /// Extract the leaf-to-root Merkle path for a stored key.
    ///
    /// Fails with [`Error::EmptyKey`] on an empty key and with
    /// [`Error::NotFound`] if the key holds no value.
    pub fn find_merkle_path(&self, key: &[u8]) -> Result<MerklePath, Error> {
        if key.is_empty() {
            return Err(Error::EmptyKey);
        }
        let hex_key = hex::encode(key);
        let mut path = path_in_branch(&self.root, &hex_key)?;
        path.push(MerkleSet::single(self.root.hash().clone()));
        Ok(path)
    }

    /// Render the whole tree as diagnostic JSON.
    pub fn to_json(&self) -> String {
        self.root.to_json()
    }
}

/// Length of the longest common prefix of two hex keys.
///
/// Callers reach this only after dispatching on the first digit, so both
/// inputs are non-empty and start with the same character; anything else is
/// a defect in the traversal.
fn common_prefix_len(a: &str, b: &str) -> usize {
    assert!(!a.is_empty() && !b.is_empty(), "common prefix of an empty key");
    assert_eq!(a.as_bytes()[0], b.as_bytes()[0], "keys share no common prefix");
    a.bytes().zip(b.bytes()).take_while(|(x, y)| x == y).count()
}

fn insert_into_branch<H: Hasher>(
    node: &mut Branch,
    key: &str,
    value: Value,
    hasher: &H,
) -> Result<(), Error> {
    let digit = key.as_bytes()[0];
    match node.child_mut(digit) {
        Some(child) => insert_into_extension(child, key, value, hasher)?,
        None => {
            let mut child = Extension::new(key, None, Some(value));
            child.refresh_hash(hasher)?;
            node.append(child);
        }
    }
    node.refresh_hash(hasher)?;
    Ok(())
}

fn insert_into_extension<H: Hasher>(
    node: &mut Extension,
    key: &str,
    value: Value,
    hasher: &H,
) -> Result<(), Error> {
    // the key ends exactly on this edge
    if key == node.key() {
        if node.has_value() {
            return Err(Error::DuplicateKey(key.to_owned()));
        }
        node.set_value(Some(value));
        node.refresh_hash(hasher)?;
        return Ok(());
    }

    let prefix_len = common_prefix_len(node.key(), key);

    if prefix_len == node.key().len() {
        // the key extends past this edge
        let tail = &key[prefix_len..];
        match node.next_mut() {
            None => {
                let mut child = Extension::new(tail, None, Some(value));
                child.refresh_hash(hasher)?;
                node.set_next(Some(Node::Extension(child)));
            }
            Some(Node::Branch(next)) => insert_into_branch(next, tail, value, hasher)?,
            Some(Node::Extension(next)) if next.first_digit() == tail.as_bytes()[0] => {
                insert_into_extension(next, tail, value, hasher)?;
            }
            Some(Node::Extension(_)) => {
                // the tail and the existing child edge diverge immediately:
                // fork into a fresh branch holding both
                let mut sibling = Extension::new(tail, None, Some(value));
                sibling.refresh_hash(hasher)?;
                let existing = match node.take_next() {
                    Some(Node::Extension(existing)) => existing,
                    _ => unreachable!("next was just matched as an extension"),
                };
                node.set_next(Some(Node::Branch(Branch::with_children(existing, sibling))));
                node.refresh_next(hasher)?;
            }
        }
        node.refresh_hash(hasher)?;
        return Ok(());
    }

    if prefix_len == key.len() {
        // this edge extends past the key: split it, keeping the carried
        // value and child on the detached tail
        let tail = node.key()[prefix_len..].to_owned();
        let prefix = node.key()[..prefix_len].to_owned();
        let next = node.take_next();
        let carried = node.take_value();
        node.set_next(Some(Node::Extension(Extension::new(tail, next, carried))));
        node.set_key(prefix);
        node.set_value(Some(value));
        node.refresh_next(hasher)?;
        node.refresh_hash(hasher)?;
        return Ok(());
    }

    // the edges diverge inside this node's label: divide at the fork
    let node_tail = node.key()[prefix_len..].to_owned();
    let key_tail = key[prefix_len..].to_owned();
    let prefix = node.key()[..prefix_len].to_owned();

    let mut new_child = Extension::new(key_tail, None, Some(value));
    new_child.refresh_hash(hasher)?;

    let next = node.take_next();
    let carried = node.take_value();
    let old_child = Extension::new(node_tail, next, carried);
    let fork_digit = old_child.first_digit();

    node.set_next(Some(Node::Branch(Branch::with_children(old_child, new_child))));
    node.set_key(prefix);
    node.set_value(None);

    // the detached tail has not been hashed yet; refresh bottom-up
    match node.next_mut() {
        Some(Node::Branch(fork)) => {
            fork.child_mut(fork_digit)
                .expect("fork was just built around this child")
                .refresh_hash(hasher)?;
            fork.refresh_hash(hasher)?;
        }
        _ => unreachable!("next was just set to a branch"),
    }
    node.refresh_hash(hasher)?;
    Ok(())
}

// Both delete routines report, besides the error, whether the caller must
// unlink the current node: a `true` means the node ended up carrying
// neither value nor child (extension), or a single child (branch), and the
// parent absorbs the remainder.

fn delete_from_branch<H: Hasher>(node: &mut Branch, key: &str, hasher: &H) -> Result<bool, Error> {
    let digit = key.as_bytes()[0];
    let collapse_child = match node.child_mut(digit) {
        None => return Err(Error::NotFound),
        Some(child) => delete_from_extension(child, key, hasher)?,
    };
    if !collapse_child {
        node.refresh_hash(hasher)?;
        return Ok(false);
    }
    node.remove(digit);
    if node.child_count() == 1 {
        // the parent extension splices the lone remaining edge out; no
        // point refreshing a node about to be unlinked
        return Ok(true);
    }
    node.refresh_hash(hasher)?;
    Ok(false)
}

fn delete_from_extension<H: Hasher>(
    node: &mut Extension,
    key: &str,
    hasher: &H,
) -> Result<bool, Error> {
    // the key ends exactly on this edge
    if key == node.key() {
        if !node.has_value() {
            return Err(Error::NotFound);
        }
        node.set_value(None);
        return match node.take_next() {
            None => Ok(true),
            Some(Node::Extension(next)) => {
                // the child edge no longer needs its own node: fuse it in
                let (next_key, next_next, next_value) = next.into_parts();
                let mut merged = node.key().to_owned();
                merged.push_str(&next_key);
                node.set_key(merged);
                node.set_value(next_value);
                node.set_next(next_next);
                node.refresh_hash(hasher)?;
                Ok(false)
            }
            Some(next @ Node::Branch(_)) => {
                node.set_next(Some(next));
                node.refresh_hash(hasher)?;
                Ok(false)
            }
        };
    }

    let prefix_len = common_prefix_len(node.key(), key);
    if prefix_len != node.key().len() || prefix_len == key.len() {
        // the key diverges inside this edge, or stops short of its end
        return Err(Error::NotFound);
    }

    let tail = &key[prefix_len..];
    let went_through_extension;
    let collapse_child = match node.next_mut() {
        None => return Err(Error::NotFound),
        Some(Node::Extension(next)) => {
            if next.first_digit() != tail.as_bytes()[0] {
                return Err(Error::NotFound);
            }
            went_through_extension = true;
            delete_from_extension(next, tail, hasher)?
        }
        Some(Node::Branch(next)) => {
            went_through_extension = false;
            delete_from_branch(next, tail, hasher)?
        }
    };

    if !collapse_child {
        node.refresh_hash(hasher)?;
        return Ok(false);
    }

    if went_through_extension {
        // the child edge went empty
        node.set_next(None);
        if node.has_value() {
            node.refresh_hash(hasher)?;
            Ok(false)
        } else {
            Ok(true)
        }
    } else {
        // the child branch is down to one edge: splice it out
        let mut branch = match node.take_next() {
            Some(Node::Branch(branch)) => branch,
            _ => unreachable!("next was just matched as a branch"),
        };
        let child = branch
            .take_first_child()
            .expect("a collapsing branch keeps exactly one child");
        if node.has_value() {
            node.set_next(Some(Node::Extension(child)));
        } else {
            // nothing stored on this edge, so the two edges fuse into one
            let (child_key, child_next, child_value) = child.into_parts();
            let mut merged = node.key().to_owned();
            merged.push_str(&child_key);
            node.set_key(merged);
            node.set_value(child_value);
            node.set_next(child_next);
        }
        node.refresh_hash(hasher)?;
        Ok(false)
    }
}

fn path_in_branch(node: &Branch, key: &str) -> Result<MerklePath, Error> {
    let digit = key.as_bytes()[0];
    let child = node.child(digit).ok_or(Error::NotFound)?;
    let mut path = path_in_extension(child, key)?;
    path.push(MerkleSet::new(
        node.children()
            .map(|child| child.map(|c| c.hash().clone()))
            .collect(),
    ));
    Ok(path)
}

fn path_in_extension(node: &Extension, key: &str) -> Result<MerklePath, Error> {
    if key == node.key() {
        if !node.has_value() {
            return Err(Error::NotFound);
        }
        return Ok(MerklePath::from_set(MerkleSet::single(node.hash().clone())));
    }

    let prefix_len = common_prefix_len(node.key(), key);
    if prefix_len != node.key().len() || prefix_len == key.len() {
        return Err(Error::NotFound);
    }

    let tail = &key[prefix_len..];
    let mut path = match node.next() {
        None => return Err(Error::NotFound),
        Some(Node::Extension(next)) => {
            if next.first_digit() != tail.as_bytes()[0] {
                return Err(Error::NotFound);
            }
            path_in_extension(next, tail)?
        }
        Some(Node::Branch(next)) => path_in_branch(next, tail)?,
    };
    path.push(MerkleSet::single(node.hash().clone()));
    Ok(path)
}
