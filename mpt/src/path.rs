//! Merkle paths: leaf-to-root hash chains proving a key's inclusion.
//!
//! A path is an ordered sequence of hash sets, leaf first. Descending
//! through an extension contributes a singleton set holding that node's
//! hash; descending through a branch contributes a 16-entry set holding
//! every child slot's hash in index order, with empty slots preserved as
//! nulls. The final set is always the singleton `[root hash]`.
//!
//! ## Text format
//!
//! [`MerklePath::to_json`] renders the path as a JSON array of arrays of
//! lowercase hex strings, one string per hash, with null slots encoded as
//! `""`:
//!
//! ```text
//! [["<hex>"],["","","<hex>","",...,""],["<hex>"]]
//! ```
//!
//! External verifiers consume this surface; it is stable. The optional
//! `serde` implementation serializes to the identical structure.

use mpt_core::trie::{branch_preimage, CHILD_COUNT};
use mpt_core::{HashBlob, Hasher, HasherError};

/// One level of a [`MerklePath`]: the hashes recorded while stepping
/// through a single node, with empty branch slots preserved as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleSet {
    hashes: Vec<Option<HashBlob>>,
}

impl MerkleSet {
    pub(crate) fn single(hash: HashBlob) -> Self {
        MerkleSet {
            hashes: vec![Some(hash)],
        }
    }

    pub(crate) fn new(hashes: Vec<Option<HashBlob>>) -> Self {
        MerkleSet { hashes }
    }

    /// The recorded hashes in slot order; `None` marks an empty slot.
    pub fn hashes(&self) -> &[Option<HashBlob>] {
        &self.hashes
    }

    /// Number of entries, nulls included.
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    /// Whether the set has no entries.
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

/// A leaf-first chain of [`MerkleSet`]s ending in the root's own hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerklePath {
    sets: Vec<MerkleSet>,
}

impl MerklePath {
    pub(crate) fn from_set(set: MerkleSet) -> Self {
        MerklePath { sets: vec![set] }
    }

    pub(crate) fn push(&mut self, set: MerkleSet) {
        self.sets.push(set);
    }

    /// The sets in leaf-to-root order.
    pub fn sets(&self) -> &[MerkleSet] {
        &self.sets
    }

    /// Number of sets in the path.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Whether the path holds no sets.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Render the stable textual encoding; see the module docs.
    pub fn to_json(&self) -> String {
        let mut out = String::from("[");
        for (i, set) in self.sets.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push('[');
            for (j, hash) in set.hashes.iter().enumerate() {
                if j > 0 {
                    out.push(',');
                }
                out.push('"');
                if let Some(hash) = hash {
                    out.push_str(&hex::encode(hash));
                }
                out.push('"');
            }
            out.push(']');
        }
        out.push(']');
        out
    }

    /// Check the structurally verifiable links of this path against a root
    /// hash.
    ///
    /// Branch-level sets carry the full slot layout, so they re-digest
    /// through the branch pre-image rules; the set preceding the final
    /// `[root]` set is the root's own slot layout and must re-digest to the
    /// root hash, and every other set's hash must appear in the branch set
    /// that follows it. Extension pre-images also cover edge labels and
    /// value bytes, which a path does not carry, so links between
    /// consecutive singleton sets are outside what the path alone can
    /// prove.
    ///
    /// Returns `Ok(false)` when any checkable link fails.
    pub fn verify(&self, root: &HashBlob, hasher: &impl Hasher) -> Result<bool, HasherError> {
        let Some((last, rest)) = self.sets.split_last() else {
            return Ok(false);
        };
        if last.len() != 1 || last.hashes()[0].as_ref() != Some(root) {
            return Ok(false);
        }
        let Some((root_slots, _)) = rest.split_last() else {
            return Ok(false);
        };
        if root_slots.len() != CHILD_COUNT {
            return Ok(false);
        }
        if &hasher.hash(&branch_preimage(root_slots.hashes.iter().map(|h| h.as_ref())))? != root {
            return Ok(false);
        }
        for pair in rest.windows(2) {
            let (current, next) = (&pair[0], &pair[1]);
            if next.len() != CHILD_COUNT {
                continue;
            }
            let current_hash = if current.len() == CHILD_COUNT {
                hasher.hash(&branch_preimage(current.hashes.iter().map(|h| h.as_ref())))?
            } else {
                match current.hashes.first().and_then(|h| h.clone()) {
                    Some(hash) => hash,
                    None => return Ok(false),
                }
            };
            if !next.hashes.iter().flatten().any(|h| *h == current_hash) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for MerkleSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.hashes.len()))?;
        for hash in &self.hashes {
            match hash {
                Some(hash) => seq.serialize_element(&hex::encode(hash))?,
                None => seq.serialize_element("")?,
            }
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for MerklePath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.sets.len()))?;
        for set in &self.sets {
            seq.serialize_element(set)?;
        }
        seq.end()
    }
}
