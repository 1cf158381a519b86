use std::fmt;

use mpt_core::HasherError;

/// Errors returned by trie operations.
///
/// Validation failures leave the trie untouched. A [`Error::Hasher`]
/// failure aborts the hash refresh after restructuring has completed: the
/// tree is still consistent, but hashes along the touched path are stale,
/// so the root hash must not be consulted until a later operation succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Keys must be non-empty byte strings.
    EmptyKey,
    /// The key (given here in hex) is already present; values are never
    /// overwritten in place.
    DuplicateKey(String),
    /// The key has no value in the trie.
    NotFound,
    /// The injected digest failed.
    Hasher(HasherError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::EmptyKey => write!(f, "key must not be empty"),
            Error::DuplicateKey(key) => write!(f, "key '{}' already exists", key),
            Error::NotFound => write!(f, "key not found"),
            Error::Hasher(err) => write!(f, "hash computation failed: {}", err),
        }
    }
}

impl std::error::Error for Error {}

impl From<HasherError> for Error {
    fn from(err: HasherError) -> Self {
        Error::Hasher(err)
    }
}
