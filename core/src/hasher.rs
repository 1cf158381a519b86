//! The digest port and feature-gated hashers implementing it.
//!
//! The trie never picks a hash function itself; callers inject one through
//! the [`Hasher`] trait. Implementations must be deterministic across
//! platforms and produce blobs of a fixed width (e.g. 32 bytes for
//! SHA-256). Two tries hashed with the same digest and holding the same
//! key-value set have byte-identical root hashes.

use core::marker::PhantomData;

use alloc::string::String;
use alloc::vec::Vec;

/// The hash of a node pre-image. Its width is fixed by the digest in use.
pub type HashBlob = Vec<u8>;

/// Failure reported by a [`Hasher`] implementation.
///
/// Carried outward unchanged; the trie never retries a failed digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HasherError(pub String);

impl core::fmt::Display for HasherError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A cryptographic digest over arbitrary byte input.
pub trait Hasher {
    /// Hash the input, producing a fixed-width blob.
    fn hash(&self, data: &[u8]) -> Result<HashBlob, HasherError>;
}

/// Adapter implementing [`Hasher`] for any RustCrypto hash function.
///
/// Anything implementing [`digest::Digest`] (Sha2, Sha3, Keccak, ...) can
/// be injected through this without further glue.
pub struct CryptoHasher<D>(PhantomData<D>);

impl<D> CryptoHasher<D> {
    /// Create the adapter.
    pub fn new() -> Self {
        CryptoHasher(PhantomData)
    }
}

impl<D> Default for CryptoHasher<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: digest::Digest> Hasher for CryptoHasher<D> {
    fn hash(&self, data: &[u8]) -> Result<HashBlob, HasherError> {
        Ok(D::digest(data).to_vec())
    }
}

/// A SHA-256 [`Hasher`], producing 32-byte blobs.
#[cfg(any(feature = "sha2-hasher", test))]
pub type Sha2Hasher = CryptoHasher<sha2::Sha256>;

/// A Blake3 [`Hasher`], producing 32-byte blobs.
#[cfg(feature = "blake3-hasher")]
pub struct Blake3Hasher;

#[cfg(feature = "blake3-hasher")]
impl Hasher for Blake3Hasher {
    fn hash(&self, data: &[u8]) -> Result<HashBlob, HasherError> {
        Ok(blake3::hash(data).as_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn sha2_hasher_matches_known_vector() {
        let hasher = Sha2Hasher::new();
        let out = hasher.hash(b"hello").unwrap();
        assert_eq!(
            out,
            hex!("2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824")
        );
    }

    #[test]
    fn sha2_hasher_is_deterministic() {
        let hasher = Sha2Hasher::new();
        assert_eq!(hasher.hash(b"input").unwrap(), hasher.hash(b"input").unwrap());
        assert_ne!(hasher.hash(b"input").unwrap(), hasher.hash(b"other").unwrap());
    }

    #[test]
    fn sha2_hasher_output_is_fixed_width() {
        let hasher = Sha2Hasher::new();
        assert_eq!(hasher.hash(b"").unwrap().len(), 32);
        assert_eq!(hasher.hash(&[0u8; 1024]).unwrap().len(), 32);
    }
}
