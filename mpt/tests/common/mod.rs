use mpt::{MerklePatriciaTrie, Sha2Hasher};

/// A fresh trie over SHA-256, the digest used throughout the suite.
pub fn new_trie() -> MerklePatriciaTrie<Sha2Hasher> {
    MerklePatriciaTrie::new(Sha2Hasher::new()).expect("hashing an empty branch never fails")
}

/// A trie holding every key in `keys`, each mapped to `b"value"`.
#[allow(dead_code)]
pub fn trie_with_keys(keys: &[&str]) -> MerklePatriciaTrie<Sha2Hasher> {
    let mut trie = new_trie();
    for key in keys {
        trie.insert(key.as_bytes(), b"value")
            .unwrap_or_else(|err| panic!("insert of '{}' failed: {}", key, err));
    }
    trie
}
