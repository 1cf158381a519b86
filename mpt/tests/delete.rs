mod common;

use common::{new_trie, trie_with_keys};
use mpt::Error;

// Every deletion order over every subset must leave the trie with the same
// root hash as a fresh trie built from the surviving keys alone.
const DELETE_CASES: &[(&[&str], &[&[&str]])] = &[
    (
        &["k12", "kab", "kac"],
        &[
            &["k12"],
            &["kab"],
            &["kac"],
            &["k12", "kab"],
            &["kab", "k12"],
            &["k12", "kac"],
            &["kac", "k12"],
            &["kab", "kac"],
            &["kac", "kab"],
            &["k12", "kab", "kac"],
            &["kac", "kab", "k12"],
            &["kab", "k12", "kac"],
        ],
    ),
    (
        &["dog", "cat", "doge"],
        &[
            &["dog"],
            &["cat"],
            &["doge"],
            &["dog", "cat"],
            &["cat", "dog"],
            &["dog", "doge"],
            &["doge", "dog"],
            &["cat", "doge"],
            &["doge", "cat"],
            &["dog", "cat", "doge"],
            &["doge", "cat", "dog"],
        ],
    ),
    (
        &["k", "kk", "kkk"],
        &[
            &["k"],
            &["kk"],
            &["kkk"],
            &["k", "kk"],
            &["kk", "k"],
            &["k", "kkk"],
            &["kkk", "k"],
            &["kk", "kkk"],
            &["kkk", "kk"],
            &["k", "kk", "kkk"],
            &["kkk", "kk", "k"],
            &["kk", "kkk", "k"],
        ],
    ),
];

#[test]
fn root_hash_is_delete_order_independent() {
    for (initial, deletion_orders) in DELETE_CASES {
        for deletions in *deletion_orders {
            let mut trie = trie_with_keys(initial);
            for key in *deletions {
                trie.delete(key.as_bytes())
                    .unwrap_or_else(|err| panic!("delete of '{}' failed: {}", key, err));
            }
            let remaining: Vec<&str> = initial
                .iter()
                .copied()
                .filter(|key| !deletions.contains(key))
                .collect();
            let fresh = trie_with_keys(&remaining);
            assert_eq!(
                trie.root_hash(),
                fresh.root_hash(),
                "initial {:?} minus {:?} diverges from a fresh build of {:?}\n{}",
                initial,
                deletions,
                remaining,
                trie.to_json()
            );
        }
    }
}

#[test]
fn deleting_every_key_restores_the_empty_root_hash() {
    let empty = new_trie();
    let mut trie = trie_with_keys(&["k12", "kab", "kac"]);
    for key in ["kab", "k12", "kac"] {
        trie.delete(key.as_bytes()).unwrap();
    }
    assert_eq!(trie.root_hash(), empty.root_hash());
}

#[test]
fn delete_then_reinsert_restores_the_root_hash() {
    let reference = trie_with_keys(&["k12", "kab", "kac"]);
    let mut trie = trie_with_keys(&["k12", "kab", "kac"]);
    trie.delete(b"kab").unwrap();
    trie.insert(b"kab", b"value").unwrap();
    assert_eq!(trie.root_hash(), reference.root_hash());
}

#[test]
fn delete_of_a_prefix_of_a_stored_key_is_not_found() {
    let mut trie = new_trie();
    trie.insert(b"key123", b"value").unwrap();
    let err = trie.delete(b"key").unwrap_err();
    assert!(matches!(err, Error::NotFound), "got {:?}", err);
}

#[test]
fn delete_diverging_mid_edge_is_not_found() {
    let mut trie = new_trie();
    trie.insert(b"key", b"value").unwrap();
    trie.insert(b"key123", b"value").unwrap();
    let before = trie.root_hash().clone();

    let err = trie.delete(b"keyxyz").unwrap_err();
    assert!(matches!(err, Error::NotFound), "got {:?}", err);
    assert_eq!(&before, trie.root_hash());
}

#[test]
fn delete_of_a_stored_prefix_key_keeps_the_longer_key() {
    let mut trie = new_trie();
    trie.insert(b"key", b"value").unwrap();
    trie.insert(b"key123", b"value").unwrap();
    trie.delete(b"key").unwrap();

    let mut fresh = new_trie();
    fresh.insert(b"key123", b"value").unwrap();
    assert_eq!(trie.root_hash(), fresh.root_hash());
}

#[test]
fn delete_from_an_empty_trie_is_not_found() {
    let mut trie = new_trie();
    let err = trie.delete(b"key").unwrap_err();
    assert!(matches!(err, Error::NotFound), "got {:?}", err);
}

#[test]
fn empty_key_is_rejected() {
    let mut trie = new_trie();
    let err = trie.delete(b"").unwrap_err();
    assert!(matches!(err, Error::EmptyKey), "got {:?}", err);
}
