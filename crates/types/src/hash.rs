// Path: crates/types/src/hash.rs

use sha2::{Digest, Sha256};

/// A 32-byte SHA-256 digest.
pub type Hash = [u8; 32];

const LEAF_PREFIX: u8 = 0x00;
const INNER_PREFIX: u8 = 0x01;

/// Computes the SHA-256 digest of `data`.
pub fn sha256(data: impl AsRef<[u8]>) -> Hash {
    Sha256::digest(data.as_ref()).into()
}

fn leaf_hash(leaf: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update([LEAF_PREFIX]);
    hasher.update(leaf);
    hasher.finalize().into()
}

fn inner_hash(left: &Hash, right: &Hash) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update([INNER_PREFIX]);
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Largest power of two strictly less than `n`. Requires `n >= 2`.
fn split_point(n: usize) -> usize {
    1usize << (usize::BITS - 1 - (n - 1).leading_zeros())
}

/// Computes the binary Merkle root of an ordered list of byte strings.
///
/// Leaves and inner nodes are domain-separated, and the tree is split at the largest
/// power of two below the item count, so the root depends on item order and count.
/// An empty list hashes to the SHA-256 of the empty string.
pub fn merkle_root<T: AsRef<[u8]>>(items: &[T]) -> Hash {
    match items {
        [] => sha256(b""),
        [only] => leaf_hash(only.as_ref()),
        _ => {
            let (left, right) = items.split_at(split_point(items.len()));
            inner_hash(&merkle_root(left), &merkle_root(right))
        }
    }
}
