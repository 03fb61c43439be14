// Path: crates/types/src/app/block.rs

use crate::app::{Address, Tx};
use crate::hash::{sha256, Hash};
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Metadata describing how a block was split into parts for propagation.
#[derive(Encode, Decode, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PartSetHeader {
    pub total: u32,
    pub hash: Hash,
}

/// Identifies a block by its header hash and part-set metadata.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockId {
    pub hash: Hash,
    pub parts: PartSetHeader,
}

impl BlockId {
    /// The zero id, used as the "last block" of a chain that has no blocks yet.
    pub fn is_zero(&self) -> bool {
        *self == BlockId::default()
    }
}

impl std::fmt::Debug for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BlockId({}:{}:{})",
            hex::encode(self.hash),
            self.parts.total,
            hex::encode(self.parts.hash)
        )
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(self.hash))
    }
}

/// The header fields the block-commit core reads.
#[derive(Encode, Decode, Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockHeader {
    pub height: u64,
    /// Block time in Unix milliseconds.
    pub time: u64,
    pub num_txs: u64,
    pub last_block_id: BlockId,
}

impl BlockHeader {
    /// SHA-256 of the canonical header encoding.
    pub fn hash(&self) -> Hash {
        sha256(self.encode())
    }
}

/// A recorded instance of validator misbehavior.
///
/// The core only reads the height and the accused address; the payload is checked by
/// the evidence pool.
#[derive(Encode, Decode, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Evidence {
    pub height: u64,
    pub validator_address: Address,
    pub payload: Vec<u8>,
}

impl Evidence {
    pub fn hash(&self) -> Hash {
        sha256(self.encode())
    }
}

/// A finalized block handed to the executor by the consensus layer.
#[derive(Encode, Decode, Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    pub header: BlockHeader,
    pub txs: Vec<Tx>,
    pub evidence: Vec<Evidence>,
}

impl Block {
    /// Builds a block whose `num_txs` matches its transaction list.
    pub fn new(height: u64, time: u64, last_block_id: BlockId, txs: Vec<Tx>, evidence: Vec<Evidence>) -> Self {
        Self {
            header: BlockHeader {
                height,
                time,
                num_txs: txs.len() as u64,
                last_block_id,
            },
            txs,
            evidence,
        }
    }

    pub fn height(&self) -> u64 {
        self.header.height
    }

    /// Canonical encoded size in bytes, the quantity bounded by `max_bytes`.
    pub fn encoded_size(&self) -> usize {
        self.encode().len()
    }

    /// Derives a block id as a single-part block: the header hash plus the hash of
    /// the full canonical block encoding.
    pub fn block_id(&self) -> BlockId {
        BlockId {
            hash: self.header.hash(),
            parts: PartSetHeader {
                total: 1,
                hash: sha256(self.encode()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_id_tracks_content() {
        let a = Block::new(1, 1_000, BlockId::default(), vec![b"tx1".to_vec()], vec![]);
        let b = Block::new(1, 1_000, BlockId::default(), vec![b"tx2".to_vec()], vec![]);
        assert_eq!(a.header, b.header);
        assert_eq!(a.block_id().hash, b.block_id().hash);
        assert_ne!(a.block_id().parts.hash, b.block_id().parts.hash);
        assert!(!a.block_id().is_zero());
        assert!(BlockId::default().is_zero());
    }

    #[test]
    fn test_new_sets_num_txs() {
        let block = Block::new(3, 10, BlockId::default(), vec![vec![1], vec![2], vec![3]], vec![]);
        assert_eq!(block.header.num_txs, 3);
        assert!(block.encoded_size() > 3);
    }
}
