// Path: crates/types/src/app/responses.rs

use crate::app::{ConsensusParamsUpdate, ValidatorUpdate};
use crate::hash::{merkle_root, Hash};
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Result code the application returns for a successfully executed transaction.
pub const CODE_TYPE_OK: u32 = 0;

/// The application's result for a single transaction.
#[derive(Encode, Decode, Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct TxResult {
    pub code: u32,
    pub data: Vec<u8>,
    pub log: String,
    pub gas_used: u64,
}

impl TxResult {
    pub fn is_ok(&self) -> bool {
        self.code == CODE_TYPE_OK
    }

    /// The deterministic part of the result: `(code, data)`. Logs and gas are
    /// informational and do not contribute to the results hash.
    fn hash_leaf(&self) -> Vec<u8> {
        let mut leaf = self.code.encode();
        leaf.extend(self.data.encode());
        leaf
    }
}

/// End-of-block changes signaled by the application.
#[derive(Encode, Decode, Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct EndBlockResponse {
    pub validator_updates: Vec<ValidatorUpdate>,
    pub consensus_param_updates: Option<ConsensusParamsUpdate>,
}

/// Everything the application returned for one block. Persisted under the block's
/// height before it is folded into the next chain state.
#[derive(Encode, Decode, Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecutionResponses {
    pub deliver_tx: Vec<TxResult>,
    pub end_block: EndBlockResponse,
}

impl ExecutionResponses {
    /// Merkle root of the per-transaction results, in block order.
    pub fn results_hash(&self) -> Hash {
        let leaves: Vec<Vec<u8>> = self.deliver_tx.iter().map(TxResult::hash_leaf).collect();
        merkle_root(&leaves)
    }

    pub fn valid_txs(&self) -> usize {
        self.deliver_tx.iter().filter(|r| r.is_ok()).count()
    }

    pub fn invalid_txs(&self) -> usize {
        self.deliver_tx.len() - self.valid_txs()
    }
}
