// Path: crates/types/src/app/state.rs

use crate::app::{
    AppHash, BlockId, ChainId, ConsensusParams, GenesisDoc, Validator, ValidatorSet,
};
use crate::codec;
use crate::error::GenesisError;
use crate::hash::Hash;
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// The consensus-relevant snapshot of the chain after `last_block_height`.
///
/// A `ChainState` is never mutated once handed out: each applied block derives a new
/// value from its predecessor, and the validator sets inside it are owned copies.
#[derive(Encode, Decode, Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct ChainState {
    pub chain_id: ChainId,

    pub last_block_height: u64,
    pub last_block_total_tx: u64,
    pub last_block_id: BlockId,
    /// Unix milliseconds.
    pub last_block_time: u64,

    /// The set that will sign the next block.
    pub validators: ValidatorSet,
    /// The set that signed the block at `last_block_height`.
    pub last_validators: ValidatorSet,
    pub last_height_validators_changed: u64,

    pub consensus_params: ConsensusParams,
    pub last_height_consensus_params_changed: u64,

    /// Merkle root of the transaction results of the last block.
    pub last_results_hash: Option<Hash>,
    /// The application's state root after committing the last block.
    pub app_hash: Option<AppHash>,
}

impl ChainState {
    /// Builds the height-0 state described by a genesis document.
    pub fn from_genesis(doc: &GenesisDoc) -> Result<Self, GenesisError> {
        doc.validate()?;
        let validators = doc
            .validators
            .iter()
            .map(|v| Validator::new(v.pub_key(), v.power))
            .collect();
        let validators = ValidatorSet::new(validators).map_err(GenesisError::Validators)?;

        Ok(ChainState {
            chain_id: doc.chain_id.clone(),
            last_block_height: 0,
            last_block_total_tx: 0,
            last_block_id: BlockId::default(),
            last_block_time: doc.genesis_time,
            validators,
            last_validators: ValidatorSet::default(),
            last_height_validators_changed: 0,
            consensus_params: doc.consensus_params.clone(),
            last_height_consensus_params_changed: 0,
            last_results_hash: None,
            app_hash: doc.app_hash(),
        })
    }

    /// True for the zero value, i.e. a state that was never initialized.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// The canonical encoding, used for persistence and byte-identity checks.
    pub fn bytes(&self) -> Result<Vec<u8>, String> {
        codec::to_bytes_canonical(self)
    }
}
