//! Chain fixtures for reproducible tests

use strata_types::app::{
    Block, ChainId, ChainState, ConsensusParams, Evidence, GenesisDoc, GenesisValidator, PubKey,
    Tx, ValidatorUpdate,
};

/// Genesis time of every fixture chain, in Unix milliseconds.
pub const GENESIS_TIME: u64 = 1_700_000_000_000;
/// Gap between consecutive fixture blocks, in milliseconds.
pub const BLOCK_INTERVAL: u64 = 1_000;
pub const CHAIN_ID: &str = "strata-test";

/// A deterministic 32-byte public key derived from `seed`.
pub fn pub_key(seed: u8) -> PubKey {
    PubKey(vec![seed; 32])
}

/// A genesis document with one validator per entry in `powers`, keyed by seeds
/// `1..=powers.len()`.
pub fn genesis_doc(powers: &[i64]) -> GenesisDoc {
    GenesisDoc {
        chain_id: ChainId::from(CHAIN_ID),
        genesis_time: GENESIS_TIME,
        validators: powers
            .iter()
            .zip(1u8..)
            .map(|(power, seed)| GenesisValidator {
                pub_key: pub_key(seed).0,
                power: *power,
                name: format!("val-{seed}"),
            })
            .collect(),
        consensus_params: ConsensusParams::default(),
        app_hash: None,
    }
}

/// The height-0 state for [`genesis_doc`].
#[allow(clippy::panic)]
pub fn genesis_state(powers: &[i64]) -> ChainState {
    match ChainState::from_genesis(&genesis_doc(powers)) {
        Ok(state) => state,
        Err(e) => panic!("fixture genesis is invalid: {e}"),
    }
}

/// `n` distinct transactions for the block at `height`.
pub fn txs(height: u64, n: usize) -> Vec<Tx> {
    (0..n).map(|i| format!("tx-{height}-{i}").into_bytes()).collect()
}

/// A valid successor of `state` carrying `txs` and no evidence.
pub fn next_block(state: &ChainState, txs: Vec<Tx>) -> Block {
    next_block_with_evidence(state, txs, Vec::new())
}

/// A valid successor of `state` carrying `txs` and `evidence`.
pub fn next_block_with_evidence(state: &ChainState, txs: Vec<Tx>, evidence: Vec<Evidence>) -> Block {
    Block::new(
        state.last_block_height + 1,
        state.last_block_time + BLOCK_INTERVAL,
        state.last_block_id,
        txs,
        evidence,
    )
}

pub fn validator_update(seed: u8, power: i64) -> ValidatorUpdate {
    ValidatorUpdate {
        pub_key: pub_key(seed),
        power,
    }
}
