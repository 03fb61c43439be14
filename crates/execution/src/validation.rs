// Path: crates/execution/src/validation.rs
//! Stateless and historical checks a block must pass before it is executed.

use strata_api::evidence::EvidencePool;
use strata_api::storage::StateStore;
use strata_types::app::{Block, ChainState, Evidence, ValidatorSet};
use strata_types::error::BlockError;

/// Checks `block` against `state` without side effects.
///
/// The block must be the direct successor of `state`, its header must agree with
/// its contents, it must fit within the consensus params, and every piece of
/// evidence it carries must be recent, name a validator that was active at the
/// evidence height, and be accepted by the evidence pool.
pub fn validate_block(
    store: &dyn StateStore,
    evpool: &dyn EvidencePool,
    state: &ChainState,
    block: &Block,
) -> Result<(), BlockError> {
    let header = &block.header;
    let expected = state.last_block_height + 1;
    if header.height != expected {
        return Err(BlockError::InvalidHeight {
            expected,
            got: header.height,
        });
    }

    if header.last_block_id != state.last_block_id {
        return Err(BlockError::MismatchedLastBlockId {
            expected: state.last_block_id.to_string(),
            got: header.last_block_id.to_string(),
        });
    }

    // The first block may share the genesis timestamp.
    let time_ok = if state.last_block_height == 0 {
        header.time >= state.last_block_time
    } else {
        header.time > state.last_block_time
    };
    if !time_ok {
        return Err(BlockError::NonMonotonicTime {
            last: state.last_block_time,
            got: header.time,
        });
    }

    let tx_count = block.txs.len() as u64;
    if header.num_txs != tx_count {
        return Err(BlockError::TxCountMismatch {
            header: header.num_txs,
            actual: tx_count,
        });
    }

    let limits = &state.consensus_params.block_size;
    if limits.max_txs > 0 && tx_count > limits.max_txs {
        return Err(BlockError::TooManyTxs {
            max: limits.max_txs,
            got: tx_count,
        });
    }
    let size = block.encoded_size() as u64;
    if size > limits.max_bytes {
        return Err(BlockError::TooLarge {
            max: limits.max_bytes,
            got: size,
        });
    }

    for evidence in &block.evidence {
        validate_evidence(store, evpool, state, header.height, evidence)?;
    }
    Ok(())
}

fn validate_evidence(
    store: &dyn StateStore,
    evpool: &dyn EvidencePool,
    state: &ChainState,
    height: u64,
    evidence: &Evidence,
) -> Result<(), BlockError> {
    if evidence.height >= height {
        return Err(BlockError::EvidenceFromFuture {
            evidence_height: evidence.height,
            height,
        });
    }

    let min_height = height.saturating_sub(state.consensus_params.evidence.max_age);
    if evidence.height < min_height {
        return Err(BlockError::EvidenceTooOld {
            evidence_height: evidence.height,
            min_height,
        });
    }

    let historical = validators_at(store, state, evidence.height)?;
    if !historical.has_address(&evidence.validator_address) {
        return Err(BlockError::EvidenceUnknownValidator {
            address: evidence.validator_address,
            height: evidence.height,
        });
    }

    if !evpool.is_valid_evidence(evidence, state) {
        return Err(BlockError::InvalidEvidence {
            height: evidence.height,
            address: evidence.validator_address,
        });
    }
    Ok(())
}

/// The set that signed the block at `height`. The current state answers for its own
/// height; older heights come from the store.
fn validators_at(
    store: &dyn StateStore,
    state: &ChainState,
    height: u64,
) -> Result<ValidatorSet, BlockError> {
    if height == state.last_block_height {
        return Ok(state.last_validators.clone());
    }
    Ok(store.load_validators(height)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_api::evidence::NopEvidencePool;
    use strata_test_utils::fixtures::{
        genesis_state, next_block, next_block_with_evidence, pub_key, txs,
    };
    use strata_test_utils::{assert_err, RecordingEvidencePool};
    use strata_types::app::{BlockId, ExecutionResponses};
    use strata_types::error::StorageError;

    /// A store with nothing in it.
    struct EmptyStore;

    impl StateStore for EmptyStore {
        fn save_state(&self, _state: &ChainState) -> Result<(), StorageError> {
            Ok(())
        }
        fn save_execution_responses(
            &self,
            _height: u64,
            _responses: &ExecutionResponses,
        ) -> Result<(), StorageError> {
            Ok(())
        }
        fn load_state(&self, height: u64) -> Result<ChainState, StorageError> {
            Err(StorageError::NotFound(height))
        }
        fn latest_height(&self) -> Result<Option<u64>, StorageError> {
            Ok(None)
        }
        fn load_execution_responses(
            &self,
            height: u64,
        ) -> Result<ExecutionResponses, StorageError> {
            Err(StorageError::NotFound(height))
        }
    }

    /// A state at height 5 whose last block was signed by the genesis validators.
    fn state_at_5() -> ChainState {
        let mut state = genesis_state(&[10, 10]);
        state.last_validators = state.validators.clone();
        state.last_block_height = 5;
        state.last_block_time += 5_000;
        state.last_block_id = BlockId {
            hash: [5; 32],
            ..Default::default()
        };
        state
    }

    fn check(state: &ChainState, block: &Block) -> Result<(), BlockError> {
        validate_block(&EmptyStore, &NopEvidencePool, state, block)
    }

    #[test]
    fn test_valid_successor_passes() {
        let state = state_at_5();
        check(&state, &next_block(&state, txs(6, 3))).unwrap();
    }

    #[test]
    fn test_wrong_height_is_rejected() {
        let state = state_at_5();
        let mut block = next_block(&state, vec![]);
        block.header.height = 8;
        let err = assert_err!(check(&state, &block));
        assert!(matches!(
            err,
            BlockError::InvalidHeight {
                expected: 6,
                got: 8
            }
        ));
    }

    #[test]
    fn test_wrong_last_block_id_is_rejected() {
        let state = state_at_5();
        let mut block = next_block(&state, vec![]);
        block.header.last_block_id = BlockId::default();
        assert!(matches!(
            check(&state, &block),
            Err(BlockError::MismatchedLastBlockId { .. })
        ));
    }

    #[test]
    fn test_time_must_advance() {
        let state = state_at_5();
        let mut block = next_block(&state, vec![]);
        block.header.time = state.last_block_time;
        assert!(matches!(
            check(&state, &block),
            Err(BlockError::NonMonotonicTime { .. })
        ));

        // At genesis the first block may reuse the genesis time.
        let genesis = genesis_state(&[10]);
        let mut first = next_block(&genesis, vec![]);
        first.header.time = genesis.last_block_time;
        check(&genesis, &first).unwrap();
    }

    #[test]
    fn test_header_tx_count_must_match() {
        let state = state_at_5();
        let mut block = next_block(&state, txs(6, 2));
        block.header.num_txs = 3;
        assert!(matches!(
            check(&state, &block),
            Err(BlockError::TxCountMismatch {
                header: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_block_size_limits() {
        let mut state = state_at_5();
        state.consensus_params.block_size.max_txs = 2;
        assert!(matches!(
            check(&state, &next_block(&state, txs(6, 3))),
            Err(BlockError::TooManyTxs { max: 2, got: 3 })
        ));

        let mut state = state_at_5();
        state.consensus_params.block_size.max_bytes = 64;
        let big = next_block(&state, vec![vec![7u8; 128]]);
        assert!(matches!(
            check(&state, &big),
            Err(BlockError::TooLarge { max: 64, .. })
        ));
    }

    #[test]
    fn test_evidence_rules() {
        let state = state_at_5();
        let accused = pub_key(1).address();
        let evidence = |height: u64| Evidence {
            height,
            validator_address: accused,
            payload: vec![1, 2, 3],
        };

        // Signed by the current state's last validators.
        let ok = next_block_with(&state, evidence(5));
        check(&state, &ok).unwrap();

        assert!(matches!(
            check(&state, &next_block_with(&state, evidence(6))),
            Err(BlockError::EvidenceFromFuture { .. })
        ));

        let mut strict = state.clone();
        strict.consensus_params.evidence.max_age = 1;
        assert!(matches!(
            check(&strict, &next_block_with(&strict, evidence(4))),
            Err(BlockError::EvidenceTooOld { min_height: 5, .. })
        ));

        // Height 4 is not in the empty store.
        assert!(matches!(
            check(&state, &next_block_with(&state, evidence(4))),
            Err(BlockError::Store(StorageError::NotFound(4)))
        ));

        let stranger = Evidence {
            validator_address: pub_key(9).address(),
            ..evidence(5)
        };
        assert!(matches!(
            check(&state, &next_block_with(&state, stranger)),
            Err(BlockError::EvidenceUnknownValidator { .. })
        ));

        let pool = RecordingEvidencePool::new();
        pool.mark_invalid(&evidence(5));
        assert!(matches!(
            validate_block(&EmptyStore, &pool, &state, &ok),
            Err(BlockError::InvalidEvidence { height: 5, .. })
        ));
    }

    fn next_block_with(state: &ChainState, evidence: Evidence) -> Block {
        next_block_with_evidence(state, vec![], vec![evidence])
    }
}
