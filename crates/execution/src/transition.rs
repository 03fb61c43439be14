// Path: crates/execution/src/transition.rs
//! Derivation of the next chain state from a block and its execution responses.

use strata_types::app::{Block, BlockId, ChainState, ExecutionResponses};
use strata_types::error::AppError;

/// Builds the state that follows `state` once `block` has been executed.
///
/// The validator set that signed `block` becomes `last_validators`; the next set is
/// a copy with the application's end-block updates applied and every accumulator
/// advanced once. The changed-height markers move to the block height only when the
/// validator composition or the consensus params actually differ. `app_hash` and
/// `last_results_hash` are left unset for the caller to fill in.
///
/// `state` is never modified. Invalid updates from the application are returned as
/// errors and no state is produced.
pub fn update_state(
    state: &ChainState,
    block_id: BlockId,
    block: &Block,
    responses: &ExecutionResponses,
) -> Result<ChainState, AppError> {
    let header = &block.header;
    let end_block = &responses.end_block;

    let last_validators = state.validators.clone();
    let mut validators = state.validators.clone();
    let mut last_height_validators_changed = state.last_height_validators_changed;
    if !end_block.validator_updates.is_empty()
        && validators.apply_updates(&end_block.validator_updates)?
    {
        last_height_validators_changed = header.height;
    }
    validators.increment_accum(1);

    let mut consensus_params = state.consensus_params.clone();
    let mut last_height_consensus_params_changed = state.last_height_consensus_params_changed;
    if let Some(update) = &end_block.consensus_param_updates {
        let next = state.consensus_params.update(update);
        next.validate()?;
        if next != state.consensus_params {
            consensus_params = next;
            last_height_consensus_params_changed = header.height;
        }
    }

    Ok(ChainState {
        chain_id: state.chain_id.clone(),
        last_block_height: header.height,
        last_block_total_tx: state.last_block_total_tx + header.num_txs,
        last_block_id: block_id,
        last_block_time: header.time,
        validators,
        last_validators,
        last_height_validators_changed,
        consensus_params,
        last_height_consensus_params_changed,
        last_results_hash: None,
        app_hash: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_test_utils::fixtures::{genesis_state, next_block, pub_key, txs, validator_update};
    use strata_types::app::{
        BlockSizeParams, ConsensusParamsUpdate, EndBlockResponse, ValidatorUpdate,
    };
    use strata_types::error::ValidatorSetError;

    fn responses(updates: Vec<ValidatorUpdate>) -> ExecutionResponses {
        ExecutionResponses {
            deliver_tx: Vec::new(),
            end_block: EndBlockResponse {
                validator_updates: updates,
                consensus_param_updates: None,
            },
        }
    }

    fn derive(state: &ChainState, updates: Vec<ValidatorUpdate>) -> Result<ChainState, AppError> {
        let block = next_block(state, txs(state.last_block_height + 1, 2));
        update_state(state, block.block_id(), &block, &responses(updates))
    }

    #[test]
    fn test_header_fields_are_copied() {
        let state = genesis_state(&[10, 10]);
        let block = next_block(&state, txs(1, 3));
        let next = update_state(&state, block.block_id(), &block, &responses(vec![])).unwrap();

        assert_eq!(next.chain_id, state.chain_id);
        assert_eq!(next.last_block_height, 1);
        assert_eq!(next.last_block_total_tx, 3);
        assert_eq!(next.last_block_id, block.block_id());
        assert_eq!(next.last_block_time, block.header.time);
        assert_eq!(next.last_validators, state.validators);
        assert!(next.app_hash.is_none());
        assert!(next.last_results_hash.is_none());
    }

    #[test]
    fn test_unchanged_set_keeps_changed_height_and_advances_accum() {
        let state = genesis_state(&[10, 10]);
        let next = derive(&state, vec![]).unwrap();

        assert_eq!(next.last_height_validators_changed, 0);
        let before: Vec<_> = state.validators.validators().iter().map(|v| v.accum).collect();
        let after: Vec<_> = next.validators.validators().iter().map(|v| v.accum).collect();
        assert_ne!(before, after);
        assert_eq!(after.iter().sum::<i64>(), 0);
    }

    #[test]
    fn test_power_change_moves_changed_height() {
        let state = genesis_state(&[10, 10]);
        let next = derive(&state, vec![validator_update(1, 20)]).unwrap();
        assert_eq!(next.last_height_validators_changed, 1);
        assert_eq!(
            next.validators
                .get_by_address(&pub_key(1).address())
                .map(|v| v.voting_power),
            Some(20)
        );
    }

    #[test]
    fn test_same_power_update_is_not_a_change() {
        let state = genesis_state(&[10, 10]);
        let next = derive(&state, vec![validator_update(2, 10)]).unwrap();
        assert_eq!(next.last_height_validators_changed, 0);
    }

    #[test]
    fn test_invalid_updates_produce_no_state() {
        let state = genesis_state(&[10]);
        let original = state.clone();
        let err = derive(&state, vec![validator_update(1, 0)]).unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidValidatorUpdates(ValidatorSetError::Empty)
        ));
        assert_eq!(state, original);
    }

    #[test]
    fn test_param_updates_follow_changed_pattern() {
        let state = genesis_state(&[10]);
        let block = next_block(&state, vec![]);

        let mut changed = responses(vec![]);
        changed.end_block.consensus_param_updates = Some(ConsensusParamsUpdate {
            block_size: Some(BlockSizeParams {
                max_bytes: 1_000_000,
                max_txs: 100,
            }),
            evidence: None,
        });
        let next = update_state(&state, block.block_id(), &block, &changed).unwrap();
        assert_eq!(next.last_height_consensus_params_changed, 1);
        assert_eq!(next.consensus_params.block_size.max_txs, 100);

        let mut same = responses(vec![]);
        same.end_block.consensus_param_updates = Some(ConsensusParamsUpdate {
            block_size: Some(state.consensus_params.block_size.clone()),
            evidence: None,
        });
        let next = update_state(&state, block.block_id(), &block, &same).unwrap();
        assert_eq!(next.last_height_consensus_params_changed, 0);

        let mut invalid = responses(vec![]);
        invalid.end_block.consensus_param_updates = Some(ConsensusParamsUpdate {
            block_size: Some(BlockSizeParams {
                max_bytes: 0,
                max_txs: 0,
            }),
            evidence: None,
        });
        assert!(matches!(
            update_state(&state, block.block_id(), &block, &invalid),
            Err(AppError::InvalidParamUpdates(_))
        ));
    }
}
