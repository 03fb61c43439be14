// Path: crates/api/src/storage/mod.rs

//! API for the durable store of chain state snapshots and execution responses.

use strata_types::app::{ChainState, ExecutionResponses, ValidatorSet};
use strata_types::error::StorageError;

/// Durable, height-keyed persistence for the block executor.
///
/// All writes are synchronous and durable when they return. Saving the same height
/// twice overwrites the earlier value, which makes replays idempotent.
pub trait StateStore: Send + Sync {
    /// Persists `state` under `state.last_block_height` and advances the latest-height
    /// pointer to it in the same atomic write.
    fn save_state(&self, state: &ChainState) -> Result<(), StorageError>;

    /// Persists the application's responses for the block at `height`.
    fn save_execution_responses(
        &self,
        height: u64,
        responses: &ExecutionResponses,
    ) -> Result<(), StorageError>;

    /// Loads the state persisted after block `height`, or `NotFound`.
    fn load_state(&self, height: u64) -> Result<ChainState, StorageError>;

    /// The height of the latest persisted state, if any.
    fn latest_height(&self) -> Result<Option<u64>, StorageError>;

    /// Loads the state at the latest-height pointer, if any.
    fn load_latest(&self) -> Result<Option<ChainState>, StorageError> {
        match self.latest_height()? {
            Some(height) => self.load_state(height).map(Some),
            None => Ok(None),
        }
    }

    /// Loads the execution responses for the block at `height`, or `NotFound`.
    fn load_execution_responses(&self, height: u64) -> Result<ExecutionResponses, StorageError>;

    /// Loads the validator set that signed the block at `height`.
    ///
    /// This is the `last_validators` of the state persisted after that block, or the
    /// `validators` of the preceding state when block `height` is not committed yet.
    fn load_validators(&self, height: u64) -> Result<ValidatorSet, StorageError> {
        match self.load_state(height) {
            Ok(state) => Ok(state.last_validators),
            Err(StorageError::NotFound(_)) if height > 0 => self
                .load_state(height - 1)
                .map(|state| state.validators)
                .map_err(|e| match e {
                    StorageError::NotFound(_) => StorageError::NotFound(height),
                    other => other,
                }),
            Err(e) => Err(e),
        }
    }
}

impl<T: StateStore + ?Sized> StateStore for std::sync::Arc<T> {
    fn save_state(&self, state: &ChainState) -> Result<(), StorageError> {
        (**self).save_state(state)
    }
    fn save_execution_responses(
        &self,
        height: u64,
        responses: &ExecutionResponses,
    ) -> Result<(), StorageError> {
        (**self).save_execution_responses(height, responses)
    }
    fn load_state(&self, height: u64) -> Result<ChainState, StorageError> {
        (**self).load_state(height)
    }
    fn latest_height(&self) -> Result<Option<u64>, StorageError> {
        (**self).latest_height()
    }
    fn load_latest(&self) -> Result<Option<ChainState>, StorageError> {
        (**self).load_latest()
    }
    fn load_execution_responses(&self, height: u64) -> Result<ExecutionResponses, StorageError> {
        (**self).load_execution_responses(height)
    }
    fn load_validators(&self, height: u64) -> Result<ValidatorSet, StorageError> {
        (**self).load_validators(height)
    }
}
