// Path: crates/storage/src/bootstrap.rs
use strata_api::storage::StateStore;
use strata_types::app::{ChainId, ChainState, GenesisDoc};
use strata_types::error::{ErrorCode, GenesisError, StorageError};
use thiserror::Error;

/// Errors raised while establishing the starting chain state.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Genesis(#[from] GenesisError),
    /// The store belongs to a different chain than the genesis document.
    #[error("stored chain id {stored} does not match genesis chain id {genesis}")]
    ChainIdMismatch { stored: ChainId, genesis: ChainId },
}

impl ErrorCode for BootstrapError {
    fn code(&self) -> &'static str {
        match self {
            Self::Storage(e) => e.code(),
            Self::Genesis(_) => "BOOTSTRAP_INVALID_GENESIS",
            Self::ChainIdMismatch { .. } => "BOOTSTRAP_CHAIN_ID_MISMATCH",
        }
    }
}

/// Returns the latest persisted state, or builds the height-0 state from `genesis`
/// and persists it when the store is empty.
pub fn load_state_or_genesis(
    store: &dyn StateStore,
    genesis: &GenesisDoc,
) -> Result<ChainState, BootstrapError> {
    if let Some(state) = store.load_latest()? {
        if state.chain_id != genesis.chain_id {
            return Err(BootstrapError::ChainIdMismatch {
                stored: state.chain_id,
                genesis: genesis.chain_id.clone(),
            });
        }
        tracing::info!(
            target: "storage",
            event = "state_loaded",
            height = state.last_block_height
        );
        return Ok(state);
    }

    let state = ChainState::from_genesis(genesis)?;
    store.save_state(&state)?;
    tracing::info!(
        target: "storage",
        event = "genesis_state_saved",
        chain_id = %state.chain_id,
        validators = state.validators.len()
    );
    Ok(state)
}
