// Path: crates/storage/src/mem_state_store.rs
use parking_lot::RwLock;
use std::collections::BTreeMap;
use strata_api::storage::StateStore;
use strata_types::app::{ChainState, ExecutionResponses};
use strata_types::error::StorageError;

#[derive(Debug, Default)]
struct Inner {
    states: BTreeMap<u64, ChainState>,
    responses: BTreeMap<u64, ExecutionResponses>,
    latest: Option<u64>,
}

/// An in-memory [`StateStore`] with the same overwrite and latest-pointer semantics
/// as the redb store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemStateStore {
    inner: RwLock<Inner>,
}

impl MemStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Heights that currently have a saved state, in ascending order.
    pub fn heights(&self) -> Vec<u64> {
        self.inner.read().states.keys().copied().collect()
    }
}

impl StateStore for MemStateStore {
    fn save_state(&self, state: &ChainState) -> Result<(), StorageError> {
        let mut inner = self.inner.write();
        inner
            .states
            .insert(state.last_block_height, state.clone());
        inner.latest = Some(state.last_block_height);
        Ok(())
    }

    fn save_execution_responses(
        &self,
        height: u64,
        responses: &ExecutionResponses,
    ) -> Result<(), StorageError> {
        self.inner.write().responses.insert(height, responses.clone());
        Ok(())
    }

    fn load_state(&self, height: u64) -> Result<ChainState, StorageError> {
        self.inner
            .read()
            .states
            .get(&height)
            .cloned()
            .ok_or(StorageError::NotFound(height))
    }

    fn latest_height(&self) -> Result<Option<u64>, StorageError> {
        Ok(self.inner.read().latest)
    }

    fn load_execution_responses(&self, height: u64) -> Result<ExecutionResponses, StorageError> {
        self.inner
            .read()
            .responses
            .get(&height)
            .cloned()
            .ok_or(StorageError::NotFound(height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_at(height: u64) -> ChainState {
        ChainState {
            last_block_height: height,
            ..Default::default()
        }
    }

    #[test]
    fn test_latest_follows_last_save() {
        let store = MemStateStore::new();
        assert_eq!(store.latest_height().unwrap(), None);
        assert!(store.load_latest().unwrap().is_none());

        store.save_state(&state_at(1)).unwrap();
        store.save_state(&state_at(2)).unwrap();
        assert_eq!(store.latest_height().unwrap(), Some(2));
        assert_eq!(store.load_latest().unwrap().unwrap().last_block_height, 2);
        assert_eq!(store.heights(), vec![1, 2]);
    }

    #[test]
    fn test_missing_height_is_not_found() {
        let store = MemStateStore::new();
        assert!(matches!(
            store.load_state(7),
            Err(StorageError::NotFound(7))
        ));
        assert!(matches!(
            store.load_execution_responses(7),
            Err(StorageError::NotFound(7))
        ));
    }
}
