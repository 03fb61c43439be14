//! A state store wrapper with switchable write failures.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use strata_api::storage::StateStore;
use strata_types::app::{ChainState, ExecutionResponses};
use strata_types::error::StorageError;

/// Delegates to `inner` but can be told to fail `save_state` or
/// `save_execution_responses` without writing anything.
#[derive(Debug, Default)]
pub struct FailingStore<S> {
    inner: S,
    fail_save_state: AtomicBool,
    fail_save_responses: AtomicBool,
    save_state_calls: AtomicUsize,
}

impl<S: StateStore> FailingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            fail_save_state: AtomicBool::new(false),
            fail_save_responses: AtomicBool::new(false),
            save_state_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_fail_save_state(&self, fail: bool) {
        self.fail_save_state.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_save_responses(&self, fail: bool) {
        self.fail_save_responses.store(fail, Ordering::SeqCst);
    }

    /// Number of `save_state` attempts, failed ones included.
    pub fn save_state_calls(&self) -> usize {
        self.save_state_calls.load(Ordering::SeqCst)
    }
}

impl<S: StateStore> StateStore for FailingStore<S> {
    fn save_state(&self, state: &ChainState) -> Result<(), StorageError> {
        self.save_state_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_save_state.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("scripted save_state failure".into()));
        }
        self.inner.save_state(state)
    }

    fn save_execution_responses(
        &self,
        height: u64,
        responses: &ExecutionResponses,
    ) -> Result<(), StorageError> {
        if self.fail_save_responses.load(Ordering::SeqCst) {
            return Err(StorageError::Backend(
                "scripted save_execution_responses failure".into(),
            ));
        }
        self.inner.save_execution_responses(height, responses)
    }

    fn load_state(&self, height: u64) -> Result<ChainState, StorageError> {
        self.inner.load_state(height)
    }

    fn latest_height(&self) -> Result<Option<u64>, StorageError> {
        self.inner.latest_height()
    }

    fn load_execution_responses(&self, height: u64) -> Result<ExecutionResponses, StorageError> {
        self.inner.load_execution_responses(height)
    }
}
