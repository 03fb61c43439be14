//! Collaborators that record what the executor hands them.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use strata_api::events::BlockEventPublisher;
use strata_api::evidence::EvidencePool;
use strata_types::app::{
    Block, BlockEvent, ChainState, EventDataNewBlock, EventDataNewBlockHeader, EventDataTx,
    Evidence,
};
use strata_types::error::{EventError, EvidenceError};
use strata_types::Hash;

/// An evidence pool that records every committed height and rejects evidence
/// explicitly marked invalid.
#[derive(Debug, Default)]
pub struct RecordingEvidencePool {
    updates: Mutex<Vec<u64>>,
    invalid: Mutex<HashSet<Hash>>,
    fail_updates: AtomicBool,
}

impl RecordingEvidencePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Heights passed to `update`, in call order.
    pub fn updates(&self) -> Vec<u64> {
        self.updates.lock().clone()
    }

    pub fn mark_invalid(&self, evidence: &Evidence) {
        self.invalid.lock().insert(evidence.hash());
    }

    /// Makes `update` return an error after recording the height.
    pub fn set_fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }
}

impl EvidencePool for RecordingEvidencePool {
    fn update(&self, block: &Block) -> Result<(), EvidenceError> {
        self.updates.lock().push(block.height());
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(EvidenceError::Update("scripted failure".into()));
        }
        Ok(())
    }

    fn is_valid_evidence(&self, evidence: &Evidence, _state: &ChainState) -> bool {
        !self.invalid.lock().contains(&evidence.hash())
    }
}

/// An event publisher that keeps every event it is given.
#[derive(Debug, Default)]
pub struct RecordingEventBus {
    events: Mutex<Vec<BlockEvent>>,
    fail: AtomicBool,
}

impl RecordingEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<BlockEvent> {
        self.events.lock().clone()
    }

    /// The `kind()` of every recorded event, in publish order.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(BlockEvent::kind).collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// Makes every publish return an error after recording the event.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn record(&self, event: BlockEvent) -> Result<(), EventError> {
        let kind = event.kind();
        self.events.lock().push(event);
        if self.fail.load(Ordering::SeqCst) {
            return Err(EventError::Publish {
                kind,
                reason: "scripted failure".into(),
            });
        }
        Ok(())
    }
}

impl BlockEventPublisher for RecordingEventBus {
    fn publish_new_block(&self, event: EventDataNewBlock) -> Result<(), EventError> {
        self.record(BlockEvent::NewBlock(event))
    }

    fn publish_new_block_header(&self, event: EventDataNewBlockHeader) -> Result<(), EventError> {
        self.record(BlockEvent::NewBlockHeader(event))
    }

    fn publish_tx(&self, event: EventDataTx) -> Result<(), EventError> {
        self.record(BlockEvent::Tx(event))
    }
}
