// Path: crates/api/src/events/mod.rs

//! Defines the publisher used to fire block events after commit.

use strata_types::app::{EventDataNewBlock, EventDataNewBlockHeader, EventDataTx};
use strata_types::error::EventError;

/// Receives the events fired after a block is committed.
///
/// Publishing is fire-and-forget for the executor: implementations must not block
/// on slow subscribers, and returned errors are only logged. Events for a height may
/// be published more than once after a crash.
pub trait BlockEventPublisher: Send + Sync {
    fn publish_new_block(&self, event: EventDataNewBlock) -> Result<(), EventError>;

    fn publish_new_block_header(&self, event: EventDataNewBlockHeader) -> Result<(), EventError>;

    fn publish_tx(&self, event: EventDataTx) -> Result<(), EventError>;
}

/// A publisher that drops every event. Used when no subscribers are configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NopEventBus;

impl BlockEventPublisher for NopEventBus {
    fn publish_new_block(&self, _event: EventDataNewBlock) -> Result<(), EventError> {
        Ok(())
    }

    fn publish_new_block_header(&self, _event: EventDataNewBlockHeader) -> Result<(), EventError> {
        Ok(())
    }

    fn publish_tx(&self, _event: EventDataTx) -> Result<(), EventError> {
        Ok(())
    }
}
