// Path: crates/execution/src/events.rs
use crate::metrics::metrics;
use strata_api::events::BlockEventPublisher;
use strata_types::app::{
    Block, EventDataNewBlock, EventDataNewBlockHeader, EventDataTx, ExecutionResponses,
};
use strata_types::error::EventError;

fn log_failure(height: u64, result: Result<(), EventError>) {
    if let Err(e) = result {
        metrics().inc_notification_failures("event_bus");
        tracing::warn!(target: "execution", event = "publish_failed", height, error = %e);
    }
}

/// Publishes the new-block event, the new-block-header event, then one event per
/// transaction in block order. Failures are logged and counted; publishing
/// continues with the next event.
pub fn fire_events(
    publisher: &dyn BlockEventPublisher,
    block: &Block,
    responses: &ExecutionResponses,
) {
    let height = block.height();
    log_failure(
        height,
        publisher.publish_new_block(EventDataNewBlock {
            block: block.clone(),
        }),
    );
    log_failure(
        height,
        publisher.publish_new_block_header(EventDataNewBlockHeader {
            header: block.header.clone(),
        }),
    );

    for (index, (tx, result)) in block.txs.iter().zip(&responses.deliver_tx).enumerate() {
        log_failure(
            height,
            publisher.publish_tx(EventDataTx {
                height,
                index: index as u32,
                tx: tx.clone(),
                result: result.clone(),
            }),
        );
    }
    tracing::debug!(
        target: "execution",
        event = "events_fired",
        height,
        txs = block.txs.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_test_utils::fixtures::{genesis_state, next_block, txs};
    use strata_test_utils::RecordingEventBus;
    use strata_types::app::{BlockEvent, TxResult};

    fn responses_for(block: &Block) -> ExecutionResponses {
        ExecutionResponses {
            deliver_tx: block.txs.iter().map(|_| TxResult::default()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_events_in_order() {
        let bus = RecordingEventBus::new();
        let block = next_block(&genesis_state(&[10]), txs(1, 2));
        fire_events(&bus, &block, &responses_for(&block));

        assert_eq!(bus.kinds(), vec!["new_block", "new_block_header", "tx", "tx"]);
        let events = bus.events();
        match &events[3] {
            BlockEvent::Tx(e) => {
                assert_eq!(e.index, 1);
                assert_eq!(e.tx, block.txs[1]);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_failing_publisher_does_not_stop_delivery() {
        let bus = RecordingEventBus::new();
        bus.set_fail(true);
        let block = next_block(&genesis_state(&[10]), txs(1, 3));
        fire_events(&bus, &block, &responses_for(&block));
        assert_eq!(bus.events().len(), 5);
    }
}
