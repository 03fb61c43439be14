// Path: crates/execution/src/event_bus.rs
use strata_api::events::BlockEventPublisher;
use strata_types::app::{BlockEvent, EventDataNewBlock, EventDataNewBlockHeader, EventDataTx};
use strata_types::config::EventBusConfig;
use strata_types::error::EventError;
use tokio::sync::broadcast;

/// An in-process publisher fanning block events out to any number of subscribers.
///
/// Each subscriber has a bounded buffer of `capacity` events. Publishing never
/// waits: a subscriber that falls behind loses its oldest events and observes a
/// `Lagged` error on its next receive. Publishing with no subscribers succeeds.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<BlockEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn from_config(config: &EventBusConfig) -> Self {
        Self::new(config.capacity)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BlockEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    fn publish(&self, event: BlockEvent) -> Result<(), EventError> {
        let kind = event.kind();
        let height = event.height();
        // `send` only fails when nobody is subscribed.
        if self.tx.send(event).is_err() {
            tracing::trace!(target: "events", event = "no_subscribers", kind, height);
        }
        Ok(())
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::from_config(&EventBusConfig::default())
    }
}

impl BlockEventPublisher for EventBus {
    fn publish_new_block(&self, event: EventDataNewBlock) -> Result<(), EventError> {
        self.publish(BlockEvent::NewBlock(event))
    }

    fn publish_new_block_header(&self, event: EventDataNewBlockHeader) -> Result<(), EventError> {
        self.publish(BlockEvent::NewBlockHeader(event))
    }

    fn publish_tx(&self, event: EventDataTx) -> Result<(), EventError> {
        self.publish(BlockEvent::Tx(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_types::app::BlockHeader;

    fn header_event(height: u64) -> EventDataNewBlockHeader {
        EventDataNewBlockHeader {
            header: BlockHeader {
                height,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_publish_without_subscribers_is_ok() {
        let bus = EventBus::new(4);
        assert_eq!(bus.subscriber_count(), 0);
        bus.publish_new_block_header(header_event(1)).unwrap();
    }

    #[tokio::test]
    async fn test_subscriber_receives_in_order() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();
        bus.publish_new_block_header(header_event(1)).unwrap();
        bus.publish_new_block_header(header_event(2)).unwrap();

        assert_eq!(rx.recv().await.unwrap().height(), 1);
        assert_eq!(rx.recv().await.unwrap().height(), 2);
    }

    #[tokio::test]
    async fn test_slow_subscriber_lags_without_blocking_publisher() {
        let bus = EventBus::new(2);
        let mut rx = bus.subscribe();
        for h in 1..=5 {
            bus.publish_new_block_header(header_event(h)).unwrap();
        }
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(3))
        ));
        assert_eq!(rx.recv().await.unwrap().height(), 4);
    }
}
