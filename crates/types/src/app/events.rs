// Path: crates/types/src/app/events.rs

use crate::app::{Block, BlockHeader, Tx, TxResult};
use serde::{Deserialize, Serialize};

/// Payload of the "new block" event.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EventDataNewBlock {
    pub block: Block,
}

/// Payload of the "new block header" event.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EventDataNewBlockHeader {
    pub header: BlockHeader,
}

/// Payload of the per-transaction event fired after a block is committed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EventDataTx {
    pub height: u64,
    pub index: u32,
    pub tx: Tx,
    pub result: TxResult,
}

/// Every event the executor publishes, as delivered to subscribers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", content = "data")]
pub enum BlockEvent {
    NewBlock(EventDataNewBlock),
    NewBlockHeader(EventDataNewBlockHeader),
    Tx(EventDataTx),
}

impl BlockEvent {
    /// The block height the event belongs to.
    pub fn height(&self) -> u64 {
        match self {
            BlockEvent::NewBlock(e) => e.block.header.height,
            BlockEvent::NewBlockHeader(e) => e.header.height,
            BlockEvent::Tx(e) => e.height,
        }
    }

    /// A stable name for logs and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            BlockEvent::NewBlock(_) => "new_block",
            BlockEvent::NewBlockHeader(_) => "new_block_header",
            BlockEvent::Tx(_) => "tx",
        }
    }
}
