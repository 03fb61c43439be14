// Path: crates/api/src/app/mod.rs

//! Defines the consensus connection to the external application state machine.

use async_trait::async_trait;
use strata_types::app::{BlockHeader, BlockId, EndBlockResponse, Evidence, TxResult};
use strata_types::error::AppError;

/// Announces the start of a block to the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBeginBlock {
    pub block_id: BlockId,
    pub header: BlockHeader,
    /// Evidence of misbehavior included in the block.
    pub byzantine_validators: Vec<Evidence>,
}

/// The application's answer to a commit request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseCommit {
    pub code: u32,
    /// The new application state root.
    pub data: Vec<u8>,
    pub log: String,
}

/// The request/response channel the executor uses to run a block on the
/// application and commit the result.
///
/// For each height the executor calls `begin_block`, `deliver_tx` once per
/// transaction in block order, `end_block`, and finally `commit`. Calls may block on
/// I/O; no timeout is applied here.
#[async_trait]
pub trait AppConnConsensus: Send + Sync {
    async fn begin_block(&self, req: RequestBeginBlock) -> Result<(), AppError>;

    /// Executes one transaction. A rejected transaction is reported through the
    /// result's code; `Err` means the call itself failed.
    async fn deliver_tx(&self, tx: &[u8]) -> Result<TxResult, AppError>;

    async fn end_block(&self, height: u64) -> Result<EndBlockResponse, AppError>;

    /// Persists the application's state and returns its new root.
    async fn commit(&self) -> Result<ResponseCommit, AppError>;
}
