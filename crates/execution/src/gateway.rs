// Path: crates/execution/src/gateway.rs
//! The executor's view of the application: run a block, then commit it.

use crate::metrics::metrics;
use parking_lot::Mutex;
use std::sync::Arc;
use strata_api::app::{AppConnConsensus, RequestBeginBlock};
use strata_types::app::{AppHash, Block, ExecutionResponses, CODE_TYPE_OK};
use strata_types::error::{AppError, ExecutionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Ready,
    Executed(u64),
}

/// Drives an [`AppConnConsensus`] through execute-then-commit for one height at a
/// time.
///
/// A commit is only accepted for the height that was just executed, and a second
/// block cannot be executed until the first is committed or aborted.
pub struct AppGateway {
    app: Arc<dyn AppConnConsensus>,
    phase: Mutex<Phase>,
}

impl std::fmt::Debug for AppGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppGateway")
            .field("phase", &*self.phase.lock())
            .finish_non_exhaustive()
    }
}

impl AppGateway {
    pub fn new(app: Arc<dyn AppConnConsensus>) -> Self {
        Self {
            app,
            phase: Mutex::new(Phase::Ready),
        }
    }

    /// The height executed but not yet committed, if any.
    pub fn pending_height(&self) -> Option<u64> {
        match *self.phase.lock() {
            Phase::Ready => None,
            Phase::Executed(h) => Some(h),
        }
    }

    /// Runs `block` on the application: begin_block, one deliver_tx per transaction
    /// in block order, then end_block.
    ///
    /// A transaction rejected by the application is a recorded result, not an error.
    pub async fn execute_block(&self, block: &Block) -> Result<ExecutionResponses, ExecutionError> {
        let height = block.height();
        let phase = *self.phase.lock();
        if let Phase::Executed(pending) = phase {
            return Err(ExecutionError::Application(AppError::OutOfOrder(format!(
                "cannot execute block {height}: block {pending} is executed but not committed"
            ))));
        }

        self.app
            .begin_block(RequestBeginBlock {
                block_id: block.block_id(),
                header: block.header.clone(),
                byzantine_validators: block.evidence.clone(),
            })
            .await
            .map_err(ExecutionError::Application)?;

        let mut deliver_tx = Vec::with_capacity(block.txs.len());
        for tx in &block.txs {
            let result = self
                .app
                .deliver_tx(tx)
                .await
                .map_err(ExecutionError::Application)?;
            if !result.is_ok() {
                tracing::debug!(
                    target: "execution",
                    event = "tx_rejected",
                    height,
                    index = deliver_tx.len(),
                    code = result.code,
                    log = %result.log
                );
            }
            deliver_tx.push(result);
        }

        let end_block = self
            .app
            .end_block(height)
            .await
            .map_err(ExecutionError::Application)?;

        let responses = ExecutionResponses {
            deliver_tx,
            end_block,
        };
        let (valid, invalid) = (responses.valid_txs(), responses.invalid_txs());
        metrics().inc_txs_delivered(valid as u64, invalid as u64);
        tracing::info!(
            target: "execution",
            event = "block_executed",
            height,
            valid_txs = valid,
            invalid_txs = invalid
        );

        *self.phase.lock() = Phase::Executed(height);
        Ok(responses)
    }

    /// Commits the application state for the block executed at `height` and returns
    /// the application's new state root.
    ///
    /// The gateway returns to its ready phase whatever the outcome, so a failed
    /// commit can be retried by executing the block again.
    pub async fn commit(&self, height: u64) -> Result<AppHash, ExecutionError> {
        {
            let mut phase = self.phase.lock();
            if *phase != Phase::Executed(height) {
                return Err(ExecutionError::Commit(AppError::OutOfOrder(format!(
                    "commit for height {height} without executing it (phase {:?})",
                    *phase
                ))));
            }
            *phase = Phase::Ready;
        }

        let res = self.app.commit().await.map_err(ExecutionError::Commit)?;
        if res.code != CODE_TYPE_OK {
            return Err(ExecutionError::Commit(AppError::Rejected {
                code: res.code,
                log: res.log,
            }));
        }

        tracing::info!(
            target: "execution",
            event = "app_committed",
            height,
            app_hash = %hex::encode(&res.data)
        );
        Ok(AppHash(res.data))
    }

    /// Drops an executed but uncommitted block so the next execution is accepted.
    pub fn abort(&self) {
        let mut phase = self.phase.lock();
        if let Phase::Executed(height) = *phase {
            tracing::warn!(target: "execution", event = "execution_aborted", height);
        }
        *phase = Phase::Ready;
    }

    /// Executes and commits `block` without deriving or saving any chain state.
    ///
    /// Used to bring an application that lags the stored chain back up to date.
    pub async fn exec_commit_block(&self, block: &Block) -> Result<AppHash, ExecutionError> {
        self.execute_block(block).await?;
        self.commit(block.height()).await
    }
}
