// Path: crates/execution/src/executor.rs
use crate::events::fire_events;
use crate::gateway::AppGateway;
use crate::metrics::metrics;
use crate::transition::update_state;
use crate::validation;
use parking_lot::Mutex;
use std::sync::Arc;
use strata_api::app::AppConnConsensus;
use strata_api::events::{BlockEventPublisher, NopEventBus};
use strata_api::evidence::EvidencePool;
use strata_api::storage::StateStore;
use strata_telemetry::error_metrics;
use strata_telemetry::time::Timer;
use strata_types::app::{AppHash, Block, BlockId, ChainState, ExecutionResponses};
use strata_types::error::{AppError, BlockError, ErrorCode, ExecutionError, StorageError};

/// A block the application has committed but whose state is not yet saved.
#[derive(Debug)]
struct PendingSave {
    block_id: BlockId,
    state: ChainState,
    responses: ExecutionResponses,
}

/// Applies finalized blocks to the chain state.
///
/// Collaborators are passed in at construction. Events go to a no-op publisher
/// until one is supplied with [`BlockExecutor::with_event_bus`].
///
/// Calls to [`BlockExecutor::apply_block`] for one chain must not overlap.
pub struct BlockExecutor {
    store: Arc<dyn StateStore>,
    gateway: AppGateway,
    evpool: Arc<dyn EvidencePool>,
    event_bus: Arc<dyn BlockEventPublisher>,
    pending_save: Mutex<Option<PendingSave>>,
}

impl std::fmt::Debug for BlockExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockExecutor")
            .field("gateway", &self.gateway)
            .finish_non_exhaustive()
    }
}

impl BlockExecutor {
    pub fn new(
        store: Arc<dyn StateStore>,
        app: Arc<dyn AppConnConsensus>,
        evpool: Arc<dyn EvidencePool>,
    ) -> Self {
        Self {
            store,
            gateway: AppGateway::new(app),
            evpool,
            event_bus: Arc::new(NopEventBus),
            pending_save: Mutex::new(None),
        }
    }

    /// Replaces the event publisher.
    pub fn with_event_bus(mut self, event_bus: Arc<dyn BlockEventPublisher>) -> Self {
        self.event_bus = event_bus;
        self
    }

    pub fn store(&self) -> &Arc<dyn StateStore> {
        &self.store
    }

    pub fn gateway(&self) -> &AppGateway {
        &self.gateway
    }

    /// Checks that `block` may be applied on top of `state`. Has no side effects.
    pub fn validate_block(&self, state: &ChainState, block: &Block) -> Result<(), BlockError> {
        validation::validate_block(self.store.as_ref(), self.evpool.as_ref(), state, block)
    }

    /// Validates, executes and commits `block`, persists the resulting state and
    /// notifies the evidence pool and event subscribers.
    ///
    /// On error nothing has been persisted as the latest state, so `state` is still
    /// the chain's current state and the whole call may be retried. Once the new
    /// state is saved the block counts as applied; later notification failures are
    /// only logged.
    ///
    /// If the application committed the block but saving the new state failed, a
    /// retry with the same block saves the state derived the first time and does
    /// not run the block on the application again.
    ///
    /// If the block is the latest one in the store, with the same block id, the stored
    /// state is returned after replaying the notifications, without running the
    /// block again. Blocks below the latest stored height are rejected.
    pub async fn apply_block(
        &self,
        state: &ChainState,
        block_id: BlockId,
        block: &Block,
    ) -> Result<ChainState, ExecutionError> {
        let _timer = Timer::new(metrics());
        let height = block.height();

        let result = match self.already_committed(block_id, block) {
            Ok(Some(stored)) => Ok(stored),
            Ok(None) => self.apply_new_block(state, block_id, block).await,
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            error_metrics().inc_error("execution", e.code());
            tracing::warn!(
                target: "execution",
                event = "apply_failed",
                height,
                code = e.code(),
                error = %e
            );
        }
        result
    }

    /// Returns the stored state for `block`'s height when it is the latest committed
    /// block, after replaying its notifications.
    fn already_committed(
        &self,
        block_id: BlockId,
        block: &Block,
    ) -> Result<Option<ChainState>, ExecutionError> {
        let height = block.height();
        match self.store.latest_height()? {
            Some(latest) if latest == height => {}
            Some(latest) if latest > height => {
                return Err(BlockError::AlreadyCommitted { height }.into());
            }
            _ => return Ok(None),
        }

        let stored = match self.store.load_state(height) {
            Ok(stored) => stored,
            Err(StorageError::NotFound(_)) => {
                return Err(BlockError::AlreadyCommitted { height }.into());
            }
            Err(e) => return Err(e.into()),
        };
        if stored.last_block_id != block_id {
            return Err(BlockError::AlreadyCommitted { height }.into());
        }

        tracing::info!(
            target: "execution",
            event = "already_committed",
            height,
            block_id = %block_id
        );
        self.replay_notifications(height, block)?;
        Ok(Some(stored))
    }

    async fn apply_new_block(
        &self,
        state: &ChainState,
        block_id: BlockId,
        block: &Block,
    ) -> Result<ChainState, ExecutionError> {
        let height = block.height();
        self.validate_block(state, block)?;

        let (new_state, responses) = match self.take_pending_save(height, block_id)? {
            Some(pending) => {
                tracing::info!(
                    target: "execution",
                    event = "resuming_save",
                    height,
                    block_id = %block_id
                );
                (pending.state, pending.responses)
            }
            None => {
                let responses = self.gateway.execute_block(block).await?;
                match self.finalize(state, block_id, block, &responses).await {
                    Ok(new_state) => (new_state, responses),
                    Err(e) => {
                        self.gateway.abort();
                        return Err(e);
                    }
                }
            }
        };

        // Durability boundary: from here on the block is applied.
        if let Err(e) = self.store.save_state(&new_state) {
            *self.pending_save.lock() = Some(PendingSave {
                block_id,
                state: new_state,
                responses,
            });
            return Err(e.into());
        }
        metrics().inc_blocks_applied();
        metrics().set_last_block_height(height);
        tracing::info!(
            target: "execution",
            event = "block_applied",
            height,
            txs = block.txs.len(),
            total_txs = new_state.last_block_total_tx,
            validators = new_state.validators.len(),
            app_hash = %new_state.app_hash.as_ref().map(|h| hex::encode(&h.0)).unwrap_or_default()
        );

        self.notify(block, &responses);
        Ok(new_state)
    }

    /// Takes the committed-but-unsaved result for `height`, if the same block left
    /// one behind. The application is already past a different block at that height,
    /// so that block is refused.
    fn take_pending_save(
        &self,
        height: u64,
        block_id: BlockId,
    ) -> Result<Option<PendingSave>, ExecutionError> {
        let mut slot = self.pending_save.lock();
        match slot.take() {
            Some(pending) if pending.state.last_block_height == height => {
                if pending.block_id == block_id {
                    Ok(Some(pending))
                } else {
                    *slot = Some(pending);
                    Err(BlockError::AlreadyCommitted { height }.into())
                }
            }
            // Left over from a height that is no longer next.
            Some(_) | None => Ok(None),
        }
    }

    /// Persists the responses, derives the next state and commits the application.
    async fn finalize(
        &self,
        state: &ChainState,
        block_id: BlockId,
        block: &Block,
        responses: &ExecutionResponses,
    ) -> Result<ChainState, ExecutionError> {
        let height = block.height();
        self.store.save_execution_responses(height, responses)?;

        let mut new_state = update_state(state, block_id, block, responses)
            .map_err(ExecutionError::Application)?;
        new_state.last_results_hash = Some(responses.results_hash());

        let app_hash: AppHash = self.gateway.commit(height).await?;
        new_state.app_hash = Some(app_hash);
        Ok(new_state)
    }

    /// Re-sends the evidence pool update and the block events for a committed
    /// height, using the execution responses persisted for it. Safe to call any
    /// number of times; chain state is not touched.
    pub fn replay_notifications(&self, height: u64, block: &Block) -> Result<(), ExecutionError> {
        if block.height() != height {
            return Err(BlockError::InvalidHeight {
                expected: height,
                got: block.height(),
            }
            .into());
        }
        let responses = self.store.load_execution_responses(height)?;
        if responses.deliver_tx.len() != block.txs.len() {
            return Err(ExecutionError::Application(AppError::ResultCountMismatch {
                expected: block.txs.len(),
                got: responses.deliver_tx.len(),
            }));
        }
        tracing::info!(target: "execution", event = "replay_notifications", height);
        self.notify(block, &responses);
        Ok(())
    }

    fn notify(&self, block: &Block, responses: &ExecutionResponses) {
        if let Err(e) = self.evpool.update(block) {
            metrics().inc_notification_failures("evidence_pool");
            tracing::warn!(
                target: "execution",
                event = "evidence_update_failed",
                height = block.height(),
                error = %e
            );
        }
        fire_events(self.event_bus.as_ref(), block, responses);
    }
}
