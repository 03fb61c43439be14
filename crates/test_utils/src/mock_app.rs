//! A scriptable in-process application for driving the block executor.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use strata_api::app::{AppConnConsensus, RequestBeginBlock, ResponseCommit};
use strata_types::app::{ConsensusParamsUpdate, EndBlockResponse, TxResult, ValidatorUpdate};
use strata_types::error::AppError;
use strata_types::hash::sha256;

/// Transactions starting with this prefix are rejected with code 1.
pub const REJECT_PREFIX: &[u8] = b"bad";

/// One call received by a [`MockApp`], in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCall {
    BeginBlock(u64),
    DeliverTx(Vec<u8>),
    EndBlock(u64),
    Commit,
}

#[derive(Debug, Default)]
struct Script {
    begin_block_failures: u32,
    deliver_tx_failures: u32,
    end_block_failures: u32,
    commit_failures: u32,
    commit_code: u32,
    validator_updates: HashMap<u64, Vec<ValidatorUpdate>>,
    param_updates: HashMap<u64, ConsensusParamsUpdate>,
}

#[derive(Debug, Default)]
struct AppState {
    /// Root after the last successful commit.
    committed: Vec<u8>,
    /// Transactions delivered since the last commit.
    pending: Vec<Vec<u8>>,
    calls: Vec<AppCall>,
}

/// A deterministic application.
///
/// Its state root is a hash chain over every delivered transaction, so two mocks fed
/// the same blocks report the same app hashes. Failures are scripted as counters
/// that are consumed one call at a time.
#[derive(Debug, Default)]
pub struct MockApp {
    script: Mutex<Script>,
    state: Mutex<AppState>,
}

impl MockApp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the next `n` begin_block calls with a connection error.
    pub fn fail_begin_block(&self, n: u32) {
        self.script.lock().begin_block_failures = n;
    }

    /// Fails the next `n` deliver_tx calls with a connection error.
    pub fn fail_deliver_tx(&self, n: u32) {
        self.script.lock().deliver_tx_failures = n;
    }

    /// Fails the next `n` end_block calls with a connection error.
    pub fn fail_end_block(&self, n: u32) {
        self.script.lock().end_block_failures = n;
    }

    /// Fails the next `n` commit calls with a connection error.
    pub fn fail_commit(&self, n: u32) {
        self.script.lock().commit_failures = n;
    }

    /// Makes every commit answer with `code`.
    pub fn set_commit_code(&self, code: u32) {
        self.script.lock().commit_code = code;
    }

    /// Returns `updates` from end_block at `height`.
    pub fn set_validator_updates(&self, height: u64, updates: Vec<ValidatorUpdate>) {
        self.script.lock().validator_updates.insert(height, updates);
    }

    /// Returns `update` from end_block at `height`.
    pub fn set_param_updates(&self, height: u64, update: ConsensusParamsUpdate) {
        self.script.lock().param_updates.insert(height, update);
    }

    pub fn calls(&self) -> Vec<AppCall> {
        self.state.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Number of commit calls that reached the application.
    pub fn commit_count(&self) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| matches!(c, AppCall::Commit))
            .count()
    }

    /// The state root after the last successful commit.
    pub fn committed_hash(&self) -> Vec<u8> {
        self.state.lock().committed.clone()
    }

    fn take_failure(counter: &mut u32, call: &str) -> Result<(), AppError> {
        if *counter > 0 {
            *counter -= 1;
            return Err(AppError::Connection(format!("scripted {call} failure")));
        }
        Ok(())
    }
}

#[async_trait]
impl AppConnConsensus for MockApp {
    async fn begin_block(&self, req: RequestBeginBlock) -> Result<(), AppError> {
        self.state.lock().calls.push(AppCall::BeginBlock(req.header.height));
        Self::take_failure(&mut self.script.lock().begin_block_failures, "begin_block")?;
        self.state.lock().pending.clear();
        Ok(())
    }

    async fn deliver_tx(&self, tx: &[u8]) -> Result<TxResult, AppError> {
        self.state.lock().calls.push(AppCall::DeliverTx(tx.to_vec()));
        Self::take_failure(&mut self.script.lock().deliver_tx_failures, "deliver_tx")?;
        self.state.lock().pending.push(tx.to_vec());

        if tx.starts_with(REJECT_PREFIX) {
            return Ok(TxResult {
                code: 1,
                data: Vec::new(),
                log: "rejected by mock".into(),
                gas_used: 0,
            });
        }
        Ok(TxResult {
            code: 0,
            data: sha256(tx).to_vec(),
            log: String::new(),
            gas_used: tx.len() as u64,
        })
    }

    async fn end_block(&self, height: u64) -> Result<EndBlockResponse, AppError> {
        self.state.lock().calls.push(AppCall::EndBlock(height));
        let mut script = self.script.lock();
        Self::take_failure(&mut script.end_block_failures, "end_block")?;
        Ok(EndBlockResponse {
            validator_updates: script.validator_updates.get(&height).cloned().unwrap_or_default(),
            consensus_param_updates: script.param_updates.get(&height).cloned(),
        })
    }

    async fn commit(&self) -> Result<ResponseCommit, AppError> {
        self.state.lock().calls.push(AppCall::Commit);
        let code = {
            let mut script = self.script.lock();
            Self::take_failure(&mut script.commit_failures, "commit")?;
            script.commit_code
        };
        if code != 0 {
            return Ok(ResponseCommit {
                code,
                data: Vec::new(),
                log: "scripted commit rejection".into(),
            });
        }

        let mut state = self.state.lock();
        let mut preimage = state.committed.clone();
        for tx in std::mem::take(&mut state.pending) {
            preimage.extend_from_slice(&tx);
        }
        state.committed = sha256(&preimage).to_vec();
        Ok(ResponseCommit {
            code: 0,
            data: state.committed.clone(),
            log: String::new(),
        })
    }
}
