// Path: crates/api/src/evidence/mod.rs

//! Defines the evidence pool contract.

use strata_types::app::{Block, ChainState, Evidence};
use strata_types::error::EvidenceError;

/// Tracks misbehavior evidence on behalf of the executor.
pub trait EvidencePool: Send + Sync {
    /// Called once per committed block, after the new state is persisted. After a
    /// crash it may be called again for the same block, so it must be idempotent.
    fn update(&self, block: &Block) -> Result<(), EvidenceError>;

    /// Consulted during block validation for every evidence item in the block.
    fn is_valid_evidence(&self, evidence: &Evidence, state: &ChainState) -> bool;
}

/// An evidence pool that accepts all evidence and records nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NopEvidencePool;

impl EvidencePool for NopEvidencePool {
    fn update(&self, _block: &Block) -> Result<(), EvidenceError> {
        Ok(())
    }

    fn is_valid_evidence(&self, _evidence: &Evidence, _state: &ChainState) -> bool {
        true
    }
}
