// Path: crates/types/src/error/mod.rs
//! Core error types for the block-commit core.

use crate::app::Address;
use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors raised by the durable state store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A generic error originating from the underlying key-value store backend (e.g., redb).
    #[error("backend error: {0}")]
    Backend(String),
    /// An error occurred while serializing data for storage.
    #[error("encode error: {0}")]
    Encode(String),
    /// An error occurred while deserializing data from storage.
    #[error("decode error: {0}")]
    Decode(String),
    /// Nothing is stored at the requested height.
    #[error("nothing stored at height {0}")]
    NotFound(u64),
}

impl ErrorCode for StorageError {
    fn code(&self) -> &'static str {
        match self {
            Self::Backend(_) => "STORAGE_BACKEND_ERROR",
            Self::Encode(_) => "STORAGE_ENCODE_ERROR",
            Self::Decode(_) => "STORAGE_DECODE_ERROR",
            Self::NotFound(_) => "STORAGE_NOT_FOUND",
        }
    }
}

/// Errors raised while changing a validator set.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidatorSetError {
    /// A validator was given a negative voting power.
    #[error("validator {address} has negative voting power {power}")]
    NegativePower {
        /// The offending validator.
        address: Address,
        /// The requested power.
        power: i64,
    },
    /// The same address appears twice in one set or one update batch.
    #[error("duplicate validator {0}")]
    DuplicateValidator(Address),
    /// A zero-power update named a validator that is not in the set.
    #[error("cannot remove unknown validator {0}")]
    RemoveUnknown(Address),
    /// The update would leave the set without validators.
    #[error("validator set would become empty")]
    Empty,
}

impl ErrorCode for ValidatorSetError {
    fn code(&self) -> &'static str {
        match self {
            Self::NegativePower { .. } => "VALSET_NEGATIVE_POWER",
            Self::DuplicateValidator(_) => "VALSET_DUPLICATE_VALIDATOR",
            Self::RemoveUnknown(_) => "VALSET_REMOVE_UNKNOWN",
            Self::Empty => "VALSET_EMPTY",
        }
    }
}

/// Errors raised by consensus parameter validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParamsError {
    /// The parameters violate a protocol bound.
    #[error("invalid consensus params: {0}")]
    Invalid(String),
}

/// Errors raised while loading a genesis document.
#[derive(Debug, Error)]
pub enum GenesisError {
    /// The document could not be parsed.
    #[error("failed to parse genesis: {0}")]
    Parse(String),
    /// The document is internally inconsistent.
    #[error("invalid genesis: {0}")]
    Invalid(String),
    /// The genesis validators do not form a valid set.
    #[error("invalid genesis validators: {0}")]
    Validators(#[source] ValidatorSetError),
}

/// Reasons a block is rejected by validation.
#[derive(Debug, Error)]
pub enum BlockError {
    /// The block's height is not `last_block_height + 1`.
    #[error("Invalid block height. Expected {expected}, got {got}")]
    InvalidHeight {
        /// The expected block height.
        expected: u64,
        /// The height of the received block.
        got: u64,
    },
    /// The block's `last_block_id` does not match the state's.
    #[error("Mismatched last block id. Expected {expected}, got {got}")]
    MismatchedLastBlockId {
        /// Hex of the expected block hash.
        expected: String,
        /// Hex of the block hash in the header.
        got: String,
    },
    /// The block's time does not advance past the last block's time.
    #[error("Block time {got} is not after last block time {last}")]
    NonMonotonicTime {
        /// The last block time.
        last: u64,
        /// The time in the header.
        got: u64,
    },
    /// The header's `num_txs` disagrees with the transaction list.
    #[error("Header claims {header} txs, block carries {actual}")]
    TxCountMismatch {
        /// `num_txs` from the header.
        header: u64,
        /// Length of the transaction list.
        actual: u64,
    },
    /// The block carries more transactions than the consensus params allow.
    #[error("Block has too many txs: {got} > {max}")]
    TooManyTxs {
        /// The allowed maximum.
        max: u64,
        /// The transaction count.
        got: u64,
    },
    /// The block's encoded size exceeds the consensus params.
    #[error("Block is too large: {got} bytes > {max}")]
    TooLarge {
        /// The allowed maximum.
        max: u64,
        /// The encoded size.
        got: u64,
    },
    /// Evidence refers to a height the chain has not committed yet.
    #[error("Evidence from height {evidence_height} is not before block height {height}")]
    EvidenceFromFuture {
        /// The evidence height.
        evidence_height: u64,
        /// The block height.
        height: u64,
    },
    /// Evidence is older than `evidence.max_age`.
    #[error("Evidence from height {evidence_height} is too old; min height is {min_height}")]
    EvidenceTooOld {
        /// The evidence height.
        evidence_height: u64,
        /// The oldest height still accepted.
        min_height: u64,
    },
    /// Evidence names an address that was not a validator at its height.
    #[error("Address {address} was not a validator at height {height}")]
    EvidenceUnknownValidator {
        /// The accused address.
        address: Address,
        /// The evidence height.
        height: u64,
    },
    /// The evidence pool rejected the evidence.
    #[error("Invalid evidence from height {height} against {address}")]
    InvalidEvidence {
        /// The evidence height.
        height: u64,
        /// The accused address.
        address: Address,
    },
    /// A different block, or a pruned one, is already committed at this height.
    #[error("A block is already committed at height {height}")]
    AlreadyCommitted {
        /// The block height.
        height: u64,
    },
    /// Historical state needed for validation could not be loaded.
    #[error("Failed to load historical state: {0}")]
    Store(#[from] StorageError),
}

impl ErrorCode for BlockError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidHeight { .. } => "BLOCK_INVALID_HEIGHT",
            Self::MismatchedLastBlockId { .. } => "BLOCK_MISMATCHED_LAST_BLOCK_ID",
            Self::NonMonotonicTime { .. } => "BLOCK_NON_MONOTONIC_TIME",
            Self::TxCountMismatch { .. } => "BLOCK_TX_COUNT_MISMATCH",
            Self::TooManyTxs { .. } => "BLOCK_TOO_MANY_TXS",
            Self::TooLarge { .. } => "BLOCK_TOO_LARGE",
            Self::EvidenceFromFuture { .. } => "BLOCK_EVIDENCE_FROM_FUTURE",
            Self::EvidenceTooOld { .. } => "BLOCK_EVIDENCE_TOO_OLD",
            Self::EvidenceUnknownValidator { .. } => "BLOCK_EVIDENCE_UNKNOWN_VALIDATOR",
            Self::InvalidEvidence { .. } => "BLOCK_INVALID_EVIDENCE",
            Self::AlreadyCommitted { .. } => "BLOCK_ALREADY_COMMITTED",
            Self::Store(_) => "BLOCK_STORE_ERROR",
        }
    }
}

/// Errors raised by the application connection or by what the application returned.
#[derive(Debug, Error)]
pub enum AppError {
    /// The application could not be reached or the request failed in transit.
    #[error("application connection error: {0}")]
    Connection(String),
    /// The application answered with a non-OK code.
    #[error("application returned code {code}: {log}")]
    Rejected {
        /// The response code.
        code: u32,
        /// The application log line.
        log: String,
    },
    /// The application returned a different number of tx results than txs delivered.
    #[error("expected {expected} tx results, got {got}")]
    ResultCountMismatch {
        /// The number of transactions in the block.
        expected: usize,
        /// The number of results returned.
        got: usize,
    },
    /// The end-block validator updates cannot be applied.
    #[error("invalid validator updates: {0}")]
    InvalidValidatorUpdates(#[from] ValidatorSetError),
    /// The end-block consensus param updates produce invalid params.
    #[error("invalid consensus param updates: {0}")]
    InvalidParamUpdates(#[from] ParamsError),
    /// Execute and commit were called out of order.
    #[error("out of order application call: {0}")]
    OutOfOrder(String),
}

impl ErrorCode for AppError {
    fn code(&self) -> &'static str {
        match self {
            Self::Connection(_) => "APP_CONNECTION_ERROR",
            Self::Rejected { .. } => "APP_REJECTED",
            Self::ResultCountMismatch { .. } => "APP_RESULT_COUNT_MISMATCH",
            Self::InvalidValidatorUpdates(_) => "APP_INVALID_VALIDATOR_UPDATES",
            Self::InvalidParamUpdates(_) => "APP_INVALID_PARAM_UPDATES",
            Self::OutOfOrder(_) => "APP_OUT_OF_ORDER",
        }
    }
}

/// Errors reported by the evidence pool. Logged by the executor, never propagated.
#[derive(Debug, Error)]
pub enum EvidenceError {
    /// The pool could not record the committed block.
    #[error("evidence pool update failed: {0}")]
    Update(String),
}

/// Errors reported by an event publisher. Logged by the executor, never propagated.
#[derive(Debug, Error)]
pub enum EventError {
    /// The event could not be handed to subscribers.
    #[error("failed to publish {kind} event: {reason}")]
    Publish {
        /// The event kind.
        kind: &'static str,
        /// Why publishing failed.
        reason: String,
    },
}

/// The error taxonomy of the block application pipeline.
///
/// Every variant is returned before the state store has accepted the new state, so
/// the caller's prior state remains the chain's current state in all cases.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The block failed validation. Never retried with the same block.
    #[error("invalid block: {0}")]
    InvalidBlock(#[from] BlockError),
    /// Executing the block on the application failed.
    #[error("application error: {0}")]
    Application(#[source] AppError),
    /// The application failed to commit after successful execution.
    #[error("commit failed for application: {0}")]
    Commit(#[source] AppError),
    /// Execution responses or the new state could not be durably saved.
    #[error("persistence error: {0}")]
    Persistence(#[from] StorageError),
}

impl ErrorCode for ExecutionError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidBlock(_) => "EXEC_INVALID_BLOCK",
            Self::Application(_) => "EXEC_APPLICATION_ERROR",
            Self::Commit(_) => "EXEC_COMMIT_ERROR",
            Self::Persistence(_) => "EXEC_PERSISTENCE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        let err = ExecutionError::from(BlockError::InvalidHeight {
            expected: 11,
            got: 5,
        });
        assert_eq!(err.code(), "EXEC_INVALID_BLOCK");
        assert!(err.to_string().contains("Expected 11, got 5"));

        let err = ExecutionError::Commit(AppError::Connection("socket closed".into()));
        assert_eq!(err.code(), "EXEC_COMMIT_ERROR");

        let err = ExecutionError::from(StorageError::NotFound(3));
        assert_eq!(err.code(), "EXEC_PERSISTENCE_ERROR");
    }
}
