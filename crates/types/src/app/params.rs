// Path: crates/types/src/app/params.rs

use crate::error::ParamsError;
use crate::hash::{sha256, Hash};
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Upper bound on `block_size.max_bytes`, regardless of what the application asks for.
pub const MAX_BLOCK_SIZE_BYTES: u64 = 104_857_600;

/// Limits on block size.
#[derive(Encode, Decode, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BlockSizeParams {
    /// Maximum canonical encoded size of a block.
    pub max_bytes: u64,
    /// Maximum number of transactions per block. Zero means unlimited.
    pub max_txs: u64,
}

impl Default for BlockSizeParams {
    fn default() -> Self {
        Self {
            max_bytes: 22_020_096,
            max_txs: 0,
        }
    }
}

/// Limits on evidence acceptance.
#[derive(Encode, Decode, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EvidenceParams {
    /// Maximum age, in blocks, of evidence that may still be included.
    pub max_age: u64,
}

impl Default for EvidenceParams {
    fn default() -> Self {
        Self { max_age: 100_000 }
    }
}

/// Protocol parameters in force at a given height.
#[derive(Encode, Decode, Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct ConsensusParams {
    #[serde(default)]
    pub block_size: BlockSizeParams,
    #[serde(default)]
    pub evidence: EvidenceParams,
}

/// A partial parameter change requested by the application. Absent sections are
/// left unchanged.
#[derive(Encode, Decode, Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct ConsensusParamsUpdate {
    pub block_size: Option<BlockSizeParams>,
    pub evidence: Option<EvidenceParams>,
}

impl ConsensusParams {
    /// Returns a new value with `update` folded in. `self` is not modified.
    pub fn update(&self, update: &ConsensusParamsUpdate) -> ConsensusParams {
        let mut next = self.clone();
        if let Some(block_size) = &update.block_size {
            next.block_size = block_size.clone();
        }
        if let Some(evidence) = &update.evidence {
            next.evidence = evidence.clone();
        }
        next
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.block_size.max_bytes == 0 {
            return Err(ParamsError::Invalid("block_size.max_bytes must be positive".into()));
        }
        if self.block_size.max_bytes > MAX_BLOCK_SIZE_BYTES {
            return Err(ParamsError::Invalid(format!(
                "block_size.max_bytes is too big: {} > {}",
                self.block_size.max_bytes, MAX_BLOCK_SIZE_BYTES
            )));
        }
        if self.evidence.max_age == 0 {
            return Err(ParamsError::Invalid("evidence.max_age must be positive".into()));
        }
        Ok(())
    }

    pub fn hash(&self) -> Hash {
        sha256(self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_leaves_absent_sections() {
        let params = ConsensusParams::default();
        let update = ConsensusParamsUpdate {
            block_size: None,
            evidence: Some(EvidenceParams { max_age: 10 }),
        };
        let next = params.update(&update);
        assert_eq!(next.block_size, params.block_size);
        assert_eq!(next.evidence.max_age, 10);
        assert_eq!(params.evidence.max_age, 100_000);
        assert_ne!(next.hash(), params.hash());
    }

    #[test]
    fn test_validate() {
        assert!(ConsensusParams::default().validate().is_ok());

        let mut params = ConsensusParams::default();
        params.block_size.max_bytes = 0;
        assert!(params.validate().is_err());

        let mut params = ConsensusParams::default();
        params.block_size.max_bytes = MAX_BLOCK_SIZE_BYTES + 1;
        assert!(params.validate().is_err());

        let mut params = ConsensusParams::default();
        params.evidence.max_age = 0;
        assert!(params.validate().is_err());
    }
}
