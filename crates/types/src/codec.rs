// Path: crates/types/src/codec.rs

//! Defines the canonical, deterministic binary codec for all consensus-critical state.
//!
//! Chain state snapshots and execution responses are persisted in this encoding, and
//! the byte-identity of derived chain state across nodes is checked against it. Every
//! component goes through these two functions so that the same value can never end up
//! with two different binary representations.

use parity_scale_codec::{Decode, DecodeAll, Encode};

/// Encodes a value into its canonical SCALE byte representation.
pub fn to_bytes_canonical<T: Encode>(v: &T) -> Result<Vec<u8>, String> {
    Ok(v.encode())
}

/// Decodes a value from its canonical SCALE byte representation.
///
/// Trailing bytes are rejected, so a value decodes only from exactly the bytes
/// `to_bytes_canonical` would have produced for it.
pub fn from_bytes_canonical<T: Decode>(b: &[u8]) -> Result<T, String> {
    T::decode_all(&mut &*b).map_err(|e| format!("canonical decode failed: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{Address, AppHash, ChainId};

    #[derive(Encode, Decode, Debug, PartialEq, Eq)]
    struct Snapshot {
        chain_id: ChainId,
        height: u64,
        app_hash: Option<AppHash>,
        proposer: Address,
    }

    #[test]
    fn test_canonical_decode_rejects_trailing_bytes() {
        let snapshot = Snapshot {
            chain_id: ChainId::from("strata-test"),
            height: 7,
            app_hash: Some(AppHash(vec![0xAB; 4])),
            proposer: Address([3u8; 20]),
        };

        let mut encoded = to_bytes_canonical(&snapshot).unwrap();
        assert_eq!(
            from_bytes_canonical::<Snapshot>(&encoded).unwrap(),
            snapshot
        );

        encoded.push(0);
        let err = from_bytes_canonical::<Snapshot>(&encoded).unwrap_err();
        assert!(err.contains("canonical decode failed"));
    }

    #[test]
    fn test_canonical_decode_failure_on_truncation() {
        let snapshot = Snapshot {
            chain_id: ChainId::from("strata-test"),
            height: 99,
            app_hash: None,
            proposer: Address::default(),
        };

        let mut encoded = to_bytes_canonical(&snapshot).unwrap();
        encoded.pop();
        encoded.pop();

        assert!(from_bytes_canonical::<Snapshot>(&encoded).is_err());
    }
}
