// Path: crates/types/src/app/mod.rs

//! Core application-level data structures for the block-commit pipeline.

mod block;
mod events;
mod genesis;
mod params;
mod responses;
mod state;
mod validator;

pub use block::*;
pub use events::*;
pub use genesis::*;
pub use params::*;
pub use responses::*;
pub use state::*;
pub use validator::*;

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// The opaque identifier of a chain, constant for the chain's lifetime.
#[derive(Encode, Decode, Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, Default)]
#[serde(transparent)]
pub struct ChainId(pub String);

impl From<&str> for ChainId {
    fn from(s: &str) -> Self {
        ChainId(s.to_string())
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The application's state root after committing a block.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, PartialEq, Eq, Hash, Default)]
pub struct AppHash(pub Vec<u8>);

impl std::fmt::Debug for AppHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AppHash({})", hex::encode(&self.0))
    }
}

impl AsRef<[u8]> for AppHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A raw transaction as carried in a block. The core never interprets its contents.
pub type Tx = Vec<u8>;
