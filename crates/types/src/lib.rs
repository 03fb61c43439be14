// Path: crates/types/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # Strata Types
//!
//! Core data structures shared by every crate of the block-commit core:
//! chain state snapshots, validator sets, blocks, consensus parameters,
//! application execution responses, events, the canonical codec and the
//! error taxonomy.

/// Chain state, validator sets, blocks and execution responses.
pub mod app;
/// The canonical, deterministic binary codec for consensus-critical data.
pub mod codec;
/// Configuration structures loaded from TOML.
pub mod config;
/// Core error types and the `ErrorCode` trait.
pub mod error;
/// SHA-256 helpers and the binary Merkle root used for result and validator hashes.
pub mod hash;

pub use hash::Hash;
