// Path: crates/storage/src/lib.rs
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

//! Durable persistence of chain state snapshots and execution responses.
//!
//! [`RedbStateStore`] keeps one canonical-encoded snapshot per height in a single
//! redb file, with the latest-height pointer updated in the same transaction as the
//! snapshot it points to. [`MemStateStore`] offers the same semantics in memory.

pub mod bootstrap;
pub mod mem_state_store;
pub mod metrics;
pub mod redb_state_store;

pub use bootstrap::{load_state_or_genesis, BootstrapError};
pub use mem_state_store::MemStateStore;
pub use redb_state_store::RedbStateStore;
