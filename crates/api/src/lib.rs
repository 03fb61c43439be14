// Path: crates/api/src/lib.rs
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

//! # Strata API
//!
//! The seams between the block executor and its external collaborators. The
//! executor holds each collaborator as a trait object passed at construction;
//! none of them is reached through global state.

/// The consensus connection to the external application.
pub mod app;
/// Evidence pool notifications and evidence checks.
pub mod evidence;
/// Publication of block and transaction events.
pub mod events;
/// Durable persistence of chain state and execution responses.
pub mod storage;
