// Path: crates/test_utils/src/lib.rs
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

//! # Strata Test Utilities
//!
//! Scriptable collaborators and chain fixtures for testing the block executor.

pub mod assertions;
pub mod failing_store;
pub mod fixtures;
pub mod mock_app;
pub mod recording;

pub use failing_store::FailingStore;
pub use mock_app::{AppCall, MockApp};
pub use recording::{RecordingEventBus, RecordingEvidencePool};
