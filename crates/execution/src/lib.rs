// Path: crates/execution/src/lib.rs
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

//! # Strata Execution
//!
//! The block application pipeline. [`BlockExecutor::apply_block`] validates a
//! block against the current chain state, runs it on the application, derives the
//! next state, commits the application, persists the result and notifies the
//! evidence pool and event subscribers, in that order.

pub mod event_bus;
pub mod events;
pub mod executor;
pub mod gateway;
pub mod metrics;
pub mod transition;
pub mod validation;

pub use event_bus::EventBus;
pub use executor::BlockExecutor;
pub use gateway::AppGateway;
pub use transition::update_state;
pub use validation::validate_block;
