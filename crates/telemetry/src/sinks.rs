// Path: crates/telemetry/src/sinks.rs
//! Defines abstract traits for metrics reporting, decoupling core logic from the backend.

use once_cell::sync::OnceCell;

// --- Static Sink Access ---

/// A no-op sink for use in tests or when telemetry is disabled.
#[derive(Debug, Clone, Copy)]
pub struct NopSink;

/// A lazily-initialized static reference to the global `MetricsSink` implementation.
pub static SINK: OnceCell<&'static dyn MetricsSink> = OnceCell::new();
static NOP_SINK: NopSink = NopSink;

/// Returns a static reference to the configured error metrics sink.
/// If no sink has been initialized, it returns a no-op sink.
pub fn error_metrics() -> &'static dyn ErrorMetricsSink {
    match SINK.get() {
        Some(sink) => sink.as_error_sink(),
        None => &NOP_SINK,
    }
}

/// Returns a static reference to the configured execution metrics sink.
/// If no sink has been initialized, it returns a no-op sink.
pub fn execution_metrics() -> &'static dyn ExecutionMetricsSink {
    match SINK.get() {
        Some(sink) => sink.as_execution_sink(),
        None => &NOP_SINK,
    }
}

/// Returns a static reference to the configured storage metrics sink.
/// If no sink has been initialized, it returns a no-op sink.
pub fn storage_metrics() -> &'static dyn StorageMetricsSink {
    match SINK.get() {
        Some(sink) => sink.as_storage_sink(),
        None => &NOP_SINK,
    }
}

// --- Trait Definitions ---

/// A sink for metrics related to the state store.
pub trait StorageMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments the total number of encoded bytes written to the backend.
    fn inc_bytes_written_total(&self, bytes: u64);
    /// Increments the total number of state snapshots removed by retention pruning.
    fn inc_heights_pruned(&self, count: u64);
}
impl StorageMetricsSink for NopSink {
    fn inc_bytes_written_total(&self, _bytes: u64) {}
    fn inc_heights_pruned(&self, _count: u64) {}
}

/// A sink for metrics related to block execution and commit.
pub trait ExecutionMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments the counter for blocks whose new state was persisted.
    fn inc_blocks_applied(&self);
    /// Adds the outcome counts of a block's delivered transactions.
    fn inc_txs_delivered(&self, valid: u64, invalid: u64);
    /// Sets the gauge for the height of the latest applied block.
    fn set_last_block_height(&self, height: u64);
    /// Observes the duration of a single `apply_block` call.
    fn observe_apply_duration(&self, duration_secs: f64);
    /// Increments a counter for failed post-commit notifications, labeled by target.
    fn inc_notification_failures(&self, target: &'static str);
}
impl ExecutionMetricsSink for NopSink {
    fn inc_blocks_applied(&self) {}
    fn inc_txs_delivered(&self, _valid: u64, _invalid: u64) {}
    fn set_last_block_height(&self, _height: u64) {}
    fn observe_apply_duration(&self, _duration_secs: f64) {}
    fn inc_notification_failures(&self, _target: &'static str) {}
}

/// A sink for recording structured error metrics.
pub trait ErrorMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments a counter for a specific error, categorized by its kind and variant.
    fn inc_error(&self, kind: &'static str, variant: &'static str);
}
impl ErrorMetricsSink for NopSink {
    fn inc_error(&self, _kind: &'static str, _variant: &'static str) {}
}

/// A unified sink that implements all domain-specific traits, providing a single
/// point of implementation for metrics backends like Prometheus.
pub trait MetricsSink: StorageMetricsSink + ExecutionMetricsSink + ErrorMetricsSink {
    fn as_storage_sink(&self) -> &dyn StorageMetricsSink;
    fn as_execution_sink(&self) -> &dyn ExecutionMetricsSink;
    fn as_error_sink(&self) -> &dyn ErrorMetricsSink;
}

// Blanket implementation to allow any type that implements all sub-traits
// to be used as a `MetricsSink`.
impl<T> MetricsSink for T
where
    T: StorageMetricsSink + ExecutionMetricsSink + ErrorMetricsSink,
{
    fn as_storage_sink(&self) -> &dyn StorageMetricsSink {
        self
    }
    fn as_execution_sink(&self) -> &dyn ExecutionMetricsSink {
        self
    }
    fn as_error_sink(&self) -> &dyn ErrorMetricsSink {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_fall_back_to_nop() {
        // No sink is installed in unit tests; every accessor must still be callable.
        execution_metrics().inc_blocks_applied();
        execution_metrics().observe_apply_duration(0.5);
        storage_metrics().inc_heights_pruned(3);
        error_metrics().inc_error("execution", "EXEC_INVALID_BLOCK");
    }
}
