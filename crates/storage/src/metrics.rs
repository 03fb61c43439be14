// Path: crates/storage/src/metrics.rs
use once_cell::sync::OnceCell;
use strata_telemetry::sinks::StorageMetricsSink;

/// A storage-only sink override. When unset, the global telemetry sink is used.
pub static SINK: OnceCell<&'static dyn StorageMetricsSink> = OnceCell::new();

pub fn metrics() -> &'static dyn StorageMetricsSink {
    SINK.get()
        .copied()
        .unwrap_or_else(strata_telemetry::storage_metrics)
}
