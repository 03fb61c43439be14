// Path: crates/execution/src/metrics.rs
use once_cell::sync::OnceCell;
use strata_telemetry::sinks::ExecutionMetricsSink;

/// An execution-only sink override. When unset, the global telemetry sink is used.
pub static SINK: OnceCell<&'static dyn ExecutionMetricsSink> = OnceCell::new();

pub fn metrics() -> &'static dyn ExecutionMetricsSink {
    SINK.get()
        .copied()
        .unwrap_or_else(strata_telemetry::execution_metrics)
}
