// Path: crates/telemetry/src/prometheus.rs
//! A concrete implementation of the metrics sinks using the Prometheus crate.

use crate::sinks::*;
use once_cell::sync::OnceCell;
use prometheus::{
    exponential_buckets, register_histogram, register_int_counter, register_int_counter_vec,
    register_int_gauge, Histogram, IntCounter, IntCounterVec, IntGauge,
};

// --- Metric Statics ---
// Collectors are registered exactly once by `install`. Until then every sink
// method is a no-op.

static STORAGE_BYTES_WRITTEN_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static STORAGE_HEIGHTS_PRUNED_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static EXECUTION_BLOCKS_APPLIED_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static EXECUTION_TXS_DELIVERED_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static EXECUTION_LAST_BLOCK_HEIGHT: OnceCell<IntGauge> = OnceCell::new();
static EXECUTION_APPLY_DURATION_SECONDS: OnceCell<Histogram> = OnceCell::new();
static EXECUTION_NOTIFICATION_FAILURES_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static ERRORS_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();

#[derive(Debug, Clone, Copy)]
pub struct PrometheusSink;

/// Runs the body against a registered collector, skipping it when `install()` has
/// not been called.
macro_rules! with_metric {
    ($metric:ident, |$m:ident| $body:expr) => {
        if let Some($m) = $metric.get() {
            $body;
        }
    };
}

impl StorageMetricsSink for PrometheusSink {
    fn inc_bytes_written_total(&self, bytes: u64) {
        with_metric!(STORAGE_BYTES_WRITTEN_TOTAL, |m| m.inc_by(bytes));
    }
    fn inc_heights_pruned(&self, count: u64) {
        with_metric!(STORAGE_HEIGHTS_PRUNED_TOTAL, |m| m.inc_by(count));
    }
}

impl ExecutionMetricsSink for PrometheusSink {
    fn inc_blocks_applied(&self) {
        with_metric!(EXECUTION_BLOCKS_APPLIED_TOTAL, |m| m.inc());
    }
    fn inc_txs_delivered(&self, valid: u64, invalid: u64) {
        with_metric!(EXECUTION_TXS_DELIVERED_TOTAL, |m| {
            m.with_label_values(&["ok"]).inc_by(valid);
            m.with_label_values(&["rejected"]).inc_by(invalid);
        });
    }
    fn set_last_block_height(&self, height: u64) {
        with_metric!(EXECUTION_LAST_BLOCK_HEIGHT, |m| m
            .set(i64::try_from(height).unwrap_or(i64::MAX)));
    }
    fn observe_apply_duration(&self, duration_secs: f64) {
        with_metric!(EXECUTION_APPLY_DURATION_SECONDS, |m| m.observe(duration_secs));
    }
    fn inc_notification_failures(&self, target: &'static str) {
        with_metric!(EXECUTION_NOTIFICATION_FAILURES_TOTAL, |m| m
            .with_label_values(&[target])
            .inc());
    }
}

impl ErrorMetricsSink for PrometheusSink {
    fn inc_error(&self, kind: &'static str, variant: &'static str) {
        with_metric!(ERRORS_TOTAL, |m| m.with_label_values(&[kind, variant]).inc());
    }
}

/// Sets a collector static, failing if `install` already ran.
fn set_once<T>(cell: &OnceCell<T>, value: T) -> Result<(), prometheus::Error> {
    cell.set(value)
        .map_err(|_| prometheus::Error::Msg("prometheus sink already installed".into()))
}

/// Registers all collectors with the default registry and returns a static reference
/// to the sink. Call once at startup, then store the result in [`SINK`].
pub fn install() -> Result<&'static dyn MetricsSink, prometheus::Error> {
    set_once(
        &STORAGE_BYTES_WRITTEN_TOTAL,
        register_int_counter!(
            "strata_storage_bytes_written_total",
            "Total encoded bytes written to the state store."
        )?,
    )?;
    set_once(
        &STORAGE_HEIGHTS_PRUNED_TOTAL,
        register_int_counter!(
            "strata_storage_heights_pruned_total",
            "Total state snapshots removed by retention pruning."
        )?,
    )?;
    set_once(
        &EXECUTION_BLOCKS_APPLIED_TOTAL,
        register_int_counter!(
            "strata_execution_blocks_applied_total",
            "Total blocks whose new state was persisted."
        )?,
    )?;
    set_once(
        &EXECUTION_TXS_DELIVERED_TOTAL,
        register_int_counter_vec!(
            "strata_execution_txs_delivered_total",
            "Total transactions delivered to the application, by outcome.",
            &["outcome"]
        )?,
    )?;
    set_once(
        &EXECUTION_LAST_BLOCK_HEIGHT,
        register_int_gauge!(
            "strata_execution_last_block_height",
            "Height of the latest applied block."
        )?,
    )?;
    set_once(
        &EXECUTION_APPLY_DURATION_SECONDS,
        register_histogram!(
            "strata_execution_apply_duration_seconds",
            "Latency of a single apply_block call.",
            exponential_buckets(0.002, 2.0, 15)?
        )?,
    )?;
    set_once(
        &EXECUTION_NOTIFICATION_FAILURES_TOTAL,
        register_int_counter_vec!(
            "strata_execution_notification_failures_total",
            "Post-commit notifications that failed, by target.",
            &["target"]
        )?,
    )?;
    set_once(
        &ERRORS_TOTAL,
        register_int_counter_vec!(
            "strata_errors_total",
            "Total number of errors, categorized by type and variant.",
            &["kind", "variant"]
        )?,
    )?;

    static SINK: PrometheusSink = PrometheusSink;
    Ok(&SINK)
}
