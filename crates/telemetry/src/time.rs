// Path: crates/telemetry/src/time.rs
use crate::sinks::ExecutionMetricsSink;
use std::time::Instant;

/// Reports the elapsed time of its scope as an `apply_block` duration when dropped.
pub struct Timer<'a> {
    sink: &'a dyn ExecutionMetricsSink,
    start: Instant,
}

impl<'a> Timer<'a> {
    pub fn new(sink: &'a dyn ExecutionMetricsSink) -> Self {
        Self {
            sink,
            start: Instant::now(),
        }
    }
}

impl Drop for Timer<'_> {
    fn drop(&mut self) {
        self.sink
            .observe_apply_duration(self.start.elapsed().as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct Recording(Mutex<Vec<f64>>);

    impl ExecutionMetricsSink for Recording {
        fn inc_blocks_applied(&self) {}
        fn inc_txs_delivered(&self, _valid: u64, _invalid: u64) {}
        fn set_last_block_height(&self, _height: u64) {}
        fn observe_apply_duration(&self, duration_secs: f64) {
            self.0.lock().unwrap().push(duration_secs);
        }
        fn inc_notification_failures(&self, _target: &'static str) {}
    }

    #[test]
    fn test_timer_observes_on_drop() {
        let sink = Recording::default();
        {
            let _timer = Timer::new(&sink);
        }
        let observed = sink.0.lock().unwrap();
        assert_eq!(observed.len(), 1);
        assert!(observed[0] >= 0.0);
    }
}
