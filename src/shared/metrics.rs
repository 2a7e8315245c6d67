//! Prometheus Metrics Module
//!
//! Book-maintenance metrics for the depth engine.
//!
//! ## Metric types
//! - **Counter**: frames by kind, rejected frames, evictions, dropped updates
//! - **Histogram**: apply latency
//! - **Gauge**: retained depth per side
//!
//! ## Usage
//! ```rust,ignore
//! use depth_engine::shared::metrics::METRICS;
//!
//! METRICS.messages_total.with_label_values(&["snapshot"]).inc();
//!
//! let timer = METRICS.apply_duration.start_timer();
//! // ... apply the frame ...
//! timer.observe_duration();
//! ```

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_gauge_vec, register_histogram, CounterVec, Encoder, GaugeVec,
    Histogram, TextEncoder,
};

lazy_static! {
    /// Global metrics instance
    pub static ref METRICS: Metrics = Metrics::new();
}

pub struct Metrics {
    /// Frames applied, by kind (snapshot/delta/unsubscribed/ignored)
    pub messages_total: CounterVec,

    /// Rejected frames (parse), skipped levels (invariant) and disconnects (transport)
    pub errors_total: CounterVec,

    /// Levels evicted to respect the depth bound, by frame kind
    pub evictions_total: CounterVec,

    /// Updates dropped because they rank below a full side, by frame kind
    pub dropped_updates_total: CounterVec,

    /// Current retained levels, by side
    pub book_depth: GaugeVec,

    /// Time spent applying one frame (seconds)
    pub apply_duration: Histogram,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            messages_total: register_counter_vec!(
                "depth_engine_messages_total",
                "Total number of feed messages processed",
                &["kind"]
            )
            .expect("messages_total registers once"),

            errors_total: register_counter_vec!(
                "depth_engine_errors_total",
                "Total number of feed errors (rejected messages, skipped levels, disconnects)",
                &["error_type"]
            )
            .expect("errors_total registers once"),

            evictions_total: register_counter_vec!(
                "depth_engine_evictions_total",
                "Levels evicted to keep the book within its depth",
                &["source"]
            )
            .expect("evictions_total registers once"),

            dropped_updates_total: register_counter_vec!(
                "depth_engine_dropped_updates_total",
                "Level updates ignored because they rank below a full side",
                &["source"]
            )
            .expect("dropped_updates_total registers once"),

            book_depth: register_gauge_vec!(
                "depth_engine_book_depth",
                "Number of levels currently retained",
                &["side"]
            )
            .expect("book_depth registers once"),

            apply_duration: register_histogram!(
                "depth_engine_apply_duration_seconds",
                "Feed message apply duration in seconds",
                vec![0.000_001, 0.000_005, 0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.01]
            )
            .expect("apply_duration registers once"),
        }
    }

    /// Exports all registered metrics in Prometheus text format
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = prometheus::gather();
        let mut buffer = vec![];
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_exported() {
        METRICS.messages_total.with_label_values(&["delta"]).inc();

        let output = METRICS.export().unwrap();
        assert!(output.contains("depth_engine_messages_total"));
    }

    #[test]
    fn test_gauge_exported() {
        METRICS.book_depth.with_label_values(&["bid"]).set(25.0);

        // shared global registry, so only presence is checked
        let output = METRICS.export().unwrap();
        assert!(output.contains("depth_engine_book_depth"));
    }

    #[test]
    fn test_histogram_exported() {
        METRICS.apply_duration.observe(0.000_002);

        let output = METRICS.export().unwrap();
        assert!(output.contains("depth_engine_apply_duration_seconds"));
    }
}
