//! Prometheus metrics for sigchain verification.
//!
//! All metrics follow the naming convention: `sc_<area>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., links_folded_total)
//! - **Histogram**: Distribution of values (e.g., fold_duration_seconds)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts,
    Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Links accepted and folded into chain state
    pub static ref LINKS_FOLDED: IntCounterVec = IntCounterVec::new(
        Opts::new("sc_fold_links_folded_total", "Links accepted and folded into chain state"),
        &["link_type"]
    ).expect("metric creation failed");

    /// Links skipped because their type is unsupported and flagged ignorable
    pub static ref LINKS_SKIPPED: IntCounter = IntCounter::new(
        "sc_fold_links_skipped_total",
        "Unsupported links skipped under ignore_if_unsupported"
    ).expect("metric creation failed");

    /// Chains whose fold ended in a valid state
    pub static ref CHAINS_VERIFIED: IntCounter = IntCounter::new(
        "sc_fold_chains_verified_total",
        "Chains folded to a valid state"
    ).expect("metric creation failed");

    /// Chains rejected, by error category
    pub static ref CHAINS_REJECTED: IntCounterVec = IntCounterVec::new(
        Opts::new("sc_fold_chains_rejected_total", "Chains rejected by error category"),
        &["category"]  // decode/linkage/type/signer/anchor/fold
    ).expect("metric creation failed");

    /// Whole-chain fold duration
    pub static ref FOLD_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "sc_fold_duration_seconds",
            "Time spent folding one chain batch"
        ).buckets(exponential_buckets(0.00005, 2.0, 16).expect("valid bucket layout"))
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Calling this more than once is harmless; already registered collectors
/// are left in place.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(LINKS_FOLDED.clone()),
        Box::new(LINKS_SKIPPED.clone()),
        Box::new(CHAINS_VERIFIED.clone()),
        Box::new(CHAINS_REJECTED.clone()),
        Box::new(FOLD_DURATION.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}
