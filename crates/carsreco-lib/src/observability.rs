//! Observability infrastructure for the prediction library
//!
//! Provides:
//! - Prometheus metrics (fit latency, query latency, retained table size)
//! - Structured logging with tracing

use prometheus::{
    register_histogram, register_int_counter, register_int_gauge, Histogram, IntCounter,
    IntGauge,
};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<PredictorMetricsInner> = OnceLock::new();

struct PredictorMetricsInner {
    fit_latency_seconds: Histogram,
    query_latency_seconds: Histogram,
    models_retained: IntGauge,
    listings_retained: IntGauge,
    queries: IntCounter,
    empty_results: IntCounter,
    rejected_queries: IntCounter,
}

impl PredictorMetricsInner {
    fn new() -> Self {
        Self {
            fit_latency_seconds: register_histogram!(
                "carsreco_fit_latency_seconds",
                "Time spent estimating per-model parameters",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register fit_latency_seconds"),

            query_latency_seconds: register_histogram!(
                "carsreco_query_latency_seconds",
                "Time spent answering a price-range query",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register query_latency_seconds"),

            models_retained: register_int_gauge!(
                "carsreco_models_retained",
                "Number of car models in the fitted statistics table"
            )
            .expect("Failed to register models_retained"),

            listings_retained: register_int_gauge!(
                "carsreco_listings_retained",
                "Number of listings kept after model truncation"
            )
            .expect("Failed to register listings_retained"),

            queries: register_int_counter!(
                "carsreco_queries_total",
                "Total number of price-range queries answered"
            )
            .expect("Failed to register queries_total"),

            empty_results: register_int_counter!(
                "carsreco_empty_results_total",
                "Total number of queries for which no model survived filtering"
            )
            .expect("Failed to register empty_results_total"),

            rejected_queries: register_int_counter!(
                "carsreco_rejected_queries_total",
                "Total number of queries rejected for invalid arguments"
            )
            .expect("Failed to register rejected_queries_total"),
        }
    }
}

/// Predictor metrics for Prometheus exposition
///
/// Lightweight handle to the global metrics instance; clones share the
/// same underlying metrics.
#[derive(Clone)]
pub struct PredictorMetrics {
    _private: (),
}

impl Default for PredictorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictorMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(PredictorMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &PredictorMetricsInner {
        GLOBAL_METRICS.get_or_init(PredictorMetricsInner::new)
    }

    pub fn observe_fit_latency(&self, duration_secs: f64) {
        self.inner().fit_latency_seconds.observe(duration_secs);
    }

    pub fn observe_query_latency(&self, duration_secs: f64) {
        self.inner().query_latency_seconds.observe(duration_secs);
    }

    /// Update the size of the fitted table
    pub fn set_retained(&self, models: i64, listings: i64) {
        self.inner().models_retained.set(models);
        self.inner().listings_retained.set(listings);
    }

    pub fn inc_queries(&self) {
        self.inner().queries.inc();
    }

    pub fn inc_empty_results(&self) {
        self.inner().empty_results.inc();
    }

    pub fn inc_rejected_queries(&self) {
        self.inner().rejected_queries.inc();
    }
}

/// Structured logger for predictor events
#[derive(Clone)]
pub struct StructuredLogger {
    component: String,
}

impl Default for StructuredLogger {
    fn default() -> Self {
        Self::new("price_predictor")
    }
}

impl StructuredLogger {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
        }
    }

    /// Log the outcome of parameter estimation
    pub fn log_fit(
        &self,
        listings_total: usize,
        listings_retained: usize,
        models_retained: usize,
        models_discarded: usize,
        elapsed_secs: f64,
    ) {
        info!(
            event = "parameters_estimated",
            component = %self.component,
            listings_total = listings_total,
            listings_retained = listings_retained,
            models_retained = models_retained,
            models_discarded = models_discarded,
            elapsed_secs = elapsed_secs,
            "Estimated per-model price and posting parameters"
        );
    }

    /// Log an answered query
    pub fn log_query(
        &self,
        lower: f64,
        upper: f64,
        alpha: f64,
        manufacturer_filter: usize,
        results: usize,
    ) {
        debug!(
            event = "query_answered",
            component = %self.component,
            price_lower = lower,
            price_upper = upper,
            alpha = alpha,
            manufacturer_filter = manufacturer_filter,
            results = results,
            "Answered price-range query"
        );
    }

    /// Log a query for which no model survived filtering
    pub fn log_empty_result(&self, lower: f64, upper: f64, candidates: usize) {
        info!(
            event = "query_empty",
            component = %self.component,
            price_lower = lower,
            price_upper = upper,
            candidates = candidates,
            "No model is likely to appear in the requested price range"
        );
    }

    /// Log a query rejected for invalid arguments
    pub fn log_rejected_query(&self, reason: &str) {
        warn!(
            event = "query_rejected",
            component = %self.component,
            reason = %reason,
            "Rejected price-range query"
        );
    }
}
