//! Price-range prediction engine

mod distribution;
mod estimation;
mod query;

pub use distribution::{
    erfc, exponential_interval, exponential_ppf, normal_cdf, normal_mass, round_to,
};
pub use estimation::estimate_parameters;
pub use query::PriceQuery;

use query::rank;

use crate::config::PredictorConfig;
use crate::dataset::Dataset;
use crate::error::PredictResult;
use crate::models::{ModelStatistics, Prediction};
use crate::observability::{PredictorMetrics, StructuredLogger};
use std::collections::BTreeMap;
use std::time::Instant;

/// Trait for price-range prediction implementations
pub trait RangePredictor: Send + Sync {
    /// Rank models likely to appear in the query's price range
    fn get_ci(&self, query: &PriceQuery) -> PredictResult<Vec<Prediction>>;

    /// Distinct manufacturers available for filtering
    fn get_manufacturer_names(&self) -> Vec<String>;
}

/// Fitted per-model price and posting-frequency parameters
///
/// The statistics table is built once at construction and never mutated;
/// queries keep their intermediate probabilities local, so one instance can
/// be shared across threads.
pub struct PricePredictor {
    config: PredictorConfig,
    dataset: Dataset,
    statistics: BTreeMap<String, ModelStatistics>,
    metrics: PredictorMetrics,
    logger: StructuredLogger,
}

impl PricePredictor {
    /// Fit with the default configuration
    pub fn new(dataset: Dataset) -> Self {
        Self::fit(dataset, PredictorConfig::default())
    }

    /// Fit with an explicit configuration
    pub fn with_config(dataset: Dataset, config: PredictorConfig) -> PredictResult<Self> {
        config.validate()?;
        Ok(Self::fit(dataset, config))
    }

    fn fit(dataset: Dataset, config: PredictorConfig) -> Self {
        let start = Instant::now();
        let listings_total = dataset.len();
        let models_total = dataset.model_count();

        let dataset = dataset.retain_top_models(config.max_models);
        let statistics = estimate_parameters(dataset.listings());

        let metrics = PredictorMetrics::new();
        let logger = StructuredLogger::default();
        let elapsed = start.elapsed().as_secs_f64();
        metrics.observe_fit_latency(elapsed);
        metrics.set_retained(statistics.len() as i64, dataset.len() as i64);
        logger.log_fit(
            listings_total,
            dataset.len(),
            statistics.len(),
            models_total - statistics.len(),
            elapsed,
        );

        Self {
            config,
            dataset,
            statistics,
            metrics,
            logger,
        }
    }

    /// Recompute the statistics table from the retained listings
    pub fn estimate_parameters(&self) -> BTreeMap<String, ModelStatistics> {
        estimate_parameters(self.dataset.listings())
    }

    pub fn statistics(&self) -> &BTreeMap<String, ModelStatistics> {
        &self.statistics
    }

    pub fn statistics_for(&self, model: &str) -> Option<&ModelStatistics> {
        self.statistics.get(model)
    }

    /// Listings kept after truncation
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    pub fn model_count(&self) -> usize {
        self.statistics.len()
    }

    /// Distinct manufacturers among the retained listings
    pub fn get_manufacturer_names(&self) -> Vec<String> {
        self.dataset.manufacturer_names()
    }

    /// Rank models by P(model, price in range) with a confidence interval
    /// on the minutes until the next matching listing
    ///
    /// Returns at most `top_k` predictions, most likely first. An empty
    /// vector means no model is likely in the range.
    pub fn get_ci(&self, query: &PriceQuery) -> PredictResult<Vec<Prediction>> {
        let start = Instant::now();
        if let Err(e) = query.validate() {
            self.metrics.inc_rejected_queries();
            self.logger.log_rejected_query(&e.to_string());
            return Err(e);
        }
        let alpha = query.alpha.unwrap_or(self.config.default_confidence);

        let predictions = rank(&self.statistics, query, alpha, &self.config);

        self.metrics.inc_queries();
        self.metrics
            .observe_query_latency(start.elapsed().as_secs_f64());
        if predictions.is_empty() {
            self.metrics.inc_empty_results();
            self.logger
                .log_empty_result(query.lower, query.upper, self.statistics.len());
        }
        self.logger.log_query(
            query.lower,
            query.upper,
            alpha,
            query.manufacturers.len(),
            predictions.len(),
        );
        Ok(predictions)
    }

    /// Unfiltered query at the default confidence level
    pub fn get_ci_range(&self, lower: f64, upper: f64) -> PredictResult<Vec<Prediction>> {
        self.get_ci(&PriceQuery::new(lower, upper))
    }
}

impl RangePredictor for PricePredictor {
    fn get_ci(&self, query: &PriceQuery) -> PredictResult<Vec<Prediction>> {
        PricePredictor::get_ci(self, query)
    }

    fn get_manufacturer_names(&self) -> Vec<String> {
        PricePredictor::get_manufacturer_names(self)
    }
}
