//! Prediction library for used-car listings
//!
//! This crate provides the core functionality for:
//! - Per-model price and posting-frequency estimation
//! - Ranking car models likely to appear in a price range
//! - Confidence intervals on the time until the next matching listing
//! - Metrics and structured logging for the embedding application

pub mod config;
pub mod dataset;
pub mod error;
pub mod models;
pub mod observability;
pub mod predictor;

pub use crate::config::PredictorConfig;
pub use dataset::Dataset;
pub use error::{PredictError, PredictResult};
pub use models::*;
pub use observability::{PredictorMetrics, StructuredLogger};
pub use predictor::{PriceQuery, PricePredictor, RangePredictor};
