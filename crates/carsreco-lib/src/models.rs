//! Core data models for the prediction library

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single used-car listing as handed off by the data loader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub model: String,
    pub manufacturer: String,
    pub price: f64,
    pub posting_date: DateTime<Utc>,
}

impl Listing {
    pub fn new(
        model: impl Into<String>,
        manufacturer: impl Into<String>,
        price: f64,
        posting_date: DateTime<Utc>,
    ) -> Self {
        Self {
            model: model.into(),
            manufacturer: manufacturer.into(),
            price,
            posting_date,
        }
    }
}

/// Fitted parameters for one car model
///
/// `price_std` uses the n-1 denominator and is NaN when `count == 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelStatistics {
    pub model: String,
    /// First manufacturer observed for this model
    pub manufacturer: String,
    pub count: u64,
    pub price_mean: f64,
    pub price_std: f64,
    pub posting_min: DateTime<Utc>,
    pub posting_max: DateTime<Utc>,
}

impl ModelStatistics {
    /// Standard error of the mean price
    pub fn price_std_error(&self) -> f64 {
        self.price_std / (self.count as f64).sqrt()
    }

    /// Observed posting window in whole minutes
    pub fn window_minutes(&self) -> i64 {
        (self.posting_max - self.posting_min).num_minutes()
    }

    /// Listings per minute over the observed posting window
    ///
    /// Infinite when every listing falls within the same minute.
    pub fn posting_rate(&self) -> f64 {
        self.count as f64 / self.window_minutes() as f64
    }
}

/// One ranked answer to a price-range query
///
/// A `[0, 0]` interval means every listing of the model was posted within
/// the same minute, so the posting rate cannot be resolved. It does not
/// mean a listing is imminent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub manufacturer: String,
    pub model: String,
    /// P(listing is this model and its price is in range)
    pub probability: f64,
    /// Lower bound of the time until the next matching listing, in minutes
    pub time_lower_mins: f64,
    /// Upper bound of the time until the next matching listing, in minutes
    pub time_upper_mins: f64,
}

impl Prediction {
    /// `(manufacturer, model, probability, time_lower, time_upper)`
    pub fn as_tuple(&self) -> (&str, &str, f64, f64, f64) {
        (
            &self.manufacturer,
            &self.model,
            self.probability,
            self.time_lower_mins,
            self.time_upper_mins,
        )
    }

    /// Key used by the UI to look up a thumbnail for this model
    pub fn thumbnail_key(&self) -> String {
        format!("{}_{}", self.manufacturer, self.model)
    }
}
