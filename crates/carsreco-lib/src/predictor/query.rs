//! Price-range queries and ranking
//!
//! Ranks models by P(model, price in range) and attaches a confidence
//! interval on the wait until the next matching listing.

use super::distribution::{exponential_interval, normal_mass, round_to};
use crate::config::PredictorConfig;
use crate::error::{PredictError, PredictResult};
use crate::models::{ModelStatistics, Prediction};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

/// A price-range query
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuery {
    pub lower: f64,
    pub upper: f64,
    /// Empty means every manufacturer
    pub manufacturers: HashSet<String>,
    /// Falls back to the predictor's default confidence when unset
    pub alpha: Option<f64>,
}

impl PriceQuery {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self {
            lower,
            upper,
            manufacturers: HashSet::new(),
            alpha: None,
        }
    }

    pub fn with_manufacturers<I, S>(mut self, manufacturers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.manufacturers = manufacturers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturers.insert(manufacturer.into());
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    /// Reject reversed or NaN bounds and confidence levels outside (0, 1)
    pub fn validate(&self) -> PredictResult<()> {
        if !(self.lower <= self.upper) {
            return Err(PredictError::InvalidPriceRange {
                lower: self.lower,
                upper: self.upper,
            });
        }
        if let Some(alpha) = self.alpha {
            if !(alpha > 0.0 && alpha < 1.0) {
                return Err(PredictError::InvalidConfidence(alpha));
            }
        }
        Ok(())
    }

    fn accepts(&self, manufacturer: &str) -> bool {
        self.manufacturers.is_empty() || self.manufacturers.contains(manufacturer)
    }
}

/// Per-call view of one model
struct Candidate<'a> {
    stats: &'a ModelStatistics,
    /// P(price in range | model)
    cond_prob: f64,
    /// P(model, price in range)
    joint: f64,
}

/// Descending order with NaN last
fn by_joint_descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

/// Rank models for a validated query
///
/// Conditional probabilities live only in this call, so concurrent queries
/// against one table never observe each other's values.
pub(crate) fn rank(
    table: &BTreeMap<String, ModelStatistics>,
    query: &PriceQuery,
    alpha: f64,
    config: &PredictorConfig,
) -> Vec<Prediction> {
    let total: u64 = table.values().map(|s| s.count).sum();
    if total == 0 {
        return Vec::new();
    }

    let mut candidates: Vec<Candidate<'_>> = table
        .values()
        .map(|stats| {
            let marginal = stats.count as f64 / total as f64;
            let cond_prob = normal_mass(
                query.lower,
                query.upper,
                stats.price_mean,
                stats.price_std_error(),
            );
            Candidate {
                stats,
                cond_prob,
                joint: cond_prob * marginal,
            }
        })
        .collect();

    // Stable: ties keep model-name order
    candidates.sort_by(|a, b| by_joint_descending(a.joint, b.joint));

    // The floor must be applied before the rate division below
    candidates
        .into_iter()
        .filter(|c| query.accepts(&c.stats.manufacturer))
        .take(config.top_k)
        .filter(|c| c.joint > config.min_joint_probability)
        .map(|c| {
            let rate = c.stats.posting_rate() / c.cond_prob;
            let (lower, upper) = exponential_interval(alpha, rate);
            Prediction {
                manufacturer: c.stats.manufacturer.clone(),
                model: c.stats.model.clone(),
                probability: c.joint,
                time_lower_mins: round_to(lower, config.interval_decimals),
                time_upper_mins: round_to(upper, config.interval_decimals),
            }
        })
        .collect()
}
