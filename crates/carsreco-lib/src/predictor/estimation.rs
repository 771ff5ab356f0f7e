//! Per-model parameter estimation
//!
//! One pass over the listings groups rows by model and folds count,
//! mean/variance (Welford), posting window and first manufacturer into a
//! model-keyed table.

use crate::models::{Listing, ModelStatistics};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Running aggregate for one model
#[derive(Debug, Clone)]
struct ModelAccumulator {
    manufacturer: String,
    count: u64,
    mean: f64,
    /// Sum of squared distances from the running mean
    m2: f64,
    posting_min: DateTime<Utc>,
    posting_max: DateTime<Utc>,
}

impl ModelAccumulator {
    fn new(listing: &Listing) -> Self {
        Self {
            manufacturer: listing.manufacturer.clone(),
            count: 1,
            mean: listing.price,
            m2: 0.0,
            posting_min: listing.posting_date,
            posting_max: listing.posting_date,
        }
    }

    fn update(&mut self, listing: &Listing) {
        self.count += 1;
        let delta = listing.price - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (listing.price - self.mean);
        self.posting_min = self.posting_min.min(listing.posting_date);
        self.posting_max = self.posting_max.max(listing.posting_date);
    }

    fn sample_std(&self) -> f64 {
        if self.count <= 1 {
            f64::NAN
        } else {
            (self.m2 / (self.count - 1) as f64).sqrt()
        }
    }

    fn finish(self, model: String) -> ModelStatistics {
        let price_std = self.sample_std();
        ModelStatistics {
            model,
            manufacturer: self.manufacturer,
            count: self.count,
            price_mean: self.mean,
            price_std,
            posting_min: self.posting_min,
            posting_max: self.posting_max,
        }
    }
}

/// Build the model-keyed statistics table
///
/// Keys are ordered by model name. Never fails: NaN prices propagate into
/// the mean and standard deviation of their model.
pub fn estimate_parameters(listings: &[Listing]) -> BTreeMap<String, ModelStatistics> {
    let mut groups: BTreeMap<&str, ModelAccumulator> = BTreeMap::new();
    for listing in listings {
        match groups.get_mut(listing.model.as_str()) {
            Some(acc) => acc.update(listing),
            None => {
                groups.insert(listing.model.as_str(), ModelAccumulator::new(listing));
            }
        }
    }

    groups
        .into_iter()
        .map(|(model, acc)| (model.to_string(), acc.finish(model.to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 5, day, hour, 0, 0).unwrap()
    }

    fn listing(model: &str, manufacturer: &str, price: f64, posted: DateTime<Utc>) -> Listing {
        Listing::new(model, manufacturer, price, posted)
    }

    #[test]
    fn test_empty_input() {
        assert!(estimate_parameters(&[]).is_empty());
    }

    #[test]
    fn test_mean_and_sample_std() {
        let listings = vec![
            listing("camry", "abc", 10000.0, at(4, 17)),
            listing("camry", "abc", 20000.0, at(6, 16)),
            listing("camry", "abc", 25000.0, at(4, 9)),
        ];
        let table = estimate_parameters(&listings);
        let camry = &table["camry"];
        assert_eq!(camry.count, 3);
        assert!((camry.price_mean - 18333.333_333).abs() < 1e-3);
        assert!((camry.price_std - 7637.626_158).abs() < 1e-3);
        assert_eq!(camry.posting_min, at(4, 9));
        assert_eq!(camry.posting_max, at(6, 16));
    }

    #[test]
    fn test_single_listing_std_is_nan() {
        let table = estimate_parameters(&[listing("silverado", "def", 7000.0, at(4, 9))]);
        let silverado = &table["silverado"];
        assert_eq!(silverado.count, 1);
        assert_eq!(silverado.price_mean, 7000.0);
        assert!(silverado.price_std.is_nan());
        assert_eq!(silverado.posting_min, silverado.posting_max);
    }

    #[test]
    fn test_first_manufacturer_wins() {
        let listings = vec![
            listing("gt", "ford", 1.0, at(4, 9)),
            listing("gt", "other", 2.0, at(5, 9)),
        ];
        assert_eq!(estimate_parameters(&listings)["gt"].manufacturer, "ford");
    }

    #[test]
    fn test_nan_price_propagates() {
        let listings = vec![
            listing("civic", "honda", 1000.0, at(4, 9)),
            listing("civic", "honda", f64::NAN, at(5, 9)),
        ];
        let civic = &estimate_parameters(&listings)["civic"];
        assert!(civic.price_mean.is_nan());
        assert!(civic.price_std.is_nan());
    }

    #[test]
    fn test_keys_sorted_and_counts_sum() {
        let listings = vec![
            listing("b", "x", 1.0, at(4, 9)),
            listing("a", "x", 1.0, at(4, 9)),
            listing("b", "x", 1.0, at(4, 9)),
        ];
        let table = estimate_parameters(&listings);
        let keys: Vec<&String> = table.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(table.values().map(|s| s.count).sum::<u64>(), 3);
    }
}
