//! Property-based tests for ranking and interval invariants

use carsreco_lib::{Dataset, Listing, PriceQuery, PricePredictor};
use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

const MODELS: &[(&str, &str)] = &[
    ("camry", "toyota"),
    ("corolla", "toyota"),
    ("civic", "honda"),
    ("accord", "honda"),
    ("f-150", "ford"),
    ("mustang", "ford"),
    ("silverado", "chevrolet"),
    ("malibu", "chevrolet"),
    ("altima", "nissan"),
    ("rogue", "nissan"),
    ("wrangler", "jeep"),
    ("outback", "subaru"),
];

fn listing_strategy() -> impl Strategy<Value = Listing> {
    (0..MODELS.len(), 1_000.0..60_000.0f64, 0i64..60 * 24 * 90).prop_map(
        |(idx, price, minutes)| {
            let (model, manufacturer) = MODELS[idx];
            let start = Utc.with_ymd_and_hms(2021, 4, 1, 0, 0, 0).unwrap();
            Listing::new(model, manufacturer, price, start + Duration::minutes(minutes))
        },
    )
}

fn dataset_strategy() -> impl Strategy<Value = Dataset> {
    prop::collection::vec(listing_strategy(), 0..200).prop_map(Dataset::from_listings)
}

fn range_strategy() -> impl Strategy<Value = (f64, f64)> {
    (0.0..70_000.0f64, 0.0..20_000.0f64).prop_map(|(lower, width)| (lower, lower + width))
}

proptest! {
    #[test]
    fn prop_results_are_bounded_and_sorted(
        dataset in dataset_strategy(),
        (lower, upper) in range_strategy(),
        alpha in 0.05..0.99f64,
    ) {
        let predictor = PricePredictor::new(dataset);
        let results = predictor
            .get_ci(&PriceQuery::new(lower, upper).with_alpha(alpha))
            .unwrap();

        prop_assert!(results.len() <= 10);
        for p in &results {
            prop_assert!(p.probability > 1e-7 && p.probability <= 1.0);
            prop_assert!(p.time_lower_mins >= 0.0);
            prop_assert!(p.time_lower_mins <= p.time_upper_mins);
            let stats = predictor.statistics_for(&p.model).unwrap();
            prop_assert!(stats.count >= 2);
            prop_assert_eq!(&stats.manufacturer, &p.manufacturer);
        }
        for pair in results.windows(2) {
            prop_assert!(pair[0].probability >= pair[1].probability);
        }
    }

    #[test]
    fn prop_queries_are_deterministic(
        dataset in dataset_strategy(),
        (lower, upper) in range_strategy(),
    ) {
        let predictor = PricePredictor::new(dataset);
        let first = predictor.get_ci_range(lower, upper).unwrap();
        let second = predictor.get_ci_range(lower, upper).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_manufacturer_filter_only_returns_that_manufacturer(
        dataset in dataset_strategy(),
        (lower, upper) in range_strategy(),
        idx in 0..MODELS.len(),
    ) {
        let manufacturer = MODELS[idx].1;
        let predictor = PricePredictor::new(dataset);
        let query = PriceQuery::new(lower, upper).with_manufacturer(manufacturer);
        let results = predictor.get_ci(&query).unwrap();
        prop_assert!(results.iter().all(|p| p.manufacturer == manufacturer));
    }

    #[test]
    fn prop_statistics_match_rows(dataset in dataset_strategy()) {
        let predictor = PricePredictor::new(dataset.clone());
        let total: u64 = predictor.statistics().values().map(|s| s.count).sum();
        prop_assert_eq!(total as usize, dataset.len());
        for stats in predictor.statistics().values() {
            prop_assert!(stats.posting_min <= stats.posting_max);
            prop_assert_eq!(stats.price_std.is_nan(), stats.count == 1);
        }
        let names = predictor.get_manufacturer_names();
        let mut deduped = names.clone();
        deduped.sort();
        deduped.dedup();
        prop_assert_eq!(deduped.len(), names.len());
    }
}
