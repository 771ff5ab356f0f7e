//! Closed-form distribution helpers
//!
//! Price given a car model is Gaussian; the wait until the next matching
//! listing is exponential.

use std::f64::consts::SQRT_2;

/// Complementary error function
///
/// Chebyshev fit with fractional error below 1.2e-7 everywhere, which keeps
/// tail probabilities accurate near the negligible-probability floor.
pub fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let poly = -1.265_512_23
        + t * (1.000_023_68
            + t * (0.374_091_96
                + t * (0.096_784_18
                    + t * (-0.186_288_06
                        + t * (0.278_868_07
                            + t * (-1.135_203_98
                                + t * (1.488_515_87
                                    + t * (-0.822_152_23 + t * 0.170_872_77))))))));
    let ans = t * (-z * z + poly).exp();
    if x >= 0.0 {
        ans
    } else {
        2.0 - ans
    }
}

/// Gaussian cumulative distribution function
///
/// NaN when `scale` is NaN or not strictly positive.
pub fn normal_cdf(x: f64, mean: f64, scale: f64) -> f64 {
    if !(scale > 0.0) {
        return f64::NAN;
    }
    0.5 * erfc(-(x - mean) / (scale * SQRT_2))
}

/// Probability mass a Gaussian assigns to `[lower, upper]`
pub fn normal_mass(lower: f64, upper: f64, mean: f64, scale: f64) -> f64 {
    normal_cdf(upper, mean, scale) - normal_cdf(lower, mean, scale)
}

/// Quantile of the exponential distribution with the given rate
pub fn exponential_ppf(q: f64, rate: f64) -> f64 {
    -(-q).ln_1p() / rate
}

/// Two-sided `alpha` interval of an exponential distribution
///
/// Places `(1 - alpha) / 2` of the mass below the lower bound and above the
/// upper bound. An infinite rate collapses the interval to `[0, 0]`.
pub fn exponential_interval(alpha: f64, rate: f64) -> (f64, f64) {
    let tail = (1.0 - alpha) / 2.0;
    if rate.is_infinite() {
        return (0.0, 0.0);
    }
    (exponential_ppf(tail, rate), exponential_ppf(1.0 - tail, rate))
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_normal_reference_values() {
        assert!((normal_cdf(0.0, 0.0, 1.0) - 0.5).abs() < 1e-7);
        assert!((normal_cdf(1.0, 0.0, 1.0) - 0.841_344_746).abs() < 1e-7);
        assert!((normal_cdf(-1.96, 0.0, 1.0) - 0.024_997_895).abs() < 1e-7);
        assert!((normal_cdf(3.0, 0.0, 1.0) - 0.998_650_102).abs() < 1e-7);
    }

    #[test]
    fn test_normal_cdf_tail_relative_accuracy() {
        // Phi(-5) = 2.8665e-7
        let p = normal_cdf(-5.0, 0.0, 1.0);
        assert!(((p - 2.866_515_7e-7) / 2.866_515_7e-7).abs() < 1e-5);
    }

    #[test]
    fn test_normal_cdf_shift_and_scale() {
        let p = normal_cdf(120.0, 100.0, 10.0);
        assert!((p - normal_cdf(2.0, 0.0, 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_normal_cdf_degenerate_scale_is_nan() {
        assert!(normal_cdf(1.0, 0.0, 0.0).is_nan());
        assert!(normal_cdf(1.0, 0.0, -1.0).is_nan());
        assert!(normal_cdf(1.0, 0.0, f64::NAN).is_nan());
    }

    #[test]
    fn test_normal_mass() {
        let mass = normal_mass(-1.96, 1.96, 0.0, 1.0);
        assert!((mass - 0.950_004_2).abs() < 1e-6);
        assert!(normal_mass(0.0, 1.0, 0.0, f64::NAN).is_nan());
    }

    #[test]
    fn test_exponential_interval() {
        let (lo, hi) = exponential_interval(0.95, 1.0);
        assert!((lo - 0.025_317_807).abs() < 1e-8);
        assert!((hi - 3.688_879_454).abs() < 1e-8);

        // Halving the rate doubles the bounds
        let (lo2, hi2) = exponential_interval(0.95, 0.5);
        assert!((lo2 - 2.0 * lo).abs() < 1e-12);
        assert!((hi2 - 2.0 * hi).abs() < 1e-12);
    }

    #[test]
    fn test_exponential_interval_infinite_rate() {
        assert_eq!(exponential_interval(0.95, f64::INFINITY), (0.0, 0.0));
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(3.14159, 2), 3.14);
        assert_eq!(round_to(2.675_1, 2), 2.68);
        assert_eq!(round_to(12.0, 0), 12.0);
    }
}
