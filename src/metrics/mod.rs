//! Metrics engine: classification quality, predictor agreement and
//! feature distributions.
//!
//! Every function here is a pure pass over the full dataset slice. Nothing
//! fails: ratios with a zero denominator are 0 and empty input yields zero
//! counts.

pub mod agreement;
pub mod confusion;
pub mod distribution;

pub use agreement::{agreement_counts, AgreementCounts};
pub use confusion::{
    confusion_counts, derive_metrics, model_metrics, predicted_default_counts, ConfusionCounts,
    MetricsSnapshot,
};
pub use distribution::{
    feature_distribution, grouped_default_rate, histogram, CategoryField, FeatureDistribution,
    NumericFeature,
};

/// `numerator / denominator`, or 0 when the denominator is 0.
pub(crate) fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Round to one decimal place from the exact binary value of `v`, breaking
/// exact ties toward the larger neighbour (fixed-point display semantics).
pub(crate) fn round_to_tenth(v: f64) -> f64 {
    if !v.is_finite() {
        return v;
    }
    // A tie at one decimal means v = k + 0.25 or k + 0.75, both exact
    // multiples of 1/4 with an odd quarter count.
    let quarters = v * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        return ((v * 10.0).floor() + 1.0) / 10.0;
    }
    // `{:.1}` rounds the exact decimal expansion; only exact ties differ.
    format!("{v:.1}").parse().unwrap_or(v)
}
