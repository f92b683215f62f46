use std::collections::BTreeMap;

use serde::Serialize;

use super::{ratio, round_to_tenth};
use crate::config::BinConfig;
use crate::data::model::{LoanRecord, Outcome};

// ---------------------------------------------------------------------------
// Binned histogram
// ---------------------------------------------------------------------------

/// Count `values` into the half-open bins `[edges[i], edges[i + 1])`.
///
/// Returns `edges.len() - 1` counts. Values below the first edge or at/after
/// the last edge fall into no bin and are dropped.
pub fn histogram(values: &[f64], edges: &[f64]) -> Vec<usize> {
    if edges.len() < 2 {
        return Vec::new();
    }
    let mut counts = vec![0usize; edges.len() - 1];
    for &v in values {
        if let Some(i) = edges.windows(2).position(|w| v >= w[0] && v < w[1]) {
            counts[i] += 1;
        }
    }
    counts
}

// ---------------------------------------------------------------------------
// Feature distributions split by outcome
// ---------------------------------------------------------------------------

/// Numeric columns charted in the feature-analysis view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NumericFeature {
    LoanAmount,
    Income,
    InterestRate,
    Age,
}

impl NumericFeature {
    pub const ALL: [NumericFeature; 4] = [
        NumericFeature::LoanAmount,
        NumericFeature::Income,
        NumericFeature::InterestRate,
        NumericFeature::Age,
    ];

    /// The record's value for this feature, `None` when missing.
    pub fn value(&self, record: &LoanRecord) -> Option<f64> {
        match self {
            NumericFeature::LoanAmount => record.loan_amount,
            NumericFeature::Income => record.income,
            NumericFeature::InterestRate => record.interest_rate,
            NumericFeature::Age => record.age,
        }
    }

    pub fn edges<'a>(&self, bins: &'a BinConfig) -> &'a [f64] {
        match self {
            NumericFeature::LoanAmount => &bins.loan_amount,
            NumericFeature::Income => &bins.income,
            NumericFeature::InterestRate => &bins.interest_rate,
            NumericFeature::Age => &bins.age,
        }
    }
}

/// Histogram of one feature for defaulted and repaid loans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureDistribution {
    pub feature: NumericFeature,
    pub edges: Vec<String>,
    pub default: Vec<usize>,
    pub no_default: Vec<usize>,
}

pub fn feature_distribution(
    records: &[LoanRecord],
    feature: NumericFeature,
    edges: &[f64],
) -> FeatureDistribution {
    let values_for = |outcome: Outcome| -> Vec<f64> {
        records
            .iter()
            .filter(|r| r.actual_outcome == outcome)
            .filter_map(|r| feature.value(r))
            .collect()
    };
    FeatureDistribution {
        feature,
        edges: edges.iter().map(|e| e.to_string()).collect(),
        default: histogram(&values_for(Outcome::Default), edges),
        no_default: histogram(&values_for(Outcome::NoDefault), edges),
    }
}

// ---------------------------------------------------------------------------
// Default rate per category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CategoryField {
    LoanIntent,
    HomeOwnership,
}

impl CategoryField {
    pub fn label<'a>(&self, record: &'a LoanRecord) -> &'a str {
        match self {
            CategoryField::LoanIntent => record.loan_intent.as_str(),
            CategoryField::HomeOwnership => record.home_ownership.as_str(),
        }
    }
}

/// Percentage of defaulted loans per category value, rounded to one decimal.
/// Only categories present in `records` appear; keys are sorted. Rounding
/// goes from the exact value of the percentage, ties upward.
pub fn grouped_default_rate(records: &[LoanRecord], field: CategoryField) -> BTreeMap<String, f64> {
    let mut tallies: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for rec in records {
        let (total, defaults) = tallies.entry(field.label(rec)).or_default();
        *total += 1;
        if rec.actual_outcome.is_default() {
            *defaults += 1;
        }
    }
    tallies
        .into_iter()
        .map(|(label, (total, defaults))| {
            let pct = ratio(defaults as f64, total as f64) * 100.0;
            (label.to_string(), round_to_tenth(pct))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;
    use crate::data::model::{HomeOwnership, LoanIntent};

    #[test]
    fn half_open_bins() {
        let edges = [0.0, 10.0, 20.0, 30.0];
        assert_eq!(histogram(&[5.0, 15.0, 25.0], &edges), vec![1, 1, 1]);
        assert_eq!(histogram(&[30.0], &edges), vec![0, 0, 0]);
        assert_eq!(histogram(&[10.0, 10.0, -1.0], &edges), vec![0, 2, 0]);
        assert_eq!(histogram(&[], &edges), vec![0, 0, 0]);
        assert!(histogram(&[1.0], &[0.0]).is_empty());
    }

    #[test]
    fn distribution_splits_by_outcome() {
        let mut a = record(1, 0, 0, 0);
        a.loan_amount = Some(4_000.0);
        let mut b = record(0, 0, 0, 0);
        b.loan_amount = Some(12_000.0);
        let mut c = record(1, 0, 0, 0);
        c.loan_amount = Some(40_000.0);

        let bins = BinConfig::default();
        let feature = NumericFeature::LoanAmount;
        let dist = feature_distribution(&[a, b, c], feature, feature.edges(&bins));
        assert_eq!(dist.default, vec![1, 0, 0, 0, 0, 0, 0]);
        assert_eq!(dist.no_default, vec![0, 0, 1, 0, 0, 0, 0]);
        assert_eq!(dist.edges.first().map(String::as_str), Some("0"));
    }

    #[test]
    fn default_rate_rounds_to_one_decimal() {
        let mut records = vec![record(1, 0, 0, 0), record(0, 0, 0, 0), record(0, 0, 0, 0)];
        records[0].home_ownership = HomeOwnership::Own;
        records[1].home_ownership = HomeOwnership::Own;
        records[2].home_ownership = HomeOwnership::Own;
        let mut venture = record(1, 0, 0, 0);
        venture.loan_intent = LoanIntent::Venture;
        venture.home_ownership = HomeOwnership::Rent;
        records.push(venture);

        let by_home = grouped_default_rate(&records, CategoryField::HomeOwnership);
        assert_eq!(by_home.get("OWN"), Some(&33.3));
        assert_eq!(by_home.get("RENT"), Some(&100.0));
        assert_eq!(by_home.len(), 2);

        let by_intent = grouped_default_rate(&records, CategoryField::LoanIntent);
        assert_eq!(
            by_intent.keys().collect::<Vec<_>>(),
            vec!["PERSONAL", "VENTURE"]
        );
        assert_eq!(by_intent.get("PERSONAL"), Some(&33.3));
    }

    #[test]
    fn default_rate_rounds_like_fixed_point_formatting() {
        // 3 / 2000 * 100 is just below 0.15 in binary, so it rounds down.
        let mut records: Vec<_> = (0..2000).map(|_| record(0, 0, 0, 0)).collect();
        for rec in records.iter_mut().take(3) {
            rec.actual_outcome = Outcome::Default;
        }
        let rates = grouped_default_rate(&records, CategoryField::LoanIntent);
        assert_eq!(rates.get("PERSONAL"), Some(&0.1));

        // 1 of 8 is exactly 12.5: no rounding needed.
        let mut records: Vec<_> = (0..8).map(|_| record(0, 0, 0, 0)).collect();
        records[0].actual_outcome = Outcome::Default;
        let rates = grouped_default_rate(&records, CategoryField::LoanIntent);
        assert_eq!(rates.get("PERSONAL"), Some(&12.5));
    }

    #[test]
    fn missing_feature_values_fall_in_no_bin() {
        let mut a = record(1, 0, 0, 0);
        a.interest_rate = None;
        let b = record(1, 0, 0, 0);
        let feature = NumericFeature::InterestRate;
        let dist = feature_distribution(&[a, b], feature, feature.edges(&BinConfig::default()));
        assert_eq!(dist.default.iter().sum::<usize>(), 1);
    }
}
