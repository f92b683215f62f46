use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::config::DashboardConfig;
use crate::data::model::Predictor;
use crate::metrics::{
    agreement_counts, feature_distribution, grouped_default_rate, model_metrics,
    predicted_default_counts, AgreementCounts, CategoryField, FeatureDistribution,
    MetricsSnapshot, NumericFeature,
};
use crate::store::RecordStore;

// ---------------------------------------------------------------------------
// Dashboard summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct PredictorSummary {
    pub predictor: Predictor,
    pub label: &'static str,
    pub predicted_defaults: usize,
    pub metrics: MetricsSnapshot,
}

/// Everything the overview, model-comparison and feature-analysis views
/// display, as plain values.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub total_records: usize,
    pub predictors: Vec<PredictorSummary>,
    pub agreement: AgreementCounts,
    pub features: Vec<FeatureDistribution>,
    pub default_rate_by_intent: BTreeMap<String, f64>,
    pub default_rate_by_home_ownership: BTreeMap<String, f64>,
}

impl DashboardSummary {
    /// Compute every metric over the store's full dataset.
    pub fn build(store: &RecordStore, config: &DashboardConfig) -> Self {
        let records = store.records();
        let defaults = predicted_default_counts(records);

        let predictors = model_metrics(records)
            .into_iter()
            .zip(defaults)
            .map(|((predictor, metrics), (_, predicted_defaults))| PredictorSummary {
                predictor,
                label: predictor.label(),
                predicted_defaults,
                metrics,
            })
            .collect();

        let features = NumericFeature::ALL
            .iter()
            .map(|&f| feature_distribution(records, f, f.edges(&config.bins)))
            .collect();

        DashboardSummary {
            total_records: records.len(),
            predictors,
            agreement: agreement_counts(records),
            features,
            default_rate_by_intent: grouped_default_rate(records, CategoryField::LoanIntent),
            default_rate_by_home_ownership: grouped_default_rate(
                records,
                CategoryField::HomeOwnership,
            ),
        }
    }
}

fn pct(v: f64) -> String {
    format!("{:.2}%", v * 100.0)
}

impl fmt::Display for DashboardSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total predictions: {}", self.total_records)?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<12} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>6} {:>6}",
            "Model", "Accuracy", "Prec 0", "Prec 1", "Rec 0", "Rec 1", "F1 0", "F1 1", "FP", "FN"
        )?;
        for p in &self.predictors {
            let m = &p.metrics;
            writeln!(
                f,
                "{:<12} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>6} {:>6}",
                p.label,
                pct(m.accuracy),
                pct(m.precision0),
                pct(m.precision1),
                pct(m.recall0),
                pct(m.recall1),
                pct(m.f1_0),
                pct(m.f1_1),
                m.fp,
                m.fn_
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "Agreement: all agree {}, two agree {}, all disagree {}",
            self.agreement.all_agree, self.agreement.two_agree, self.agreement.all_disagree
        )?;

        writeln!(f)?;
        writeln!(f, "Default rate by loan intent:")?;
        for (label, rate) in &self.default_rate_by_intent {
            writeln!(f, "  {label:<18} {rate:.1}%")?;
        }
        writeln!(f, "Default rate by home ownership:")?;
        for (label, rate) in &self.default_rate_by_home_ownership {
            writeln!(f, "  {label:<18} {rate:.1}%")?;
        }

        for dist in &self.features {
            writeln!(f)?;
            writeln!(f, "{:?} (default / no default):", dist.feature)?;
            for (i, (d, n)) in dist.default.iter().zip(&dist.no_default).enumerate() {
                writeln!(
                    f,
                    "  [{}, {}) {d:>7} {n:>7}",
                    dist.edges[i],
                    dist.edges[i + 1]
                )?;
            }
        }
        Ok(())
    }
}
