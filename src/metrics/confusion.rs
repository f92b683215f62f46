use serde::Serialize;

use super::ratio;
use crate::data::model::{LoanRecord, Outcome, Predictor};

// ---------------------------------------------------------------------------
// Confusion counts
// ---------------------------------------------------------------------------

/// Tally of one predictor against ground truth, with "default" as positive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionCounts {
    pub tp: usize,
    pub tn: usize,
    pub fp: usize,
    #[serde(rename = "fn")]
    pub fn_: usize,
}

impl ConfusionCounts {
    pub fn total(&self) -> usize {
        self.tp + self.tn + self.fp + self.fn_
    }
}

/// Single pass over `records` comparing `actual_outcome` with `predictor`.
pub fn confusion_counts(records: &[LoanRecord], predictor: Predictor) -> ConfusionCounts {
    records
        .iter()
        .fold(ConfusionCounts::default(), |mut c, rec| {
            match (rec.actual_outcome, predictor.of(rec)) {
                (Outcome::Default, Outcome::Default) => c.tp += 1,
                (Outcome::NoDefault, Outcome::NoDefault) => c.tn += 1,
                (Outcome::NoDefault, Outcome::Default) => c.fp += 1,
                (Outcome::Default, Outcome::NoDefault) => c.fn_ += 1,
            }
            c
        })
}

// ---------------------------------------------------------------------------
// Derived statistics
// ---------------------------------------------------------------------------

/// Accuracy and per-class precision / recall / F1 for one predictor.
/// Class 0 is "no default", class 1 is "default"; `f1` is the macro average.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub tp: usize,
    pub tn: usize,
    pub fp: usize,
    #[serde(rename = "fn")]
    pub fn_: usize,
    pub accuracy: f64,
    pub precision0: f64,
    pub precision1: f64,
    pub recall0: f64,
    pub recall1: f64,
    pub f1_0: f64,
    pub f1_1: f64,
    pub f1: f64,
}

fn f1_score(precision: f64, recall: f64) -> f64 {
    ratio(2.0 * precision * recall, precision + recall)
}

pub fn derive_metrics(counts: ConfusionCounts) -> MetricsSnapshot {
    let ConfusionCounts { tp, tn, fp, fn_ } = counts;
    let (tpf, tnf, fpf, fnf) = (tp as f64, tn as f64, fp as f64, fn_ as f64);

    let precision0 = ratio(tnf, tnf + fnf);
    let precision1 = ratio(tpf, tpf + fpf);
    let recall0 = ratio(tnf, tnf + fpf);
    let recall1 = ratio(tpf, tpf + fnf);
    let f1_0 = f1_score(precision0, recall0);
    let f1_1 = f1_score(precision1, recall1);

    MetricsSnapshot {
        tp,
        tn,
        fp,
        fn_,
        accuracy: ratio(tpf + tnf, counts.total() as f64),
        precision0,
        precision1,
        recall0,
        recall1,
        f1_0,
        f1_1,
        f1: (f1_0 + f1_1) / 2.0,
    }
}

/// Snapshot for every predictor, in predictor order.
pub fn model_metrics(records: &[LoanRecord]) -> Vec<(Predictor, MetricsSnapshot)> {
    Predictor::ALL
        .iter()
        .map(|&p| (p, derive_metrics(confusion_counts(records, p))))
        .collect()
}

/// How many records each predictor labels as a default.
pub fn predicted_default_counts(records: &[LoanRecord]) -> Vec<(Predictor, usize)> {
    Predictor::ALL
        .iter()
        .map(|&p| {
            let n = records.iter().filter(|r| p.of(r).is_default()).count();
            (p, n)
        })
        .collect()
}
