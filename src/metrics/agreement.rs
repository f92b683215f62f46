use serde::Serialize;

use crate::data::model::LoanRecord;

/// How the three predictors relate on each record. The three buckets
/// partition the dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AgreementCounts {
    pub all_agree: usize,
    pub two_agree: usize,
    pub all_disagree: usize,
}

impl AgreementCounts {
    pub fn total(&self) -> usize {
        self.all_agree + self.two_agree + self.all_disagree
    }
}

pub fn agreement_counts(records: &[LoanRecord]) -> AgreementCounts {
    let mut counts = AgreementCounts::default();
    for rec in records {
        let [a, b, c] = rec.predictions();
        if a == b && b == c {
            counts.all_agree += 1;
        } else if a == b || b == c || a == c {
            counts.two_agree += 1;
        } else {
            // Unreachable with binary labels; kept so the buckets stay total.
            counts.all_disagree += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;

    #[test]
    fn buckets_partition_records() {
        let records = vec![
            record(0, 0, 0, 0),
            record(1, 1, 1, 1),
            record(0, 1, 0, 0),
            record(0, 0, 1, 1),
            record(1, 1, 0, 1),
        ];
        let counts = agreement_counts(&records);
        assert_eq!(counts.all_agree, 2);
        assert_eq!(counts.two_agree, 3);
        assert_eq!(counts.all_disagree, 0);
        assert_eq!(counts.total(), records.len());
    }

    #[test]
    fn empty_input() {
        assert_eq!(agreement_counts(&[]), AgreementCounts::default());
    }
}
