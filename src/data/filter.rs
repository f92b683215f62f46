use super::model::{HomeOwnership, LoanIntent, LoanRecord, Outcome};

// ---------------------------------------------------------------------------
// Filter criteria: one optional constraint per dropdown
// ---------------------------------------------------------------------------

/// A single dropdown selection: either "all" or one concrete value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

// Manual impl: the derive would demand `T: Default`.
impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: PartialEq> Selection<T> {
    fn admits(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }
}

/// Consensus dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsensusFilter {
    #[default]
    All,
    /// Unanimous records only.
    Agree,
    /// Records where at least one predictor dissents.
    Disagree,
}

impl ConsensusFilter {
    fn admits(&self, record: &LoanRecord) -> bool {
        match self {
            ConsensusFilter::All => true,
            ConsensusFilter::Agree => record.consensus() == 3,
            ConsensusFilter::Disagree => record.consensus() != 3,
        }
    }
}

/// Structured filter over the dataset. The default value admits every record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    pub loan_intent: Selection<LoanIntent>,
    pub home_ownership: Selection<HomeOwnership>,
    pub actual_outcome: Selection<Outcome>,
    pub consensus: ConsensusFilter,
}

impl FilterCriteria {
    /// A record passes when it satisfies every non-"all" criterion.
    pub fn matches(&self, record: &LoanRecord) -> bool {
        self.loan_intent.admits(&record.loan_intent)
            && self.home_ownership.admits(&record.home_ownership)
            && self.actual_outcome.admits(&record.actual_outcome)
            && self.consensus.admits(record)
    }
}

/// Return indices of records that pass `criteria`, in dataset order.
pub fn filtered_indices(records: &[LoanRecord], criteria: &FilterCriteria) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, rec)| criteria.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// Free-text search
// ---------------------------------------------------------------------------

/// Return indices of records where any field's text contains `term`,
/// ignoring case. An empty term matches everything.
pub fn search_indices(records: &[LoanRecord], term: &str) -> Vec<usize> {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return (0..records.len()).collect();
    }
    records
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            rec.field_strings()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;
    use crate::data::model::CellValue;

    fn sample() -> Vec<LoanRecord> {
        let mut a = record(1, 1, 1, 1);
        a.loan_intent = LoanIntent::Medical;
        let mut b = record(0, 0, 1, 0);
        b.home_ownership = HomeOwnership::Mortgage;
        let mut c = record(0, 0, 0, 0);
        c.loan_intent = LoanIntent::Medical;
        c.home_ownership = HomeOwnership::Own;
        c.extra.insert("loan_grade".into(), CellValue::String("X9".into()));
        vec![a, b, c]
    }

    #[test]
    fn default_criteria_keep_everything_in_order() {
        let records = sample();
        assert_eq!(
            filtered_indices(&records, &FilterCriteria::default()),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn criteria_combine_with_and() {
        let records = sample();
        let criteria = FilterCriteria {
            loan_intent: Selection::Only(LoanIntent::Medical),
            actual_outcome: Selection::Only(Outcome::NoDefault),
            ..Default::default()
        };
        assert_eq!(filtered_indices(&records, &criteria), vec![2]);
    }

    #[test]
    fn consensus_filter_splits_unanimous_from_rest() {
        let records = sample();
        let agree = FilterCriteria {
            consensus: ConsensusFilter::Agree,
            ..Default::default()
        };
        let disagree = FilterCriteria {
            consensus: ConsensusFilter::Disagree,
            ..Default::default()
        };
        assert_eq!(filtered_indices(&records, &agree), vec![0, 2]);
        assert_eq!(filtered_indices(&records, &disagree), vec![1]);
    }

    #[test]
    fn search_is_case_insensitive_across_all_fields() {
        let records = sample();
        assert_eq!(search_indices(&records, "mortgage"), vec![1]);
        assert_eq!(search_indices(&records, "MeDiC"), vec![0, 2]);
        // Extra columns are searchable too.
        assert_eq!(search_indices(&records, "x9"), vec![2]);
        assert_eq!(search_indices(&records, ""), vec![0, 1, 2]);
        assert!(search_indices(&records, "zzz").is_empty());
    }
}
