use std::collections::BTreeSet;

use crate::config::DEFAULT_PAGE_SIZE;
use crate::data::filter::{filtered_indices, search_indices, FilterCriteria};
use crate::data::model::{HomeOwnership, LoanIntent, LoanRecord, RawRow};

// ---------------------------------------------------------------------------
// Load report
// ---------------------------------------------------------------------------

/// What happened to the raw rows handed to [`RecordStore::load`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub accepted: usize,
    /// Rows dropped by the age data-quality check.
    pub missing_age: usize,
    /// Rows with an age but a missing or non-binary outcome / prediction.
    pub rejected: usize,
}

// ---------------------------------------------------------------------------
// Record store
// ---------------------------------------------------------------------------

/// Owns the dataset, the current filtered view and the pagination cursor.
pub struct RecordStore {
    /// Full dataset, fixed between loads.
    records: Vec<LoanRecord>,

    /// Indices of records in the current view, in dataset order.
    visible_indices: Vec<usize>,

    /// 1-indexed page shown in the table.
    current_page: usize,

    page_size: usize,

    /// Set when the loader failed; the dataset is then empty.
    load_error: Option<String>,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A page size of 0 is treated as 1.
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            records: Vec::new(),
            visible_indices: Vec::new(),
            current_page: 1,
            page_size: page_size.max(1),
            load_error: None,
        }
    }

    /// Replace the dataset with the convertible rows of `rows`.
    ///
    /// Rows without an age are dropped silently (data-quality filter). Of the
    /// rest, only rows whose outcome or predictions are not 0/1 are dropped,
    /// with a warning; missing features and unlisted categories are kept.
    pub fn load(&mut self, rows: &[RawRow]) -> LoadReport {
        let mut report = LoadReport::default();
        let mut records = Vec::with_capacity(rows.len());

        for (i, row) in rows.iter().enumerate() {
            if !LoanRecord::has_age(row) {
                report.missing_age += 1;
                continue;
            }
            match LoanRecord::try_from(row) {
                Ok(rec) => records.push(rec),
                Err(e) => {
                    log::warn!("skipping row {i}: {e}");
                    report.rejected += 1;
                }
            }
        }
        report.accepted = records.len();
        log::info!(
            "{} records loaded ({} without age, {} rejected)",
            report.accepted,
            report.missing_age,
            report.rejected
        );

        self.set_records(records);
        report
    }

    /// Record a loader failure: the dataset becomes empty and `error` is kept
    /// for display.
    pub fn load_failed(&mut self, error: impl std::fmt::Display) {
        log::error!("error loading data: {error}");
        self.set_records(Vec::new());
        self.load_error = Some(error.to_string());
    }

    fn set_records(&mut self, records: Vec<LoanRecord>) {
        self.visible_indices = (0..records.len()).collect();
        self.records = records;
        self.current_page = 1;
        self.load_error = None;
    }

    // -- view transformations --

    /// Show records matching every criterion. Replaces any previous filter or search.
    pub fn filter(&mut self, criteria: &FilterCriteria) {
        self.visible_indices = filtered_indices(&self.records, criteria);
        self.current_page = 1;
        log::debug!("filter {criteria:?} -> {} records", self.visible_indices.len());
    }

    /// Show records with any field containing `term` (case-insensitive).
    /// Replaces any previous filter; an empty term shows everything.
    pub fn search(&mut self, term: &str) {
        self.visible_indices = search_indices(&self.records, term);
        self.current_page = 1;
        log::debug!("search {term:?} -> {} records", self.visible_indices.len());
    }

    // -- accessors --

    /// The full dataset; metrics are always computed over this, never the view.
    pub fn records(&self) -> &[LoanRecord] {
        &self.records
    }

    pub fn dataset_len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn view_len(&self) -> usize {
        self.visible_indices.len()
    }

    /// Records of the current view, in order.
    pub fn view(&self) -> Vec<LoanRecord> {
        self.visible_indices
            .iter()
            .map(|&i| self.records[i].clone())
            .collect()
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    // -- pagination --

    /// Records on 1-indexed page `page_number` of the view. Pages outside
    /// the view, including 0, are empty.
    pub fn page(&self, page_number: usize, page_size: usize) -> Vec<LoanRecord> {
        if page_number == 0 || page_size == 0 {
            return Vec::new();
        }
        self.visible_indices
            .iter()
            .skip((page_number - 1).saturating_mul(page_size))
            .take(page_size)
            .map(|&i| self.records[i].clone())
            .collect()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn current_page_records(&self) -> Vec<LoanRecord> {
        self.page(self.current_page, self.page_size)
    }

    pub fn total_pages(&self) -> usize {
        self.view_len().div_ceil(self.page_size)
    }

    /// Advance the cursor unless already on the last page.
    pub fn next_page(&mut self) -> bool {
        if self.current_page < self.total_pages() {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Step the cursor back unless already on the first page.
    pub fn prev_page(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    /// "Showing X of Y records", or the "no data" condition.
    pub fn status_line(&self) -> String {
        match (&self.load_error, self.records.is_empty()) {
            (Some(_), _) => "Error loading data".to_string(),
            (None, true) => "No records available".to_string(),
            (None, false) => format!(
                "Showing {} of {} records",
                self.view_len(),
                self.dataset_len()
            ),
        }
    }

    // -- filter options --

    /// Sorted distinct loan intents present in the dataset.
    pub fn distinct_loan_intents(&self) -> Vec<LoanIntent> {
        let set: BTreeSet<_> = self.records.iter().map(|r| r.loan_intent.clone()).collect();
        set.into_iter().collect()
    }

    /// Sorted distinct home-ownership values present in the dataset.
    pub fn distinct_home_ownerships(&self) -> Vec<HomeOwnership> {
        let set: BTreeSet<_> = self.records.iter().map(|r| r.home_ownership.clone()).collect();
        set.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{ConsensusFilter, Selection};
    use crate::data::model::tests::record;
    use crate::data::model::{CellValue, Outcome};

    fn raw(age: CellValue, intent: &str, status: i64) -> RawRow {
        let mut row = RawRow::new();
        row.insert("person_age".into(), age);
        row.insert("person_income".into(), CellValue::Integer(40_000));
        row.insert("person_home_ownership".into(), CellValue::String("OWN".into()));
        row.insert("loan_intent".into(), CellValue::String(intent.into()));
        row.insert("loan_amnt".into(), CellValue::Integer(8_000));
        row.insert("loan_int_rate".into(), CellValue::Float(10.5));
        row.insert("loan_status".into(), CellValue::Integer(status));
        row.insert("xgb_prediction".into(), CellValue::Integer(status));
        row.insert("rf_prediction".into(), CellValue::Integer(0));
        row.insert("logreg_prediction".into(), CellValue::Integer(0));
        row
    }

    fn store_with(n: usize) -> RecordStore {
        let mut store = RecordStore::new();
        store.set_records((0..n).map(|i| record((i % 2) as u8, 0, 0, (i % 3 == 0) as u8)).collect());
        store
    }

    #[test]
    fn load_drops_rows_without_age_and_bad_rows() {
        let rows = vec![
            raw(CellValue::Integer(25), "EDUCATION", 0),
            raw(CellValue::Null, "EDUCATION", 0),
            raw(CellValue::Integer(40), "MEDICAL", 2),
            raw(CellValue::Float(33.0), "MEDICAL", 1),
        ];
        let mut store = RecordStore::new();
        let report = store.load(&rows);
        assert_eq!(
            report,
            LoadReport {
                accepted: 2,
                missing_age: 1,
                rejected: 1
            }
        );
        assert_eq!(store.dataset_len(), 2);
        assert_eq!(store.view_len(), 2);
        assert_eq!(store.status_line(), "Showing 2 of 2 records");
        assert_eq!(
            store.distinct_loan_intents(),
            vec![LoanIntent::Education, LoanIntent::Medical]
        );
    }

    #[test]
    fn rows_with_age_keep_missing_features() {
        use crate::config::BinConfig;
        use crate::data::model::Predictor;
        use crate::metrics::{
            confusion_counts, feature_distribution, grouped_default_rate, CategoryField,
            NumericFeature,
        };

        let mut partial = raw(CellValue::Integer(25), "TRAVEL", 1);
        partial.insert("loan_int_rate".into(), CellValue::Null);
        partial.remove("person_income");
        let rows = vec![partial, raw(CellValue::Integer(48), "EDUCATION", 0)];

        let mut store = RecordStore::new();
        let report = store.load(&rows);
        assert_eq!(report.accepted, 2);
        assert_eq!(report.rejected, 0);
        assert_eq!(store.dataset_len(), 2);

        let rec = &store.records()[0];
        assert_eq!(rec.interest_rate, None);
        assert_eq!(rec.income, None);
        assert_eq!(rec.loan_intent, LoanIntent::Unlisted("TRAVEL".into()));

        let counts = confusion_counts(store.records(), Predictor::A);
        assert_eq!(counts.total(), 2);
        assert_eq!(counts.tp, 1);

        let rates = grouped_default_rate(store.records(), CategoryField::LoanIntent);
        assert_eq!(rates.get("TRAVEL"), Some(&100.0));

        store.search("travel");
        assert_eq!(store.view_len(), 1);
        store.search("null");
        assert_eq!(store.view_len(), 1);

        let rate = feature_distribution(
            store.records(),
            NumericFeature::InterestRate,
            &BinConfig::default().interest_rate,
        );
        assert_eq!(rate.default.iter().sum::<usize>(), 0);
        assert_eq!(rate.no_default.iter().sum::<usize>(), 1);
    }

    #[test]
    fn load_failure_leaves_empty_dataset() {
        let mut store = store_with(3);
        store.load_failed("file not found");
        assert!(store.is_empty());
        assert_eq!(store.load_error(), Some("file not found"));
        assert_eq!(store.status_line(), "Error loading data");
        assert!(store.page(1, 50).is_empty());
    }

    #[test]
    fn all_criteria_view_equals_dataset() {
        let mut store = store_with(10);
        store.filter(&FilterCriteria::default());
        assert_eq!(store.view(), store.records().to_vec());
    }

    #[test]
    fn filter_resets_cursor_and_search_replaces_filter() {
        let mut store = store_with(120);
        assert!(store.next_page());
        assert_eq!(store.current_page(), 2);

        store.filter(&FilterCriteria {
            actual_outcome: Selection::Only(Outcome::Default),
            consensus: ConsensusFilter::Disagree,
            ..Default::default()
        });
        assert_eq!(store.current_page(), 1);
        assert!(store.view_len() < 120);
        assert!(store
            .view()
            .iter()
            .all(|r| r.actual_outcome == Outcome::Default && r.consensus() == 2));

        store.search("");
        assert_eq!(store.view_len(), 120);
        assert_eq!(store.view(), store.records().to_vec());
    }

    #[test]
    fn pagination_over_120_records() {
        let store = store_with(120);
        assert_eq!(store.page(1, 50).len(), 50);
        assert_eq!(store.page(3, 50).len(), 20);
        assert!(store.page(4, 50).is_empty());
        assert!(store.page(0, 50).is_empty());
        assert_eq!(store.page(3, 50)[0], store.records()[100]);
        assert_eq!(store.total_pages(), 3);
    }

    #[test]
    fn cursor_is_clamped() {
        let mut store = store_with(60);
        assert!(!store.prev_page());
        assert!(store.next_page());
        assert!(!store.next_page());
        assert_eq!(store.current_page(), 2);
        assert_eq!(store.current_page_records().len(), 10);
    }

    #[test]
    fn empty_store_reports_no_records() {
        let store = RecordStore::new();
        assert_eq!(store.status_line(), "No records available");
        assert_eq!(store.total_pages(), 0);
    }
}
