use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::RecordError;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a raw input row
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as produced by the CSV / JSON / Parquet loaders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "null"),
        }
    }
}

impl CellValue {
    /// Numeric view of the cell. Numeric strings are accepted because CSV
    /// exports occasionally quote numbers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Whether the cell counts as "present" for the age data-quality check:
    /// null, empty text, zero and NaN all count as absent.
    pub fn is_present(&self) -> bool {
        match self {
            CellValue::Null => false,
            CellValue::String(s) => !s.is_empty(),
            CellValue::Integer(i) => *i != 0,
            CellValue::Float(v) => *v != 0.0 && !v.is_nan(),
            CellValue::Bool(b) => *b,
        }
    }
}

/// One parsed input row: column name → cell.
pub type RawRow = BTreeMap<String, CellValue>;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

/// A record column with the alternative header names it may appear under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
}

impl Column {
    const fn new(name: &'static str, aliases: &'static [&'static str]) -> Self {
        Column { name, aliases }
    }

    /// True if `header` names this column.
    pub fn matches(&self, header: &str) -> bool {
        self.name == header || self.aliases.contains(&header)
    }

    fn lookup<'a>(&self, row: &'a RawRow) -> Option<&'a CellValue> {
        row.get(self.name)
            .or_else(|| self.aliases.iter().find_map(|a| row.get(*a)))
    }

    /// Header under which the cell was found, if any.
    fn header_in(&self, row: &RawRow) -> Option<String> {
        std::iter::once(self.name)
            .chain(self.aliases.iter().copied())
            .find(|h| row.contains_key(*h))
            .map(str::to_string)
    }
}

/// Known columns. Aliases are the header names of the credit-risk export.
pub mod columns {
    use super::Column;

    pub const AGE: Column = Column::new("age", &["person_age"]);
    pub const INCOME: Column = Column::new("income", &["person_income"]);
    pub const HOME_OWNERSHIP: Column =
        Column::new("home_ownership", &["person_home_ownership"]);
    pub const LOAN_INTENT: Column = Column::new("loan_intent", &[]);
    pub const LOAN_AMOUNT: Column = Column::new("loan_amount", &["loan_amnt"]);
    pub const INTEREST_RATE: Column = Column::new("interest_rate", &["loan_int_rate"]);
    pub const ACTUAL_OUTCOME: Column = Column::new("actual_outcome", &["loan_status"]);
    pub const PREDICTION_A: Column = Column::new("prediction_a", &["xgb_prediction"]);
    pub const PREDICTION_B: Column = Column::new("prediction_b", &["rf_prediction"]);
    pub const PREDICTION_C: Column = Column::new("prediction_c", &["logreg_prediction"]);

    pub const ALL: [Column; 10] = [
        AGE,
        INCOME,
        HOME_OWNERSHIP,
        LOAN_INTENT,
        LOAN_AMOUNT,
        INTEREST_RATE,
        ACTUAL_OUTCOME,
        PREDICTION_A,
        PREDICTION_B,
        PREDICTION_C,
    ];

    /// True if `header` belongs to one of the typed record fields.
    pub fn is_known(header: &str) -> bool {
        ALL.iter().any(|c| c.matches(header))
    }
}

// ---------------------------------------------------------------------------
// Categorical fields
// ---------------------------------------------------------------------------

/// Declares an open categorical column: a fixed set of known labels plus an
/// `Unlisted` catch-all. Equality and ordering go by label text, so values
/// sort the way the dashboard lists them.
macro_rules! open_category {
    ($name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone)]
        pub enum $name {
            $($variant,)+
            /// A label outside the known set, kept verbatim (empty when missing).
            Unlisted(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $label,)+
                    $name::Unlisted(s) => s.as_str(),
                }
            }

            /// Case-insensitive match against the known labels; anything else
            /// is kept as `Unlisted`.
            pub fn from_label(s: &str) -> Self {
                let s = s.trim();
                $(
                    if s.eq_ignore_ascii_case($label) {
                        return $name::$variant;
                    }
                )+
                $name::Unlisted(s.to_string())
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.as_str() == other.as_str()
            }
        }

        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.as_str().cmp(other.as_str())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

open_category!(HomeOwnership {
    Rent => "RENT",
    Own => "OWN",
    Mortgage => "MORTGAGE",
    Other => "OTHER",
});

open_category!(LoanIntent {
    DebtConsolidation => "DEBTCONSOLIDATION",
    Education => "EDUCATION",
    HomeImprovement => "HOMEIMPROVEMENT",
    Medical => "MEDICAL",
    Personal => "PERSONAL",
    Venture => "VENTURE",
});

// ---------------------------------------------------------------------------
// Binary outcome and predictors
// ---------------------------------------------------------------------------

/// Binary default flag: ground truth or a model's prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub enum Outcome {
    NoDefault = 0,
    Default = 1,
}

impl Outcome {
    pub fn is_default(self) -> bool {
        self == Outcome::Default
    }

    fn from_cell(cell: &CellValue, column: Column) -> Result<Self, RecordError> {
        let code = match cell {
            CellValue::Bool(b) => Some(u8::from(*b)),
            other => other.as_f64().and_then(|v| {
                if v == 0.0 {
                    Some(0)
                } else if v == 1.0 {
                    Some(1)
                } else {
                    None
                }
            }),
        };
        match code {
            Some(0) => Ok(Outcome::NoDefault),
            Some(1) => Ok(Outcome::Default),
            _ => Err(RecordError::NotBinary {
                column: column.name,
                value: cell.to_string(),
            }),
        }
    }
}

impl From<Outcome> for u8 {
    fn from(o: Outcome) -> u8 {
        o as u8
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

/// One of the three independent classifiers whose outputs each record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Predictor {
    A,
    B,
    C,
}

impl Predictor {
    pub const ALL: [Predictor; 3] = [Predictor::A, Predictor::B, Predictor::C];

    pub fn label(&self) -> &'static str {
        match self {
            Predictor::A => "Predictor A",
            Predictor::B => "Predictor B",
            Predictor::C => "Predictor C",
        }
    }

    /// Source column holding this predictor's output.
    pub fn column(&self) -> Column {
        match self {
            Predictor::A => columns::PREDICTION_A,
            Predictor::B => columns::PREDICTION_B,
            Predictor::C => columns::PREDICTION_C,
        }
    }

    /// The prediction this predictor made for `record`.
    pub fn of(&self, record: &LoanRecord) -> Outcome {
        match self {
            Predictor::A => record.prediction_a,
            Predictor::B => record.prediction_b,
            Predictor::C => record.prediction_c,
        }
    }
}

// ---------------------------------------------------------------------------
// LoanRecord – one row of the dataset
// ---------------------------------------------------------------------------

/// A single loan application with its ground truth and three predictions.
///
/// Numeric features are `None` when the source cell is empty or not a
/// number; such records still count in every metric and are left out of
/// that feature's histogram only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanRecord {
    pub age: Option<f64>,
    pub income: Option<f64>,
    pub home_ownership: HomeOwnership,
    pub loan_intent: LoanIntent,
    pub loan_amount: Option<f64>,
    pub interest_rate: Option<f64>,
    pub actual_outcome: Outcome,
    pub prediction_a: Outcome,
    pub prediction_b: Outcome,
    pub prediction_c: Outcome,
    /// Columns of the source row that have no typed field, plus any
    /// non-numeric text found in a numeric column.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, CellValue>,
}

/// Agreement level among the three predictions: 3 when unanimous, otherwise 2.
///
/// Binary predictions can never be pairwise distinct, so every
/// non-unanimous record is reported as 2.
pub type Consensus = u8;

impl LoanRecord {
    /// True if the row carries a usable age; rows failing this are dropped at load.
    pub fn has_age(row: &RawRow) -> bool {
        columns::AGE.lookup(row).is_some_and(CellValue::is_present)
    }

    pub fn predictions(&self) -> [Outcome; 3] {
        [self.prediction_a, self.prediction_b, self.prediction_c]
    }

    pub fn consensus(&self) -> Consensus {
        let sum: u8 = self.predictions().iter().map(|p| *p as u8).sum();
        if sum == 0 || sum == 3 {
            3
        } else {
            2
        }
    }

    /// Label shown in the consensus column of the predictions table.
    pub fn consensus_label(&self) -> String {
        match self.consensus() {
            3 => "All Agree".to_string(),
            c => format!("{c}/3"),
        }
    }

    /// String form of every field, in column order followed by extra columns.
    /// Missing numbers render as `null`.
    pub fn field_strings(&self) -> Vec<String> {
        let num = |v: Option<f64>| v.map_or_else(|| "null".to_string(), |x| x.to_string());
        let mut out = vec![
            num(self.age),
            num(self.income),
            self.home_ownership.to_string(),
            self.loan_intent.to_string(),
            num(self.loan_amount),
            num(self.interest_rate),
            self.actual_outcome.to_string(),
            self.prediction_a.to_string(),
            self.prediction_b.to_string(),
            self.prediction_c.to_string(),
        ];
        out.extend(self.extra.values().map(|v| v.to_string()));
        out
    }
}

/// Numeric feature: `None` when missing or not a number. Unparseable text is
/// moved into `extra` so it stays searchable.
fn number(row: &RawRow, column: Column, extra: &mut BTreeMap<String, CellValue>) -> Option<f64> {
    let cell = column.lookup(row)?;
    let value = cell.as_f64();
    if value.is_none() && cell.is_present() {
        if let Some(header) = column.header_in(row) {
            extra.insert(header, cell.clone());
        }
    }
    value
}

fn category(row: &RawRow, column: Column) -> String {
    match column.lookup(row) {
        Some(CellValue::Null) | None => String::new(),
        Some(cell) => cell.to_string(),
    }
}

fn outcome(row: &RawRow, column: Column) -> Result<Outcome, RecordError> {
    match column.lookup(row) {
        Some(CellValue::Null) | None => Err(RecordError::MissingColumn {
            column: column.name,
        }),
        Some(cell) => Outcome::from_cell(cell, column),
    }
}

impl TryFrom<&RawRow> for LoanRecord {
    type Error = RecordError;

    /// Only a missing or non-binary outcome / prediction fails conversion.
    fn try_from(row: &RawRow) -> Result<Self, Self::Error> {
        let mut extra: BTreeMap<String, CellValue> = row
            .iter()
            .filter(|(k, _)| !columns::is_known(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Ok(LoanRecord {
            actual_outcome: outcome(row, columns::ACTUAL_OUTCOME)?,
            prediction_a: outcome(row, Predictor::A.column())?,
            prediction_b: outcome(row, Predictor::B.column())?,
            prediction_c: outcome(row, Predictor::C.column())?,
            age: number(row, columns::AGE, &mut extra),
            income: number(row, columns::INCOME, &mut extra),
            home_ownership: HomeOwnership::from_label(&category(row, columns::HOME_OWNERSHIP)),
            loan_intent: LoanIntent::from_label(&category(row, columns::LOAN_INTENT)),
            loan_amount: number(row, columns::LOAN_AMOUNT, &mut extra),
            interest_rate: number(row, columns::INTEREST_RATE, &mut extra),
            extra,
        })
    }
}
