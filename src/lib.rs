//! Classification metrics and record filtering for loan-default datasets.
//!
//! Each loan record carries a ground-truth outcome and the outputs of three
//! independent binary predictors. [`store::RecordStore`] holds the dataset and
//! the table view (filter, search, pagination); [`metrics`] computes
//! confusion statistics, agreement and feature distributions over the full
//! dataset; [`report::DashboardSummary`] gathers those into one value.

pub mod config;
pub mod data;
pub mod error;
pub mod metrics;
pub mod report;
pub mod store;
