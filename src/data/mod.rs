/// Data layer: record model, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → Vec<RawRow>
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ LoanRecord │  typed row (age filter + conversion in the store)
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter  │  criteria / search term → record indices
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
