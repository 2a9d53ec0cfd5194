/// Data layer: cell model, loading, filtering and per-date counting.
///
/// Architecture:
/// ```text
///  .xlsx / .xls
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  first sheet → Grid of CellValue
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐      ┌──────────┐
///   │  filter   │ ───▶ │  words    │  discover distinct values that pass the filters
///   └──────────┘      └──────────┘
///        │                 │
///        ▼                 ▼
///   ┌──────────────────────────┐
///   │  reducer                  │  header dates → DateColumnCount per column
///   └──────────────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  counts → CSV
///   └──────────┘
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod reducer;
pub mod words;
