/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌─────────────────┐
///   │ service/loader  │  read once → Arc<Dataset>
///   └─────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSelection predicates → FilteredResult
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ summary  │  KPIs, histogram, box summaries → DashboardView
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod service;
pub mod summary;
