/// Data layer: schema, loading, normalization, filtering, summaries, export.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .parquet / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read file → RawTable
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ normalize   │  schema check, coerce, drop rows → IncidentDataset
///   └────────────┘
///        │  (memoized per source in `cache`)
///        ▼
///   ┌──────────┐
///   │  filter   │  country / type / date predicates → IncidentDataset
///   └──────────┘
///        │
///        ▼
///   aggregate (charts)   export (CSV)
/// ```

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod schema;

pub use error::DataError;
pub use filter::{filter_dataset, DateSelection, IncidentFilter};
pub use loader::{load_file, DataSource};
pub use model::{IncidentDataset, IncidentRecord};
