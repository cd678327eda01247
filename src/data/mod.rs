/// Data layer: sheet loading, condition column selection, and quality filtering.
///
/// ```text
///   <sheet>.xlsx ("edited")
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  calamine range → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  select  │  condition label → replicate column indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter  │  drop empty / undetected rows → ComparisonTable
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod select;

pub use model::{ComparisonTable, Dataset, Feature, FeatureRow, MEASUREMENT_OFFSET};
