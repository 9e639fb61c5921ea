/// Data layer: record types, loading, normalization, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .json / .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Vec<RawAppRecord>
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize │  raw strings → AppRecord (total, lossy)
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSelection → ordered subsequence
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  top-N, category sums, histograms
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   view    │  ViewRequest → ChartSeries
///   └──────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod view;
