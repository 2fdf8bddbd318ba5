/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → TrackTable
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ TrackTable │  Vec<TrackRow>, artist/playlist/year indices
///   └────────────┘
///        │  FilterSpec
///        ▼
///   ┌──────────┐
///   │  filter  │  artist ∧ playlist ∧ year range → new TrackTable
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  empty → Dashboard::NoData, else the eight derived tables
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
