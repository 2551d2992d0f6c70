/// Data layer: table model, loading, and the filter pipeline.
///
/// Architecture:
/// ```text
///  .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table (types inferred once), cached
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │  select   │   │  filter   │  column projection / value range
///   └──────────┘   └──────────┘
///                       │
///               ┌───────┴───────┐
///               ▼               ▼
///         ┌──────────┐    ┌──────────┐
///         │  export   │    │  stats    │  CSV bytes / describe()
///         └──────────┘    └──────────┘
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod select;
pub mod stats;
