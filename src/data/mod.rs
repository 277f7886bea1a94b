/// Data layer: core types, loading, normalization and bucketing.
///
/// Architecture:
/// ```text
///  .txt / .tsv / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → SpectralTable
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  windowed percentiles → alpha per sample
///   └───────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  ColorSamples → fixed-step buckets
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
