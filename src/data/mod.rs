/// Data layer: record shapes and file ingestion.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Vec<record>
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────────────────────────────┐
///   │ LightCurvePoint / SpectrumPoint / Sample │  handed to crate::analysis
///   └──────────────────────────────────────────┘
/// ```

pub mod loader;
pub mod model;
