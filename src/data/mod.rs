/// Data layer: core types, input loading and reference SRF data.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv         SR_WL CSVs + bandpass CSVs
///        │                                  │
///        ▼                                  ▼
///   ┌──────────┐                     ┌───────────┐
///   │  loader   │  → ReflectanceTable │ reference  │  → SensorReference
///   └──────────┘                     └───────────┘
///        │                                  │
///        └────────────────┬─────────────────┘
///                         ▼
///                    ┌─────────┐
///                    │  model   │  Spectrum, SrfTable, WavelengthKey
///                    └─────────┘
/// ```

pub mod loader;
pub mod model;
pub mod reference;
