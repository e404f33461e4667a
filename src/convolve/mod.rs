/// Convolution engine.
///
/// Architecture:
/// ```text
///   ReflectanceTable + Sensor
///        │
///        ▼
///   ┌──────────────┐
///   │ orchestrator  │  load reference data → ConvolutionPlan
///   └──────────────┘
///        │ per observation (rayon)
///        ├──────────────────────┐
///        ▼                      ▼
///   ┌──────────┐         ┌──────────┐
///   │  fixed    │         │ bandpass  │  window (centre, FWHM) → rows
///   └──────────┘         └──────────┘
///        │                      │
///        └──────────┬───────────┘
///                   ▼
///            ┌────────────┐
///            │ integrate   │  trapezoid ratio, interpolation
///            └────────────┘
/// ```

pub mod bandpass;
pub mod diagnostics;
pub mod fixed;
pub mod integrate;
pub mod orchestrator;
pub mod window;
