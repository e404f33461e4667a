//! Convolve in-situ hyperspectral reflectance to the bands of satellite
//! multispectral sensors using each sensor's spectral response functions.

pub mod config;
pub mod convolve;
pub mod data;
pub mod error;
pub mod output;
pub mod sensors;

pub use convolve::diagnostics::Diagnostics;
pub use convolve::orchestrator::{ConvolutionPlan, Convolver};
pub use data::model::{Observation, ReflectanceTable, Spectrum, SrfTable, WavelengthKey};
pub use data::reference::{
    BandpassEntry, InMemoryReference, ReferenceDir, ReferenceSource, SensorReference,
};
pub use error::{ConvolutionError, Result};
pub use output::{ConvolutionResult, ConvolvedTable};
pub use sensors::{Sensor, SensorFamily, SrfResolution};
