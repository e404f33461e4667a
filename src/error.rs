//! Error types for the convolution engine.
//!
//! Only configuration problems are errors. Per-band data gaps and zero SRF
//! integrals resolve to a defined `0.0` and never surface here.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for convolution operations
pub type Result<T> = std::result::Result<T, ConvolutionError>;

/// Errors that abort a convolution run before any numerical work starts
#[derive(Error, Debug)]
pub enum ConvolutionError {
    /// Sensor identifier is not in the catalog
    #[error("unknown sensor '{0}' (run `srf-convolve sensors` for the supported list)")]
    UnknownSensor(String),

    /// Reference file for a known sensor does not exist
    #[error("missing reference data for {sensor}: {path}")]
    MissingReference { sensor: String, path: PathBuf },

    /// Reference table present but unusable
    #[error("malformed reference data for {sensor}: {reason}")]
    MalformedReference { sensor: String, reason: String },

    /// Band descriptor inconsistent with its SRF table
    #[error("invalid band '{band}' for {sensor}: {reason}")]
    InvalidBand {
        sensor: String,
        band: String,
        reason: String,
    },

    /// Reflectance input has an unusable shape
    #[error("invalid reflectance table: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ConvolutionError {
    pub(crate) fn malformed(sensor: impl Into<String>, reason: impl Into<String>) -> Self {
        ConvolutionError::MalformedReference {
            sensor: sensor.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_band(
        sensor: impl Into<String>,
        band: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ConvolutionError::InvalidBand {
            sensor: sensor.into(),
            band: band.into(),
            reason: reason.into(),
        }
    }
}
