//! Bandpass strategy: band windows derived from (centre, FWHM) metadata.
//!
//! Fine-resolution SRFs (0.1 nm) get the input interpolated onto the SRF
//! grid. Coarse SRFs (1 nm) share the input's grid, so weights are read at
//! the input wavelengths and no smoothing is introduced.

use crate::convolve::diagnostics::Diagnostics;
use crate::convolve::integrate::{interp, weighted_mean};
use crate::convolve::window::{coerce_odd_width, BandWindow};
use crate::data::model::{Spectrum, SrfTable, WavelengthKey};
use crate::data::reference::BandpassEntry;
use crate::error::{ConvolutionError, Result};
use crate::sensors::SrfResolution;

/// A bandpass entry resolved against its SRF table.
#[derive(Debug, Clone, PartialEq)]
pub struct BandpassBand {
    pub centre_nm: f64,
    /// FWHM after odd-width coercion.
    pub width_nm: f64,
    pub window: BandWindow,
    /// SRF column holding this band's response.
    pub column: usize,
}

impl BandpassBand {
    /// Output column label: the centre wavelength.
    pub fn label(&self) -> String {
        self.centre_nm.to_string()
    }
}

/// SRF column name of a band: its centre wavelength truncated to whole nm.
pub fn srf_column_name(centre_nm: f64) -> String {
    format!("{}", centre_nm.trunc() as i64)
}

/// Resolve bandpass metadata into integrable bands, in table order.
///
/// Every inconsistency is reported here so a run never fails per
/// observation.
pub fn prepare_bands(
    sensor: &str,
    srf: &SrfTable,
    entries: &[BandpassEntry],
    resolution: SrfResolution,
) -> Result<Vec<BandpassBand>> {
    let (first, last) = match (srf.keys().first(), srf.keys().last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return Err(ConvolutionError::malformed(sensor, "SRF table has no rows")),
    };

    entries
        .iter()
        .map(|entry| {
            let name = srf_column_name(entry.centre_nm);
            if !entry.centre_nm.is_finite() || !(entry.fwhm_nm.is_finite() && entry.fwhm_nm > 0.0) {
                return Err(ConvolutionError::invalid_band(
                    sensor,
                    &name,
                    format!("centre {} / FWHM {} is not usable", entry.centre_nm, entry.fwhm_nm),
                ));
            }

            let column = srf.column_index(&name).ok_or_else(|| {
                ConvolutionError::invalid_band(sensor, &name, "no matching SRF column")
            })?;

            let width_nm = coerce_odd_width(entry.fwhm_nm);
            let window = BandWindow::new(resolution, entry.centre_nm, width_nm);
            if window.start < first || window.end > last {
                return Err(ConvolutionError::invalid_band(
                    sensor,
                    &name,
                    format!(
                        "window {}..{} nm leaves the SRF domain {}..{} nm",
                        window.start, window.end, first, last
                    ),
                ));
            }

            Ok(BandpassBand {
                centre_nm: entry.centre_nm,
                width_nm,
                window,
                column,
            })
        })
        .collect()
}

/// Fine-resolution convolution of one band.
pub fn convolve_fine(
    srf: &SrfTable,
    band: &BandpassBand,
    spectrum: &Spectrum,
    diagnostics: &mut Diagnostics,
) -> f64 {
    let samples = spectrum.samples_between(band.window.start, band.window.end);
    if samples.is_empty() {
        diagnostics.missing_input(band.centre_nm);
        return 0.0;
    }

    let rows = srf.rows_between(band.window.start, band.window.end);
    let srf_wavelengths = &srf.wavelengths()[rows.clone()];
    let weights = &srf.column(band.column)[rows];
    let resampled = interp(
        srf_wavelengths,
        &spectrum.wavelengths[samples.clone()],
        &spectrum.reflectance[samples],
    );
    weighted_mean(srf_wavelengths, &resampled, weights)
}

/// Coarse-resolution convolution of one band.
///
/// Input samples off the SRF grid drop out of both integrals.
pub fn convolve_coarse(
    srf: &SrfTable,
    band: &BandpassBand,
    spectrum: &Spectrum,
    diagnostics: &mut Diagnostics,
) -> f64 {
    let samples = spectrum.samples_between(band.window.start, band.window.end);
    if samples.is_empty() {
        diagnostics.missing_input(band.centre_nm);
        return 0.0;
    }

    let column = srf.column(band.column);
    let mut x = Vec::with_capacity(samples.len());
    let mut values = Vec::with_capacity(samples.len());
    let mut weights = Vec::with_capacity(samples.len());
    for i in samples {
        let wavelength = spectrum.wavelengths[i];
        if let Some(row) = srf.row_of(WavelengthKey::from_nm(wavelength)) {
            x.push(wavelength);
            values.push(spectrum.reflectance[i]);
            weights.push(column[row]);
        }
    }
    weighted_mean(&x, &values, &weights)
}

/// All bands of one observation, in bandpass-table order.
pub fn convolve_observation(
    srf: &SrfTable,
    bands: &[BandpassBand],
    resolution: SrfResolution,
    spectrum: &Spectrum,
) -> (Vec<f64>, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let values = bands
        .iter()
        .map(|band| match resolution {
            SrfResolution::Fine => convolve_fine(srf, band, spectrum, &mut diagnostics),
            SrfResolution::Coarse => convolve_coarse(srf, band, spectrum, &mut diagnostics),
        })
        .collect();
    (values, diagnostics)
}
