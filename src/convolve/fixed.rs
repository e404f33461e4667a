//! Fixed-band strategy: every band integrates over a pre-tabulated row
//! window of the sensor's SRF table.

use crate::convolve::diagnostics::Diagnostics;
use crate::convolve::integrate::ratio_of_integrals;
use crate::data::model::{Spectrum, SrfTable, WavelengthKey};
use crate::error::{ConvolutionError, Result};
use crate::sensors::bands::FixedBand;

/// One observation's reflectance multiplied into every SRF band column,
/// aligned row by row with the SRF wavelength axis.
#[derive(Debug, Clone)]
pub struct BandProducts {
    /// Whether the observation has a sample at each SRF row.
    covered: Vec<bool>,
    /// `columns[band][row]`; zero on uncovered rows.
    columns: Vec<Vec<f64>>,
}

impl BandProducts {
    pub fn new(srf: &SrfTable, spectrum: &Spectrum) -> Self {
        let input_keys: Vec<WavelengthKey> = spectrum
            .wavelengths
            .iter()
            .map(|&w| WavelengthKey::from_nm(w))
            .collect();

        let aligned: Vec<Option<f64>> = srf
            .keys()
            .iter()
            .map(|key| {
                input_keys
                    .binary_search(key)
                    .ok()
                    .map(|i| spectrum.reflectance[i])
            })
            .collect();

        let columns = (0..srf.band_count())
            .map(|band| {
                srf.column(band)
                    .iter()
                    .zip(&aligned)
                    .map(|(weight, r)| r.map_or(0.0, |r| r * weight))
                    .collect()
            })
            .collect();

        BandProducts {
            covered: aligned.iter().map(Option::is_some).collect(),
            columns,
        }
    }

    pub fn column(&self, band: usize) -> &[f64] {
        &self.columns[band]
    }

    pub fn is_covered(&self, row: usize) -> bool {
        self.covered[row]
    }
}

/// Check a band table against the SRF table it indexes into.
///
/// Called once per run, before any observation is touched.
pub fn validate_bands(sensor: &str, srf: &SrfTable, bands: &[FixedBand]) -> Result<()> {
    if srf.band_count() < bands.len() {
        return Err(ConvolutionError::malformed(
            sensor,
            format!(
                "SRF table has {} band columns, {} bands expected",
                srf.band_count(),
                bands.len()
            ),
        ));
    }
    for band in bands {
        if band.start >= band.end {
            return Err(ConvolutionError::invalid_band(
                sensor,
                band.label,
                format!("empty row window {}..{}", band.start, band.end),
            ));
        }
        if band.end > srf.len() {
            return Err(ConvolutionError::invalid_band(
                sensor,
                band.label,
                format!(
                    "row window {}..{} exceeds the {} SRF rows",
                    band.start,
                    band.end,
                    srf.len()
                ),
            ));
        }
    }
    Ok(())
}

/// Weighted mean reflectance of band `index` over its row window.
///
/// Rows without an input sample drop out of both integrals; a window with no
/// input at all yields `0.0` and a diagnostic.
pub fn convolve_band(
    srf: &SrfTable,
    products: &BandProducts,
    index: usize,
    band: &FixedBand,
    diagnostics: &mut Diagnostics,
) -> f64 {
    let wavelengths = srf.wavelengths();
    let weights = srf.column(index);
    let product = products.column(index);

    let rows: Vec<usize> = band.rows().filter(|&row| products.is_covered(row)).collect();
    if rows.is_empty() {
        diagnostics.missing_input(band.centre());
        return 0.0;
    }

    let x: Vec<f64> = rows.iter().map(|&r| wavelengths[r]).collect();
    let num: Vec<f64> = rows.iter().map(|&r| product[r]).collect();
    let den: Vec<f64> = rows.iter().map(|&r| weights[r]).collect();
    ratio_of_integrals(&x, &num, &den)
}

/// All bands of one observation, in band-table order.
pub fn convolve_observation(
    srf: &SrfTable,
    bands: &[FixedBand],
    spectrum: &Spectrum,
) -> (Vec<f64>, Diagnostics) {
    let products = BandProducts::new(srf, spectrum);
    let mut diagnostics = Diagnostics::new();
    let values = bands
        .iter()
        .enumerate()
        .map(|(index, band)| convolve_band(srf, &products, index, band, &mut diagnostics))
        .collect();
    (values, diagnostics)
}
