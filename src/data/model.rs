use std::collections::BTreeSet;
use std::fmt;
use std::ops::Range;

use crate::error::{ConvolutionError, Result};

// ---------------------------------------------------------------------------
// WavelengthKey – exact integer key for a wavelength
// ---------------------------------------------------------------------------

/// Wavelength expressed in integer thousandths of a nanometre.
///
/// Input spectra and SRF tables come from different instruments and are
/// written with different float precisions; all alignment and window
/// membership tests go through this key so `400.1` always matches `400.1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WavelengthKey(i64);

impl WavelengthKey {
    pub const PER_NM: i64 = 1000;

    pub fn from_nm(nm: f64) -> Self {
        WavelengthKey((nm * Self::PER_NM as f64).round() as i64)
    }

    pub fn from_raw(raw: i64) -> Self {
        WavelengthKey(raw)
    }

    pub fn raw(self) -> i64 {
        self.0
    }

    pub fn offset(self, delta: i64) -> Self {
        WavelengthKey(self.0 + delta)
    }

    pub fn as_nm(self) -> f64 {
        self.0 as f64 / Self::PER_NM as f64
    }
}

impl fmt::Display for WavelengthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_nm())
    }
}

// ---------------------------------------------------------------------------
// Spectrum – one observation's usable samples
// ---------------------------------------------------------------------------

/// Reflectance samples of a single observation, wavelengths strictly
/// increasing and every value finite.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    pub wavelengths: Vec<f64>,
    pub reflectance: Vec<f64>,
}

impl Spectrum {
    pub fn len(&self) -> usize {
        self.wavelengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelengths.is_empty()
    }

    /// Indices of samples whose wavelength lies in `[start, end]`.
    pub fn samples_between(&self, start: WavelengthKey, end: WavelengthKey) -> Range<usize> {
        let lo = self
            .wavelengths
            .partition_point(|&w| WavelengthKey::from_nm(w) < start);
        let hi = self
            .wavelengths
            .partition_point(|&w| WavelengthKey::from_nm(w) <= end);
        lo..hi.max(lo)
    }
}

// ---------------------------------------------------------------------------
// ReflectanceTable – the caller's input
// ---------------------------------------------------------------------------

/// One column of the input table. `NaN` marks a missing sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub id: String,
    pub reflectance: Vec<f64>,
}

/// Reflectance spectra sharing one wavelength index, one column per
/// observation.
#[derive(Debug, Clone, PartialEq)]
pub struct ReflectanceTable {
    wavelengths: Vec<f64>,
    observations: Vec<Observation>,
}

impl ReflectanceTable {
    /// Build a table, checking the wavelength index and column shapes.
    pub fn new(wavelengths: Vec<f64>, observations: Vec<Observation>) -> Result<Self> {
        check_increasing(&wavelengths).map_err(ConvolutionError::InvalidInput)?;

        let mut seen = BTreeSet::new();
        for obs in &observations {
            if obs.reflectance.len() != wavelengths.len() {
                return Err(ConvolutionError::InvalidInput(format!(
                    "observation '{}' has {} values but the wavelength index has {}",
                    obs.id,
                    obs.reflectance.len(),
                    wavelengths.len()
                )));
            }
            if !seen.insert(obs.id.as_str()) {
                return Err(ConvolutionError::InvalidInput(format!(
                    "duplicate observation id '{}'",
                    obs.id
                )));
            }
        }

        Ok(ReflectanceTable {
            wavelengths,
            observations,
        })
    }

    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Usable samples of one observation; missing and non-finite values are
    /// dropped.
    pub fn spectrum(&self, index: usize) -> Spectrum {
        let mut wavelengths = Vec::with_capacity(self.wavelengths.len());
        let mut reflectance = Vec::with_capacity(self.wavelengths.len());
        for (&w, &r) in self
            .wavelengths
            .iter()
            .zip(&self.observations[index].reflectance)
        {
            if r.is_finite() {
                wavelengths.push(w);
                reflectance.push(r);
            }
        }
        Spectrum {
            wavelengths,
            reflectance,
        }
    }
}

// ---------------------------------------------------------------------------
// SrfTable – per-band response weights on a shared wavelength axis
// ---------------------------------------------------------------------------

/// Spectral response table: one weight column per band, rows keyed by
/// wavelength. Also used for the parallel standard-deviation table.
#[derive(Debug, Clone, PartialEq)]
pub struct SrfTable {
    wavelengths: Vec<f64>,
    keys: Vec<WavelengthKey>,
    band_names: Vec<String>,
    /// Column-major: `columns[band][row]`.
    columns: Vec<Vec<f64>>,
}

impl SrfTable {
    /// Build a table from its columns. `source` names the sensor or file in
    /// error messages.
    pub fn from_columns(
        source: &str,
        wavelengths: Vec<f64>,
        band_names: Vec<String>,
        columns: Vec<Vec<f64>>,
    ) -> Result<Self> {
        check_increasing(&wavelengths)
            .map_err(|reason| ConvolutionError::malformed(source, reason))?;

        if band_names.len() != columns.len() {
            return Err(ConvolutionError::malformed(
                source,
                format!(
                    "{} band names for {} weight columns",
                    band_names.len(),
                    columns.len()
                ),
            ));
        }

        for (name, column) in band_names.iter().zip(&columns) {
            if column.len() != wavelengths.len() {
                return Err(ConvolutionError::malformed(
                    source,
                    format!(
                        "column '{name}' has {} rows, expected {}",
                        column.len(),
                        wavelengths.len()
                    ),
                ));
            }
            if let Some(bad) = column.iter().find(|w| !w.is_finite() || **w < 0.0) {
                return Err(ConvolutionError::malformed(
                    source,
                    format!("column '{name}' holds invalid weight {bad}"),
                ));
            }
        }

        let keys = wavelengths.iter().map(|&w| WavelengthKey::from_nm(w)).collect();
        Ok(SrfTable {
            wavelengths,
            keys,
            band_names,
            columns,
        })
    }

    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }

    pub fn keys(&self) -> &[WavelengthKey] {
        &self.keys
    }

    pub fn band_names(&self) -> &[String] {
        &self.band_names
    }

    /// Number of wavelength rows.
    pub fn len(&self) -> usize {
        self.wavelengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelengths.is_empty()
    }

    pub fn band_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, band: usize) -> &[f64] {
        &self.columns[band]
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.band_names.iter().position(|n| n == name)
    }

    /// Row holding exactly this wavelength, if any.
    pub fn row_of(&self, key: WavelengthKey) -> Option<usize> {
        self.keys.binary_search(&key).ok()
    }

    /// Rows whose wavelength lies in `[start, end]`.
    pub fn rows_between(&self, start: WavelengthKey, end: WavelengthKey) -> Range<usize> {
        let lo = self.keys.partition_point(|&k| k < start);
        let hi = self.keys.partition_point(|&k| k <= end);
        lo..hi.max(lo)
    }

    /// Same wavelength axis and band columns as `other`.
    pub fn same_shape(&self, other: &SrfTable) -> bool {
        self.keys == other.keys && self.band_names.len() == other.band_names.len()
    }
}

fn check_increasing(wavelengths: &[f64]) -> std::result::Result<(), String> {
    if let Some(bad) = wavelengths.iter().find(|w| !w.is_finite()) {
        return Err(format!("non-finite wavelength {bad}"));
    }
    for pair in wavelengths.windows(2) {
        if WavelengthKey::from_nm(pair[1]) <= WavelengthKey::from_nm(pair[0]) {
            return Err(format!(
                "wavelengths must be strictly increasing ({} followed by {})",
                pair[0], pair[1]
            ));
        }
    }
    Ok(())
}
