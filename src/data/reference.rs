use std::collections::HashMap;
use std::io::Read;
use std::path::PathBuf;

use log::debug;
use serde::{Deserialize, Serialize};

use super::model::SrfTable;
use crate::error::{ConvolutionError, Result};
use crate::sensors::{Sensor, SensorFamily};

/// Name of the wavelength index column in SRF tables.
pub const SRF_INDEX_COLUMN: &str = "SR_WL";

// ---------------------------------------------------------------------------
// Reference data model
// ---------------------------------------------------------------------------

/// One row of a bandpass table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandpassEntry {
    #[serde(rename = "Nominal Center Wavelength")]
    pub centre_nm: f64,
    #[serde(rename = "Width (FWHM)")]
    pub fwhm_nm: f64,
}

/// Everything needed to convolve against one sensor.
#[derive(Debug, Clone, PartialEq)]
pub enum SensorReference {
    FixedBands {
        srf: SrfTable,
        stds: Option<SrfTable>,
    },
    Bandpass {
        srf: SrfTable,
        bands: Vec<BandpassEntry>,
    },
}

/// Supplier of reference SRF data, loaded once per run.
pub trait ReferenceSource: Sync {
    fn load(&self, sensor: Sensor) -> Result<SensorReference>;
}

// ---------------------------------------------------------------------------
// Directory of CSV files
// ---------------------------------------------------------------------------

/// Reference data stored as CSV files in one directory, named as listed by
/// [`Sensor::reference_files`].
#[derive(Debug, Clone)]
pub struct ReferenceDir {
    root: PathBuf,
}

impl ReferenceDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ReferenceDir { root: root.into() }
    }

    fn existing(&self, sensor: Sensor, name: &str) -> Result<PathBuf> {
        let path = self.root.join(name);
        if !path.is_file() {
            return Err(ConvolutionError::MissingReference {
                sensor: sensor.id().to_string(),
                path,
            });
        }
        Ok(path)
    }
}

impl ReferenceSource for ReferenceDir {
    fn load(&self, sensor: Sensor) -> Result<SensorReference> {
        let (srf_name, second) = sensor.reference_files();
        let srf_path = self.existing(sensor, &srf_name)?;
        debug!("loading SRF for {sensor} from {}", srf_path.display());
        let srf = read_srf(sensor.id(), std::fs::File::open(&srf_path)?)?;

        match sensor.family() {
            SensorFamily::FixedBands { .. } => {
                let stds = match second {
                    Some(name) => {
                        let path = self.existing(sensor, &name)?;
                        debug!("loading SRF stds for {sensor} from {}", path.display());
                        Some(read_srf(sensor.id(), std::fs::File::open(&path)?)?)
                    }
                    None => None,
                };
                Ok(SensorReference::FixedBands { srf, stds })
            }
            SensorFamily::Bandpass { .. } => {
                let name = second.ok_or_else(|| {
                    ConvolutionError::malformed(sensor.id(), "no bandpass table configured")
                })?;
                let path = self.existing(sensor, &name)?;
                debug!("loading bandpass table for {sensor} from {}", path.display());
                let bands = read_bandpass(sensor.id(), std::fs::File::open(&path)?)?;
                Ok(SensorReference::Bandpass { srf, bands })
            }
        }
    }
}

/// Parse an SRF table: an `SR_WL` wavelength column plus one weight column
/// per band. Empty cells are zero response.
pub fn read_srf<R: Read>(source: &str, reader: R) -> Result<SrfTable> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();

    let index = headers
        .iter()
        .position(|h| h == SRF_INDEX_COLUMN)
        .ok_or_else(|| {
            ConvolutionError::malformed(source, format!("missing '{SRF_INDEX_COLUMN}' column"))
        })?;
    let band_names: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, h)| h.clone())
        .collect();

    let mut wavelengths = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); band_names.len()];

    for (row_no, record) in reader.records().enumerate() {
        let record = record?;
        let mut band = 0;
        for (col, cell) in record.iter().enumerate() {
            let cell = cell.trim();
            if col == index {
                wavelengths.push(parse_cell(source, row_no, SRF_INDEX_COLUMN, cell)?);
                continue;
            }
            if band >= columns.len() {
                break;
            }
            let value = if cell.is_empty() {
                0.0
            } else {
                parse_cell(source, row_no, &band_names[band], cell)?
            };
            columns[band].push(value);
            band += 1;
        }
    }

    SrfTable::from_columns(source, wavelengths, band_names, columns)
}

/// Parse a bandpass table by its `Nominal Center Wavelength` and
/// `Width (FWHM)` columns; any other columns are ignored.
pub fn read_bandpass<R: Read>(source: &str, reader: R) -> Result<Vec<BandpassEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let bands = reader
        .deserialize()
        .collect::<std::result::Result<Vec<BandpassEntry>, csv::Error>>()
        .map_err(|e| ConvolutionError::malformed(source, format!("bandpass table: {e}")))?;
    if bands.is_empty() {
        return Err(ConvolutionError::malformed(source, "bandpass table has no rows"));
    }
    Ok(bands)
}

fn parse_cell(source: &str, row: usize, column: &str, cell: &str) -> Result<f64> {
    cell.parse::<f64>().map_err(|_| {
        ConvolutionError::malformed(
            source,
            format!("row {row}, column '{column}': '{cell}' is not a number"),
        )
    })
}

// ---------------------------------------------------------------------------
// In-memory source
// ---------------------------------------------------------------------------

/// Reference data held in memory, for embedding callers and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReference {
    entries: HashMap<Sensor, SensorReference>,
}

impl InMemoryReference {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sensor: Sensor, reference: SensorReference) -> Self {
        self.entries.insert(sensor, reference);
        self
    }
}

impl ReferenceSource for InMemoryReference {
    fn load(&self, sensor: Sensor) -> Result<SensorReference> {
        self.entries
            .get(&sensor)
            .cloned()
            .ok_or_else(|| ConvolutionError::MissingReference {
                sensor: sensor.id().to_string(),
                path: PathBuf::from("<memory>"),
            })
    }
}
