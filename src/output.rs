use std::io::Write;
use std::path::{Path, PathBuf};

use log::info;

use crate::convolve::diagnostics::Diagnostics;
use crate::error::Result;

/// Row index name of fixed-band output tables.
pub const BAND_INDEX_NAME: &str = "Band_name_and_centre_wavelength";
/// Row index name of bandpass output tables.
pub const OBSERVATION_INDEX_NAME: &str = "Observation";

// ---------------------------------------------------------------------------
// ConvolvedTable – labelled rectangular result
// ---------------------------------------------------------------------------

/// Labelled table of convolved band values.
///
/// Orientation depends on the sensor family: fixed-band tables have bands as
/// rows and one `{id}_conv` column per observation, bandpass tables have
/// observations as rows and one column per band centre.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvolvedTable {
    index_name: String,
    index: Vec<String>,
    columns: Vec<String>,
    /// Row-major, `index.len() × columns.len()`.
    values: Vec<Vec<f64>>,
}

impl ConvolvedTable {
    /// Fixed-band layout from per-observation band vectors.
    pub(crate) fn bands_by_observation(
        band_labels: Vec<String>,
        observation_ids: &[String],
        per_observation: &[Vec<f64>],
    ) -> Self {
        let values = (0..band_labels.len())
            .map(|band| per_observation.iter().map(|obs| obs[band]).collect())
            .collect();
        ConvolvedTable {
            index_name: BAND_INDEX_NAME.to_string(),
            index: band_labels,
            columns: observation_ids.iter().map(|id| format!("{id}_conv")).collect(),
            values,
        }
    }

    /// Bandpass layout: one row per observation.
    pub(crate) fn observations_by_band(
        observation_ids: &[String],
        band_labels: Vec<String>,
        per_observation: Vec<Vec<f64>>,
    ) -> Self {
        ConvolvedTable {
            index_name: OBSERVATION_INDEX_NAME.to_string(),
            index: observation_ids.to_vec(),
            columns: band_labels,
            values: per_observation,
        }
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn index(&self) -> &[String] {
        &self.index
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.values
    }

    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let r = self.index.iter().position(|l| l == row)?;
        let c = self.columns.iter().position(|l| l == column)?;
        Some(self.values[r][c])
    }

    pub fn row(&self, label: &str) -> Option<&[f64]> {
        let r = self.index.iter().position(|l| l == label)?;
        Some(&self.values[r])
    }

    pub fn column(&self, label: &str) -> Option<Vec<f64>> {
        let c = self.columns.iter().position(|l| l == label)?;
        Some(self.values.iter().map(|row| row[c]).collect())
    }

    /// Delimited text: header row, then one line per index label.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut out = csv::Writer::from_writer(writer);
        let header = std::iter::once(self.index_name.as_str())
            .chain(self.columns.iter().map(String::as_str));
        out.write_record(header)?;
        for (label, row) in self.index.iter().zip(&self.values) {
            let mut record = Vec::with_capacity(row.len() + 1);
            record.push(label.clone());
            record.extend(row.iter().map(f64::to_string));
            out.write_record(&record)?;
        }
        out.flush()?;
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_csv(std::io::BufWriter::new(file))?;
        info!("wrote {}", path.display());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ConvolutionResult – what a run hands back
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ConvolutionResult {
    pub means: ConvolvedTable,
    /// Present for sensors whose SRFs carry standard deviations.
    pub stds: Option<ConvolvedTable>,
    pub diagnostics: Diagnostics,
}

/// Output file names for a sensor: `(means, stds)` for the fixed-band family,
/// a single `_conv` file for the bandpass family.
pub fn artifact_names(sensor_id: &str, fixed_bands: bool) -> (String, String) {
    if fixed_bands {
        (
            format!("{sensor_id}_convolved_bands.csv"),
            format!("{sensor_id}_convolved_bands_stds.csv"),
        )
    } else {
        (format!("{sensor_id}_conv.csv"), format!("{sensor_id}_conv_stds.csv"))
    }
}

impl ConvolutionResult {
    /// Write the table(s) into `dir`; returns the paths written.
    pub fn save(&self, dir: &Path, sensor_id: &str, fixed_bands: bool) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;
        let (means_name, stds_name) = artifact_names(sensor_id, fixed_bands);

        let mut written = Vec::new();
        let means_path = dir.join(means_name);
        self.means.save(&means_path)?;
        written.push(means_path);

        if let Some(stds) = &self.stds {
            let stds_path = dir.join(stds_name);
            stds.save(&stds_path)?;
            written.push(stds_path);
        }
        Ok(written)
    }
}
