//! Run-level orchestration: sensor validation, reference loading, strategy
//! dispatch and result assembly.

use std::path::Path;

use log::{debug, info};
use rayon::prelude::*;

use crate::convolve::bandpass::{self, BandpassBand};
use crate::convolve::diagnostics::Diagnostics;
use crate::convolve::fixed;
use crate::data::model::{ReflectanceTable, SrfTable};
use crate::data::reference::{ReferenceSource, SensorReference};
use crate::error::{ConvolutionError, Result};
use crate::output::{ConvolutionResult, ConvolvedTable};
use crate::sensors::bands::FixedBand;
use crate::sensors::{Sensor, SensorFamily, SrfResolution};

// ---------------------------------------------------------------------------
// ConvolutionPlan – validated, strategy-resolved reference data
// ---------------------------------------------------------------------------

/// Reference data checked against the sensor's band descriptors, with the
/// integration strategy fixed. Read-only for the whole run.
#[derive(Debug, Clone)]
pub enum ConvolutionPlan {
    FixedBands {
        sensor: Sensor,
        bands: &'static [FixedBand],
        srf: SrfTable,
        stds: Option<SrfTable>,
    },
    Bandpass {
        sensor: Sensor,
        resolution: SrfResolution,
        srf: SrfTable,
        bands: Vec<BandpassBand>,
    },
}

impl ConvolutionPlan {
    /// Validate `reference` for `sensor`. Every configuration problem
    /// surfaces here, before any spectrum is touched.
    pub fn prepare(sensor: Sensor, reference: SensorReference) -> Result<Self> {
        let id = sensor.id();
        match (sensor.family(), reference) {
            (
                SensorFamily::FixedBands { bands, with_stds },
                SensorReference::FixedBands { srf, stds },
            ) => {
                fixed::validate_bands(id, &srf, bands)?;
                match (&stds, with_stds) {
                    (Some(stds), true) => {
                        if !stds.same_shape(&srf) {
                            return Err(ConvolutionError::malformed(
                                id,
                                "SRF stds table does not match the means table",
                            ));
                        }
                    }
                    (None, true) => {
                        return Err(ConvolutionError::malformed(id, "SRF stds table is missing"));
                    }
                    (Some(_), false) => {
                        return Err(ConvolutionError::malformed(
                            id,
                            "sensor has no SRF stds but one was supplied",
                        ));
                    }
                    (None, false) => {}
                }
                Ok(ConvolutionPlan::FixedBands {
                    sensor,
                    bands,
                    srf,
                    stds,
                })
            }
            (SensorFamily::Bandpass { resolution }, SensorReference::Bandpass { srf, bands }) => {
                let bands = bandpass::prepare_bands(id, &srf, &bands, resolution)?;
                for band in &bands {
                    debug!(
                        "{id} band {}: width {} nm, window {}..{} nm ({} SRF rows)",
                        band.label(),
                        band.width_nm,
                        band.window.start,
                        band.window.end,
                        band.window.sample_count(resolution.step_key())
                    );
                }
                Ok(ConvolutionPlan::Bandpass {
                    sensor,
                    resolution,
                    srf,
                    bands,
                })
            }
            _ => Err(ConvolutionError::malformed(
                id,
                "reference data does not match the sensor's band family",
            )),
        }
    }

    pub fn is_fixed_bands(&self) -> bool {
        matches!(self, ConvolutionPlan::FixedBands { .. })
    }

    /// Canonical ordered band labels of the output.
    pub fn band_labels(&self) -> Vec<String> {
        match self {
            ConvolutionPlan::FixedBands { bands, .. } => {
                bands.iter().map(|b| b.label.to_string()).collect()
            }
            ConvolutionPlan::Bandpass { bands, .. } => {
                bands.iter().map(BandpassBand::label).collect()
            }
        }
    }

    /// Convolve every observation. Observations run in parallel; output
    /// ordering follows the input and the band table.
    pub fn run(&self, table: &ReflectanceTable) -> ConvolutionResult {
        let ids: Vec<String> = table.observations().iter().map(|o| o.id.clone()).collect();

        match self {
            ConvolutionPlan::FixedBands {
                bands, srf, stds, ..
            } => {
                let (means, mut diagnostics) = run_fixed(table, srf, bands);
                let means_table =
                    ConvolvedTable::bands_by_observation(self.band_labels(), &ids, &means);

                let stds_table = stds.as_ref().map(|stds| {
                    let (values, stds_diagnostics) = run_fixed(table, stds, bands);
                    diagnostics.merge(stds_diagnostics);
                    ConvolvedTable::bands_by_observation(self.band_labels(), &ids, &values)
                });

                ConvolutionResult {
                    means: means_table,
                    stds: stds_table,
                    diagnostics,
                }
            }
            ConvolutionPlan::Bandpass {
                resolution,
                srf,
                bands,
                ..
            } => {
                let (values, diagnostics): (Vec<Vec<f64>>, Vec<Diagnostics>) = (0..table.len())
                    .into_par_iter()
                    .map(|i| {
                        bandpass::convolve_observation(srf, bands, *resolution, &table.spectrum(i))
                    })
                    .unzip();

                ConvolutionResult {
                    means: ConvolvedTable::observations_by_band(&ids, self.band_labels(), values),
                    stds: None,
                    diagnostics: diagnostics.into_iter().collect(),
                }
            }
        }
    }
}

fn run_fixed(
    table: &ReflectanceTable,
    srf: &SrfTable,
    bands: &[FixedBand],
) -> (Vec<Vec<f64>>, Diagnostics) {
    let (values, diagnostics): (Vec<Vec<f64>>, Vec<Diagnostics>) = (0..table.len())
        .into_par_iter()
        .map(|i| fixed::convolve_observation(srf, bands, &table.spectrum(i)))
        .unzip();
    (values, diagnostics.into_iter().collect())
}

// ---------------------------------------------------------------------------
// Convolver – top-level entry point
// ---------------------------------------------------------------------------

/// Converts reflectance tables to sensor bands using reference data from
/// `S`. Holds no state between runs.
#[derive(Debug, Clone)]
pub struct Convolver<S> {
    source: S,
}

impl<S: ReferenceSource> Convolver<S> {
    pub fn new(source: S) -> Self {
        Convolver { source }
    }

    /// Validate the sensor name, then run [`Convolver::convolve`].
    pub fn convolve_named(
        &self,
        table: &ReflectanceTable,
        sensor_name: &str,
        save_dir: Option<&Path>,
    ) -> Result<ConvolutionResult> {
        let sensor: Sensor = sensor_name.parse()?;
        self.convolve(table, sensor, save_dir)
    }

    /// Convolve `table` to `sensor`'s bands, optionally persisting the
    /// table(s) into `save_dir`.
    pub fn convolve(
        &self,
        table: &ReflectanceTable,
        sensor: Sensor,
        save_dir: Option<&Path>,
    ) -> Result<ConvolutionResult> {
        let plan = self.plan(sensor)?;
        debug!(
            "convolving {} observations to {} ({} bands)",
            table.len(),
            sensor,
            plan.band_labels().len()
        );

        let result = plan.run(table);
        result.diagnostics.log();

        if let Some(dir) = save_dir {
            let written = result.save(dir, sensor.id(), plan.is_fixed_bands())?;
            info!("saved {} table(s) for {sensor}", written.len());
        }
        Ok(result)
    }

    /// Load and validate reference data for `sensor`.
    pub fn plan(&self, sensor: Sensor) -> Result<ConvolutionPlan> {
        let reference = self.source.load(sensor)?;
        ConvolutionPlan::prepare(sensor, reference)
    }
}
