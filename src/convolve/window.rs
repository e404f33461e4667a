//! Band windows for the bandpass family.
//!
//! All arithmetic runs on [`WavelengthKey`]s (thousandths of a nanometre) so
//! the 0.05 nm tie-break is decided on exact decimals, not on float residue.

use crate::data::model::WavelengthKey;
use crate::sensors::SrfResolution;

const KEY_TENTH: i64 = WavelengthKey::PER_NM / 10;

/// FWHM rounded to the nearest whole nanometre, then forced odd, so the
/// window sits symmetric around the centre on an integer grid.
///
/// Applies to both SRF resolutions: FWHM 4 becomes 5, FWHM 10 becomes 11.
pub fn coerce_odd_width(fwhm_nm: f64) -> f64 {
    (fwhm_nm.round() as i64 | 1) as f64
}

/// Inclusive wavelength window `[start, end]` of one band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandWindow {
    pub start: WavelengthKey,
    pub end: WavelengthKey,
}

impl BandWindow {
    pub fn new(resolution: SrfResolution, centre_nm: f64, width_nm: f64) -> Self {
        match resolution {
            SrfResolution::Fine => Self::fine(centre_nm, width_nm),
            SrfResolution::Coarse => Self::coarse(centre_nm, width_nm),
        }
    }

    /// Window on a 0.1 nm grid. A half-width ending exactly on a 0.05 nm
    /// boundary is split: rounded down on the left, up on the right.
    pub fn fine(centre_nm: f64, width_nm: f64) -> Self {
        let centre = WavelengthKey::from_nm(centre_nm);
        let half = WavelengthKey::from_nm(width_nm / 2.0).raw();

        let (left, right) = if half.rem_euclid(KEY_TENTH) == KEY_TENTH / 2 {
            (half - KEY_TENTH / 2, half + KEY_TENTH / 2)
        } else {
            let rounded = (half + KEY_TENTH / 2).div_euclid(KEY_TENTH) * KEY_TENTH;
            (rounded, rounded)
        };

        BandWindow {
            start: centre.offset(-left),
            end: centre.offset(right),
        }
    }

    /// Window on a 1 nm grid: `centre ± floor(width / 2)`.
    pub fn coarse(centre_nm: f64, width_nm: f64) -> Self {
        let centre = WavelengthKey::from_nm(centre_nm);
        let half = (width_nm / 2.0).floor() as i64 * WavelengthKey::PER_NM;
        BandWindow {
            start: centre.offset(-half),
            end: centre.offset(half),
        }
    }

    pub fn contains(&self, key: WavelengthKey) -> bool {
        self.start <= key && key <= self.end
    }

    /// Grid points covered when sampling every `step_key` from `start`.
    pub fn sample_count(&self, step_key: i64) -> usize {
        ((self.end.raw() - self.start.raw()) / step_key + 1) as usize
    }
}
