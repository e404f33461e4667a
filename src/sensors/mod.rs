//! Sensor catalog: the closed set of supported sensors and how each one is
//! convolved.
//!
//! Adding a sensor is a data change: a new variant, its reference files and
//! either a band table in [`bands`] or a bandpass CSV.

pub mod bands;

use std::fmt;
use std::str::FromStr;

use crate::error::ConvolutionError;
use bands::FixedBand;

/// Sampling step of a parametric sensor's SRF table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SrfResolution {
    /// 0.1 nm rows; input is interpolated onto the SRF grid.
    Fine,
    /// 1 nm rows shared with the input; weights are looked up directly.
    Coarse,
}

impl SrfResolution {
    /// Step in thousandths of a nanometre.
    pub fn step_key(self) -> i64 {
        match self {
            SrfResolution::Fine => 100,
            SrfResolution::Coarse => 1000,
        }
    }

    pub fn step_nm(self) -> f64 {
        match self {
            SrfResolution::Fine => 0.1,
            SrfResolution::Coarse => 1.0,
        }
    }
}

/// How a sensor's bands are described and integrated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorFamily {
    /// Pre-tabulated SRF row windows. `with_stds` sensors ship a second
    /// table of response standard deviations.
    FixedBands {
        bands: &'static [FixedBand],
        with_stds: bool,
    },
    /// (centre, FWHM) pairs read from a bandpass table.
    Bandpass { resolution: SrfResolution },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sensor {
    MsiS2a,
    MsiS2b,
    OlciS3a,
    OlciS3b,
    Superdove,
    TmL5,
    EtmL7,
    OliL8,
    OliL9,
    Meris,
    ModisAqua,
    ViirsSnpp,
}

impl Sensor {
    pub const ALL: [Sensor; 12] = [
        Sensor::MsiS2a,
        Sensor::MsiS2b,
        Sensor::OlciS3a,
        Sensor::OlciS3b,
        Sensor::Superdove,
        Sensor::TmL5,
        Sensor::EtmL7,
        Sensor::OliL8,
        Sensor::OliL9,
        Sensor::Meris,
        Sensor::ModisAqua,
        Sensor::ViirsSnpp,
    ];

    /// Canonical identifier, also used in output file names.
    pub fn id(self) -> &'static str {
        match self {
            Sensor::MsiS2a => "MSI_S2A",
            Sensor::MsiS2b => "MSI_S2B",
            Sensor::OlciS3a => "OLCI_S3A",
            Sensor::OlciS3b => "OLCI_S3B",
            Sensor::Superdove => "Superdove",
            Sensor::TmL5 => "TM_L5",
            Sensor::EtmL7 => "ETM_L7",
            Sensor::OliL8 => "OLI_L8",
            Sensor::OliL9 => "OLI_L9",
            Sensor::Meris => "MERIS",
            Sensor::ModisAqua => "MODIS_AQUA",
            Sensor::ViirsSnpp => "VIIRS_SNPP",
        }
    }

    /// Name accepted by older tooling for the same sensor.
    pub fn legacy_name(self) -> Option<&'static str> {
        match self {
            Sensor::MsiS2a => Some("Sentinel2a"),
            Sensor::MsiS2b => Some("Sentinel2b"),
            Sensor::OlciS3a => Some("Sentinel3a"),
            Sensor::OlciS3b => Some("Sentinel3b"),
            Sensor::Superdove => None,
            Sensor::TmL5 => Some("Landsat5TM"),
            Sensor::EtmL7 => Some("Landsat7ETM+"),
            Sensor::OliL8 => Some("Landsat8OLI"),
            Sensor::OliL9 => Some("Landsat9OLI"),
            Sensor::Meris | Sensor::ModisAqua | Sensor::ViirsSnpp => None,
        }
    }

    pub fn family(self) -> SensorFamily {
        use bands::*;
        let fixed = |bands, with_stds| SensorFamily::FixedBands { bands, with_stds };
        match self {
            Sensor::MsiS2a | Sensor::MsiS2b => fixed(SENTINEL2, false),
            Sensor::OlciS3a | Sensor::OlciS3b => fixed(SENTINEL3, true),
            Sensor::Superdove => fixed(SUPERDOVE, false),
            Sensor::TmL5 => fixed(LANDSAT5, false),
            Sensor::EtmL7 => fixed(LANDSAT7, false),
            Sensor::OliL8 => fixed(LANDSAT8, true),
            Sensor::OliL9 => fixed(LANDSAT9, true),
            Sensor::Meris => SensorFamily::Bandpass {
                resolution: SrfResolution::Fine,
            },
            Sensor::ModisAqua | Sensor::ViirsSnpp => SensorFamily::Bandpass {
                resolution: SrfResolution::Coarse,
            },
        }
    }

    /// Reference file names: `(srf, stds)` for fixed-band sensors,
    /// `(srf, bandpass)` for bandpass sensors.
    pub fn reference_files(self) -> (String, Option<String>) {
        let single = |name: &str| (format!("{name}_srf.csv"), None);
        let pair = |name: &str| {
            (
                format!("{name}_srf_means.csv"),
                Some(format!("{name}_srf_stds.csv")),
            )
        };
        match self {
            Sensor::MsiS2a => single("s2a"),
            Sensor::MsiS2b => single("s2b"),
            Sensor::OlciS3a => pair("s3a"),
            Sensor::OlciS3b => pair("s3b"),
            Sensor::Superdove => single("superdove"),
            Sensor::TmL5 => single("l5"),
            Sensor::EtmL7 => single("l7"),
            Sensor::OliL8 => pair("l8"),
            Sensor::OliL9 => pair("l9"),
            Sensor::Meris | Sensor::ModisAqua | Sensor::ViirsSnpp => (
                format!("{}_srf.csv", self.id()),
                Some(format!("{}_bandpass.csv", self.id())),
            ),
        }
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Sensor {
    type Err = ConvolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sensor::ALL
            .into_iter()
            .find(|sensor| sensor.id() == s || sensor.legacy_name() == Some(s))
            .ok_or_else(|| ConvolutionError::UnknownSensor(s.to_string()))
    }
}
