//! Tabulated band windows for the fixed-band sensors.
//!
//! Each entry is a half-open row range `[start, end)` into the sensor's
//! reference SRF table, chosen where that band's response is non-negligible.
//! Band order is the SRF column order and the canonical output order.
//!
//! Sources of the reference responses:
//! - Sentinel-2 MSI: ESA S2-SRF COPE-GSEG-EOPG-TN-15-0007 v3.1
//! - Sentinel-3 OLCI: ESA OLCI spectral characterisation data
//! - SuperDove: Planet relative spectral response curves. The blue band
//!   window is the central stretch without zero responses.
//! - Landsat 5/7/8/9: USGS spectral characteristics viewer

use std::ops::Range;

/// One band of a fixed-band sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedBand {
    /// `Band{n}_{centre}` label used as the output row index.
    pub label: &'static str,
    pub start: usize,
    pub end: usize,
}

impl FixedBand {
    const fn new(label: &'static str, start: usize, end: usize) -> Self {
        FixedBand { label, start, end }
    }

    pub fn rows(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Centre wavelength part of the label (`"443"` for `Band1_443`).
    pub fn centre(&self) -> &'static str {
        self.label
            .rsplit_once('_')
            .map(|(_, centre)| centre)
            .unwrap_or(self.label)
    }
}

pub const SENTINEL2: &[FixedBand] = &[
    FixedBand::new("Band1_443", 62, 107),
    FixedBand::new("Band2_490", 89, 184),
    FixedBand::new("Band3_560", 188, 233),
    FixedBand::new("Band4_665", 296, 344),
    FixedBand::new("Band5_705", 345, 364),
    FixedBand::new("Band6_740", 381, 399),
    FixedBand::new("Band7_783", 419, 447),
    FixedBand::new("Band8_842", 423, 557),
    FixedBand::new("Band8A_865", 497, 531),
    FixedBand::new("Band9_940", 582, 609),
    FixedBand::new("Band10_1375", 987, 1063),
    FixedBand::new("Band11_1610", 1189, 1332),
    FixedBand::new("Band12_2190", 1728, 1970),
];

pub const SENTINEL3: &[FixedBand] = &[
    FixedBand::new("Band1_400", 37, 62),
    FixedBand::new("Band2_412.5", 52, 72),
    FixedBand::new("Band3_442.5", 83, 103),
    FixedBand::new("Band4_490", 131, 150),
    FixedBand::new("Band5_510", 151, 170),
    FixedBand::new("Band6_560", 201, 220),
    FixedBand::new("Band7_620", 261, 280),
    FixedBand::new("Band8_665", 305, 325),
    FixedBand::new("Band9_673.75", 315, 333),
    FixedBand::new("Band10_681.25", 323, 340),
    FixedBand::new("Band11_708.75", 349, 369),
    FixedBand::new("Band12_753.75", 396, 413),
    FixedBand::new("Band13_761.25", 406, 418),
    FixedBand::new("Band14_764.375", 408, 422),
    FixedBand::new("Band15_767.5", 412, 424),
    FixedBand::new("Band16_778.75", 417, 442),
    FixedBand::new("Band17_865", 501, 530),
    FixedBand::new("Band18_885", 524, 544),
    FixedBand::new("Band19_900", 539, 559),
    FixedBand::new("Band20_940", 575, 604),
    FixedBand::new("Band21_1020", 645, 694),
];

pub const SUPERDOVE: &[FixedBand] = &[
    FixedBand::new("Band1_443", 77, 111),
    FixedBand::new("Band2_490", 108, 172),
    FixedBand::new("Band3_531", 157, 209),
    FixedBand::new("Band4_565", 193, 242),
    FixedBand::new("Band5_610", 243, 285),
    FixedBand::new("Band6_665", 291, 339),
    FixedBand::new("Band7_705", 342, 374),
    FixedBand::new("Band8_865", 490, 545),
];

pub const LANDSAT5: &[FixedBand] = &[
    FixedBand::new("Band1_485", 60, 203),
    FixedBand::new("Band2_569", 150, 301),
    FixedBand::new("Band3_660", 230, 391),
    FixedBand::new("Band4_840", 380, 596),
    FixedBand::new("Band5_1676", 1164, 1531),
    FixedBand::new("Band7_2223", 1650, 2051),
];

pub const LANDSAT7: &[FixedBand] = &[
    FixedBand::new("Band1_483", 60, 174),
    FixedBand::new("Band2_560", 150, 301),
    FixedBand::new("Band3_662", 230, 391),
    FixedBand::new("Band4_835", 380, 596),
    FixedBand::new("Band5_1648", 1164, 1531),
    FixedBand::new("Band7_2206", 1650, 2051),
    FixedBand::new("Band8_706", 150, 591),
];

pub const LANDSAT8: &[FixedBand] = &[
    FixedBand::new("Band1_443", 77, 110),
    FixedBand::new("Band2_482", 86, 179),
    FixedBand::new("Band3_561", 162, 261),
    FixedBand::new("Band4_655", 275, 342),
    FixedBand::new("Band5_865", 479, 551),
    FixedBand::new("Band6_1609", 1165, 1348),
    FixedBand::new("Band7_2201", 1687, 2006),
    FixedBand::new("Band8_590", 138, 343),
    FixedBand::new("Band9_1373", 990, 1060),
];

// Row windows match Landsat 8 except the band 2 upper edge.
pub const LANDSAT9: &[FixedBand] = &[
    FixedBand::new("Band1_443", 77, 110),
    FixedBand::new("Band2_482", 86, 181),
    FixedBand::new("Band3_562", 162, 261),
    FixedBand::new("Band4_655", 275, 342),
    FixedBand::new("Band5_865", 479, 551),
    FixedBand::new("Band6_1610", 1165, 1348),
    FixedBand::new("Band7_2200", 1687, 2006),
    FixedBand::new("Band8_590", 138, 343),
    FixedBand::new("Band9_1375", 990, 1060),
];
