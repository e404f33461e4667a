use std::path::Path;

use approx::assert_relative_eq;
use srf_convolve::sensors::bands::FixedBand;
use srf_convolve::{
    BandpassEntry, ConvolutionError, ConvolutionPlan, Convolver, InMemoryReference, Observation,
    ReferenceDir, ReflectanceTable, Sensor, SensorFamily, SensorReference, SrfResolution, SrfTable,
};

const FIRST_NM: i32 = 350;
const LAST_NM: i32 = 2500;

fn fixed_bands(sensor: Sensor) -> &'static [FixedBand] {
    match sensor.family() {
        SensorFamily::FixedBands { bands, .. } => bands,
        SensorFamily::Bandpass { .. } => panic!("{sensor} is not a fixed-band sensor"),
    }
}

/// 1 nm SRF over 350–2500 nm with a positive, uneven response inside each
/// band's window and zero outside.
fn fixed_srf(sensor: Sensor, scale: f64) -> SrfTable {
    let wavelengths: Vec<f64> = (FIRST_NM..=LAST_NM).map(f64::from).collect();
    let bands = fixed_bands(sensor);
    let columns = bands
        .iter()
        .map(|band| {
            (0..wavelengths.len())
                .map(|row| {
                    if band.rows().contains(&row) {
                        scale * (0.2 + 0.1 * (row % 7) as f64)
                    } else {
                        0.0
                    }
                })
                .collect()
        })
        .collect();
    let names = bands.iter().map(|b| b.label.to_string()).collect();
    SrfTable::from_columns(sensor.id(), wavelengths, names, columns).unwrap()
}

fn fixed_reference(sensor: Sensor) -> SensorReference {
    let with_stds = matches!(sensor.family(), SensorFamily::FixedBands { with_stds: true, .. });
    SensorReference::FixedBands {
        srf: fixed_srf(sensor, 1.0),
        stds: with_stds.then(|| fixed_srf(sensor, 0.05)),
    }
}

fn all_fixed_sensors() -> InMemoryReference {
    Sensor::ALL
        .into_iter()
        .filter(|s| matches!(s.family(), SensorFamily::FixedBands { .. }))
        .fold(InMemoryReference::new(), |reference, sensor| {
            reference.with(sensor, fixed_reference(sensor))
        })
}

fn flat_table(ids: &[&str], value: f64) -> ReflectanceTable {
    let wavelengths: Vec<f64> = (FIRST_NM..=LAST_NM).map(f64::from).collect();
    let observations = ids
        .iter()
        .map(|id| Observation {
            id: id.to_string(),
            reflectance: vec![value; wavelengths.len()],
        })
        .collect();
    ReflectanceTable::new(wavelengths, observations).unwrap()
}

fn ramp_table(id: &str) -> ReflectanceTable {
    let wavelengths: Vec<f64> = (FIRST_NM..=LAST_NM).map(f64::from).collect();
    let reflectance = wavelengths.iter().map(|w| 0.01 + w * 1e-4).collect();
    ReflectanceTable::new(
        wavelengths,
        vec![Observation {
            id: id.to_string(),
            reflectance,
        }],
    )
    .unwrap()
}

fn trapz(x: &[f64], y: &[f64]) -> f64 {
    (1..x.len())
        .map(|i| (x[i] - x[i - 1]) * (y[i] + y[i - 1]) / 2.0)
        .sum()
}

/// Coarse 1 nm bandpass sensor over 400–900 nm.
fn modis_reference() -> SensorReference {
    let centres = [412.0, 443.0, 488.0, 531.0, 667.0, 869.0];
    let wavelengths: Vec<f64> = (400..=900).map(f64::from).collect();
    let columns = centres
        .iter()
        .map(|&c| {
            wavelengths
                .iter()
                .map(|&w| (-(w - c).powi(2) / 50.0).exp())
                .collect()
        })
        .collect();
    let names = centres.iter().map(|c| format!("{c}")).collect();
    SensorReference::Bandpass {
        srf: SrfTable::from_columns("MODIS_AQUA", wavelengths, names, columns).unwrap(),
        bands: centres
            .iter()
            .map(|&centre_nm| BandpassEntry {
                centre_nm,
                fwhm_nm: 10.0,
            })
            .collect(),
    }
}

/// Fine 0.1 nm bandpass sensor over 400–900 nm.
fn meris_reference() -> SensorReference {
    meris_reference_with_fwhm(7.5)
}

fn meris_reference_with_fwhm(fwhm_nm: f64) -> SensorReference {
    let centres = [412.5, 442.5, 490.0, 560.0, 681.25, 865.0];
    let wavelengths: Vec<f64> = (4000..=9000).map(|t| f64::from(t) / 10.0).collect();
    let columns = centres
        .iter()
        .map(|&c| {
            wavelengths
                .iter()
                .map(|&w| (-(w - c).powi(2) / 8.0).exp())
                .collect()
        })
        .collect();
    let names = centres
        .iter()
        .map(|c: &f64| format!("{}", c.trunc() as i64))
        .collect();
    SensorReference::Bandpass {
        srf: SrfTable::from_columns("MERIS", wavelengths, names, columns).unwrap(),
        bands: centres
            .iter()
            .map(|&centre_nm| BandpassEntry { centre_nm, fwhm_nm })
            .collect(),
    }
}

#[test]
fn output_labels_match_canonical_band_lists() {
    let convolver = Convolver::new(all_fixed_sensors());
    let table = flat_table(&["site"], 0.1);
    for sensor in Sensor::ALL {
        let SensorFamily::FixedBands { bands, with_stds } = sensor.family() else {
            continue;
        };
        let result = convolver.convolve(&table, sensor, None).unwrap();
        let expected: Vec<String> = bands.iter().map(|b| b.label.to_string()).collect();
        assert_eq!(result.means.index(), expected.as_slice(), "{sensor}");
        assert_eq!(result.means.columns(), &["site_conv".to_string()]);
        assert_eq!(result.stds.is_some(), with_stds, "{sensor}");
        if let Some(stds) = &result.stds {
            assert_eq!(stds.index(), result.means.index());
            assert_eq!(stds.columns(), result.means.columns());
        }
    }
}

#[test]
fn flat_spectrum_returns_its_value_for_every_band() {
    let convolver = Convolver::new(all_fixed_sensors());
    let table = flat_table(&["a", "b"], 0.37);
    for sensor in Sensor::ALL {
        if !matches!(sensor.family(), SensorFamily::FixedBands { .. }) {
            continue;
        }
        let result = convolver.convolve(&table, sensor, None).unwrap();
        for row in result.means.rows().iter().chain(result.stds.iter().flat_map(|t| t.rows())) {
            for &value in row {
                assert_relative_eq!(value, 0.37, max_relative = 1e-12);
            }
        }
        assert!(result.diagnostics.is_empty());
    }
}

#[test]
fn fixed_band_matches_independent_trapezoid_ratio() {
    let convolver = Convolver::new(all_fixed_sensors());
    let table = ramp_table("ramp");
    let result = convolver.convolve(&table, Sensor::MsiS2a, None).unwrap();

    let srf = fixed_srf(Sensor::MsiS2a, 1.0);
    for (index, band) in fixed_bands(Sensor::MsiS2a).iter().enumerate() {
        let x = &srf.wavelengths()[band.rows()];
        let w = &srf.column(index)[band.rows()];
        let num: Vec<f64> = x.iter().zip(w).map(|(x, w)| (0.01 + x * 1e-4) * w).collect();
        let expected = trapz(x, &num) / trapz(x, w);
        let value = result.means.get(band.label, "ramp_conv").unwrap();
        assert_relative_eq!(value, expected, max_relative = 1e-9);
    }
}

#[test]
fn runs_are_bit_identical() {
    let convolver = Convolver::new(all_fixed_sensors());
    let table = ramp_table("ramp");
    let first = convolver.convolve(&table, Sensor::OlciS3b, None).unwrap();
    let second = convolver.convolve(&table, Sensor::OlciS3b, None).unwrap();
    assert_eq!(first, second);
}

#[test]
fn identical_observations_give_identical_columns() {
    let wavelengths: Vec<f64> = (FIRST_NM..=LAST_NM).map(f64::from).collect();
    let spectrum: Vec<f64> = wavelengths.iter().map(|w| (w / 300.0).sin().abs() * 0.2).collect();
    let table = ReflectanceTable::new(
        wavelengths,
        vec![
            Observation {
                id: "twin_a".into(),
                reflectance: spectrum.clone(),
            },
            Observation {
                id: "other".into(),
                reflectance: vec![0.9; spectrum.len()],
            },
            Observation {
                id: "twin_b".into(),
                reflectance: spectrum,
            },
        ],
    )
    .unwrap();

    let result = Convolver::new(all_fixed_sensors())
        .convolve(&table, Sensor::TmL5, None)
        .unwrap();
    assert_eq!(
        result.means.columns(),
        &["twin_a_conv".to_string(), "other_conv".to_string(), "twin_b_conv".to_string()]
    );
    assert_eq!(
        result.means.column("twin_a_conv"),
        result.means.column("twin_b_conv")
    );
}

#[test]
fn spectrum_outside_every_band_gives_zeros_and_one_note_per_band() {
    let wavelengths = vec![100.0, 101.0, 102.0, 103.0, 104.0];
    let table = ReflectanceTable::new(
        wavelengths,
        vec![
            Observation {
                id: "uv1".into(),
                reflectance: vec![0.5; 5],
            },
            Observation {
                id: "uv2".into(),
                reflectance: vec![0.4; 5],
            },
        ],
    )
    .unwrap();

    let result = Convolver::new(all_fixed_sensors())
        .convolve(&table, Sensor::MsiS2b, None)
        .unwrap();
    for row in result.means.rows() {
        assert!(row.iter().all(|&v| v == 0.0));
    }
    let bands = fixed_bands(Sensor::MsiS2b);
    assert_eq!(result.diagnostics.len(), bands.len());
    for band in bands {
        let message = format!(
            "Band {} nm was not convolved due to missing input data",
            band.centre()
        );
        assert!(result.diagnostics.contains(&message), "{message}");
    }
}

#[test]
fn zero_response_band_is_zero_without_diagnostic() {
    let sensor = Sensor::Superdove;
    let mut srf = fixed_srf(sensor, 1.0);
    let names = srf.band_names().to_vec();
    let mut columns: Vec<Vec<f64>> =
        (0..srf.band_count()).map(|b| srf.column(b).to_vec()).collect();
    columns[2] = vec![0.0; srf.len()];
    srf = SrfTable::from_columns(sensor.id(), srf.wavelengths().to_vec(), names, columns).unwrap();

    let reference =
        InMemoryReference::new().with(sensor, SensorReference::FixedBands { srf, stds: None });
    let result = Convolver::new(reference)
        .convolve(&flat_table(&["x"], 0.2), sensor, None)
        .unwrap();

    let values = result.means.column("x_conv").unwrap();
    assert_eq!(values[2], 0.0);
    assert_relative_eq!(values[1], 0.2, max_relative = 1e-12);
    assert!(result.diagnostics.is_empty());
}

#[test]
fn coarse_bandpass_uses_observation_rows() {
    let reference = InMemoryReference::new().with(Sensor::ModisAqua, modis_reference());
    let table = flat_table(&["lake", "river"], 0.05);
    let result = Convolver::new(reference)
        .convolve_named(&table, "MODIS_AQUA", None)
        .unwrap();

    assert_eq!(result.means.index_name(), "Observation");
    assert_eq!(result.means.index(), &["lake".to_string(), "river".to_string()]);
    assert_eq!(result.means.columns()[0], "412");
    assert!(result.stds.is_none());
    for row in result.means.rows() {
        assert_eq!(row.len(), 6);
        for &value in row {
            assert_relative_eq!(value, 0.05, max_relative = 1e-12);
        }
    }
}

#[test]
fn coarse_bandpass_matches_window_of_coerced_width() {
    let reference = InMemoryReference::new().with(Sensor::ModisAqua, modis_reference());
    let table = ramp_table("ramp");
    let result = Convolver::new(reference)
        .convolve(&table, Sensor::ModisAqua, None)
        .unwrap();

    // FWHM 10 becomes 11 → window 443 ± 5
    let x: Vec<f64> = (438..=448).map(f64::from).collect();
    let w: Vec<f64> = x.iter().map(|&v| (-(v - 443.0f64).powi(2) / 50.0).exp()).collect();
    let num: Vec<f64> = x.iter().zip(&w).map(|(x, w)| (0.01 + x * 1e-4) * w).collect();
    let expected = trapz(&x, &num) / trapz(&x, &w);
    assert_relative_eq!(
        result.means.get("ramp", "443").unwrap(),
        expected,
        max_relative = 1e-9
    );
}

#[test]
fn fine_bandpass_flat_spectrum_and_gaps() {
    let reference = InMemoryReference::new().with(Sensor::Meris, meris_reference());
    let wavelengths: Vec<f64> = (400..=600).map(f64::from).collect();
    let table = ReflectanceTable::new(
        wavelengths.clone(),
        vec![Observation {
            id: "blue_only".into(),
            reflectance: vec![0.08; wavelengths.len()],
        }],
    )
    .unwrap();

    let result = Convolver::new(reference)
        .convolve(&table, Sensor::Meris, None)
        .unwrap();
    let row = result.means.row("blue_only").unwrap();
    assert_eq!(result.means.columns()[0], "412.5");
    for &value in &row[..4] {
        assert_relative_eq!(value, 0.08, max_relative = 1e-12);
    }
    assert_eq!(row[4], 0.0);
    assert_eq!(row[5], 0.0);
    assert_eq!(result.diagnostics.len(), 2);
    assert!(result
        .diagnostics
        .contains("Band 681.25 nm was not convolved due to missing input data"));
}

#[test]
fn fine_bandpass_even_fwhm_is_widened_to_next_odd_nanometre() {
    let reference = InMemoryReference::new().with(Sensor::Meris, meris_reference_with_fwhm(4.0));
    let convolver = Convolver::new(reference);

    let plan = convolver.plan(Sensor::Meris).unwrap();
    let ConvolutionPlan::Bandpass { bands, .. } = &plan else {
        panic!("MERIS should use the bandpass strategy");
    };
    let band = &bands[3];
    assert_eq!(band.label(), "560");
    assert_eq!(band.width_nm, 5.0);
    assert_relative_eq!(band.window.start.as_nm(), 557.5);
    assert_relative_eq!(band.window.end.as_nm(), 562.5);
    assert_eq!(band.window.sample_count(SrfResolution::Fine.step_key()), 51);

    // 1 nm input inside the window spans 558..=562; the interpolated ramp is
    // held flat beyond those samples
    let result = convolver.convolve(&ramp_table("ramp"), Sensor::Meris, None).unwrap();
    let x: Vec<f64> = (5575..=5625).map(|t| f64::from(t) / 10.0).collect();
    let w: Vec<f64> = x.iter().map(|&v| (-(v - 560.0f64).powi(2) / 8.0).exp()).collect();
    let num: Vec<f64> = x
        .iter()
        .zip(&w)
        .map(|(x, w)| (0.01 + x.clamp(558.0, 562.0) * 1e-4) * w)
        .collect();
    assert_relative_eq!(
        result.means.get("ramp", "560").unwrap(),
        trapz(&x, &num) / trapz(&x, &w),
        max_relative = 1e-9
    );
}

#[test]
fn unknown_sensor_is_a_configuration_error() {
    let convolver = Convolver::new(all_fixed_sensors());
    let err = convolver
        .convolve_named(&flat_table(&["a"], 0.1), "Sentinel9", None)
        .unwrap_err();
    assert!(matches!(err, ConvolutionError::UnknownSensor(_)));
}

fn write_srf_csv(path: &Path, srf: &SrfTable) {
    let mut out = csv::Writer::from_path(path).unwrap();
    let mut header = vec!["SR_WL".to_string()];
    header.extend(srf.band_names().iter().cloned());
    out.write_record(&header).unwrap();
    for (row, wl) in srf.wavelengths().iter().enumerate() {
        let mut record = vec![wl.to_string()];
        record.extend((0..srf.band_count()).map(|b| srf.column(b)[row].to_string()));
        out.write_record(&record).unwrap();
    }
    out.flush().unwrap();
}

#[test]
fn reference_directory_run_saves_means_and_stds() {
    let refs = tempfile::TempDir::new().unwrap();
    let out = tempfile::TempDir::new().unwrap();
    write_srf_csv(&refs.path().join("l8_srf_means.csv"), &fixed_srf(Sensor::OliL8, 1.0));
    write_srf_csv(&refs.path().join("l8_srf_stds.csv"), &fixed_srf(Sensor::OliL8, 0.05));

    let convolver = Convolver::new(ReferenceDir::new(refs.path()));
    let result = convolver
        .convolve_named(&flat_table(&["plot7"], 0.3), "Landsat8OLI", Some(out.path()))
        .unwrap();
    assert!(result.stds.is_some());

    let means = std::fs::read_to_string(out.path().join("OLI_L8_convolved_bands.csv")).unwrap();
    let mut lines = means.lines();
    assert_eq!(lines.next(), Some("Band_name_and_centre_wavelength,plot7_conv"));
    assert!(lines.next().unwrap().starts_with("Band1_443,"));
    assert!(out.path().join("OLI_L8_convolved_bands_stds.csv").is_file());
}

#[test]
fn reference_directory_bandpass_run_saves_single_table() {
    let refs = tempfile::TempDir::new().unwrap();
    let out = tempfile::TempDir::new().unwrap();
    let SensorReference::Bandpass { srf, bands } = modis_reference() else {
        unreachable!()
    };
    write_srf_csv(&refs.path().join("MODIS_AQUA_srf.csv"), &srf);
    let mut bandpass = String::from("Band,Nominal Center Wavelength,Width (FWHM)\n");
    for (i, band) in bands.iter().enumerate() {
        bandpass.push_str(&format!("B{},{},{}\n", i + 1, band.centre_nm, band.fwhm_nm));
    }
    std::fs::write(refs.path().join("MODIS_AQUA_bandpass.csv"), bandpass).unwrap();

    Convolver::new(ReferenceDir::new(refs.path()))
        .convolve(&flat_table(&["s1"], 0.1), Sensor::ModisAqua, Some(out.path()))
        .unwrap();

    let saved = std::fs::read_to_string(out.path().join("MODIS_AQUA_conv.csv")).unwrap();
    assert_eq!(saved.lines().next(), Some("Observation,412,443,488,531,667,869"));
    assert_eq!(saved.lines().count(), 2);
}
