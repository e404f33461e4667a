//! Write a synthetic reflectance table (`sample_reflectance.parquet` and
//! `sample_reflectance.csv`) covering 350–2500 nm at 1 nm for trying out
//! `srf-convolve run`.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Smooth water-leaving-like reflectance: a baseline plus absorption dips
/// and a red-edge rise, with a little measurement noise.
fn generate_spectrum(
    wavelengths: &[f64],
    baseline: f64,
    features: &[(f64, f64, f64)],
    noise_level: f64,
    rng: &mut SimpleRng,
) -> Vec<f64> {
    wavelengths
        .iter()
        .map(|&wl| {
            let signal: f64 = features
                .iter()
                .map(|&(mu, sigma, amp)| gaussian(wl, mu, sigma, amp))
                .sum();
            (baseline + signal + rng.gauss(0.0, noise_level)).max(0.0)
        })
        .collect()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = SimpleRng::new(42);

    let wavelengths: Vec<f64> = (350..=2500).map(f64::from).collect();

    let sites: [(&str, f64, Vec<(f64, f64, f64)>); 4] = [
        ("clear_lake", 0.01, vec![(560.0, 40.0, 0.02), (760.0, 5.0, -0.005)]),
        ("turbid_river", 0.03, vec![(580.0, 60.0, 0.05), (810.0, 30.0, 0.02)]),
        (
            "algal_bloom",
            0.02,
            vec![(550.0, 25.0, 0.03), (675.0, 10.0, -0.015), (705.0, 12.0, 0.04)],
        ),
        ("sand_bank", 0.15, vec![(1450.0, 40.0, -0.05), (1940.0, 50.0, -0.08)]),
    ];

    let mut columns: Vec<(String, Vec<f64>)> = Vec::new();
    for (name, baseline, features) in &sites {
        let y = generate_spectrum(&wavelengths, *baseline, features, 0.0005, &mut rng);
        columns.push((name.to_string(), y));
    }

    // Parquet
    let mut fields = vec![Field::new("wavelength", DataType::Float64, false)];
    let mut arrays: Vec<ArrayRef> = vec![Arc::new(Float64Array::from(wavelengths.clone()))];
    for (name, values) in &columns {
        fields.push(Field::new(name.as_str(), DataType::Float64, true));
        arrays.push(Arc::new(Float64Array::from(values.clone())));
    }
    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let parquet_path = "sample_reflectance.parquet";
    let file = std::fs::File::create(parquet_path).context("creating parquet output")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;

    // CSV
    let csv_path = "sample_reflectance.csv";
    let mut out = csv::Writer::from_path(csv_path).context("creating CSV output")?;
    let mut header = vec!["wavelength".to_string()];
    header.extend(columns.iter().map(|(name, _)| name.clone()));
    out.write_record(&header)?;
    for (row, wl) in wavelengths.iter().enumerate() {
        let mut record = vec![wl.to_string()];
        record.extend(columns.iter().map(|(_, values)| format!("{:.6}", values[row])));
        out.write_record(&record)?;
    }
    out.flush()?;

    println!(
        "Wrote {} spectra ({} wavelengths each) to {parquet_path} and {csv_path}",
        columns.len(),
        wavelengths.len()
    );
    Ok(())
}
