use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use srf_convolve::config::RunConfig;
use srf_convolve::data::loader::load_reflectance;
use srf_convolve::{Convolver, ReferenceDir, Sensor, SensorFamily};

/// Convolve in-situ reflectance spectra to satellite sensor bands
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convolve a reflectance table (.csv, .json or .parquet)
    Run {
        /// Input reflectance table
        input: PathBuf,

        /// Sensor identifier (see `sensors`)
        #[arg(long, short)]
        sensor: String,

        /// Directory with the reference SRF / bandpass CSV files
        #[arg(long)]
        reference_dir: Option<PathBuf>,

        /// Directory to write the convolved table(s) into
        #[arg(long, short)]
        output_dir: Option<PathBuf>,

        /// Worker threads for per-observation convolution
        #[arg(long)]
        threads: Option<usize>,

        /// JSON config file; flags override its values
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List supported sensors
    Sensors,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Sensors => {
            list_sensors();
            Ok(())
        }
        Command::Run {
            input,
            sensor,
            reference_dir,
            output_dir,
            threads,
            config,
        } => {
            let base = match config {
                Some(path) => RunConfig::from_file(&path)?,
                None => RunConfig::default(),
            };
            let config = base.merge(RunConfig {
                reference_dir,
                output_dir,
                threads,
            });
            run(&input, &sensor, &config)
        }
    }
}

fn run(input: &std::path::Path, sensor: &str, config: &RunConfig) -> Result<()> {
    // Reject unknown sensors before touching any file.
    let sensor: Sensor = sensor.parse()?;
    let reference_dir = config.validate()?;

    if let Some(threads) = config.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("configuring worker threads")?;
    }

    let table = load_reflectance(input)?;
    let convolver = Convolver::new(ReferenceDir::new(reference_dir));
    let result = convolver.convolve(&table, sensor, config.output_dir.as_deref())?;

    let band_count = match sensor.family() {
        SensorFamily::FixedBands { bands, .. } => bands.len(),
        SensorFamily::Bandpass { .. } => result.means.columns().len(),
    };
    info!(
        "{sensor}: {} observations × {band_count} bands, {} band(s) without input coverage",
        table.len(),
        result.diagnostics.len()
    );

    if config.output_dir.is_none() {
        let stdout = std::io::stdout();
        result.means.write_csv(stdout.lock())?;
        if let Some(stds) = &result.stds {
            println!();
            stds.write_csv(stdout.lock())?;
        }
    }
    Ok(())
}

fn list_sensors() {
    for sensor in Sensor::ALL {
        let family = match sensor.family() {
            SensorFamily::FixedBands { bands, with_stds } => format!(
                "fixed bands ({}{})",
                bands.len(),
                if with_stds { ", with stds" } else { "" }
            ),
            SensorFamily::Bandpass { resolution } => {
                format!("bandpass ({} nm SRF)", resolution.step_nm())
            }
        };
        match sensor.legacy_name() {
            Some(legacy) => println!("{:<12} {:<26} alias {legacy}", sensor.id(), family),
            None => println!("{:<12} {family}", sensor.id()),
        }
    }
}
