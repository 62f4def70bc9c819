//! Command-line front end: generate input files, run the diffusion and export for Ovito.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gasdiffusion::core::{GasDiffusion, IdGenerator};
use gasdiffusion::driver::{Driver, DriverConfig, StopReason, DEFAULT_INTERVALS_AFTER_EQUILIBRIUM};
use gasdiffusion::io::{
    export_ovito, read_dynamic, read_static, write_dynamic, write_static, WriterSink, DYNAMIC_FILE, OVITO_FILE,
    STATIC_FILE,
};
use gasdiffusion::setup::{initial_particles, StaticConfig, DEFAULT_MAX_TRIES};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "gasdiffusion", about = "Hard-disk gas diffusing through a partitioned box")]
struct Cli {
    /// Directory every generated file is written to.
    #[arg(long, global = true, default_value = "output")]
    output_dir: PathBuf,

    /// Seed for particle placement; random when omitted.
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write a static file for N equal disks.
    GenStatic {
        n: usize,
        mass: f64,
        speed: f64,
        radius: f64,
        /// Box height L.
        height: f64,
        /// Box width W.
        width: f64,
    },
    /// Place the particles of a static file in the left half and write a dynamic file.
    GenDynamic {
        #[arg(value_name = "STATIC")]
        static_file: PathBuf,
        #[arg(long, default_value_t = DEFAULT_MAX_TRIES)]
        max_tries: usize,
    },
    /// Run the simulation until equilibrium and beyond.
    Gas {
        #[arg(value_name = "STATIC")]
        static_file: PathBuf,
        #[arg(value_name = "DYNAMIC")]
        dynamic_file: PathBuf,
        /// Reporting interval.
        dt2: f64,
        /// Height of the gap in the partition.
        opening: f64,
        #[arg(long, default_value_t = DEFAULT_INTERVALS_AFTER_EQUILIBRIUM)]
        intervals_after_equilibrium: u64,
        /// Stop after this many collisions.
        #[arg(long)]
        max_steps: Option<u64>,
    },
    /// Convert a trajectory file into an XYZ file with box markers.
    Ovito {
        #[arg(value_name = "STATIC")]
        static_file: PathBuf,
        #[arg(value_name = "OUTPUT")]
        trajectory: PathBuf,
        opening: f64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    fs::create_dir_all(&cli.output_dir)
        .with_context(|| format!("creating {}", cli.output_dir.display()))?;

    match cli.command {
        Command::GenStatic {
            n,
            mass,
            speed,
            radius,
            height,
            width,
        } => {
            let config = StaticConfig::uniform(n, mass, speed, radius, height, width)?;
            let path = cli.output_dir.join(STATIC_FILE);
            write_static(BufWriter::new(create(&path)?), &config)?;
            tracing::info!(path = %path.display(), "static file written");
        }
        Command::GenDynamic { static_file, max_tries } => {
            let config = load_static(&static_file)?;
            let particles = initial_particles(&config, max_tries, cli.seed).context("placing particles")?;
            let path = cli.output_dir.join(DYNAMIC_FILE);
            write_dynamic(BufWriter::new(create(&path)?), &particles)?;
            tracing::info!(path = %path.display(), particles = particles.len(), "dynamic file written");
        }
        Command::Gas {
            static_file,
            dynamic_file,
            dt2,
            opening,
            intervals_after_equilibrium,
            max_steps,
        } => {
            let config = load_static(&static_file)?;
            let particles = read_dynamic(BufReader::new(open(&dynamic_file)?), &config, &mut IdGenerator::new())
                .with_context(|| format!("reading {}", dynamic_file.display()))?;
            let engine = GasDiffusion::new(config.geometry(opening)?);
            let driver_config = DriverConfig {
                intervals_after_equilibrium,
                max_steps,
                ..DriverConfig::new(dt2)?
            };

            let mut sink = WriterSink::create(&cli.output_dir, config)?;
            let mut driver = Driver::new(engine, particles, driver_config)?;
            let summary = driver.run(&mut sink)?;
            sink.into_inner()?;

            match summary.stop {
                StopReason::Completed => tracing::info!(
                    steps = summary.steps,
                    snapshots = summary.snapshots,
                    simulated_time = summary.simulated_time,
                    "simulation complete"
                ),
                reason => tracing::warn!(?reason, steps = summary.steps, "simulation stopped early"),
            }
        }
        Command::Ovito {
            static_file,
            trajectory,
            opening,
        } => {
            let config = load_static(&static_file)?;
            config.geometry(opening)?;
            let path = cli.output_dir.join(OVITO_FILE);
            export_ovito(
                &config,
                opening,
                BufReader::new(open(&trajectory)?),
                BufWriter::new(create(&path)?),
            )
            .with_context(|| format!("converting {}", trajectory.display()))?;
        }
    }
    Ok(())
}

fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("opening {}", path.display()))
}

fn create(path: &Path) -> Result<File> {
    File::create(path).with_context(|| format!("creating {}", path.display()))
}

fn load_static(path: &Path) -> Result<StaticConfig> {
    read_static(BufReader::new(open(path)?)).with_context(|| format!("reading {}", path.display()))
}
