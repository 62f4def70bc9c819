//! Snapshot sink writing the trajectory, per-interval CSV and equilibrium summary.

use crate::core::Particle;
use crate::driver::{EquilibriumReport, Snapshot, SnapshotSink};
use crate::error::Result;
use crate::io::{INTERVALS_FILE, OUTPUT_FILE, SUMMARY_FILE};
use crate::setup::StaticConfig;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

const INTERVALS_HEADER: &str = "Iteration,Time (s),Fraction,Pressure,Temperature";

/// Trajectory frame: the iteration line, then `id id x y vx vy R G B` per particle.
///
/// Colours: red for particles resolved in the last step, green on the left of the
/// partition (`x <= W/2`, the side the left-side fraction counts), blue on the right.
pub fn write_frame<W: Write>(mut w: W, particles: &[Particle], width: f64, iteration: u64) -> Result<()> {
    writeln!(w, "{iteration}")?;
    for p in particles {
        let (r, g, b) = if p.colliding {
            (1, 0, 0)
        } else if p.x() <= width / 2.0 {
            (0, 1, 0)
        } else {
            (0, 0, 1)
        };
        writeln!(
            w,
            "{id}\t{id}\t{}\t{}\t{}\t{}\t{r}\t{g}\t{b}",
            p.r[0],
            p.r[1],
            p.v[0],
            p.v[1],
            id = p.id
        )?;
    }
    Ok(())
}

/// `key,value` lines describing the run at equilibrium.
pub fn write_summary<W: Write>(mut w: W, config: &StaticConfig, report: &EquilibriumReport) -> Result<()> {
    writeln!(w, "N,{}", config.n)?;
    writeln!(w, "L,{}", config.height)?;
    writeln!(w, "W,{}", config.width)?;
    writeln!(w, "mass,{}", config.mass)?;
    writeln!(w, "speed,{}", config.speed)?;
    writeln!(w, "iteration,{}", report.iteration)?;
    writeln!(w, "Real Time (in seconds),{}", report.time)?;
    writeln!(w, "Pressure,{}", report.mean_pressure)?;
    writeln!(w, "Temperature,{}", config.temperature())?;
    Ok(())
}

/// [`SnapshotSink`] over three writers: trajectory frames, one CSV row per snapshot and
/// the equilibrium summary.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    trajectory: W,
    intervals: W,
    summary: W,
    config: StaticConfig,
    header_written: bool,
}

impl<W: Write> WriterSink<W> {
    pub fn new(trajectory: W, intervals: W, summary: W, config: StaticConfig) -> Self {
        Self {
            trajectory,
            intervals,
            summary,
            config,
            header_written: false,
        }
    }

    /// Flush and hand back the writers (trajectory, intervals, summary).
    pub fn into_inner(mut self) -> Result<(W, W, W)> {
        self.trajectory.flush()?;
        self.intervals.flush()?;
        self.summary.flush()?;
        Ok((self.trajectory, self.intervals, self.summary))
    }
}

impl WriterSink<BufWriter<File>> {
    /// Create `dir` if needed and start fresh output files inside it.
    pub fn create(dir: &Path, config: StaticConfig) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let open = |name: &str| -> Result<BufWriter<File>> { Ok(BufWriter::new(File::create(dir.join(name))?)) };
        Ok(Self::new(
            open(OUTPUT_FILE)?,
            open(INTERVALS_FILE)?,
            open(SUMMARY_FILE)?,
            config,
        ))
    }
}

impl<W: Write> SnapshotSink for WriterSink<W> {
    fn snapshot(&mut self, snapshot: &Snapshot) -> Result<()> {
        write_frame(
            &mut self.trajectory,
            &snapshot.particles,
            self.config.width,
            snapshot.iteration,
        )?;
        if !self.header_written {
            writeln!(self.intervals, "{INTERVALS_HEADER}")?;
            self.header_written = true;
        }
        writeln!(
            self.intervals,
            "{},{},{},{},{}",
            snapshot.iteration,
            snapshot.time,
            snapshot.left_side_fraction,
            snapshot.pressure,
            snapshot.mean_kinetic_energy()
        )?;
        Ok(())
    }

    fn equilibrium(&mut self, report: &EquilibriumReport) -> Result<()> {
        write_summary(&mut self.summary, &self.config, report)?;
        self.summary.flush()?;
        Ok(())
    }
}
