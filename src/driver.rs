//! Run loop around the engine: steps until half the gas has crossed the partition, then
//! for a fixed number of further reporting intervals, snapshotting every `dt2`.

use crate::core::{GasDiffusion, Particle};
use crate::error::{Error, Result};
use tracing::{debug, info};

/// Reporting intervals simulated after equilibrium unless configured otherwise.
pub const DEFAULT_INTERVALS_AFTER_EQUILIBRIUM: u64 = 100;

/// Driver parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverConfig {
    /// Reporting interval (> 0).
    pub dt2: f64,
    /// Snapshots to take once the left-side fraction has dropped to 0.5.
    pub intervals_after_equilibrium: u64,
    /// Hard bound on engine steps; `None` for unbounded.
    pub max_steps: Option<u64>,
}

impl DriverConfig {
    pub fn new(dt2: f64) -> Result<Self> {
        let config = Self {
            dt2,
            intervals_after_equilibrium: DEFAULT_INTERVALS_AFTER_EQUILIBRIUM,
            max_steps: None,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.dt2.is_finite() || self.dt2 <= 0.0 {
            return Err(Error::InvalidParam("dt2 must be finite and > 0".into()));
        }
        Ok(())
    }
}

/// State of the system at a reporting instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub iteration: u64,
    /// `iteration * dt2`.
    pub time: f64,
    pub left_side_fraction: f64,
    /// Pressure accumulated during the interval that just ended.
    pub pressure: f64,
    pub particles: Vec<Particle>,
}

impl Snapshot {
    /// Mean kinetic energy per particle (0 for an empty system).
    pub fn mean_kinetic_energy(&self) -> f64 {
        if self.particles.is_empty() {
            return 0.0;
        }
        let total: f64 = self.particles.iter().map(Particle::kinetic_energy).sum();
        total / self.particles.len() as f64
    }
}

/// Reported once, when the left-side fraction first drops to 0.5 or below.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquilibriumReport {
    pub iteration: u64,
    pub time: f64,
    /// Total pressure divided by the number of completed intervals.
    pub mean_pressure: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Equilibrium reached and the extra intervals simulated.
    Completed,
    /// No further event exists.
    Idle,
    /// `max_steps` exhausted.
    StepLimit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub equilibrium: Option<EquilibriumReport>,
    pub stop: StopReason,
    /// Engine steps taken.
    pub steps: u64,
    /// Snapshots emitted, the initial one included.
    pub snapshots: u64,
    /// Sum of all collision times.
    pub simulated_time: f64,
}

/// Persistence boundary: receives snapshots as the run progresses.
pub trait SnapshotSink {
    fn snapshot(&mut self, snapshot: &Snapshot) -> Result<()>;

    fn equilibrium(&mut self, _report: &EquilibriumReport) -> Result<()> {
        Ok(())
    }
}

impl SnapshotSink for Vec<Snapshot> {
    fn snapshot(&mut self, snapshot: &Snapshot) -> Result<()> {
        self.push(snapshot.clone());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Progress {
    Advanced,
    Snapshot,
    Stopped(StopReason),
}

/// Owns the particles between engine calls and keeps the reporting clock.
#[derive(Debug)]
pub struct Driver {
    engine: GasDiffusion,
    particles: Vec<Particle>,
    config: DriverConfig,
    /// Time since the last snapshot boundary.
    elapsed: f64,
    iteration: u64,
    left_side_fraction: f64,
    steps: u64,
    simulated_time: f64,
}

impl Driver {
    pub fn new(engine: GasDiffusion, particles: Vec<Particle>, config: DriverConfig) -> Result<Self> {
        config.validate()?;
        let left_side_fraction = engine.left_side_fraction(&particles);
        Ok(Self {
            engine,
            particles,
            config,
            elapsed: 0.0,
            iteration: 0,
            left_side_fraction,
            steps: 0,
            simulated_time: 0.0,
        })
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn engine(&self) -> &GasDiffusion {
        &self.engine
    }

    pub fn left_side_fraction(&self) -> f64 {
        self.left_side_fraction
    }

    /// Run to completion, writing snapshots into `sink`.
    pub fn run<S: SnapshotSink + ?Sized>(&mut self, sink: &mut S) -> Result<RunSummary> {
        self.emit(sink, 0.0)?;

        let mut stop = None;
        while stop.is_none() && self.left_side_fraction > 0.5 {
            if let Progress::Stopped(reason) = self.advance(sink)? {
                stop = Some(reason);
            }
        }

        let mut equilibrium = None;
        if stop.is_none() {
            let report = EquilibriumReport {
                iteration: self.iteration,
                time: self.iteration as f64 * self.config.dt2,
                mean_pressure: if self.iteration > 0 {
                    self.engine.total_pressure() / self.iteration as f64
                } else {
                    0.0
                },
            };
            info!(
                iteration = report.iteration,
                time = report.time,
                mean_pressure = report.mean_pressure,
                "equilibrium reached"
            );
            sink.equilibrium(&report)?;
            equilibrium = Some(report);

            let mut after = 0u64;
            while after < self.config.intervals_after_equilibrium {
                match self.advance(sink)? {
                    Progress::Snapshot => after += 1,
                    Progress::Advanced => {}
                    Progress::Stopped(reason) => {
                        stop = Some(reason);
                        break;
                    }
                }
            }
        }

        let stop = stop.unwrap_or(StopReason::Completed);
        info!(?stop, steps = self.steps, snapshots = self.iteration, "run finished");
        Ok(RunSummary {
            equilibrium,
            stop,
            steps: self.steps,
            snapshots: self.iteration,
            simulated_time: self.simulated_time,
        })
    }

    /// One engine step plus reporting-interval bookkeeping.
    fn advance<S: SnapshotSink + ?Sized>(&mut self, sink: &mut S) -> Result<Progress> {
        if self.config.max_steps.is_some_and(|max| self.steps >= max) {
            info!(steps = self.steps, "step limit reached");
            return Ok(Progress::Stopped(StopReason::StepLimit));
        }

        let particles = std::mem::take(&mut self.particles);
        let step = self.engine.run(particles);
        self.particles = step.particles;
        if step.events.is_empty() {
            info!("no collision at any time with the given parameters; check the setup");
            return Ok(Progress::Stopped(StopReason::Idle));
        }

        self.steps += 1;
        self.left_side_fraction = step.left_side_fraction;
        self.simulated_time += step.collision_time;
        self.elapsed += step.collision_time;

        if self.elapsed >= self.config.dt2 {
            // Skipped intervals collapse into one snapshot.
            self.elapsed %= self.config.dt2;
            let pressure = self.engine.current_pressure();
            self.emit(sink, pressure)?;
            self.engine.reset_current_pressure();
            return Ok(Progress::Snapshot);
        }
        Ok(Progress::Advanced)
    }

    fn emit<S: SnapshotSink + ?Sized>(&mut self, sink: &mut S, pressure: f64) -> Result<()> {
        let snapshot = Snapshot {
            iteration: self.iteration,
            time: self.iteration as f64 * self.config.dt2,
            left_side_fraction: self.left_side_fraction,
            pressure,
            particles: self.particles.clone(),
        };
        debug!(
            iteration = snapshot.iteration,
            fraction = snapshot.left_side_fraction,
            pressure,
            "snapshot"
        );
        sink.snapshot(&snapshot)?;
        self.iteration += 1;
        Ok(())
    }
}
