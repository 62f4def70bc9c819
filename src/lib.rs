//! Event-driven simulation of a 2D hard-disk gas diffusing through an opening in a
//! partition.
//!
//! The box `[0, W] x [0, L]` is split at `x = W/2` by a wall with a centered gap. Particles
//! start on the left; the [`core::GasDiffusion`] engine jumps from one collision to the next
//! and reports, at every step, the elapsed time, the fraction of particles still on the
//! left and the pressure on the outer walls. The [`driver::Driver`] keeps stepping until
//! half the gas has crossed and snapshots the system every reporting interval.
//!
//! ```rust,ignore
//! use gasdiffusion::core::GasDiffusion;
//! use gasdiffusion::setup::{initial_particles, StaticConfig, DEFAULT_MAX_TRIES};
//!
//! let config = StaticConfig::uniform(100, 1.0, 0.01, 0.0015, 0.09, 0.24)?;
//! let mut engine = GasDiffusion::new(config.geometry(0.01)?);
//! let particles = initial_particles(&config, DEFAULT_MAX_TRIES, Some(1))?;
//! let step = engine.run(particles);
//! println!("{} {}", step.collision_time, step.left_side_fraction);
//! ```

pub mod core;
pub mod driver;
pub mod error;
pub mod io;
pub mod setup;

#[cfg(feature = "python")]
mod python;
