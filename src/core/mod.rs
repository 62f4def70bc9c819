//! Event-driven collision engine for a 2D hard-disk gas.
//!
//! Leaves first: [`particle`] values, pure [`geometry`] contact times, [`wall`] kinds and
//! the box shape, the [`event`] model, and the [`engine`] that predicts, advances and
//! resolves one step at a time.

pub mod engine;
pub mod event;
pub mod geometry;
pub mod particle;
pub mod wall;

pub use engine::{GasDiffusion, StepData, TieSet};
pub use event::{Event, EventKind};
pub use particle::{IdGenerator, Particle};
pub use wall::{BoxGeometry, Wall};
