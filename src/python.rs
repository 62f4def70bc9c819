use numpy::ndarray::Array2;
use numpy::{IntoPyArray, PyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::core::particle::DIM;
use crate::core::{GasDiffusion, Particle};
use crate::setup::{initial_particles, StaticConfig, DEFAULT_MAX_TRIES};

fn py_err<E: ToString>(e: E) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn to_array<F: Fn(&Particle) -> [f64; DIM]>(particles: &[Particle], f: F) -> Array2<f64> {
    let mut arr = Array2::<f64>::zeros((particles.len(), DIM));
    for (i, p) in particles.iter().enumerate() {
        for (k, value) in f(p).into_iter().enumerate() {
            arr[[i, k]] = value;
        }
    }
    arr
}

/// Python-facing wrapper around the collision engine.
///
/// API:
/// - __new__(num_particles, mass, speed, radius, height, width, opening, seed=None)
/// - step() -> (collision_time, left_side_fraction, pressure)
/// - get_positions() / get_velocities() -> np.ndarray, shape (N, 2)
#[pyclass]
pub struct GasDiffusionSim {
    engine: GasDiffusion,
    particles: Vec<Particle>,
    left_side_fraction: f64,
}

#[pymethods]
impl GasDiffusionSim {
    /// Place `num_particles` disks in the left half of a `width` x `height` box whose
    /// partition has an opening of `opening`.
    ///
    /// Errors: raises ValueError on invalid parameters or when the disks do not fit.
    #[new]
    #[pyo3(signature = (num_particles, mass, speed, radius, height, width, opening, seed=None))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        num_particles: usize,
        mass: f64,
        speed: f64,
        radius: f64,
        height: f64,
        width: f64,
        opening: f64,
        seed: Option<u64>,
    ) -> PyResult<Self> {
        let config = StaticConfig::uniform(num_particles, mass, speed, radius, height, width).map_err(py_err)?;
        let engine = GasDiffusion::new(config.geometry(opening).map_err(py_err)?);
        let particles = initial_particles(&config, DEFAULT_MAX_TRIES, seed).map_err(py_err)?;
        let left_side_fraction = engine.left_side_fraction(&particles);
        Ok(Self {
            engine,
            particles,
            left_side_fraction,
        })
    }

    /// Advance to the next event (releases the GIL during computation).
    ///
    /// Returns (collision_time, left_side_fraction, pressure); collision_time is 0 when no
    /// event exists any more.
    fn step(&mut self, py: Python<'_>) -> (f64, f64, f64) {
        let particles = std::mem::take(&mut self.particles);
        let engine = &mut self.engine;
        let step = py.detach(|| engine.run(particles));
        self.particles = step.particles;
        self.left_side_fraction = step.left_side_fraction;
        (step.collision_time, step.left_side_fraction, step.pressure)
    }

    /// Return positions as a NumPy array of shape (N, 2), dtype=float64.
    fn get_positions(&self, py: Python<'_>) -> Py<PyArray2<f64>> {
        to_array(&self.particles, |p| p.r).into_pyarray(py).unbind()
    }

    /// Return velocities as a NumPy array of shape (N, 2), dtype=float64.
    fn get_velocities(&self, py: Python<'_>) -> Py<PyArray2<f64>> {
        to_array(&self.particles, |p| p.v).into_pyarray(py).unbind()
    }

    fn left_side_fraction(&self) -> f64 {
        self.left_side_fraction
    }

    /// Pressure accumulated since the last reset.
    fn current_pressure(&self) -> f64 {
        self.engine.current_pressure()
    }

    fn total_pressure(&self) -> f64 {
        self.engine.total_pressure()
    }

    fn reset_pressure(&mut self) {
        self.engine.reset_current_pressure();
    }
}

/// The gasdiffusion Python module entry point.
#[pymodule]
fn gasdiffusion(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<GasDiffusionSim>()?;
    Ok(())
}
