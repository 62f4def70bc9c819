//! Static configuration and initial particle placement.

use crate::core::geometry::distance_between;
use crate::core::particle::DIM;
use crate::core::{BoxGeometry, IdGenerator, Particle};
use crate::error::{Error, Result};
use rand::{rng, rngs::StdRng, Rng, SeedableRng};
use std::f64::consts::TAU;

/// Default number of consecutive rejected positions before placement gives up.
pub const DEFAULT_MAX_TRIES: usize = 100_000;

/// Physical parameters of a run, as stored in the static file.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticConfig {
    /// Number of particles.
    pub n: usize,
    /// Common particle mass.
    pub mass: f64,
    /// Common initial speed.
    pub speed: f64,
    /// One radius per particle.
    pub radii: Vec<f64>,
    /// Box height `L`.
    pub height: f64,
    /// Box width `W`.
    pub width: f64,
}

impl StaticConfig {
    /// `n` particles sharing one radius.
    pub fn uniform(n: usize, mass: f64, speed: f64, radius: f64, height: f64, width: f64) -> Result<Self> {
        let mut radii = Vec::new();
        radii
            .try_reserve_exact(n)
            .map_err(|e| Error::InvalidParam(format!("cannot hold {n} particles: {e}")))?;
        radii.resize(n, radius);
        let config = Self {
            n,
            mass,
            speed,
            radii,
            height,
            width,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check everything that does not depend on the opening.
    pub fn validate(&self) -> Result<()> {
        if self.radii.len() != self.n {
            return Err(Error::InvalidParam(format!(
                "expected {} radii, got {}",
                self.n,
                self.radii.len()
            )));
        }
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(Error::InvalidParam("mass must be finite and > 0".into()));
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(Error::InvalidParam("speed must be finite and >= 0".into()));
        }
        if !self.radii.iter().all(|r| r.is_finite() && *r >= 0.0) {
            return Err(Error::InvalidParam("radii must be finite and >= 0".into()));
        }
        if !self.height.is_finite() || self.height <= 0.0 {
            return Err(Error::InvalidParam("height must be finite and > 0".into()));
        }
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(Error::InvalidParam("width must be finite and > 0".into()));
        }
        Ok(())
    }

    /// The box these parameters describe, partitioned with the given `opening`.
    pub fn geometry(&self, opening: f64) -> Result<BoxGeometry> {
        self.validate()?;
        BoxGeometry::new(self.width, self.height, opening)
    }

    /// Temperature-like reference value `1/2 m v^2` of the initial speed.
    pub fn temperature(&self) -> f64 {
        0.5 * self.mass * self.speed * self.speed
    }

    /// Region particles start in: the left half of the box.
    pub fn left_half(&self) -> Region {
        Region {
            min: [0.0, 0.0],
            max: [self.width / 2.0, self.height],
        }
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub min: [f64; DIM],
    pub max: [f64; DIM],
}

/// RNG seeded from `seed`, or from the thread RNG when `None`.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => SeedableRng::seed_from_u64(s),
        None => SeedableRng::seed_from_u64(rng().random()),
    }
}

/// Place one particle per entry of `radii` inside `region` without overlap.
///
/// Positions are uniform over the area where the whole disk fits; directions are uniform
/// in [0, 2π) with magnitude `speed`. A particle that cannot be placed within `max_tries`
/// consecutive attempts aborts the placement.
pub fn random_particles<R: Rng>(
    region: Region,
    radii: &[f64],
    speed: f64,
    mass: f64,
    max_tries: usize,
    ids: &mut IdGenerator,
    rng: &mut R,
) -> Result<Vec<Particle>> {
    let mut particles: Vec<Particle> = Vec::with_capacity(radii.len());
    for &radius in radii {
        let mut lo = [0.0_f64; DIM];
        let mut hi = [0.0_f64; DIM];
        for k in 0..DIM {
            lo[k] = region.min[k] + radius;
            hi[k] = region.max[k] - radius;
            if lo[k] > hi[k] {
                return Err(Error::InvalidParam(format!(
                    "radius {radius} does not fit in the placement region"
                )));
            }
        }

        let mut attempts = 0usize;
        let candidate = loop {
            if attempts >= max_tries {
                return Err(Error::Placement {
                    placed: particles.len(),
                    requested: radii.len(),
                });
            }
            attempts += 1;

            let mut r = [0.0_f64; DIM];
            for (k, r_k) in r.iter_mut().enumerate() {
                *r_k = rng.random_range(lo[k]..=hi[k]);
            }
            let theta = rng.random_range(0.0..TAU);
            let v = [speed * theta.cos(), speed * theta.sin()];

            // Id is only drawn once the position is accepted.
            let p = Particle::new(0, r, v, radius, mass)?;
            if !particles.iter().any(|q| distance_between(q, &p) < 0.0) {
                break p;
            }
        };
        particles.push(Particle {
            id: ids.next_id(),
            ..candidate
        });
    }
    Ok(particles)
}

/// Generate the initial particles of `config`: left half of the box, common speed and mass.
pub fn initial_particles(config: &StaticConfig, max_tries: usize, seed: Option<u64>) -> Result<Vec<Particle>> {
    config.validate()?;
    let mut rng = seeded_rng(seed);
    let mut ids = IdGenerator::new();
    random_particles(
        config.left_half(),
        &config.radii,
        config.speed,
        config.mass,
        max_tries,
        &mut ids,
        &mut rng,
    )
}
