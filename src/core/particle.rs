use crate::error::{Error, Result};

/// Fixed spatial dimension (2D).
pub const DIM: usize = 2;

/// Axis index of the x component.
pub const X: usize = 0;
/// Axis index of the y component.
pub const Y: usize = 1;

/// A hard disk of the gas.
///
/// Particles are values: every step produces a new generation advanced to the next event
/// time and the previous generation is dropped. Fields:
/// - `id`: stable identifier, assigned once by an [`IdGenerator`]
/// - `r`: position [x, y]
/// - `v`: velocity [vx, vy]
/// - `radius`: disk radius (>= 0)
/// - `mass`: particle mass (> 0)
/// - `colliding`: set only on the copy produced by the event resolved in the current step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Stable particle identifier.
    pub id: u64,
    /// Position (x, y).
    pub r: [f64; DIM],
    /// Velocity (vx, vy).
    pub v: [f64; DIM],
    /// Disk radius (>= 0).
    pub radius: f64,
    /// Mass (> 0).
    pub mass: f64,
    /// Whether this copy is the direct result of the event just resolved.
    pub colliding: bool,
}

impl Particle {
    /// Create a new particle after validating invariants.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if `radius` is negative, `mass` is non-positive, or any
    ///   component is NaN/inf.
    pub fn new(id: u64, r: [f64; DIM], v: [f64; DIM], radius: f64, mass: f64) -> Result<Self> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(Error::InvalidParam("radius must be finite and >= 0".into()));
        }
        if !mass.is_finite() || mass <= 0.0 {
            return Err(Error::InvalidParam("mass must be finite and > 0".into()));
        }
        if !r.iter().all(|x| x.is_finite()) {
            return Err(Error::InvalidParam("position must be finite".into()));
        }
        if !v.iter().all(|x| x.is_finite()) {
            return Err(Error::InvalidParam("velocity must be finite".into()));
        }
        Ok(Self {
            id,
            r,
            v,
            radius,
            mass,
            colliding: false,
        })
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.r[X]
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.r[Y]
    }

    /// Velocity magnitude.
    #[inline]
    pub fn speed(&self) -> f64 {
        dot(&self.v, &self.v).sqrt()
    }

    /// Returns the particle's kinetic energy: 1/2 m |v|^2.
    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * dot(&self.v, &self.v)
    }

    /// Free flight: the same particle advanced by `dt` with unchanged velocity.
    #[must_use]
    pub fn moved(&self, dt: f64) -> Self {
        let mut r = self.r;
        for (rk, vk) in r.iter_mut().zip(self.v.iter()) {
            *rk += vk * dt;
        }
        Self {
            r,
            colliding: false,
            ..*self
        }
    }

    /// Free flight by `dt`, then the velocity is replaced by `v` and the copy is marked as
    /// colliding. Used by event resolution.
    #[must_use]
    pub fn moved_with_velocity(&self, dt: f64, v: [f64; DIM]) -> Self {
        Self {
            v,
            colliding: true,
            ..self.moved(dt)
        }
    }
}

/// Hands out particle identifiers. Ids start at 1 and are never reused.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Returns the next unused id.
    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
pub(crate) fn dot(a: &[f64; DIM], b: &[f64; DIM]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
