use crate::core::particle::{dot, Particle, DIM};
use crate::core::wall::Wall;
use crate::error::{Error, Result};
use ordered_float::NotNan;
use std::cmp::Ordering;
use tracing::warn;

/// Largest relative kinetic-energy change tolerated when resolving a pair collision.
pub const KINETIC_ENERGY_TOLERANCE: f64 = 1e-6;

/// What happens at an event and to whom.
///
/// Participants are referenced by their index in the particle collection the prediction
/// ran over. Resolution reads them from the generation advanced to the event time, so
/// tied events sharing a particle compose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventKind {
    /// Particle-to-particle collision between particles at indices `i` and `j`.
    Points { i: usize, j: usize },
    /// Particle-to-wall bounce of the particle at index `i`.
    Wall {
        i: usize,
        wall: Wall,
        /// Length used to normalize the pressure contribution (0 for the partition).
        wall_length: f64,
        /// Sign of the normal velocity component when the hit was predicted.
        heading: f64,
    },
}

/// A predicted event, `time` after "now".
///
/// Events compare by `time` only: two events at the same time are equal for ordering
/// purposes, whatever their participants. That is what lets the engine collect every
/// event tied at the earliest time.
#[derive(Debug, Clone, Copy)]
pub struct Event {
    pub time: NotNan<f64>,
    pub kind: EventKind,
}

impl Event {
    /// Create a new event, validating that time is finite and non-negative.
    pub fn new(time: f64, kind: EventKind) -> Result<Self> {
        if time.is_nan() {
            return Err(Error::InvalidParam("event time cannot be NaN".into()));
        }
        if !time.is_finite() {
            return Err(Error::InvalidParam("event time must be finite".into()));
        }
        if time < 0.0 {
            return Err(Error::InvalidParam("event time cannot be negative".into()));
        }
        let time = NotNan::new(time)
            .map_err(|_| Error::InvalidParam("event time cannot be NaN".into()))?;
        Ok(Self { time, kind })
    }

    /// Collision between the particles at indices `i` and `j`.
    pub fn points(time: f64, i: usize, j: usize) -> Result<Self> {
        Self::new(time, EventKind::Points { i, j })
    }

    /// Bounce of `particle` (at index `i`) off `wall`. Only the direction `particle` is
    /// heading along the wall normal is recorded.
    pub fn wall(time: f64, i: usize, particle: &Particle, wall: Wall, wall_length: f64) -> Result<Self> {
        let heading = particle.v[wall.normal_axis()].signum();
        Self::new(
            time,
            EventKind::Wall {
                i,
                wall,
                wall_length,
                heading,
            },
        )
    }

    /// Returns the raw f64 event time.
    #[inline]
    pub fn time_f64(&self) -> f64 {
        self.time.into_inner()
    }

    /// Lowest collection index taking part in this event.
    #[inline]
    pub fn first_index(&self) -> usize {
        match self.kind {
            EventKind::Points { i, j } => i.min(j),
            EventKind::Wall { i, .. } => i,
        }
    }

    /// Whether the particle at collection index `index` takes part.
    pub fn involves(&self, index: usize) -> bool {
        match self.kind {
            EventKind::Points { i, j } => i == index || j == index,
            EventKind::Wall { i, .. } => i == index,
        }
    }

    /// Resolve the event on `particles`, the generation already advanced to the event
    /// time. Returns `(index, particle)` for each participant, with post-contact
    /// velocities and the colliding flag set.
    ///
    /// A participant that an earlier tied event already turned away is left moving as it
    /// is: a wall only reflects a particle still heading into it, and a pair only
    /// exchanges momentum while approaching.
    pub fn execute(&self, particles: &[Particle]) -> Vec<(usize, Particle)> {
        match self.kind {
            EventKind::Points { i, j } => {
                let (a, b) = elastic_collision(&particles[i], &particles[j]);
                vec![(i, a), (j, b)]
            }
            EventKind::Wall { i, wall, heading, .. } => {
                let p = &particles[i];
                let mut v = p.v;
                let axis = wall.normal_axis();
                if v[axis] * heading > 0.0 {
                    v[axis] = -v[axis];
                }
                vec![(i, p.moved_with_velocity(0.0, v))]
            }
        }
    }

    /// Pressure contribution of this event on `particles` (as passed to
    /// [`execute`](Self::execute)): zero for a pair collision, `2·m·|v| / wall_length`
    /// for an outer wall hit and `None` for walls without length.
    pub fn pressure(&self, particles: &[Particle]) -> Option<f64> {
        match self.kind {
            EventKind::Points { .. } => Some(0.0),
            EventKind::Wall {
                i,
                wall,
                wall_length,
                heading,
            } => {
                if wall_length <= 0.0 {
                    return None;
                }
                let p = &particles[i];
                if p.v[wall.normal_axis()] * heading > 0.0 {
                    Some(2.0 * p.mass * p.speed() / wall_length)
                } else {
                    Some(0.0)
                }
            }
        }
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.time.cmp(&other.time))
    }
}

/// Elastic hard-disk collision of two touching disks: only the velocity component along
/// the center line changes, momentum and kinetic energy are conserved.
fn elastic_collision(a: &Particle, b: &Particle) -> (Particle, Particle) {
    let mut n = [0.0_f64; DIM];
    for (k, nk) in n.iter_mut().enumerate() {
        *nk = b.r[k] - a.r[k];
    }
    let dist = dot(&n, &n).sqrt();
    if dist == 0.0 {
        // Coincident centers (only possible for point particles): no contact normal.
        warn!(a = a.id, b = b.id, "coincident particle centers, collision skipped");
        return (
            a.moved_with_velocity(0.0, a.v),
            b.moved_with_velocity(0.0, b.v),
        );
    }
    for nk in &mut n {
        *nk /= dist;
    }

    let mut u = [0.0_f64; DIM];
    for (k, uk) in u.iter_mut().enumerate() {
        *uk = b.v[k] - a.v[k];
    }
    let u_n = dot(&u, &n);
    if u_n >= 0.0 {
        // Already separating: nothing to exchange.
        return (
            a.moved_with_velocity(0.0, a.v),
            b.moved_with_velocity(0.0, b.v),
        );
    }

    // Impulse along n, shared through the reduced mass.
    let j = 2.0 * a.mass * b.mass * u_n / (a.mass + b.mass);
    let mut va = a.v;
    let mut vb = b.v;
    for k in 0..DIM {
        va[k] += j * n[k] / a.mass;
        vb[k] -= j * n[k] / b.mass;
    }

    let next_a = a.moved_with_velocity(0.0, va);
    let next_b = b.moved_with_velocity(0.0, vb);

    let before = a.kinetic_energy() + b.kinetic_energy();
    let after = next_a.kinetic_energy() + next_b.kinetic_energy();
    let drift = if before > 0.0 {
        ((after - before) / before).abs()
    } else {
        (after - before).abs()
    };
    if drift > KINETIC_ENERGY_TOLERANCE {
        warn!(a = a.id, b = b.id, before, after, "kinetic energy not conserved by collision");
    }
    debug_assert!(
        drift <= KINETIC_ENERGY_TOLERANCE,
        "kinetic energy not conserved: before={before}, after={after}"
    );

    (next_a, next_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::particle::{X, Y};

    fn disk(id: u64, r: [f64; 2], v: [f64; 2], mass: f64) -> Result<Particle> {
        Particle::new(id, r, v, 0.5, mass)
    }

    #[test]
    fn new_event_rejects_nan_time() -> Result<()> {
        let p = disk(1, [0.0, 0.0], [1.0, 0.0], 1.0)?;
        let err = Event::wall(f64::NAN, 0, &p, Wall::Vertical, 1.0).unwrap_err();
        assert!(err.to_string().contains("NaN"));
        Ok(())
    }

    #[test]
    fn new_event_rejects_negative_and_infinite_time() -> Result<()> {
        let p = disk(1, [0.0, 0.0], [1.0, 0.0], 1.0)?;
        assert!(Event::wall(-1e-3, 0, &p, Wall::Vertical, 1.0).is_err());
        assert!(Event::wall(f64::INFINITY, 0, &p, Wall::Vertical, 1.0).is_err());
        assert!(Event::wall(0.0, 0, &p, Wall::Vertical, 1.0).is_ok());
        Ok(())
    }

    #[test]
    fn ordering_by_time_with_ties() -> Result<()> {
        let p = disk(1, [0.0, 0.0], [1.0, 0.0], 1.0)?;
        let q = disk(2, [5.0, 0.0], [-1.0, 0.0], 1.0)?;
        let e1 = Event::points(1.0, 0, 1)?;
        let e2 = Event::wall(2.0, 0, &p, Wall::Vertical, 1.0)?;
        let e3 = Event::wall(1.0, 1, &q, Wall::Horizontal, 1.0)?;
        assert!(e1 < e2);
        // different participants, same time: tied
        assert_eq!(e1.partial_cmp(&e3), Some(Ordering::Equal));
        assert!(e1 == e3);
        Ok(())
    }

    #[test]
    fn equal_masses_swap_velocities_head_on() -> Result<()> {
        // already advanced to contact
        let ps = [
            disk(1, [4.5, 0.0], [1.0, 0.0], 1.0)?,
            disk(2, [5.5, 0.0], [-1.0, 0.0], 1.0)?,
        ];
        let ev = Event::points(4.5, 0, 1)?;
        let out = ev.execute(&ps);
        assert_eq!(out.len(), 2);
        let (i, a) = out[0];
        let (j, b) = out[1];
        assert_eq!((i, j), (0, 1));
        assert_eq!(a.r, ps[0].r);
        assert_eq!(b.r, ps[1].r);
        assert!((a.v[X] + 1.0).abs() < 1e-12);
        assert!((b.v[X] - 1.0).abs() < 1e-12);
        assert!(a.colliding && b.colliding);
        assert_eq!(ev.pressure(&ps), Some(0.0));
        Ok(())
    }

    #[test]
    fn oblique_collision_conserves_momentum_and_energy() -> Result<()> {
        // touching at 45 degrees
        let s = 1.0 / 2.0_f64.sqrt();
        let ps = [
            disk(1, [0.0, 0.0], [1.0, 0.2], 2.0)?,
            disk(2, [s, s], [-0.3, -0.4], 0.5)?,
        ];
        let out = Event::points(0.0, 0, 1)?.execute(&ps);
        let (a, b) = (out[0].1, out[1].1);
        for k in 0..DIM {
            let before = ps[0].mass * ps[0].v[k] + ps[1].mass * ps[1].v[k];
            let after = a.mass * a.v[k] + b.mass * b.v[k];
            assert!((before - after).abs() < 1e-12);
        }
        let e0 = ps[0].kinetic_energy() + ps[1].kinetic_energy();
        let e1 = a.kinetic_energy() + b.kinetic_energy();
        assert!(((e1 - e0) / e0).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn separating_pair_keeps_its_velocities() -> Result<()> {
        let ps = [
            disk(1, [4.5, 0.0], [-1.0, 0.0], 1.0)?,
            disk(2, [5.5, 0.0], [1.0, 0.0], 1.0)?,
        ];
        let out = Event::points(0.0, 0, 1)?.execute(&ps);
        assert_eq!(out[0].1.v, [-1.0, 0.0]);
        assert_eq!(out[1].1.v, [1.0, 0.0]);
        assert!(out[0].1.colliding && out[1].1.colliding);
        Ok(())
    }

    #[test]
    fn wall_bounce_negates_normal_component_only() -> Result<()> {
        let p = disk(1, [0.5, 1.75], [-2.0, 3.0], 1.0)?;
        let mut ps = vec![p; 5];
        let out = Event::wall(0.25, 4, &p, Wall::Vertical, 1.0)?.execute(&ps);
        assert_eq!(out.len(), 1);
        let (i, q) = out[0];
        assert_eq!(i, 4);
        assert_eq!(q.v, [2.0, 3.0]);
        assert_eq!(q.r, [0.5, 1.75]);
        assert!(q.colliding);

        let out = Event::wall(0.0, 4, &p, Wall::Horizontal, 1.0)?.execute(&ps);
        assert_eq!(out[0].1.v, [-2.0, -3.0]);

        let out = Event::wall(0.0, 4, &p, Wall::Middle, 0.0)?.execute(&ps);
        assert_eq!(out[0].1.v[X], 2.0);
        assert_eq!(out[0].1.v[Y], 3.0);

        // turned away by an earlier tied event: no second reflection, no pressure
        let ev = Event::wall(0.0, 4, &p, Wall::Vertical, 1.0)?;
        ps[4].v = [2.0, 3.0];
        assert_eq!(ev.execute(&ps)[0].1.v, [2.0, 3.0]);
        assert_eq!(ev.pressure(&ps), Some(0.0));
        Ok(())
    }

    #[test]
    fn wall_pressure_contribution() -> Result<()> {
        // speed 5, mass 2, length 4: 2 * 2 * 5 / 4 = 5
        let ps = [disk(1, [1.0, 1.0], [3.0, 4.0], 2.0)?];
        let ev = Event::wall(1.0, 0, &ps[0], Wall::Horizontal, 4.0)?;
        assert_eq!(ev.pressure(&ps), Some(5.0));
        let mid = Event::wall(1.0, 0, &ps[0], Wall::Middle, 0.0)?;
        assert_eq!(mid.pressure(&ps), None);
        Ok(())
    }

    #[test]
    fn participants() -> Result<()> {
        let ev = Event::points(1.0, 3, 1)?;
        assert_eq!(ev.first_index(), 1);
        assert!(ev.involves(3) && ev.involves(1) && !ev.involves(0));
        Ok(())
    }
}
