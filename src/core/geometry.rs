//! Free-flight contact times and distances. Pure functions, no state.
//!
//! Every function returns `f64::INFINITY` when the contact never happens; none of them
//! divides by a zero velocity.

use crate::core::particle::{dot, Particle, DIM, X, Y};
use crate::core::wall::Wall;

/// Surface-to-surface gap between two disks (negative when they overlap).
pub fn distance_between(p1: &Particle, p2: &Particle) -> f64 {
    let d = sub(&p2.r, &p1.r);
    dot(&d, &d).sqrt() - p1.radius - p2.radius
}

/// Time until the surfaces of `p1` and `p2` first touch, or infinity when they are not
/// approaching or their trajectories miss.
///
/// With Δr = r2 − r1, Δv = v2 − v1 and σ = R1 + R2, contact happens at the smaller root
/// of |Δr + Δv t| = σ. A zero discriminant (grazing contact) is a valid hit.
pub fn collision_time(p1: &Particle, p2: &Particle) -> f64 {
    let dr = sub(&p2.r, &p1.r);
    let dv = sub(&p2.v, &p1.v);

    let vr = dot(&dv, &dr);
    if vr >= 0.0 {
        return f64::INFINITY;
    }

    let vv = dot(&dv, &dv);
    let rr = dot(&dr, &dr);
    let sigma = p1.radius + p2.radius;

    let d = vr * vr - vv * (rr - sigma * sigma);
    if d < 0.0 {
        return f64::INFINITY;
    }

    -(vr + d.sqrt()) / vv
}

/// Time until the near surface of `particle` touches the wall perpendicular to
/// `wall.normal_axis()` placed at `low_bound` (when moving towards lower coordinates) or
/// `high_bound` (when moving towards higher ones).
pub fn time_to_hit_wall(particle: &Particle, wall: Wall, low_bound: f64, high_bound: f64) -> f64 {
    let axis = wall.normal_axis();
    let v = particle.v[axis];
    let r = particle.r[axis];

    if v == 0.0 {
        return f64::INFINITY;
    }
    if v < 0.0 {
        return (low_bound + particle.radius - r) / v;
    }
    (high_bound - particle.radius - r) / v
}

/// Time until `particle` strikes a solid segment of the partition at `x_position`, whose
/// centered opening is `opening` high in a box `box_height` high.
///
/// Only a particle whose center is on the side it is moving away from can hit the
/// partition. If at contact time the disk fits strictly inside the opening band it passes
/// through and the result is infinity. A disk touching a band edge exactly still hits.
pub fn time_to_hit_middle_wall(
    particle: &Particle,
    x_position: f64,
    box_height: f64,
    opening: f64,
) -> f64 {
    let vx = particle.v[X];
    if vx == 0.0 {
        return f64::INFINITY;
    }

    let eligible = if vx < 0.0 {
        particle.x() > x_position
    } else {
        particle.x() < x_position
    };
    if !eligible {
        return f64::INFINITY;
    }

    let t = time_to_hit_wall(particle, Wall::Middle, x_position, x_position);

    // A disk already straddling the partition is judged where it stands.
    let y = particle.y() + particle.v[Y] * t.max(0.0);
    let low = box_height / 2.0 - opening / 2.0;
    let high = box_height / 2.0 + opening / 2.0;
    if y - particle.radius > low && y + particle.radius < high {
        return f64::INFINITY;
    }
    t
}

#[inline]
fn sub(a: &[f64; DIM], b: &[f64; DIM]) -> [f64; DIM] {
    let mut out = [0.0_f64; DIM];
    for (k, o) in out.iter_mut().enumerate() {
        *o = a[k] - b[k];
    }
    out
}
