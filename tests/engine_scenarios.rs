use gasdiffusion::core::{BoxGeometry, EventKind, GasDiffusion, Particle, Wall};
use gasdiffusion::error::Result;
use gasdiffusion::setup::{initial_particles, StaticConfig, DEFAULT_MAX_TRIES};

const EPS: f64 = 1e-9;

/// Head-on collision of two equal disks: contact after 4.5, velocities swapped.
#[test]
fn head_on_pair_swaps_velocities() -> Result<()> {
    let mut engine = GasDiffusion::new(BoxGeometry::new(40.0, 10.0, 2.0)?);
    let particles = vec![
        Particle::new(1, [0.0, 5.0], [1.0, 0.0], 0.5, 1.0)?,
        Particle::new(2, [10.0, 5.0], [-1.0, 0.0], 0.5, 1.0)?,
    ];

    let step = engine.run(particles);
    assert!((step.collision_time - 4.5).abs() < EPS);
    assert_eq!(step.events.len(), 1);
    assert!(matches!(step.events[0].kind, EventKind::Points { i: 0, j: 1, .. }));

    let (a, b) = (&step.particles[0], &step.particles[1]);
    assert!((a.v[0] + 1.0).abs() < EPS, "vx1 = {}", a.v[0]);
    assert!((b.v[0] - 1.0).abs() < EPS, "vx2 = {}", b.v[0]);
    assert!((a.x() - 4.5).abs() < EPS);
    assert!((b.x() - 5.5).abs() < EPS);
    assert!(a.colliding && b.colliding);
    assert_eq!(step.left_side_fraction, 1.0);
    assert_eq!(step.pressure, 0.0);
    Ok(())
}

/// A lone disk in a box whose partition is fully open bounces off the four outer walls.
#[test]
fn single_particle_bounces_off_every_outer_wall() -> Result<()> {
    let (width, height, radius, mass) = (4.0, 2.0, 0.1, 2.0);
    let mut engine = GasDiffusion::new(BoxGeometry::new(width, height, height)?);
    let mut particles = vec![Particle::new(1, [1.0, 1.0], [1.0, 0.7], radius, mass)?];
    let speed = particles[0].speed();

    let (mut left, mut right, mut bottom, mut top) = (false, false, false, false);
    let mut accumulated = 0.0;
    for _ in 0..40 {
        let step = engine.run(particles);
        assert!(step.collision_time >= 0.0);
        assert_eq!(step.events.len(), 1);

        let p = step.particles[0];
        assert!(p.x() >= radius - EPS && p.x() <= width - radius + EPS, "x = {}", p.x());
        assert!(p.y() >= radius - EPS && p.y() <= height - radius + EPS, "y = {}", p.y());
        assert!((p.speed() - speed).abs() < EPS);

        let expected_fraction = if p.x() <= width / 2.0 { 1.0 } else { 0.0 };
        assert_eq!(step.left_side_fraction, expected_fraction);

        match step.events[0].kind {
            EventKind::Wall { wall: Wall::Horizontal, .. } => {
                assert!((step.pressure - 2.0 * mass * speed / width).abs() < EPS);
                if p.y() < height / 2.0 {
                    bottom = true;
                } else {
                    top = true;
                }
            }
            EventKind::Wall { wall: Wall::Vertical, .. } => {
                assert!((step.pressure - 2.0 * mass * speed / height).abs() < EPS);
                if p.x() < width / 2.0 {
                    left = true;
                } else {
                    right = true;
                }
            }
            ref other => panic!("unexpected event {other:?}"),
        }
        accumulated += step.pressure;
        particles = step.particles;
    }

    assert!(left && right && bottom && top);
    assert!((engine.total_pressure() - accumulated).abs() < EPS);
    assert!((engine.current_pressure() - accumulated).abs() < EPS);
    engine.reset_current_pressure();
    assert_eq!(engine.current_pressure(), 0.0);
    Ok(())
}

#[test]
fn empty_system_is_a_no_op() -> Result<()> {
    let mut engine = GasDiffusion::new(BoxGeometry::new(4.0, 2.0, 1.0)?);
    let step = engine.run(Vec::new());
    assert!(step.particles.is_empty());
    assert!(step.is_idle());
    assert_eq!(step.collision_time, 0.0);
    assert_eq!(step.left_side_fraction, 0.0);
    assert_eq!(engine.total_pressure(), 0.0);
    Ok(())
}

/// A pair collision and an unrelated wall hit at the same instant are both resolved.
#[test]
fn tied_events_are_all_resolved() -> Result<()> {
    let mut engine = GasDiffusion::new(BoxGeometry::new(40.0, 10.0, 2.0)?);
    let particles = vec![
        Particle::new(1, [2.0, 5.0], [1.0, 0.0], 0.5, 1.0)?,
        Particle::new(2, [6.0, 5.0], [-1.0, 0.0], 0.5, 1.0)?,
        Particle::new(3, [15.0, 8.0], [0.0, 1.0], 0.5, 1.0)?,
    ];

    let step = engine.run(particles);
    assert!((step.collision_time - 1.5).abs() < EPS);
    assert_eq!(step.events.len(), 2);
    assert!(matches!(step.events[0].kind, EventKind::Points { .. }));
    assert!(matches!(
        step.events[1].kind,
        EventKind::Wall { i: 2, wall: Wall::Horizontal, .. }
    ));

    assert!((step.particles[0].v[0] + 1.0).abs() < EPS);
    assert!((step.particles[1].v[0] - 1.0).abs() < EPS);
    assert!((step.particles[2].v[1] + 1.0).abs() < EPS);
    assert!((step.particles[2].y() - 9.5).abs() < EPS);
    assert!(step.particles.iter().all(|p| p.colliding));
    assert!((step.pressure - 2.0 / 40.0).abs() < EPS);
    Ok(())
}

/// A disk aimed at the solid part of the partition bounces back without pressure.
#[test]
fn partition_reflects_below_the_opening() -> Result<()> {
    let mut engine = GasDiffusion::new(BoxGeometry::new(4.0, 2.0, 1.0)?);
    let particles = vec![Particle::new(1, [1.0, 0.2], [1.0, 0.0], 0.1, 1.0)?];

    let step = engine.run(particles);
    assert!((step.collision_time - 0.9).abs() < EPS);
    assert!(matches!(step.events[0].kind, EventKind::Wall { wall: Wall::Middle, .. }));
    assert!((step.particles[0].v[0] + 1.0).abs() < EPS);
    assert_eq!(step.pressure, 0.0);
    assert_eq!(engine.total_pressure(), 0.0);
    Ok(())
}

/// A disk inside the opening band crosses to the right half.
#[test]
fn disk_passes_through_the_opening() -> Result<()> {
    let mut engine = GasDiffusion::new(BoxGeometry::new(4.0, 2.0, 1.0)?);
    let mut particles = vec![Particle::new(1, [1.0, 1.0], [1.0, 0.0], 0.1, 1.0)?];

    let step = engine.run(particles);
    assert!(matches!(step.events[0].kind, EventKind::Wall { wall: Wall::Vertical, .. }));
    assert!((step.collision_time - 2.9).abs() < EPS);
    assert_eq!(step.left_side_fraction, 0.0);
    particles = step.particles;

    let step = engine.run(particles);
    assert!((step.collision_time - 3.8).abs() < EPS);
    assert_eq!(step.left_side_fraction, 1.0);
    Ok(())
}

/// Many steps of a random gas: kinetic energy is conserved and nobody leaves the box.
#[test]
fn random_gas_conserves_energy_and_stays_in_the_box() -> Result<()> {
    let config = StaticConfig::uniform(30, 1.0, 0.01, 0.0015, 0.09, 0.24)?;
    let mut engine = GasDiffusion::new(config.geometry(0.02)?);
    let mut particles = initial_particles(&config, DEFAULT_MAX_TRIES, Some(42))?;
    let energy = |ps: &[Particle]| ps.iter().map(Particle::kinetic_energy).sum::<f64>();
    let e0 = energy(&particles);

    for _ in 0..2_000 {
        let step = engine.run(particles);
        assert!(!step.is_idle());
        assert!(step.collision_time >= 0.0);
        particles = step.particles;
    }

    let e1 = energy(&particles);
    assert!(((e1 - e0) / e0).abs() < 1e-9, "energy drifted from {e0} to {e1}");
    let tol = 1e-9;
    for p in &particles {
        assert!(p.x() >= p.radius - tol && p.x() <= config.width - p.radius + tol);
        assert!(p.y() >= p.radius - tol && p.y() <= config.height - p.radius + tol);
    }
    assert!(engine.total_pressure() > 0.0);
    Ok(())
}
