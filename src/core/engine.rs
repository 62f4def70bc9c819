use crate::core::geometry::{collision_time, time_to_hit_middle_wall, time_to_hit_wall};
use crate::core::wall::{BoxGeometry, Wall};
use crate::core::{Event, Particle};
use std::cmp::Ordering;
use tracing::{debug, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Outcome of one engine step.
#[derive(Debug, Clone)]
pub struct StepData {
    /// The new generation of particles, advanced to the event time and resolved.
    pub particles: Vec<Particle>,
    /// Time elapsed in this step (0 when nothing happened).
    pub collision_time: f64,
    /// Fraction of particles with `x <= W/2`.
    pub left_side_fraction: f64,
    /// Pressure contributed by the events of this step.
    pub pressure: f64,
    /// Every event resolved in this step (all tied at `collision_time`).
    pub events: Vec<Event>,
}

impl StepData {
    /// True when no event could be found: the particles were returned unchanged.
    pub fn is_idle(&self) -> bool {
        self.events.is_empty()
    }
}

/// Events sharing the earliest time seen so far.
///
/// `merge` is associative and commutative up to the order of the collected events, so
/// partial results can be combined in any order.
#[derive(Debug, Clone, Default)]
pub struct TieSet {
    events: Vec<Event>,
}

impl TieSet {
    /// Earliest time, if any event was found.
    pub fn time(&self) -> Option<f64> {
        self.events.first().map(Event::time_f64)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    pub fn merge(mut self, mut other: TieSet) -> TieSet {
        let ordering = match (self.events.first(), other.events.first()) {
            (None, _) => return other,
            (_, None) => return self,
            (Some(a), Some(b)) => a.time.cmp(&b.time),
        };
        match ordering {
            Ordering::Less => self,
            Ordering::Greater => other,
            Ordering::Equal => {
                self.events.append(&mut other.events);
                self
            }
        }
    }
}

impl From<Option<Event>> for TieSet {
    fn from(event: Option<Event>) -> Self {
        Self {
            events: event.into_iter().collect(),
        }
    }
}

/// Event-driven collision engine for a box split by a partition with an opening.
///
/// Holds no particle state between calls: each [`run`](Self::run) takes the current
/// generation and returns the next one. The only state carried across calls is the
/// pressure accumulated since the last [`reset_current_pressure`](Self::reset_current_pressure)
/// and over the whole run.
#[derive(Debug, Clone)]
pub struct GasDiffusion {
    geometry: BoxGeometry,
    current_pressure: f64,
    total_pressure: f64,
}

impl GasDiffusion {
    pub fn new(geometry: BoxGeometry) -> Self {
        Self {
            geometry,
            current_pressure: 0.0,
            total_pressure: 0.0,
        }
    }

    pub fn geometry(&self) -> &BoxGeometry {
        &self.geometry
    }

    /// Pressure accumulated since the last reset.
    pub fn current_pressure(&self) -> f64 {
        self.current_pressure
    }

    /// Pressure accumulated since the engine was created.
    pub fn total_pressure(&self) -> f64 {
        self.total_pressure
    }

    /// Start a new reporting interval.
    pub fn reset_current_pressure(&mut self) {
        self.current_pressure = 0.0;
    }

    /// Fraction of `particles` on the left of the partition (`x <= W/2`); 0 when empty.
    pub fn left_side_fraction(&self, particles: &[Particle]) -> f64 {
        if particles.is_empty() {
            return 0.0;
        }
        let mid = self.geometry.middle_x();
        let left = particles.iter().filter(|p| p.x() <= mid).count();
        left as f64 / particles.len() as f64
    }

    /// Advance the system to its next event and resolve every event tied at that time.
    pub fn run(&mut self, particles: Vec<Particle>) -> StepData {
        if particles.is_empty() {
            return StepData {
                particles,
                collision_time: 0.0,
                left_side_fraction: 0.0,
                pressure: 0.0,
                events: Vec::new(),
            };
        }

        let ties = self.predict(&particles);
        let Some(time) = ties.time() else {
            debug!(n = particles.len(), "no finite event");
            let left_side_fraction = self.left_side_fraction(&particles);
            return StepData {
                particles,
                collision_time: 0.0,
                left_side_fraction,
                pressure: 0.0,
                events: Vec::new(),
            };
        };
        let events = ties.into_events();
        debug!(time, ties = events.len(), "next event");

        // Free flight for everyone; the left side is counted on these positions.
        let mid = self.geometry.middle_x();
        let mut left = 0usize;
        let mut next = Vec::with_capacity(particles.len());
        for p in &particles {
            let q = p.moved(time);
            if q.x() <= mid {
                left += 1;
            }
            next.push(q);
        }

        // Tied events resolve one after another against the generation being built, so
        // a particle shared by two of them carries the first outcome into the second.
        let mut pressure = 0.0;
        for ev in &events {
            if let Some(contribution) = ev.pressure(&next) {
                pressure += contribution;
            }
            for (idx, p) in ev.execute(&next) {
                next[idx] = p;
            }
        }
        self.current_pressure += pressure;
        self.total_pressure += pressure;

        StepData {
            left_side_fraction: left as f64 / next.len() as f64,
            particles: next,
            collision_time: time,
            pressure,
            events,
        }
    }

    /// Earliest events of the system, sorted by their lowest participant index.
    pub fn predict(&self, particles: &[Particle]) -> TieSet {
        #[cfg(feature = "parallel")]
        let ties = (0..particles.len())
            .into_par_iter()
            .map(|i| TieSet::from(self.predict_for(particles, i)))
            .reduce(TieSet::default, TieSet::merge);

        #[cfg(not(feature = "parallel"))]
        let ties = (0..particles.len())
            .map(|i| TieSet::from(self.predict_for(particles, i)))
            .fold(TieSet::default(), TieSet::merge);

        let mut ties = ties;
        ties.events.sort_by_key(Event::first_index);
        ties
    }

    /// Earliest event of particle `i`: pair collisions with every higher index and the
    /// three kinds of walls.
    fn predict_for(&self, particles: &[Particle], i: usize) -> Option<Event> {
        let p = &particles[i];
        let mut best: Option<Event> = None;

        for (j, q) in particles.iter().enumerate().skip(i + 1) {
            if let Some(t) = admissible(collision_time(p, q)) {
                if is_earlier(t, &best) {
                    best = Event::points(t, i, j).ok();
                }
            }
        }

        let g = &self.geometry;
        let walls = [
            (Wall::Horizontal, time_to_hit_wall(p, Wall::Horizontal, 0.0, g.height())),
            (Wall::Vertical, time_to_hit_wall(p, Wall::Vertical, 0.0, g.width())),
            (
                Wall::Middle,
                time_to_hit_middle_wall(p, g.middle_x(), g.height(), g.opening()),
            ),
        ];
        for (wall, t) in walls {
            if let Some(t) = admissible(t) {
                if is_earlier(t, &best) {
                    best = Event::wall(t, i, p, wall, g.wall_length(wall)).ok();
                }
            }
        }

        best
    }
}

/// Finite contact times only. A slightly negative time means the contact is already
/// under way (rounding left the disks touching or overlapping) and it fires now.
fn admissible(t: f64) -> Option<f64> {
    debug_assert!(!t.is_nan(), "contact time is NaN");
    if !t.is_finite() {
        return None;
    }
    if t < 0.0 {
        trace!(t, "negative contact time clamped to 0");
        return Some(0.0);
    }
    Some(t)
}

#[inline]
fn is_earlier(t: f64, best: &Option<Event>) -> bool {
    best.as_ref().map_or(true, |b| t < b.time_f64())
}
